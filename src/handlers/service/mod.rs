//! Service endpoints.
//!
//! Beyond plain CRUD, most service mutations go through the
//! `DoActionOnServer` dispatch endpoint; see [`actions`]. A service detail
//! fetch is a composite: the base payload plus up to six sequential
//! follow-up calls for ancillary data (env, credentials, firewall rules,
//! domains, SSH keys), each of which degrades to an empty value while the
//! deployment is still in progress.

mod actions;
mod types;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::parse_json;

use actions::{DEFAULT_ALERT_CYCLE_SECS, DEFAULT_ALERT_RULES, ServerAction};
pub use types::{
    CreateServiceRequest, SERVICE_DEPLOYMENT_STATUS_DEPLOYED,
    SERVICE_DEPLOYMENT_STATUS_IN_PROGRESS, SERVICE_FIREWALL_RULE_PROTOCOL_TCP,
    SERVICE_FIREWALL_RULE_PROTOCOL_UDP, SERVICE_FIREWALL_RULE_TYPE_INPUT,
    SERVICE_FIREWALL_RULE_TYPE_OUTPUT, SERVICE_STATUS_DELETING, SERVICE_STATUS_MIGRATING,
    SERVICE_STATUS_RUNNING, SERVICE_STATUS_STOPPED, Service, ServiceAdmin, ServiceDatabaseAdmin,
    ServiceFirewallRule, ServiceSshPublicKey, Template, ValidateConfigRequest,
};

/// Client handler for service endpoints.
pub struct ServiceHandler<'a> {
    pub(crate) client: &'a Client,
}

impl ServiceHandler<'_> {
    /// List the public template catalog.
    ///
    /// The only endpoint that works without a session.
    pub async fn templates(&self) -> Result<Vec<Template>> {
        #[derive(Deserialize)]
        struct TemplatesResponse {
            #[serde(default)]
            instances: Vec<Template>,
        }

        let url = format!("{}/api/servers/getTemplates", self.client.base_url);
        let text = self.client.send_get(&url).await?;

        let res: TemplatesResponse = parse_json(&text)?;
        if res.instances.is_empty() {
            return Err(Error::NotFound {
                resource: "templates".to_string(),
                id: None,
            });
        }

        Ok(res
            .instances
            .into_iter()
            .map(|mut template| {
                // Catalog logos come back protocol-relative.
                template.logo = template.logo.replacen("//", "https://", 1);
                template
            })
            .collect())
    }

    /// Get a service by id, with ancillary data resolved.
    pub async fn get(&self, project_id: &str, service_id: &str) -> Result<Service> {
        #[derive(Serialize)]
        struct GetRequest<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "vmID")]
            service_id: &'a str,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct GetResponse {
            #[serde(rename = "serviceInfos", default)]
            services: Vec<Service>,
        }

        let url = format!("{}/api/servers/getServerDetails", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &GetRequest {
                    project_id,
                    service_id,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: GetResponse = parse_json(&text)?;
        let service = res
            .services
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "service".to_string(),
                id: Some(service_id.to_string()),
            })?;

        self.format_service(service).await
    }

    /// List the active services of a project, with ancillary data resolved
    /// per service. An empty list is a valid result.
    pub async fn list(&self, project_id: &str) -> Result<Vec<Service>> {
        #[derive(Serialize)]
        struct ListRequest<'a> {
            #[serde(rename = "projectId")]
            project_id: &'a str,
            #[serde(rename = "appid")]
            app_id: &'a str,
            #[serde(rename = "isActiveService")]
            is_active_service: bool,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct ListResponse {
            #[serde(rename = "servers", default)]
            services: Vec<Service>,
        }

        let url = format!("{}/api/servers/getServices", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &ListRequest {
                    project_id,
                    app_id: "",
                    is_active_service: true,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: ListResponse = parse_json(&text)?;

        let mut services = Vec::with_capacity(res.services.len());
        for service in res.services {
            services.push(self.format_service(service).await?);
        }

        Ok(services)
    }

    /// Check a deployment configuration against the provider catalog
    /// without creating anything.
    pub async fn validate_config(&self, req: &ValidateConfigRequest) -> Result<bool> {
        let url = format!("{}/api/servers/validate", self.client.base_url);
        self.client.send_post(&url, req).await?;
        Ok(true)
    }

    /// Create a service and return its formatted representation.
    pub async fn create(&self, mut req: CreateServiceRequest) -> Result<Service> {
        if req.created_from.is_empty() {
            req.created_from = "rustClient".to_string();
        }

        #[derive(Serialize)]
        struct FullRequest<'a> {
            #[serde(flatten)]
            req: &'a CreateServiceRequest,
            data: &'a str,
            #[serde(rename = "appid")]
            app_id: &'a str,
            #[serde(rename = "deploymentServiceType")]
            deployment_service_type: &'a str,
            #[serde(rename = "serviceType")]
            service_type: &'a str,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct CreateResponse {
            #[serde(default)]
            data: Vec<Service>,
        }

        let url = format!("{}/api/servers/createServer", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &FullRequest {
                    req: &req,
                    data: "",
                    app_id: "",
                    deployment_service_type: "normal",
                    service_type: "Service",
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: CreateResponse = parse_json(&text)?;
        let service = res.data.into_iter().next().ok_or_else(|| Error::Decode {
            detail: "createServer response contained no service".to_string(),
        })?;

        self.format_service(service).await
    }

    /// Delete a service, optionally keeping its backups.
    pub async fn delete(&self, project_id: &str, service_id: &str, keep_backups: bool) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteRequest<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "vmID")]
            service_id: &'a str,
            #[serde(rename = "isDeleteServiceWithBackup")]
            is_without_backup: bool,
            jwt: &'a str,
        }

        let url = format!("{}/api/servers/deleteServer", self.client.base_url);
        self.client
            .send_post(
                &url,
                &DeleteRequest {
                    project_id,
                    service_id,
                    is_without_backup: !keep_backups,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        Ok(())
    }

    /// Switch the deployed software to another version tag.
    pub async fn update_version(&self, service_id: &str, new_version: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::ChangeVersion {
                version: new_version.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    /// Move the service to a bigger server type.
    ///
    /// Upgrade only; the service reboots within a few minutes.
    pub async fn update_server_type(
        &self,
        service_id: &str,
        new_server_type: &str,
        provider_name: &str,
        datacenter: &str,
    ) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::ChangeServerType {
                server_type: new_server_type.to_string(),
                provider_name: provider_name.to_string(),
                datacenter: datacenter.to_string(),
                upgrade_cpu_ram_only: false,
            },
        )
        .await?;
        Ok(())
    }

    /// Enable application auto-updates on the default schedule.
    pub async fn enable_app_auto_updates(&self, service_id: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::EnableAppAutoUpdates {
                day_of_week: "0".to_string(),
                hour: "1".to_string(),
                minute: "00".to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn disable_app_auto_updates(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::DisableAppAutoUpdates)
            .await?;
        Ok(())
    }

    /// Enable system auto-updates on the default reboot schedule.
    pub async fn enable_system_auto_updates(
        &self,
        service_id: &str,
        security_patches_only: bool,
    ) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::EnableSystemAutoUpdates {
                day_of_week: "0".to_string(),
                hour: "5".to_string(),
                minute: "00".to_string(),
                security_patches_only,
            },
        )
        .await?;
        Ok(())
    }

    pub async fn disable_system_auto_updates(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::DisableSystemAutoUpdates)
            .await?;
        Ok(())
    }

    pub async fn enable_backups(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::EnableBackups)
            .await?;
        Ok(())
    }

    pub async fn disable_backups(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::DisableBackups)
            .await?;
        Ok(())
    }

    /// Enable scheduled remote backups with the standard path and hour.
    pub async fn enable_remote_backups(&self, service_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct SetupRequest<'a> {
            jwt: &'a str,
            #[serde(rename = "serverID")]
            service_id: &'a str,
            #[serde(rename = "backupPath")]
            backup_path: &'a str,
            #[serde(rename = "backupHour")]
            backup_hour: i64,
        }

        let url = format!("{}/api/backups/SetupAutoBackups", self.client.base_url);
        self.client
            .send_post(
                &url,
                &SetupRequest {
                    jwt: &self.client.jwt,
                    service_id,
                    backup_path: "/opt",
                    backup_hour: 4,
                },
            )
            .await?;

        Ok(())
    }

    pub async fn disable_remote_backups(&self, service_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct DisableRequest<'a> {
            jwt: &'a str,
            #[serde(rename = "serverID")]
            service_id: &'a str,
        }

        let url = format!("{}/api/backups/DisableAutoBackups", self.client.base_url);
        self.client
            .send_post(
                &url,
                &DisableRequest {
                    jwt: &self.client.jwt,
                    service_id,
                },
            )
            .await?;

        Ok(())
    }

    /// Enable resource alerts with the default rule set.
    pub async fn enable_alerts(&self, service_id: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::EnableAlerts {
                monit_cycle_in_seconds: DEFAULT_ALERT_CYCLE_SECS,
                rules: DEFAULT_ALERT_RULES.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn disable_alerts(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::DisableAlerts)
            .await?;
        Ok(())
    }

    /// Enable the firewall with the given rule set.
    ///
    /// Rule types are validated before any network call; only
    /// [`SERVICE_FIREWALL_RULE_TYPE_INPUT`] and
    /// [`SERVICE_FIREWALL_RULE_TYPE_OUTPUT`] are accepted.
    pub async fn enable_firewall_with_rules(
        &self,
        service_id: &str,
        rules: &[ServiceFirewallRule],
    ) -> Result<()> {
        for rule in rules {
            if rule.rule_type != SERVICE_FIREWALL_RULE_TYPE_INPUT
                && rule.rule_type != SERVICE_FIREWALL_RULE_TYPE_OUTPUT
            {
                return Err(Error::InvalidParameter {
                    param: "type".to_string(),
                    detail: format!(
                        "invalid rule type '{}': only '{}' and '{}' are supported",
                        rule.rule_type,
                        SERVICE_FIREWALL_RULE_TYPE_INPUT,
                        SERVICE_FIREWALL_RULE_TYPE_OUTPUT
                    ),
                });
            }
        }

        let rules_json = serde_json::to_string(rules).map_err(|e| Error::Serialization {
            detail: e.to_string(),
        })?;

        self.dispatch(service_id, &ServerAction::EnableFirewall { rules: rules_json })
            .await?;
        Ok(())
    }

    pub async fn disable_firewall(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::DisableFirewall)
            .await?;
        Ok(())
    }

    /// Attach a custom domain name (SSL is provisioned upstream).
    pub async fn add_custom_domain_name(&self, service_id: &str, domain: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::AddCustomDomain {
                domain: domain.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn remove_custom_domain_name(&self, service_id: &str, domain: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::RemoveCustomDomain {
                domain: domain.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn add_ssh_public_key(&self, service_id: &str, name: &str, key: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::AddSshPublicKey {
                name: name.to_string(),
                key: key.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn remove_ssh_public_key(&self, service_id: &str, name: &str) -> Result<()> {
        self.dispatch(
            service_id,
            &ServerAction::RemoveSshPublicKey {
                name: name.to_string(),
            },
        )
        .await?;
        Ok(())
    }

    pub async fn reboot(&self, service_id: &str) -> Result<()> {
        self.dispatch(service_id, &ServerAction::Reboot).await?;
        Ok(())
    }

    /// Environment variables of the deployed app stack.
    ///
    /// Empty while the deployment is in progress; sub-call failures also
    /// degrade to empty rather than failing the composite fetch.
    pub async fn get_service_env(&self, service: &Service) -> Result<HashMap<String, String>> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(HashMap::new());
        }

        #[derive(Deserialize, Default)]
        struct EnvData {
            #[serde(rename = "envResult", default)]
            env: String,
        }

        #[derive(Deserialize)]
        struct EnvResponse {
            #[serde(default)]
            data: EnvData,
        }

        let Ok(text) = self
            .dispatch(
                &service.id,
                &ServerAction::GetAppStackConfig {
                    project_id: service.project_id.clone(),
                    template_id: service.template_id,
                },
            )
            .await
        else {
            return Ok(HashMap::new());
        };

        let Ok(res) = parse_json::<EnvResponse>(&text) else {
            return Ok(HashMap::new());
        };

        let mut env = HashMap::new();
        for line in res.data.env.lines() {
            let mut parts = line.split('=');
            // Lines with more or fewer than one '=' are not variables.
            if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
                env.insert(key.to_string(), value.to_string());
            }
        }

        Ok(env)
    }

    /// Admin UI credentials, or an empty struct while the service is not
    /// deployed.
    pub async fn get_service_admin(&self, service: &Service) -> Result<ServiceAdmin> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(ServiceAdmin::default());
        }

        let Ok(text) = self.fetch_app_credentials(service, None).await else {
            return Ok(ServiceAdmin::default());
        };

        Ok(parse_json::<ServiceAdmin>(&text).unwrap_or_default())
    }

    /// Database admin credentials, or an empty struct for non-database
    /// services and undeployed ones.
    pub async fn get_service_database_admin(
        &self,
        service: &Service,
    ) -> Result<ServiceDatabaseAdmin> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(ServiceDatabaseAdmin::default());
        }

        if service.category != "Databases & Cache" {
            return Ok(ServiceDatabaseAdmin::default());
        }

        let Ok(text) = self.fetch_app_credentials(service, Some("dbAdmin")).await else {
            return Ok(ServiceDatabaseAdmin::default());
        };

        let Ok(admin) = parse_json::<ServiceAdmin>(&text) else {
            return Ok(ServiceDatabaseAdmin::default());
        };

        let host = service.cname.clone();
        let command = service
            .database_admin_command
            .replace("[APP_PASSWORD]", &admin.password)
            .replace("[EMAIL]", &service.admin_email)
            .replace("[DOMAIN]", &host);

        Ok(ServiceDatabaseAdmin {
            host,
            port: service.database_admin_port.clone(),
            user: admin.user,
            password: admin.password,
            command,
        })
    }

    /// Firewall rules (INPUT and OUTPUT), empty while undeployed or when
    /// the firewall is off.
    pub async fn get_service_firewall_rules(
        &self,
        service: &Service,
    ) -> Result<Vec<ServiceFirewallRule>> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(Vec::new());
        }

        if !service.firewall_enabled.as_bool() {
            return Ok(Vec::new());
        }

        #[derive(Deserialize)]
        struct RulesResponse {
            #[serde(default)]
            rules: Vec<ServiceFirewallRule>,
        }

        let Ok(text) = self
            .dispatch(&service.id, &ServerAction::GetFirewallRules)
            .await
        else {
            return Ok(Vec::new());
        };

        Ok(parse_json::<RulesResponse>(&text)
            .map(|r| r.rules)
            .unwrap_or_default())
    }

    /// Custom domain names, with the default service CNAME filtered out.
    ///
    /// This endpoint answers with a bare JSON array, so envelope
    /// validation is skipped.
    pub async fn get_service_custom_domain_names(&self, service: &Service) -> Result<Vec<String>> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(Vec::new());
        }

        let Ok(text) = self
            .dispatch_raw(&service.id, &ServerAction::ListCustomDomains)
            .await
        else {
            return Ok(Vec::new());
        };

        let Ok(mut domains) = parse_json::<Vec<String>>(&text) else {
            return Ok(Vec::new());
        };

        domains.retain(|domain| *domain != service.cname);
        Ok(domains)
    }

    /// SSH public keys registered on the service.
    pub async fn get_service_ssh_public_keys(
        &self,
        service: &Service,
    ) -> Result<Vec<ServiceSshPublicKey>> {
        if service.deployment_status != SERVICE_DEPLOYMENT_STATUS_DEPLOYED {
            return Ok(Vec::new());
        }

        #[derive(Deserialize)]
        struct KeysResponse {
            #[serde(default)]
            data: Vec<ServiceSshPublicKey>,
        }

        let Ok(text) = self
            .dispatch(&service.id, &ServerAction::ListSshPublicKeys)
            .await
        else {
            return Ok(Vec::new());
        };

        Ok(parse_json::<KeysResponse>(&text)
            .map(|r| r.data)
            .unwrap_or_default())
    }

    /// Resolve placeholders and ancillary data on a freshly decoded
    /// service.
    ///
    /// The sub-fetches run strictly sequentially; each degrades to an
    /// empty value on failure, so the caller always receives either a
    /// fully-populated service or a hard error from the base fetch.
    async fn format_service(&self, mut service: Service) -> Result<Service> {
        service.admin_user = service.admin_user.replace("[EMAIL]", &service.admin_email);

        service.env = self.get_service_env(&service).await?;
        service.admin = self.get_service_admin(&service).await?;
        service.database_admin = self.get_service_database_admin(&service).await?;
        service.firewall_rules = self.get_service_firewall_rules(&service).await?;
        service.custom_domain_names = self.get_service_custom_domain_names(&service).await?;
        service.ssh_public_keys = self.get_service_ssh_public_keys(&service).await?;

        Ok(service)
    }

    /// Send one action through the dispatch endpoint.
    async fn dispatch(&self, service_id: &str, action: &ServerAction) -> Result<String> {
        let url = format!("{}/api/servers/DoActionOnServer", self.client.base_url);
        self.client
            .send_post(
                &url,
                &ActionRequest {
                    jwt: &self.client.jwt,
                    service_id,
                    action,
                },
            )
            .await
    }

    /// Like [`dispatch`](Self::dispatch) but without envelope validation,
    /// for actions answering with a bare JSON array.
    async fn dispatch_raw(&self, service_id: &str, action: &ServerAction) -> Result<String> {
        let url = format!("{}/api/servers/DoActionOnServer", self.client.base_url);
        self.client
            .send_post_raw(
                &url,
                &ActionRequest {
                    jwt: &self.client.jwt,
                    service_id,
                    action,
                },
            )
            .await
    }

    async fn fetch_app_credentials(&self, service: &Service, mode: Option<&str>) -> Result<String> {
        #[derive(Serialize)]
        struct CredentialsRequest<'a> {
            jwt: &'a str,
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "vmID")]
            service_id: &'a str,
            #[serde(rename = "appId")]
            app_id: &'a str,
            #[serde(rename = "isServerDeleted")]
            is_server_deleted: bool,
            #[serde(rename = "srvPort")]
            admin_external_port: i64,
            #[serde(rename = "targetPort")]
            admin_internal_port: i64,
            #[serde(skip_serializing_if = "Option::is_none")]
            mode: Option<&'a str>,
        }

        let url = format!("{}/api/servers/getAppCredentials", self.client.base_url);
        self.client
            .send_post(
                &url,
                &CredentialsRequest {
                    jwt: &self.client.jwt,
                    project_id: &service.project_id,
                    service_id: &service.id,
                    app_id: "CloudVM",
                    is_server_deleted: false,
                    admin_external_port: service.admin_external_port,
                    admin_internal_port: service.admin_internal_port,
                    mode,
                },
            )
            .await
    }
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    jwt: &'a str,
    #[serde(rename = "vmID")]
    service_id: &'a str,
    #[serde(flatten)]
    action: &'a ServerAction,
}
