//! Load balancer endpoints.
//!
//! Load balancers share the generic server endpoints (`createServer`,
//! `getServerDetails`, `deleteServer`) with services, distinguished by
//! `serviceType: "LB"`; only the config detail endpoint is their own.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::http::parse_json;
use crate::types::FlexString;

/// Client handler for load balancer endpoints.
pub struct LoadBalancerHandler<'a> {
    pub(crate) client: &'a Client,
}

pub const LOAD_BALANCER_DEPLOYMENT_STATUS_DEPLOYED: &str = "Deployed";
pub const LOAD_BALANCER_DEPLOYMENT_STATUS_IN_PROGRESS: &str = "IN PROGRESS";

/// A load balancer, assembled from the server detail and config endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub project_id: String,
    pub provider_name: String,
    pub datacenter: String,
    pub server_type: String,
    pub config: LoadBalancerConfig,
    pub created_at: String,
    pub creator_name: String,
    pub deployment_status: String,
    pub ipv4: String,
    pub ipv6: String,
    pub cname: String,
    pub country: String,
    pub city: String,
    pub global_ip: String,
    pub cores: i64,
    pub ram_size_gb: String,
    pub storage_size_gb: i64,
    pub price_per_hour: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    pub host_header: String,
    pub is_access_logs_enabled: bool,
    pub is_force_https_enabled: bool,
    pub ip_rate_limit: i64,
    pub is_ip_rate_limit_enabled: bool,
    pub output_cache_in_seconds: i64,
    pub is_sticky_session_enabled: bool,
    pub is_proxy_protocol_enabled: bool,
    pub ssl_domains: Vec<String>,
    pub forward_rules: Vec<LoadBalancerConfigForwardRule>,
    pub output_headers: Vec<LoadBalancerConfigOutputHeader>,
    pub target_services: Vec<String>,
    pub remove_response_headers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancerConfigForwardRule {
    pub protocol: String,
    #[serde(rename = "listeningPort")]
    pub port: String,
    #[serde(rename = "targetProtocol")]
    pub target_protocol: String,
    #[serde(rename = "targetPort")]
    pub target_port: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancerConfigOutputHeader {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLoadBalancerRequest {
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "providerName")]
    pub provider_name: String,
    pub datacenter: String,
    #[serde(rename = "serverType")]
    pub server_type: String,
    #[serde(rename = "loadBalancerPayload")]
    pub config: CreateLoadBalancerRequestConfig,
    #[serde(rename = "createdFrom")]
    pub created_from: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateLoadBalancerRequestConfig {
    #[serde(rename = "hostHeader")]
    pub host_header: String,
    #[serde(rename = "accessLog")]
    pub is_access_logs_enabled: bool,
    #[serde(rename = "forceHttps")]
    pub is_force_https_enabled: bool,
    #[serde(rename = "ipRateLimit")]
    pub ip_rate_limit: i64,
    #[serde(rename = "isIpRateLimiter")]
    pub is_ip_rate_limit_enabled: bool,
    #[serde(rename = "outputCache")]
    pub output_cache_in_seconds: i64,
    #[serde(rename = "stickySession")]
    pub is_sticky_session_enabled: bool,
    #[serde(rename = "proxyProtocol")]
    pub is_proxy_protocol_enabled: bool,
    #[serde(rename = "sslDomains")]
    pub ssl_domains: Vec<String>,
    #[serde(rename = "forwardRules")]
    pub forward_rules: Vec<LoadBalancerConfigForwardRule>,
    #[serde(rename = "outputHeaders")]
    pub output_headers: Vec<LoadBalancerConfigOutputHeader>,
    #[serde(rename = "targetServiceIDs")]
    pub target_services: Vec<String>,
    #[serde(rename = "removeResponseHeaders")]
    pub remove_response_headers: Vec<String>,
}

/// Same field set as the create config; the update endpoint takes it as a
/// flat sibling of the action discriminator instead of nested.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLoadBalancerConfigRequest {
    #[serde(rename = "hostHeader")]
    pub host_header: String,
    #[serde(rename = "accessLog")]
    pub is_access_logs_enabled: bool,
    #[serde(rename = "forceHttps")]
    pub is_force_https_enabled: bool,
    #[serde(rename = "ipRateLimit")]
    pub ip_rate_limit: i64,
    #[serde(rename = "isIpRateLimiter")]
    pub is_ip_rate_limit_enabled: bool,
    #[serde(rename = "outputCache")]
    pub output_cache_in_seconds: i64,
    #[serde(rename = "stickySession")]
    pub is_sticky_session_enabled: bool,
    #[serde(rename = "proxyProtocol")]
    pub is_proxy_protocol_enabled: bool,
    #[serde(rename = "sslDomains")]
    pub ssl_domains: Vec<String>,
    #[serde(rename = "forwardRules")]
    pub forward_rules: Vec<LoadBalancerConfigForwardRule>,
    #[serde(rename = "outputHeaders")]
    pub output_headers: Vec<LoadBalancerConfigOutputHeader>,
    #[serde(rename = "targetServiceIDs")]
    pub target_services: Vec<String>,
    #[serde(rename = "removeResponseHeaders")]
    pub remove_response_headers: Vec<String>,
}

/// Shared fields of the `getServerDetails` entries for load balancers.
#[derive(Debug, Default, Deserialize)]
struct LbDetails {
    #[serde(rename = "creationDate", default)]
    created_at: String,
    #[serde(rename = "creatorName", default)]
    creator_name: String,
    #[serde(rename = "deploymentStatus", default)]
    deployment_status: String,
    #[serde(default)]
    ipv4: String,
    #[serde(default)]
    ipv6: String,
    #[serde(default)]
    cname: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    city: String,
    #[serde(rename = "globalIP", default)]
    global_ip: String,
    #[serde(default)]
    cores: i64,
    #[serde(rename = "ramGB", default)]
    ram_size_gb: String,
    #[serde(rename = "storageSizeGB", default)]
    storage_size_gb: i64,
    #[serde(rename = "pricePerHour", default)]
    price_per_hour: String,
}

#[derive(Debug, Default, Deserialize)]
struct LbConfigData {
    #[serde(rename = "projectID", default)]
    project_id: String,
    #[serde(rename = "providerName", default)]
    provider_name: String,
    #[serde(rename = "providerRegion", default)]
    datacenter: String,
    #[serde(rename = "planType", default)]
    server_type: String,
    #[serde(rename = "hostHeader", default)]
    host_header: String,
    #[serde(rename = "accessLog", default)]
    is_access_logs_enabled: bool,
    #[serde(rename = "forceHttps", default)]
    is_force_https_enabled: bool,
    #[serde(rename = "ipRateLimit", default)]
    ip_rate_limit: i64,
    #[serde(rename = "isIpRateLimiter", default)]
    is_ip_rate_limit_enabled: bool,
    #[serde(rename = "outputCache", default)]
    output_cache_in_seconds: i64,
    #[serde(rename = "isStickySessions", default)]
    is_sticky_session_enabled: bool,
    #[serde(rename = "proxyProtocol", default)]
    is_proxy_protocol_enabled: bool,
    #[serde(rename = "sslDomains", default)]
    ssl_domains: Vec<String>,
    #[serde(rename = "forwardingRules", default)]
    forward_rules: Vec<LoadBalancerConfigForwardRule>,
    #[serde(rename = "outputHeaders", default)]
    output_headers: Vec<LoadBalancerConfigOutputHeader>,
    #[serde(rename = "targetServiceIDs", default)]
    target_services: Vec<String>,
    #[serde(rename = "removeResponseHeaders", default)]
    remove_response_headers: Vec<String>,
}

impl LoadBalancerHandler<'_> {
    /// Get a load balancer by id.
    ///
    /// Two sequential calls: the generic server detail endpoint for the
    /// machine facts and the load balancer config endpoint for the
    /// forwarding setup; merged into one flat struct.
    pub async fn get(&self, project_id: &str, load_balancer_id: &str) -> Result<LoadBalancer> {
        #[derive(Serialize)]
        struct DetailsRequest<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "vmID")]
            load_balancer_id: &'a str,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct DetailsResponse {
            #[serde(rename = "serviceInfos", default)]
            services: Vec<LbDetails>,
        }

        let url = format!("{}/api/servers/getServerDetails", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &DetailsRequest {
                    project_id,
                    load_balancer_id,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: DetailsResponse = parse_json(&text)?;
        // The endpoint answers with an array; only the first entry matters.
        let details = res
            .services
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                resource: "load balancer".to_string(),
                id: Some(load_balancer_id.to_string()),
            })?;

        #[derive(Serialize)]
        struct ConfigRequest<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "loadBalancerID")]
            load_balancer_id: &'a str,
            #[serde(rename = "isRestoreLb")]
            is_restore_lb: bool,
            #[serde(rename = "isActiveService")]
            is_active_service: bool,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct ConfigResponse {
            #[serde(default)]
            data: LbConfigData,
        }

        let url = format!("{}/api/loadBalancer/getLBDetails", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &ConfigRequest {
                    project_id,
                    load_balancer_id,
                    is_restore_lb: false,
                    is_active_service: true,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: ConfigResponse = parse_json(&text)?;
        let config = res.data;

        Ok(LoadBalancer {
            id: load_balancer_id.to_string(),
            project_id: config.project_id,
            provider_name: config.provider_name,
            datacenter: config.datacenter,
            server_type: config.server_type,
            config: LoadBalancerConfig {
                host_header: config.host_header,
                is_access_logs_enabled: config.is_access_logs_enabled,
                is_force_https_enabled: config.is_force_https_enabled,
                ip_rate_limit: config.ip_rate_limit,
                is_ip_rate_limit_enabled: config.is_ip_rate_limit_enabled,
                output_cache_in_seconds: config.output_cache_in_seconds,
                is_sticky_session_enabled: config.is_sticky_session_enabled,
                is_proxy_protocol_enabled: config.is_proxy_protocol_enabled,
                ssl_domains: config.ssl_domains,
                forward_rules: config.forward_rules,
                output_headers: config.output_headers,
                target_services: config.target_services,
                remove_response_headers: config.remove_response_headers,
            },
            created_at: details.created_at,
            creator_name: details.creator_name,
            deployment_status: details.deployment_status,
            ipv4: details.ipv4,
            ipv6: details.ipv6,
            cname: details.cname,
            country: details.country,
            city: details.city,
            global_ip: details.global_ip,
            cores: details.cores,
            ram_size_gb: details.ram_size_gb,
            storage_size_gb: details.storage_size_gb,
            price_per_hour: details.price_per_hour,
        })
    }

    /// Create a load balancer, then fetch its canonical representation.
    ///
    /// The create endpoint only returns the new id; the follow-up get is
    /// what yields the fully-populated struct.
    pub async fn create(&self, mut req: CreateLoadBalancerRequest) -> Result<LoadBalancer> {
        if req.created_from.is_empty() {
            req.created_from = "rustClient".to_string();
        }

        #[derive(Serialize)]
        struct FullRequest<'a> {
            #[serde(flatten)]
            req: &'a CreateLoadBalancerRequest,
            #[serde(rename = "serviceType")]
            service_type: &'a str,
            jwt: &'a str,
        }

        #[derive(Deserialize)]
        struct CreateResponse {
            #[serde(rename = "providerServerID", default)]
            ids: Vec<FlexString>,
        }

        let url = format!("{}/api/servers/createServer", self.client.base_url);
        let text = self
            .client
            .send_post(
                &url,
                &FullRequest {
                    req: &req,
                    service_type: "LB",
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        let res: CreateResponse = parse_json(&text)?;
        let id = res.ids.into_iter().next().ok_or_else(|| Error::Decode {
            detail: "createServer response contained no providerServerID".to_string(),
        })?;

        self.get(&req.project_id, id.as_str()).await
    }

    /// Replace the load balancer configuration, then fetch the updated
    /// representation.
    pub async fn update_config(
        &self,
        project_id: &str,
        load_balancer_id: &str,
        req: &UpdateLoadBalancerConfigRequest,
    ) -> Result<LoadBalancer> {
        #[derive(Serialize)]
        struct FullRequest<'a> {
            #[serde(flatten)]
            req: &'a UpdateLoadBalancerConfigRequest,
            #[serde(rename = "vmID")]
            load_balancer_id: &'a str,
            action: &'a str,
            jwt: &'a str,
        }

        let url = format!("{}/api/servers/DoActionOnServer", self.client.base_url);
        self.client
            .send_post(
                &url,
                &FullRequest {
                    req,
                    load_balancer_id,
                    action: "updateLBSetting",
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        self.get(project_id, load_balancer_id).await
    }

    /// Delete a load balancer, optionally keeping its backups.
    pub async fn delete(
        &self,
        project_id: &str,
        load_balancer_id: &str,
        keep_backups: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteRequest<'a> {
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "vmID")]
            load_balancer_id: &'a str,
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
                    load_balancer_id,
                    is_without_backup: !keep_backups,
                    jwt: &self.client.jwt,
                },
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_rule_wire_names() {
        let rule = LoadBalancerConfigForwardRule {
            protocol: "HTTPS".to_string(),
            port: "443".to_string(),
            target_protocol: "HTTP".to_string(),
            target_port: "3000".to_string(),
        };
        let v = serde_json::to_value(&rule).unwrap();
        assert_eq!(v["protocol"], "HTTPS");
        assert_eq!(v["listeningPort"], "443");
        assert_eq!(v["targetProtocol"], "HTTP");
        assert_eq!(v["targetPort"], "3000");
    }

    #[test]
    fn create_config_nests_under_payload_key() {
        let req = CreateLoadBalancerRequest {
            project_id: "596".to_string(),
            provider_name: "hetzner".to_string(),
            datacenter: "fsn1".to_string(),
            server_type: "MEDIUM-2C-4G".to_string(),
            config: CreateLoadBalancerRequestConfig {
                host_header: "$http_host".to_string(),
                ..Default::default()
            },
            created_from: "rustClient".to_string(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["projectId"], "596");
        assert_eq!(v["loadBalancerPayload"]["hostHeader"], "$http_host");
        assert_eq!(v["loadBalancerPayload"]["stickySession"], false);
    }

    #[test]
    fn config_data_reads_upstream_names() {
        let raw = r#"{
            "projectID": "596",
            "providerName": "hetzner",
            "providerRegion": "fsn1",
            "planType": "MEDIUM-2C-4G",
            "hostHeader": "$http_host",
            "accessLog": true,
            "forceHttps": true,
            "ipRateLimit": 100,
            "isIpRateLimiter": false,
            "outputCache": 0,
            "isStickySessions": false,
            "proxyProtocol": false,
            "sslDomains": [],
            "forwardingRules": [
                {"protocol":"HTTP","listeningPort":"80","targetProtocol":"HTTP","targetPort":"3000"}
            ],
            "outputHeaders": [],
            "targetServiceIDs": ["svc-1"],
            "removeResponseHeaders": []
        }"#;
        let data: LbConfigData = serde_json::from_str(raw).unwrap();
        assert_eq!(data.server_type, "MEDIUM-2C-4G");
        assert_eq!(data.forward_rules.len(), 1);
        assert_eq!(data.forward_rules[0].port, "80");
        assert_eq!(data.target_services, vec!["svc-1".to_string()]);
    }
}
