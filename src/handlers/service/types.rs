//! Service wire and client-facing types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::NumberAsBool;

// Lifecycle states as reported by the `status` field.
pub const SERVICE_STATUS_STOPPED: &str = "off";
pub const SERVICE_STATUS_RUNNING: &str = "running";
pub const SERVICE_STATUS_DELETING: &str = "deleting";
pub const SERVICE_STATUS_MIGRATING: &str = "migrating";

pub const SERVICE_DEPLOYMENT_STATUS_DEPLOYED: &str = "Deployed";
pub const SERVICE_DEPLOYMENT_STATUS_IN_PROGRESS: &str = "IN PROGRESS";

// Firewall rule types
pub const SERVICE_FIREWALL_RULE_TYPE_INPUT: &str = "INPUT";
pub const SERVICE_FIREWALL_RULE_TYPE_OUTPUT: &str = "OUTPUT";

// Firewall rule protocols
pub const SERVICE_FIREWALL_RULE_PROTOCOL_TCP: &str = "tcp";
pub const SERVICE_FIREWALL_RULE_PROTOCOL_UDP: &str = "udp";

/// An entry of the public template catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "title", default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "mainImage", default)]
    pub logo: String,
    #[serde(rename = "dockerhub_image", default)]
    pub docker_hub_image: String,
    #[serde(rename = "dockerhub_default_tag", default)]
    pub docker_hub_default_tag: String,
}

/// Admin UI credentials of a deployed service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceAdmin {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

/// Database connection credentials, assembled client-side from the admin
/// credentials and the service's connection metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDatabaseAdmin {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub command: String,
}

/// An SSH public key registered on a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSshPublicKey {
    #[serde(rename = "indexID", default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
}

/// One firewall rule, as sent to and returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceFirewallRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    pub port: String,
    pub protocol: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

/// A service (VM or managed app).
///
/// Most fields map straight off the detail endpoint; the last block
/// (`firewall_rules` through `database_admin`) is assembled by follow-up
/// calls after the detail fetch and is empty until the deployment has
/// finished.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "vmID", default)]
    pub id: String,
    #[serde(rename = "projectID", default)]
    pub project_id: String,
    #[serde(rename = "id", default)]
    pub elestio_id: i64,
    #[serde(rename = "displayName", default)]
    pub server_name: String,
    #[serde(rename = "serverType", default)]
    pub server_type: String,
    #[serde(rename = "template", default)]
    pub template_id: i64,
    #[serde(rename = "selected_software_tag", default)]
    pub version: String,
    #[serde(rename = "provider", default)]
    pub provider_name: String,
    #[serde(default)]
    pub datacenter: String,
    #[serde(rename = "support", default)]
    pub support_level: String,
    #[serde(rename = "email", default)]
    pub admin_email: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "deploymentStatus", default)]
    pub deployment_status: String,
    #[serde(rename = "deploymentStart", default)]
    pub deployment_started_at: String,
    #[serde(rename = "deploymentEnd", default)]
    pub deployment_ended_at: String,
    #[serde(rename = "creatorName", default)]
    pub creator_name: String,
    #[serde(rename = "creationDate", default)]
    pub created_at: String,
    #[serde(default)]
    pub ipv4: String,
    #[serde(default)]
    pub ipv6: String,
    #[serde(default)]
    pub cname: String,
    #[serde(rename = "customDomainNames", default)]
    pub custom_domain_names: Vec<String>,
    #[serde(rename = "sshKeys", default)]
    pub ssh_public_keys: Vec<ServiceSshPublicKey>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "adminUser", default)]
    pub admin_user: String,
    #[serde(rename = "rootAppPath", default)]
    pub root_app_path: String,
    #[serde(rename = "globalIP", default)]
    pub global_ip: String,
    #[serde(rename = "adminExternalPort", default)]
    pub admin_external_port: i64,
    #[serde(rename = "adminInternalPort", default)]
    pub admin_internal_port: i64,
    #[serde(rename = "traffic_outgoing", default)]
    pub traffic_outgoing: i64,
    #[serde(rename = "traffic_ingoing", default)]
    pub traffic_incoming: i64,
    #[serde(rename = "traffic_included", default)]
    pub traffic_included: i64,
    #[serde(default)]
    pub cores: i64,
    #[serde(rename = "ramGB", default)]
    pub ram_size_gb: String,
    #[serde(rename = "storageSizeGB", default)]
    pub storage_size_gb: i64,
    #[serde(rename = "pricePerHour", default)]
    pub price_per_hour: String,
    #[serde(rename = "app_AutoUpdate_Enabled", default)]
    pub app_auto_updates_enabled: NumberAsBool,
    #[serde(rename = "app_AutoUpdate_DayOfWeek", default)]
    pub app_auto_updates_day_of_week: i64,
    #[serde(rename = "app_AutoUpdate_Hour", default)]
    pub app_auto_updates_hour: i64,
    #[serde(rename = "app_AutoUpdate_Minute", default)]
    pub app_auto_updates_minute: i64,
    #[serde(rename = "system_AutoUpdate_Enabled", default)]
    pub system_auto_updates_enabled: NumberAsBool,
    #[serde(rename = "system_AutoUpdate_SecurityPatchesOnly", default)]
    pub system_auto_updates_security_patches_only_enabled: NumberAsBool,
    #[serde(rename = "system_AutoUpdate_RebootDayOfWeek", default)]
    pub system_auto_updates_reboot_day_of_week: i64,
    #[serde(rename = "system_AutoUpdate_RebootHour", default)]
    pub system_auto_updates_reboot_hour: i64,
    #[serde(rename = "system_AutoUpdate_RebootMinute", default)]
    pub system_auto_updates_reboot_minute: i64,
    #[serde(rename = "backupsActivated", default)]
    pub backups_enabled: NumberAsBool,
    #[serde(rename = "remoteBackupsActivated", default)]
    pub remote_backups_enabled: NumberAsBool,
    #[serde(rename = "isExternalBackupActivated", default)]
    pub external_backups_enabled: NumberAsBool,
    #[serde(rename = "externalBackupUpdateDay", default)]
    pub external_backups_update_day_of_week: i64,
    #[serde(rename = "externalBackupUpdateHour", default)]
    pub external_backups_update_hour: i64,
    #[serde(rename = "externalBackupUpdateMinute", default)]
    pub external_backups_update_minute: i64,
    #[serde(rename = "externalBackupUpdateType", default)]
    pub external_backups_update_type: String,
    #[serde(rename = "externalBackupRetainDay", default)]
    pub external_backups_retain_day_of_week: i64,
    #[serde(rename = "isFirewallActivated", default)]
    pub firewall_enabled: NumberAsBool,
    #[serde(rename = "firewall_id", default)]
    pub firewall_id: String,
    #[serde(rename = "managedDBCLI", default)]
    pub database_admin_command: String,
    #[serde(rename = "managedDBPort", default)]
    pub database_admin_port: String,
    #[serde(rename = "isAlertsActivated", default)]
    pub alerts_enabled: NumberAsBool,

    // Populated by follow-up calls, not by the detail payload.
    #[serde(skip_deserializing, default)]
    pub firewall_rules: Vec<ServiceFirewallRule>,
    #[serde(skip_deserializing, default)]
    pub env: HashMap<String, String>,
    #[serde(skip_deserializing, default)]
    pub admin: ServiceAdmin,
    #[serde(skip_deserializing, default)]
    pub database_admin: ServiceDatabaseAdmin,
}

/// Pre-flight check of a deployment configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateConfigRequest {
    #[serde(rename = "template")]
    pub template_id: i64,
    #[serde(rename = "provider")]
    pub provider_name: String,
    pub datacenter: String,
    #[serde(rename = "serverType")]
    pub server_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateServiceRequest {
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "serverName")]
    pub server_name: String,
    #[serde(rename = "serverType")]
    pub server_type: String,
    #[serde(rename = "templateID")]
    pub template_id: i64,
    pub version: String,
    #[serde(rename = "providerName")]
    pub provider_name: String,
    pub datacenter: String,
    #[serde(rename = "support")]
    pub support_level: String,
    #[serde(rename = "appPassword")]
    pub app_password: String,
    #[serde(rename = "adminEmail")]
    pub admin_email: String,
    #[serde(rename = "system_AutoUpdate_Enabled")]
    pub is_system_auto_update_enabled: NumberAsBool,
    #[serde(rename = "app_AutoUpdate_Enabled")]
    pub is_app_auto_update_enabled: NumberAsBool,
    #[serde(rename = "createdFrom")]
    pub created_from: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_deserializes_detail_payload() {
        let raw = r#"{
            "vmID": "42438730",
            "projectID": "13194",
            "id": 9001,
            "displayName": "mypostgres",
            "serverType": "SMALL-2C-2G",
            "template": 11,
            "selected_software_tag": "14",
            "provider": "scaleway",
            "datacenter": "fr-par-1",
            "support": "level1",
            "email": "dev@example.com",
            "category": "Databases & Cache",
            "status": "running",
            "deploymentStatus": "Deployed",
            "creationDate": "2023-03-01",
            "ipv4": "51.15.0.1",
            "cname": "mypostgres-x.elest.io",
            "adminUser": "[EMAIL]",
            "adminExternalPort": 15432,
            "adminInternalPort": 5432,
            "cores": 2,
            "ramGB": "2",
            "storageSizeGB": 40,
            "pricePerHour": "0.02",
            "app_AutoUpdate_Enabled": 1,
            "system_AutoUpdate_Enabled": 0,
            "backupsActivated": 1,
            "isFirewallActivated": 1,
            "managedDBCLI": "psql postgres://postgres:[APP_PASSWORD]@[DOMAIN]:15432",
            "managedDBPort": "15432",
            "isAlertsActivated": 0
        }"#;

        let s: Service = serde_json::from_str(raw).unwrap();
        assert_eq!(s.id, "42438730");
        assert_eq!(s.elestio_id, 9001);
        assert_eq!(s.server_name, "mypostgres");
        assert_eq!(s.template_id, 11);
        assert_eq!(s.version, "14");
        assert_eq!(s.deployment_status, SERVICE_DEPLOYMENT_STATUS_DEPLOYED);
        assert!(s.app_auto_updates_enabled.as_bool());
        assert!(!s.system_auto_updates_enabled.as_bool());
        assert!(s.firewall_enabled.as_bool());
        // Composite fields start empty; they are filled by follow-up calls.
        assert!(s.env.is_empty());
        assert!(s.admin.url.is_empty());
        assert!(s.firewall_rules.is_empty());
    }

    #[test]
    fn firewall_rule_wire_names() {
        let rule = ServiceFirewallRule {
            rule_type: SERVICE_FIREWALL_RULE_TYPE_INPUT.to_string(),
            port: "443".to_string(),
            protocol: SERVICE_FIREWALL_RULE_PROTOCOL_TCP.to_string(),
            targets: vec!["0.0.0.0/0".to_string()],
        };
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(
            json,
            r#"{"type":"INPUT","port":"443","protocol":"tcp","targets":["0.0.0.0/0"]}"#
        );
    }

    #[test]
    fn create_request_wire_names() {
        let req = CreateServiceRequest {
            project_id: "596".to_string(),
            server_name: "mypostgres".to_string(),
            server_type: "SMALL-2C-2G".to_string(),
            template_id: 11,
            version: "14".to_string(),
            provider_name: "scaleway".to_string(),
            datacenter: "fr-par-1".to_string(),
            support_level: "level1".to_string(),
            app_password: "L0ngPassw0rd".to_string(),
            admin_email: "dev@example.com".to_string(),
            is_system_auto_update_enabled: true.into(),
            is_app_auto_update_enabled: false.into(),
            created_from: String::new(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["projectId"], "596");
        assert_eq!(v["templateID"], 11);
        assert_eq!(v["support"], "level1");
        assert_eq!(v["system_AutoUpdate_Enabled"], 1);
        assert_eq!(v["app_AutoUpdate_Enabled"], 0);
    }

    #[test]
    fn template_deserializes_catalog_entry() {
        let raw = r#"{
            "id": 11,
            "title": "PostgreSQL",
            "category": "Databases & Cache",
            "description": "Relational database",
            "mainImage": "//cdn.elest.io/postgres.png",
            "dockerhub_image": "postgres",
            "dockerhub_default_tag": "16"
        }"#;
        let t: Template = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, 11);
        assert_eq!(t.name, "PostgreSQL");
        assert_eq!(t.logo, "//cdn.elest.io/postgres.png");
    }
}
