//! Server actions multiplexed through the `DoActionOnServer` endpoint.
//!
//! The endpoint is a micro-RPC: a flat JSON object whose `action` field
//! selects the behavior and whose sibling fields are the action's
//! parameters. The closed enum below pins each action to its exact field
//! set; the serde rename attributes carry the upstream names, which are an
//! external contract and must not change.

use serde::Serialize;

/// Default alert rule set applied by `enableAlerts`, mirrored from the
/// upstream console defaults.
pub(crate) const DEFAULT_ALERT_RULES: &str = "[{\"parameter\":\"CPU\",\"value\":90,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"MEMORY\",\"value\":90,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"SWAP\",\"value\":75,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"SPACE\",\"value\":80,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"INODE\",\"value\":80,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"READ_RATE\",\"value\":20,\"cycles\":15,\"unit\":\"MB/s\"},{\"parameter\":\"WRITE_RATE\",\"value\":20,\"cycles\":15,\"unit\":\"MB/s\"},{\"parameter\":\"SATURATION\",\"value\":90,\"cycles\":15,\"unit\":\"%\"},{\"parameter\":\"DOWNLOAD\",\"value\":25,\"cycles\":15,\"unit\":\"MB/s\"},{\"parameter\":\"UPLOAD\",\"value\":25,\"cycles\":15,\"unit\":\"MB/s\"}]";

/// Default monitoring cycle for `enableAlerts`, in seconds.
pub(crate) const DEFAULT_ALERT_CYCLE_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action")]
pub(crate) enum ServerAction {
    #[serde(rename = "reboot")]
    Reboot,

    #[serde(rename = "softwareChangeSelectedVersion")]
    ChangeVersion {
        #[serde(rename = "versionTag")]
        version: String,
    },

    /// Server type changes are upgrade-only and reboot the machine.
    #[serde(rename = "changeType")]
    ChangeServerType {
        #[serde(rename = "newType")]
        server_type: String,
        #[serde(rename = "providerName")]
        provider_name: String,
        #[serde(rename = "region")]
        datacenter: String,
        #[serde(rename = "upgradeCPURAMOnly")]
        upgrade_cpu_ram_only: bool,
    },

    // The enable/disable pairs are asymmetric on purpose: disable takes no
    // parameters, enable carries the upstream console's default schedule.
    #[serde(rename = "appAutoUpdateEnable")]
    EnableAppAutoUpdates {
        #[serde(rename = "appAutoUpdateDayOfWeek")]
        day_of_week: String,
        #[serde(rename = "appAutoUpdateHour")]
        hour: String,
        #[serde(rename = "appAutoUpdateMinute")]
        minute: String,
    },

    #[serde(rename = "appAutoUpdateDisable")]
    DisableAppAutoUpdates,

    #[serde(rename = "systemAutoUpdateEnable")]
    EnableSystemAutoUpdates {
        #[serde(rename = "systemAutoUpdateRebootDayOfWeek")]
        day_of_week: String,
        #[serde(rename = "systemAutoUpdateRebootHour")]
        hour: String,
        #[serde(rename = "systemAutoUpdateRebootMinute")]
        minute: String,
        #[serde(rename = "systemAutoUpdateSecurityPatchesOnly")]
        security_patches_only: bool,
    },

    #[serde(rename = "systemAutoUpdateDisable")]
    DisableSystemAutoUpdates,

    #[serde(rename = "enableBackup")]
    EnableBackups,

    #[serde(rename = "disableBackup")]
    DisableBackups,

    #[serde(rename = "enableAlerts")]
    EnableAlerts {
        #[serde(rename = "monitCycleInSeconds")]
        monit_cycle_in_seconds: i64,
        /// JSON-encoded rule list; the endpoint expects a string, not an
        /// array.
        rules: String,
    },

    #[serde(rename = "disableAlerts")]
    DisableAlerts,

    #[serde(rename = "enableFirewall")]
    EnableFirewall {
        /// JSON-encoded rule list; the endpoint expects a string, not an
        /// array.
        rules: String,
    },

    #[serde(rename = "disableFirewall")]
    DisableFirewall,

    #[serde(rename = "getFirewallRules")]
    GetFirewallRules,

    #[serde(rename = "SSLDomainsAdd")]
    AddCustomDomain { domain: String },

    #[serde(rename = "SSLDomainsRemove")]
    RemoveCustomDomain { domain: String },

    #[serde(rename = "SSLDomainsList")]
    ListCustomDomains,

    #[serde(rename = "SSHPubKeysAdd")]
    AddSshPublicKey { name: String, key: String },

    #[serde(rename = "SSHPubKeysRemove")]
    RemoveSshPublicKey {
        #[serde(rename = "deleteParams")]
        name: String,
    },

    #[serde(rename = "SSHPubKeysList")]
    ListSshPublicKeys,

    #[serde(rename = "getAppStackConfig")]
    GetAppStackConfig {
        #[serde(rename = "projectID")]
        project_id: String,
        #[serde(rename = "templateID")]
        template_id: i64,
    },
}
