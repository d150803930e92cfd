use serde::{Deserialize, Serialize};

// --- Sentinel values ---

/// Canonical user-record values checked by the cleanup filter
pub mod user_type {
    pub const LOCAL: &str = "Local";
}

pub mod user_status {
    pub const ENABLED: &str = "Enabled";
}

pub mod current_status {
    pub const ONLINE: &str = "Online";
}

/// Canonical inventory values checked by the onboarding filter
pub mod streaming_status {
    pub const ACTIVE: &str = "active";
}

pub mod device_status {
    pub const REGISTERED: &str = "Registered";
}

/// Inventory type of a switch/router entry
pub const NETELEMENT: &str = "netelement";

/// The placeholder container CVP parks streaming-but-unprovisioned devices in
pub const UNDEFINED_CONTAINER: &str = "undefined_container";

// --- CVP API types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvpInfo {
    /// Release string, or the literal `cvaas` on a CVaaS instance
    pub version: String,
}

/// One CVP user account as returned by getUsers.do / getUser.do
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    /// `Local`, or the external AAA system (`TACACS`, `RADIUS`, ...)
    pub user_type: String,
    pub user_status: String,
    pub current_status: String,
    /// Epoch seconds of the last session activity
    #[serde(default)]
    pub last_accessed: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Wire shape of GET /user/getUsers.do
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub total: i64,
    pub users: Vec<User>,
}

/// Wire shape of GET /user/getUser.do - the record nests under `user`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
    #[serde(default)]
    #[allow(dead_code)]
    pub roles: Vec<String>,
}

/// One inventory entry (CVP calls these net elements)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetElement {
    pub hostname: String,
    pub system_mac_address: String,
    #[serde(default)]
    pub parent_container_id: String,
    #[serde(default)]
    pub streaming_status: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub serial_number: String,
}

/// Named text blob holding a device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configlet {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub config: String,
}

/// Name/key pair used when attaching configlets to a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigletRef {
    pub name: String,
    pub key: String,
}

/// Grouping node in the provisioning hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub key: String,
    pub name: String,
}

/// Topology saves return the ids of the tasks they enqueued; nothing is
/// executed until those tasks are run from CVP itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(default)]
    pub data: TaskData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    #[serde(default)]
    pub task_ids: Vec<String>,
    #[serde(default)]
    pub status: String,
}

// --- Wire envelopes used only by the client ---

/// Wire shape of GET /inventory/device/config
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceConfigResponse {
    #[serde(default)]
    pub output: String,
}

/// Wire shape of GET /provisioning/searchTopology.do
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTopologyResponse {
    #[serde(default)]
    pub container_list: Vec<Container>,
}

/// Wire shape of GET /provisioning/getConfigletsByNetElementId.do
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigletListResponse {
    #[serde(default)]
    pub configlet_list: Vec<Configlet>,
}

/// CVP wraps single-value results (new configlet keys, status strings) in a
/// `data` field
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DataResponse {
    pub data: String,
}

// --- Request bodies ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfigletCreate {
    pub name: String,
    pub config: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConfigletUpdate {
    pub config: String,
    pub key: String,
    pub name: String,
}
