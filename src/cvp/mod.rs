pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::CvpClient;
pub use types::{
    Configlet, ConfigletRef, Container, CvpInfo, NetElement, TaskResponse, User, UserPage,
};

use anyhow::Result;

/// The slice of the CVP management API the operational tools consume.
///
/// `CvpClient` is the live implementation; the pipelines stay generic over
/// this trait so they can run against an in-memory double in tests.
#[async_trait::async_trait]
pub trait CvpApi {
    async fn get_cvp_info(&self) -> Result<CvpInfo>;

    /// Full user listing (raw `/user/getUsers.do` page)
    async fn get_users(&self) -> Result<UserPage>;

    async fn get_user(&self, user_id: &str) -> Result<User>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;

    /// Full inventory, including devices that were never provisioned
    async fn get_inventory(&self) -> Result<Vec<NetElement>>;

    /// Running configuration text for the device with the given system MAC
    async fn get_device_configuration(&self, mac: &str) -> Result<String>;

    /// Lookup by exact name; a missing configlet is an error
    async fn get_configlet_by_name(&self, name: &str) -> Result<Configlet>;

    /// Create a configlet, returning its server-assigned key
    async fn add_configlet(&self, name: &str, config: &str) -> Result<String>;

    /// Replace the text of an existing configlet, returning the server's
    /// status message
    async fn update_configlet(&self, config: &str, key: &str, name: &str) -> Result<String>;

    /// Lookup by exact name; `None` when no such container exists
    async fn get_container_by_name(&self, name: &str) -> Result<Option<Container>>;

    /// Enqueue a pending task moving the device into the container
    async fn move_device_to_container(
        &self,
        reason: &str,
        device: &NetElement,
        container: &Container,
    ) -> Result<TaskResponse>;

    /// Enqueue a pending task attaching the configlets to the device
    async fn apply_configlets_to_device(
        &self,
        reason: &str,
        device: &NetElement,
        configlets: &[ConfigletRef],
    ) -> Result<TaskResponse>;
}
