use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use super::types::*;
use super::CvpApi;

/// In-memory stand-in for a CVP server.
///
/// Seeded with fixture state up front; mutations are recorded instead of
/// executed so tests can assert on exactly what would have been sent.
#[derive(Default)]
pub(crate) struct MockCvp {
    pub users: Vec<User>,
    pub inventory: Vec<NetElement>,
    pub containers: Vec<Container>,
    /// system MAC -> running config text; a missing entry fails the fetch
    pub configs: HashMap<String, String>,
    /// configlet name -> configlet
    pub configlets: Mutex<HashMap<String, Configlet>>,

    pub deleted_users: Mutex<Vec<String>>,
    pub added_configlets: Mutex<Vec<String>>,
    pub updated_configlets: Mutex<Vec<String>>,
    /// (hostname, container name)
    pub moves: Mutex<Vec<(String, String)>>,
    /// (hostname, configlet refs as submitted)
    pub applies: Mutex<Vec<(String, Vec<ConfigletRef>)>>,
}

fn task_response(id: &str) -> TaskResponse {
    TaskResponse {
        data: TaskData {
            task_ids: vec![id.to_string()],
            status: "success".to_string(),
        },
    }
}

#[async_trait::async_trait]
impl CvpApi for MockCvp {
    async fn get_cvp_info(&self) -> Result<CvpInfo> {
        Ok(CvpInfo {
            version: "2024.2.0".to_string(),
        })
    }

    async fn get_users(&self) -> Result<UserPage> {
        Ok(UserPage {
            total: self.users.len() as i64,
            users: self.users.clone(),
        })
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        match self.users.iter().find(|u| u.user_id == user_id) {
            Some(user) => Ok(user.clone()),
            None => bail!("CVP API error 132801: Entity does not exist"),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.deleted_users.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn get_inventory(&self) -> Result<Vec<NetElement>> {
        Ok(self.inventory.clone())
    }

    async fn get_device_configuration(&self, mac: &str) -> Result<String> {
        match self.configs.get(mac) {
            Some(config) => Ok(config.clone()),
            None => bail!("CVP API error 122401: Entity does not exist"),
        }
    }

    async fn get_configlet_by_name(&self, name: &str) -> Result<Configlet> {
        match self.configlets.lock().unwrap().get(name) {
            Some(configlet) => Ok(configlet.clone()),
            None => bail!("CVP API error 132801: Entity does not exist"),
        }
    }

    async fn add_configlet(&self, name: &str, config: &str) -> Result<String> {
        let mut configlets = self.configlets.lock().unwrap();
        let key = format!("configlet_{}", configlets.len() + 1);
        configlets.insert(
            name.to_string(),
            Configlet {
                key: key.clone(),
                name: name.to_string(),
                config: config.to_string(),
            },
        );
        self.added_configlets.lock().unwrap().push(name.to_string());
        Ok(key)
    }

    async fn update_configlet(&self, config: &str, key: &str, name: &str) -> Result<String> {
        self.configlets.lock().unwrap().insert(
            name.to_string(),
            Configlet {
                key: key.to_string(),
                name: name.to_string(),
                config: config.to_string(),
            },
        );
        self.updated_configlets
            .lock()
            .unwrap()
            .push(name.to_string());
        Ok("success".to_string())
    }

    async fn get_container_by_name(&self, name: &str) -> Result<Option<Container>> {
        Ok(self.containers.iter().find(|c| c.name == name).cloned())
    }

    async fn move_device_to_container(
        &self,
        _reason: &str,
        device: &NetElement,
        container: &Container,
    ) -> Result<TaskResponse> {
        self.moves
            .lock()
            .unwrap()
            .push((device.hostname.clone(), container.name.clone()));
        Ok(task_response("1"))
    }

    async fn apply_configlets_to_device(
        &self,
        _reason: &str,
        device: &NetElement,
        configlets: &[ConfigletRef],
    ) -> Result<TaskResponse> {
        self.applies
            .lock()
            .unwrap()
            .push((device.hostname.clone(), configlets.to_vec()));
        Ok(task_response("2"))
    }
}
