use anyhow::{bail, Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::types::*;
use super::CvpApi;

/// CVP REST client.
///
/// Supports the two authentication modes the tools need: an on-prem session
/// login (cookie carried by the client's cookie store) and a CVaaS bearer
/// token. One instance per server connection, requests strictly serial.
pub struct CvpClient {
    base_url: String,
    api_token: Option<String>,
    client: Client,
}

impl CvpClient {
    /// Authenticate against a CVP node with username/password.
    pub async fn connect(host: &str, username: &str, password: &str) -> Result<Self> {
        let cvp = Self {
            base_url: base_url_for(host),
            api_token: None,
            client: build_http_client()?,
        };
        cvp.login(username, password).await?;
        Ok(cvp)
    }

    /// Connect to a CVaaS instance with an API token. There is no login
    /// endpoint in this mode; reachability is verified with an info probe.
    pub async fn connect_with_token(host: &str, token: &str) -> Result<Self> {
        let cvp = Self {
            base_url: base_url_for(host),
            api_token: Some(token.to_string()),
            client: build_http_client()?,
        };
        cvp.get_cvp_info()
            .await
            .context("CVP token authentication failed")?;
        Ok(cvp)
    }

    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let body = LoginRequest {
            user_id: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .post("/login/authenticate.do", &body)
            .await
            .context("CVP authentication failed")?;
        if resp.session_id.is_some() {
            tracing::debug!("Session established for {}", username);
        }
        Ok(())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/cvpservice{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.api_url(path));
        match &self.api_token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .request(Method::GET, path)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::into_checked(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        Self::into_checked(resp).await
    }

    /// Validate HTTP status and CVP's embedded error convention, then
    /// deserialize. CVP reports logical failures (missing configlet, bad
    /// session) as 200 bodies carrying `errorCode`/`errorMessage`.
    async fn into_checked<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("CVP API error {}: {}", status, body);
        }

        let value: Value = resp.json().await?;
        if let Some(code) = value.get("errorCode") {
            // errorCode arrives as a string on some endpoints, a number on others
            let code = match code.as_str() {
                Some(code) => code.to_string(),
                None => code.to_string(),
            };
            let message = value
                .get("errorMessage")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            bail!("CVP API error {}: {}", code, message.trim());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Currently-applied configlets for a device; an apply must re-submit
    /// these alongside any new ones or the server drops them.
    async fn get_applied_configlets(&self, mac: &str) -> Result<Vec<Configlet>> {
        let resp: ConfigletListResponse = self
            .get(&format!(
                "/provisioning/getConfigletsByNetElementId.do?netElementId={}&queryParam=&startIndex=0&endIndex=0",
                mac
            ))
            .await?;
        Ok(resp.configlet_list)
    }

    /// Stage a temp action against the topology. A later save turns staged
    /// actions into pending tasks.
    async fn add_temp_action(&self, actions: Value) -> Result<()> {
        let body = json!({ "data": actions });
        let _: Value = self
            .post(
                "/provisioning/addTempAction.do?format=topology&queryParam=&nodeId=root",
                &body,
            )
            .await?;
        Ok(())
    }

    async fn save_topology(&self) -> Result<TaskResponse> {
        self.post("/provisioning/v2/saveTopology.do", &json!([]))
            .await
    }
}

fn build_http_client() -> Result<Client> {
    // CVP installs ship self-signed certificates; certificate verification
    // stays off for every outbound call, like the tooling this replaces.
    Client::builder()
        .danger_accept_invalid_certs(true)
        .cookie_store(true)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")
}

fn base_url_for(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait::async_trait]
impl CvpApi for CvpClient {
    async fn get_cvp_info(&self) -> Result<CvpInfo> {
        self.get("/cvpInfo/getCvpInfo.do").await
    }

    // --- Users ---

    async fn get_users(&self) -> Result<UserPage> {
        self.get("/user/getUsers.do?startIndex=0&endIndex=0").await
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let envelope: UserEnvelope = self
            .get(&format!("/user/getUser.do?userId={}", user_id))
            .await?;
        Ok(envelope.user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        // deleteUsers.do takes a list of ids
        let _: Value = self.post("/user/deleteUsers.do", &json!([user_id])).await?;
        Ok(())
    }

    // --- Inventory ---

    async fn get_inventory(&self) -> Result<Vec<NetElement>> {
        self.get("/inventory/devices?provisioned=false").await
    }

    async fn get_device_configuration(&self, mac: &str) -> Result<String> {
        let resp: DeviceConfigResponse = self
            .get(&format!("/inventory/device/config?netElementId={}", mac))
            .await?;
        Ok(resp.output)
    }

    // --- Configlets ---

    async fn get_configlet_by_name(&self, name: &str) -> Result<Configlet> {
        self.get(&format!("/configlet/getConfigletByName.do?name={}", name))
            .await
    }

    async fn add_configlet(&self, name: &str, config: &str) -> Result<String> {
        let body = ConfigletCreate {
            name: name.to_string(),
            config: config.to_string(),
        };
        let resp: DataResponse = self.post("/configlet/addConfiglet.do", &body).await?;
        Ok(resp.data)
    }

    async fn update_configlet(&self, config: &str, key: &str, name: &str) -> Result<String> {
        let body = ConfigletUpdate {
            config: config.to_string(),
            key: key.to_string(),
            name: name.to_string(),
        };
        let resp: DataResponse = self.post("/configlet/updateConfiglet.do", &body).await?;
        Ok(resp.data)
    }

    // --- Provisioning topology ---

    async fn get_container_by_name(&self, name: &str) -> Result<Option<Container>> {
        let resp: SearchTopologyResponse = self
            .get(&format!(
                "/provisioning/searchTopology.do?queryParam={}&startIndex=0&endIndex=0",
                name
            ))
            .await?;
        Ok(resp.container_list.into_iter().find(|c| c.name == name))
    }

    async fn move_device_to_container(
        &self,
        reason: &str,
        device: &NetElement,
        container: &Container,
    ) -> Result<TaskResponse> {
        let info = format!(
            "{}: move {} to container {}",
            reason, device.hostname, container.name
        );
        tracing::debug!("{}", info);
        self.add_temp_action(json!([{
            "info": info,
            "infoPreview": info,
            "action": "update",
            "nodeType": "netelement",
            "nodeId": device.system_mac_address,
            "toId": container.key,
            "fromId": device.parent_container_id,
            "nodeName": device.hostname,
            "toName": container.name,
            "toIdType": "container",
            "childTasks": [],
            "parentTask": "",
        }]))
        .await?;
        self.save_topology().await
    }

    async fn apply_configlets_to_device(
        &self,
        reason: &str,
        device: &NetElement,
        configlets: &[ConfigletRef],
    ) -> Result<TaskResponse> {
        // Re-submit whatever is already attached, with the new refs appended
        let applied = self
            .get_applied_configlets(&device.system_mac_address)
            .await?;
        let mut keys: Vec<String> = applied.iter().map(|c| c.key.clone()).collect();
        let mut names: Vec<String> = applied.iter().map(|c| c.name.clone()).collect();
        for entry in configlets {
            if !keys.contains(&entry.key) {
                keys.push(entry.key.clone());
                names.push(entry.name.clone());
            }
        }

        let info = format!("{}: configlet assign to device {}", reason, device.hostname);
        tracing::debug!("{}", info);
        self.add_temp_action(json!([{
            "info": info,
            "infoPreview": info,
            "note": "",
            "action": "associate",
            "nodeType": "configlet",
            "nodeId": "",
            "configletList": keys,
            "configletNamesList": names,
            "ignoreConfigletList": [],
            "ignoreConfigletNamesList": [],
            "configletBuilderList": [],
            "configletBuilderNamesList": [],
            "ignoreConfigletBuilderList": [],
            "ignoreConfigletBuilderNamesList": [],
            "toId": device.system_mac_address,
            "toIdType": "netelement",
            "fromId": "",
            "nodeName": "",
            "fromName": "",
            "toName": device.hostname,
            "nodeIpAddress": device.ip_address,
            "nodeTargetIpAddress": device.ip_address,
            "childTasks": [],
            "parentTask": "",
        }]))
        .await?;
        self.save_topology().await
    }
}
