use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::ServiceCenterConfig;
use crate::service_register_center::typos::Registration;
use crate::service_register_center::ServiceRegister;
use crate::{Error, Result};

/// Consul client configuration options
#[derive(Debug, Clone)]
pub struct ConsulOptions {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub timeout: u64,
}

impl ConsulOptions {
    pub fn from_config(config: &ServiceCenterConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout,
            protocol: config.protocol.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}://{}:{}{}", self.protocol, self.host, self.port, path)
    }
}

/// Consul service registry implementation
///
/// 直接调用 Consul agent 的 HTTP API，不保存任何注册状态。
#[derive(Debug, Clone)]
pub struct Consul {
    pub options: ConsulOptions,
    client: Client,
}

impl Consul {
    /// Create a new Consul client from the service center config
    pub fn from_config(config: &ServiceCenterConfig) -> Result<Self> {
        let options = ConsulOptions::from_config(config);
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout))
            .build()?;

        Ok(Self { options, client })
    }

    /// 构建 `/v1/agent/service/register` 的请求体
    fn registration_payload(registration: &Registration) -> Value {
        let mut payload = json!({
            "ID": registration.id,
            "Name": registration.name,
            "Address": registration.host,
            "Port": registration.port,
            "Tags": registration.tags,
        });

        if let Some(check) = &registration.check {
            let mut check_json = json!({
                "Name": check.name,
                "HTTP": check.url,
                "Interval": check.interval,
            });
            if let Some(timeout) = &check.timeout {
                check_json["Timeout"] = json!(timeout);
            }
            if let Some(deregister_after) = &check.deregister_after {
                check_json["DeregisterCriticalServiceAfter"] = json!(deregister_after);
            }
            payload["Check"] = check_json;
        }

        payload
    }

    /// 非 2xx 响应转换为 `Error::Registration`
    async fn ensure_success(response: Response, action: &str) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Failed to {}: HTTP {}: {}", action, status, error_text);
        Err(Error::Registration {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

#[async_trait]
impl ServiceRegister for Consul {
    async fn register(&self, registration: Registration) -> Result<String> {
        let url = self.options.endpoint("/v1/agent/service/register");

        debug!(
            "Registering service: {} ({}:{}) at {}",
            registration.name, registration.host, registration.port, url
        );

        let payload = Self::registration_payload(&registration);
        let response = self.client.put(&url).json(&payload).send().await?;
        Self::ensure_success(response, "register service").await?;

        info!(
            "Service registered successfully: {} (id: {})",
            registration.name, registration.id
        );
        Ok(registration.id)
    }

    async fn deregister(&self, service_id: &str) -> Result<()> {
        let url = self
            .options
            .endpoint(&format!("/v1/agent/service/deregister/{}", service_id));

        debug!("Deregistering service: {}", service_id);

        let response = self.client.put(&url).send().await?;
        Self::ensure_success(response, "deregister service").await?;

        info!("Service deregistered successfully: {}", service_id);
        Ok(())
    }
}
