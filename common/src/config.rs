use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::configs::LogConfig;
use crate::Result;

/// 环境变量前缀，例如 `ORCHESTRATOR__SERVICE__PORT=9001`
pub const ENV_PREFIX: &str = "ORCHESTRATOR";
/// 默认配置文件路径，不存在时直接使用内置默认值
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.yaml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub service_center: ServiceCenterConfig,
    pub log: LogConfig,
}

/// 服务自身的监听与注册信息
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    /// 注册中心的去重键，相同ID重复注册会覆盖旧条目
    pub id: String,
    pub host: String,
    pub port: u16,
    /// 注册到Consul的地址，未设置时使用主机名
    pub advertise_address: Option<String>,
    pub tags: Vec<String>,
    /// 优雅关闭时等待存量请求的秒数
    pub shutdown_grace_secs: u64,
    pub health_check: HealthCheckConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "ai-orchestrator".to_string(),
            id: "ai-orchestrator".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8001,
            advertise_address: None,
            tags: Vec::new(),
            shutdown_grace_secs: 10,
            health_check: HealthCheckConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 注册中心对本服务发起的HTTP健康检查
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// 注册中心访问本服务时使用的主机名
    pub host: String,
    pub interval: String,
    pub timeout: Option<String>,
    /// 对应 Consul 的 DeregisterCriticalServiceAfter
    pub deregister_after: Option<String>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            interval: "10s".to_string(),
            timeout: None,
            deregister_after: None,
        }
    }
}

impl HealthCheckConfig {
    /// 健康检查URL
    ///
    /// `port` 为监听器实际绑定的端口，`route` 为服务暴露的状态路由。
    pub fn url(&self, port: u16, route: &str) -> String {
        format!("http://{}:{}{}", self.host, port, route)
    }
}

/// 服务发现配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceCenterConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    /// 请求超时（秒）
    pub timeout: u64,
    pub failure_policy: RegistrationPolicy,
    pub deregister_on_shutdown: bool,
}

impl Default for ServiceCenterConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 8500,
            timeout: 5,
            failure_policy: RegistrationPolicy::default(),
            deregister_on_shutdown: true,
        }
    }
}

impl ServiceCenterConfig {
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// 启动时注册失败的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// 记录警告并继续提供服务
    #[default]
    Advisory,
    /// 终止启动
    Fatal,
}

impl AppConfig {
    /// 从默认配置文件和环境变量加载配置
    pub fn new() -> Result<Self> {
        Self::from_file(None)
    }

    /// 从多个来源加载配置：内置默认值 < 配置文件 < 环境变量
    pub fn from_file(file_path: Option<&str>) -> Result<Self> {
        Self::load(file_path, None)
    }

    fn load(file_path: Option<&str>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();

        // 显式指定的配置文件必须存在，默认配置文件可以缺省
        let (path, required) = match file_path {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };
        if required || Path::new(path).exists() {
            builder = builder.add_source(File::new(path, file_format(path)).required(required));
        }

        // 读取环境变量 (最高优先级)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

fn file_format(path: &str) -> FileFormat {
    if path.ends_with(".json") {
        FileFormat::Json
    } else if path.ends_with(".yaml") || path.ends_with(".yml") {
        FileFormat::Yaml
    } else {
        FileFormat::Toml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load(Some("does-not-matter.yaml"), None);
        assert!(config.is_err(), "显式指定的配置文件不存在时应报错");

        let config = AppConfig::load(None, env(&[])).unwrap();
        assert_eq!(config.service.name, "ai-orchestrator");
        assert_eq!(config.service.id, "ai-orchestrator");
        assert_eq!(config.service.port, 8001);
        assert_eq!(config.service.listen_addr(), "0.0.0.0:8001");
        assert_eq!(config.service.health_check.interval, "10s");
        assert_eq!(config.service_center.url(), "http://localhost:8500");
        assert_eq!(
            config.service_center.failure_policy,
            RegistrationPolicy::Advisory
        );
        assert!(config.service_center.deregister_on_shutdown);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let path = write_temp(
            "orchestrator.yaml",
            r#"
service:
  port: 9100
  tags: [ai, orchestrator]
  health_check:
    interval: 30s
    deregister_after: 1m
service_center:
  host: consul.internal
  failure_policy: fatal
log:
  level: debug
  format: json
"#,
        );

        let config = AppConfig::load(path.to_str(), env(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.id, "ai-orchestrator");
        assert_eq!(config.service.tags, vec!["ai", "orchestrator"]);
        assert_eq!(config.service.health_check.interval, "30s");
        assert_eq!(
            config.service.health_check.deregister_after.as_deref(),
            Some("1m")
        );
        assert_eq!(config.service_center.host, "consul.internal");
        assert_eq!(config.service_center.port, 8500);
        assert_eq!(config.service_center.failure_policy, RegistrationPolicy::Fatal);
        assert_eq!(config.log.format.as_deref(), Some("json"));
    }

    #[test]
    fn environment_overrides_file() {
        let path = write_temp(
            "orchestrator.toml",
            r#"
[service]
port = 9100

[service_center]
host = "consul.internal"
"#,
        );

        let config = AppConfig::load(
            path.to_str(),
            env(&[
                ("ORCHESTRATOR__SERVICE__PORT", "9200"),
                ("ORCHESTRATOR__SERVICE__ID", "ai-orchestrator-2"),
                ("ORCHESTRATOR__SERVICE_CENTER__HOST", "consul"),
                ("ORCHESTRATOR__SERVICE_CENTER__PORT", "8600"),
                ("ORCHESTRATOR__SERVICE_CENTER__DEREGISTER_ON_SHUTDOWN", "false"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.service.port, 9200);
        assert_eq!(config.service.id, "ai-orchestrator-2");
        assert_eq!(config.service_center.url(), "http://consul:8600");
        assert!(!config.service_center.deregister_on_shutdown);
    }

    #[test]
    fn health_check_url_uses_listen_port() {
        let check = HealthCheckConfig::default();
        assert_eq!(check.url(8001, "/health"), "http://localhost:8001/health");

        let check = HealthCheckConfig {
            host: "10.0.0.7".to_string(),
            ..Default::default()
        };
        assert_eq!(check.url(9000, "/health"), "http://10.0.0.7:9000/health");
    }
}
