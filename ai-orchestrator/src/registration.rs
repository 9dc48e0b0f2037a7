use common::config::ServiceConfig;
use common::service::local_hostname;
use common::service_register_center::{HealthCheck, Registration};
use common::Result;

use crate::router::HEALTH_PATH;

/// 注册到注册中心的地址：优先使用配置，否则使用本机主机名
pub fn advertise_address(config: &ServiceConfig) -> Result<String> {
    match &config.advertise_address {
        Some(address) if !address.is_empty() => Ok(address.clone()),
        _ => local_hostname(),
    }
}

/// 构建服务注册信息
///
/// `port` 必须是监听器实际绑定的端口；健康检查URL指向该端口上的状态路由。
pub fn build_registration(config: &ServiceConfig, address: String, port: u16) -> Registration {
    let check = &config.health_check;

    Registration {
        id: config.id.clone(),
        name: config.name.clone(),
        host: address,
        port,
        tags: config.tags.clone(),
        check: Some(HealthCheck {
            name: format!("{} health", config.name),
            url: check.url(port, HEALTH_PATH),
            interval: check.interval.clone(),
            timeout: check.timeout.clone(),
            deregister_after: check.deregister_after.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn default_registration_fields() {
        let config = ServiceConfig::default();
        let registration = build_registration(&config, "orchestrator-host".to_string(), config.port);

        assert_eq!(registration.name, "ai-orchestrator");
        assert_eq!(registration.id, "ai-orchestrator");
        assert_eq!(registration.host, "orchestrator-host");
        assert_eq!(registration.port, 8001);
        assert!(registration.tags.is_empty());

        let check = registration.check.unwrap();
        assert_eq!(check.url, "http://localhost:8001/health");
        assert_eq!(check.interval, "10s");
        assert_eq!(check.timeout, None);
        assert_eq!(check.deregister_after, None);
    }

    #[test]
    fn check_follows_bound_port() {
        let config = ServiceConfig::default();
        let registration = build_registration(&config, "host".to_string(), 41234);

        assert_eq!(registration.port, 41234);
        assert_eq!(
            registration.check.unwrap().url,
            "http://localhost:41234/health"
        );
    }

    #[test]
    fn advertise_address_prefers_config() {
        let config = ServiceConfig {
            advertise_address: Some("10.0.0.5".to_string()),
            ..Default::default()
        };
        assert_eq!(advertise_address(&config).unwrap(), "10.0.0.5");

        let config = ServiceConfig {
            advertise_address: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(advertise_address(&config).unwrap(), local_hostname().unwrap());
    }

    #[tokio::test]
    async fn registered_check_url_is_served() {
        let mut config = ServiceConfig::default();
        config.health_check.host = "10.0.0.7".to_string();
        let registration = build_registration(&config, "host".to_string(), 9300);

        let url = registration.check.unwrap().url;
        let path = url
            .strip_prefix("http://10.0.0.7:9300")
            .expect("检查URL应指向绑定端口");
        assert_eq!(path, HEALTH_PATH);

        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
