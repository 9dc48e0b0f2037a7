/// 一次服务注册的内容
///
/// 由调用方在启动时构建，Consul 实现负责转换为 agent API 的请求体。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registration {
    /// 注册中心的去重键
    pub id: String,
    pub name: String,
    /// 注册中心及其他服务访问本服务的地址
    pub host: String,
    pub port: u16,
    pub tags: Vec<String>,
    pub check: Option<HealthCheck>,
}

/// 注册中心对服务发起的 HTTP 健康检查
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub name: String,
    pub url: String,
    /// 检查间隔，例如 "10s"
    pub interval: String,
    pub timeout: Option<String>,
    /// 对应 Consul 的 DeregisterCriticalServiceAfter
    pub deregister_after: Option<String>,
}
