use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use crate::config::ServiceCenterConfig;
use crate::Result;

// 声明子模块
pub mod consul;
pub mod typos;

pub use crate::service_register_center::consul::Consul;
pub use crate::service_register_center::typos::{HealthCheck, Registration};

/// 服务注册接口
///
/// 定义了服务注册和注销的核心功能
#[async_trait]
pub trait ServiceRegister: Send + Sync + Debug {
    /// 向注册中心注册服务
    ///
    /// 每次调用都会发起一次网络请求；相同ID重复注册由注册中心覆盖旧条目。
    ///
    /// # 返回
    /// 成功返回注册的服务ID
    async fn register(&self, registration: Registration) -> Result<String>;

    /// 从注册中心注销服务
    ///
    /// # 参数
    /// * `service_id` - 服务的唯一标识
    async fn deregister(&self, service_id: &str) -> Result<()>;
}

/// 根据配置创建服务注册中心实例
pub fn service_register_center(config: &ServiceCenterConfig) -> Result<Arc<dyn ServiceRegister>> {
    Ok(Arc::new(Consul::from_config(config)?))
}
