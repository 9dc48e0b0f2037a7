use axum_server::Handle;
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use common::config::{AppConfig, RegistrationPolicy};
use common::service_register_center::{service_register_center, ServiceRegister};
use common::Result;

use crate::registration::{advertise_address, build_registration};
use crate::router::build_router;

/// 服务进程
///
/// 在 `main` 中构造一次，启动顺序固定为：绑定监听 → 注册到注册中心 → 提供服务。
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: Arc<AppConfig>,
    registry: Arc<dyn ServiceRegister>,
}

impl Orchestrator {
    pub fn new(config: Arc<AppConfig>, registry: Arc<dyn ServiceRegister>) -> Self {
        Self { config, registry }
    }

    /// 使用配置中的 Consul 作为注册中心
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self> {
        let registry = service_register_center(&config.service_center)?;
        Ok(Self::new(config, registry))
    }

    /// 绑定HTTP监听地址
    pub fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.config.service.listen_addr())?;
        listener.set_nonblocking(true)?;
        Ok(listener)
    }

    /// 向注册中心注册本服务，进程生命周期内只调用一次
    ///
    /// 成功返回服务ID。失败时按 `failure_policy` 处理：advisory 记录警告并返回
    /// `Ok(None)`，fatal 返回错误。
    pub async fn register_with_discovery(&self, port: u16) -> Result<Option<String>> {
        let service = &self.config.service;

        let outcome = match advertise_address(service) {
            Ok(address) => {
                let registration = build_registration(service, address, port);
                info!(
                    "注册服务 {} 到 {}, 地址: {}:{}",
                    registration.name,
                    self.config.service_center.url(),
                    registration.host,
                    registration.port
                );
                self.registry.register(registration).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(service_id) => {
                info!("服务已注册到注册中心, 服务ID: {}", service_id);
                Ok(Some(service_id))
            }
            Err(e) => match self.config.service_center.failure_policy {
                RegistrationPolicy::Advisory => {
                    warn!("服务注册失败，继续提供服务: {}", e);
                    Ok(None)
                }
                RegistrationPolicy::Fatal => {
                    error!("服务注册失败，终止启动: {}", e);
                    Err(e)
                }
            },
        }
    }

    /// 在已绑定的监听器上提供服务，直到 `shutdown` 完成
    ///
    /// 收到关闭信号后先从注册中心注销（如已注册且启用），再优雅关闭服务器。
    pub async fn serve<F>(
        &self,
        listener: TcpListener,
        service_id: Option<String>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let handle = Handle::new();
        let grace = Duration::from_secs(self.config.service.shutdown_grace_secs);

        let registry = self.registry.clone();
        let deregister_id = service_id.filter(|_| self.config.service_center.deregister_on_shutdown);
        let shutdown_handle = handle.clone();
        let shutdown_task = tokio::spawn(async move {
            shutdown.await;

            if let Some(service_id) = deregister_id {
                match registry.deregister(&service_id).await {
                    Ok(_) => info!("已从服务注册中心注销服务: {}", service_id),
                    Err(e) => error!("从服务注册中心注销服务失败: {}", e),
                }
            }

            shutdown_handle.graceful_shutdown(Some(grace));
        });

        info!("ai-orchestrator 服务监听: http://{}", addr);

        let served = axum_server::from_tcp(listener)
            .handle(handle)
            .serve(build_router().into_make_service())
            .await;

        if served.is_err() {
            shutdown_task.abort();
        } else if let Err(e) = shutdown_task.await {
            error!("关闭任务异常退出: {}", e);
        }
        served?;

        info!("HTTP服务已关闭");
        Ok(())
    }

    /// 注册并提供服务
    pub async fn run<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let port = listener.local_addr()?.port();
        let service_id = self.register_with_discovery(port).await?;
        self.serve(listener, service_id, shutdown).await
    }
}
