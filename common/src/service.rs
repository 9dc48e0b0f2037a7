use tokio::signal;
use tracing::{error, info};

use crate::{Error, Result};

/// 等待关闭信号
///
/// 监听 Ctrl+C，在Unix系统上同时监听 SIGTERM。信号处理器安装失败时
/// 记录错误，对应的分支永不返回。
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("无法安装Ctrl+C处理器: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("无法安装SIGTERM处理器: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    // 在非Unix系统上创建一个永不返回的future
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("接收到关闭信号，准备优雅关闭...");
}

/// 获取本机主机名，作为注册到注册中心的默认地址
pub fn local_hostname() -> Result<String> {
    hostname::get()?
        .into_string()
        .map_err(|name| Error::Internal(format!("主机名不是有效的UTF-8: {:?}", name)))
}
