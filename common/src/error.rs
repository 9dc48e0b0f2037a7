use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("内部服务错误: {0}")]
    Internal(String),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    /// 注册中心返回了非 2xx 状态码
    #[error("注册中心请求失败: HTTP {status}: {message}")]
    Registration { status: u16, message: String },

    #[error("HTTP请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO错误: {0}")]
    IO(#[from] std::io::Error),
}

impl Error {
    /// 是否为与注册中心通信时产生的错误
    pub fn is_registration_failure(&self) -> bool {
        matches!(self, Error::Registration { .. } | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
