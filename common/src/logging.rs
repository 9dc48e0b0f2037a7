use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::configs::LogConfig;
use crate::{Error, Result};

// 日志输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    // 普通文本格式
    Plain,
    // JSON格式，适合ELK等日志聚合系统
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// 从配置初始化日志系统
///
/// `RUST_LOG` 存在时覆盖配置文件中的日志级别，
/// `RUST_LOG_<COMPONENT>` 可以单独覆盖常见组件的级别。
///
/// # 示例
/// ```no_run
/// use common::config::AppConfig;
/// use common::logging;
///
/// fn main() -> common::Result<()> {
///     let config = AppConfig::new()?;
///     logging::init_from_config(&config.log)?;
///     tracing::info!("日志系统从配置初始化成功");
///     Ok(())
/// }
/// ```
pub fn init_from_config(config: &LogConfig) -> Result<()> {
    let filter_string = resolve_filter(env::var("RUST_LOG").ok(), config);
    let env_filter = EnvFilter::try_new(&filter_string)
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let env_filter = check_env_component_overrides(env_filter);

    let log_format = config
        .format
        .as_deref()
        .map(LogFormat::parse)
        .unwrap_or(LogFormat::Plain);

    let installed = match log_format {
        LogFormat::Plain => fmt()
            .with_env_filter(env_filter)
            .with_ansi(true)
            .with_thread_names(true)
            .try_init(),
        LogFormat::Json => fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_thread_names(true)
            .try_init(),
    };
    installed.map_err(|e| Error::Internal(format!("日志系统初始化失败: {}", e)))?;

    info!("日志系统从配置初始化成功，过滤器: {}", filter_string);
    info!("日志格式: {:?}", log_format);
    Ok(())
}

/// 环境变量优先于配置文件
fn resolve_filter(rust_log: Option<String>, config: &LogConfig) -> String {
    match rust_log {
        Some(filter) if !filter.trim().is_empty() => filter,
        _ => config.filter_directives(),
    }
}

/// 常见组件，可以通过 `RUST_LOG_<COMPONENT>` 单独设置级别
const OVERRIDABLE_COMPONENTS: [&str; 4] = ["tower_http", "hyper", "axum", "reqwest"];

/// 检查环境变量中是否有组件特定的日志级别覆盖
fn check_env_component_overrides(mut env_filter: EnvFilter) -> EnvFilter {
    for directive in component_overrides(|name| env::var(name).ok()) {
        // 解析失败的指令直接忽略
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }
    env_filter
}

/// 根据 `lookup` 返回的变量值生成 `component=level` 指令
fn component_overrides<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    OVERRIDABLE_COMPONENTS
        .iter()
        .filter_map(|component| {
            let env_var_name = format!("RUST_LOG_{}", component.to_uppercase());
            lookup(&env_var_name).map(|level| format!("{}={}", component, level))
        })
        .collect()
}
