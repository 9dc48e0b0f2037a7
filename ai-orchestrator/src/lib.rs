// 导出模块
pub mod app;
pub mod registration;
pub mod router;

pub use app::Orchestrator;
