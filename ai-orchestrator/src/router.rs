use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

/// 状态路由，注册中心的健康检查同样探测该路径
pub const HEALTH_PATH: &str = "/health";

/// 构建服务的HTTP路由，只暴露健康检查端点
pub fn build_router() -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查处理函数
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "OK" })))
}
