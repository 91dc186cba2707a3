//! 核心中间件模块

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

use super::error::ErrorMarker;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求日志中间件，为每个请求分配 request id 并写回响应头
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!("request", id = %request_id);
    let mut response = next.run(req).instrument(span).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "{} {} - {} - {}ms - request_id: {} - User-Agent: {:?}",
        method,
        uri,
        status,
        duration.as_millis(),
        request_id,
        user_agent
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// 兼容模式：错误响应保留消息正文，但状态码一律改写为 200
pub async fn legacy_error_status(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    if response.extensions().get::<ErrorMarker>().is_some() {
        *response.status_mut() = StatusCode::OK;
    }
    response
}
