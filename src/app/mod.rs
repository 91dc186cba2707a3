//! 应用层

pub mod usuarios;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::core::middleware::{legacy_error_status, request_logging_middleware};
use usuarios::handler::{
    atualizar_usuario, buscar_usuario, buscar_usuarios, criar_usuario, deletar_usuario,
};
use usuarios::AppState;

/// 创建路由
pub fn routes(state: AppState) -> Router {
    let legacy = state.legacy_responses;
    let body_limit = match state.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let router = Router::new()
        .route("/usuarios", get(buscar_usuarios).post(criar_usuario))
        .route(
            "/usuarios/:id",
            get(buscar_usuario)
                .put(atualizar_usuario)
                .delete(deletar_usuario),
        )
        .with_state(state)
        .layer(body_limit);

    let router = if legacy {
        router.layer(middleware::from_fn(legacy_error_status))
    } else {
        router
    };

    router
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
}
