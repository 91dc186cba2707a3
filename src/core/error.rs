//! 核心错误处理模块
//!
//! 所有错误都以纯文本消息写回，状态码由错误类型决定，消息文本由各操作提供。

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::app::usuarios::service::StoreError;

pub const MSG_NAO_ENCONTRADO: &str = "Usuário não encontrado!";

/// 单个操作在各失败点写回的消息
#[derive(Debug, Clone, Copy)]
pub struct Mensagens {
    pub leitura_corpo: &'static str,
    pub conversao_json: &'static str,
    pub parametro_id: &'static str,
    pub conexao: &'static str,
    /// 语句准备失败
    pub preparar: &'static str,
    /// 语句执行失败
    pub executar: &'static str,
    /// 获取新插入 id 失败
    pub obter_id: &'static str,
    pub escanear: &'static str,
    pub codificar: &'static str,
}

impl Mensagens {
    /// 各操作未覆盖的失败点使用的消息
    pub const PADRAO: Mensagens = Mensagens {
        leitura_corpo: "Falha ao ler o corpo da requisição!",
        conversao_json: "Erro ao converter o usuário para struct!",
        parametro_id: "Erro ao converter o parametro id para número inteiro",
        conexao: "Erro ao conectar com o banco de dados!",
        preparar: "Erro ao criar o statement!",
        executar: "Erro ao executar o statement!",
        obter_id: "Erro ao obter o ID inserido!",
        escanear: "Erro ao escanear o usuário!",
        codificar: "Erro ao converter o usuário para JSON!",
    };

    pub fn store(&self, source: &StoreError) -> &'static str {
        match source {
            StoreError::Connection(_) => self.conexao,
            StoreError::Prepare(_) => self.preparar,
            StoreError::Statement(_) => self.executar,
            StoreError::InsertedId(_) => self.obter_id,
            StoreError::Scan(_) => self.escanear,
        }
    }
}

/// 错误响应上的标记，兼容模式中间件据此改写状态码
#[derive(Debug, Clone, Copy)]
pub struct ErrorMarker;

/// 核心错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .mensagens.leitura_corpo)]
    BodyRead {
        mensagens: &'static Mensagens,
        #[source]
        source: BytesRejection,
    },

    #[error("{}", .mensagens.conversao_json)]
    JsonDecode {
        mensagens: &'static Mensagens,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}", .mensagens.parametro_id)]
    InvalidId {
        mensagens: &'static Mensagens,
        raw: String,
    },

    #[error("{}", .mensagens.store(.source))]
    Store {
        mensagens: &'static Mensagens,
        #[source]
        source: StoreError,
    },

    #[error("{}", .mensagens.codificar)]
    Encode {
        mensagens: &'static Mensagens,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}", MSG_NAO_ENCONTRADO)]
    NotFound,
}

impl AppError {
    /// 将存储错误附上当前操作的消息
    pub fn store(mensagens: &'static Mensagens) -> impl FnOnce(StoreError) -> Self {
        move |source| AppError::Store { mensagens, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BodyRead { .. } | AppError::JsonDecode { .. } | AppError::InvalidId { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Store {
                source: StoreError::Connection(_),
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store { .. } | AppError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store { source, .. } => error!("Store error: {}", source),
            AppError::Encode { source, .. } => error!("Encode error: {}", source),
            _ => {}
        }

        let status = self.status();
        let mut response = (status, self.to_string()).into_response();
        response.extensions_mut().insert(ErrorMarker);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BUSCAR: Mensagens = Mensagens {
        conexao: "Erro ao conectar com o banco de dados",
        executar: "Erro ao buscar o usuário!",
        ..Mensagens::PADRAO
    };

    #[test]
    fn messages_follow_store_error_kind() {
        let err = AppError::store(&BUSCAR)(StoreError::Connection(sqlx::Error::PoolTimedOut));
        assert_eq!(err.to_string(), "Erro ao conectar com o banco de dados");
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = AppError::store(&BUSCAR)(StoreError::Statement(sqlx::Error::RowNotFound));
        assert_eq!(err.to_string(), "Erro ao buscar o usuário!");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::store(&BUSCAR)(StoreError::Prepare(sqlx::Error::PoolClosed));
        assert_eq!(err.to_string(), "Erro ao criar o statement!");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::store(&BUSCAR)(StoreError::InsertedId("none".to_string()));
        assert_eq!(err.to_string(), "Erro ao obter o ID inserido!");

        let err = AppError::store(&BUSCAR)(StoreError::Scan("bad".to_string()));
        assert_eq!(err.to_string(), "Erro ao escanear o usuário!");
    }

    #[test]
    fn client_errors_are_bad_request() {
        let err = AppError::InvalidId {
            mensagens: &BUSCAR,
            raw: "abc".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::JsonDecode {
            mensagens: &BUSCAR,
            source,
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn response_is_marked_plain_text() {
        let response = AppError::InvalidId {
            mensagens: &BUSCAR,
            raw: "x".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorMarker>().is_some());
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
    }
}
