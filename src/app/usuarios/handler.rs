//! 用户处理器
//!
//! 每个处理器按顺序：提取输入、获取连接、执行一条语句、写回响应。
//! 任一步失败立即返回纯文本错误，消息文本按操作区分。

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::{
    model::{Usuario, UsuarioPayload},
    service::UsuarioStore,
};
use crate::core::error::{AppError, Mensagens};

static CRIAR: Mensagens = Mensagens {
    executar: "Erro ao executar o statement!",
    ..Mensagens::PADRAO
};

static LISTAR: Mensagens = Mensagens {
    preparar: "Erro ao buscar os usuários!",
    executar: "Erro ao buscar os usuários!",
    codificar: "Erro ao converter os usuários para JSON!",
    ..Mensagens::PADRAO
};

static BUSCAR: Mensagens = Mensagens {
    conexao: "Erro ao conectar com o banco de dados",
    preparar: "Erro ao buscar o usuário!",
    executar: "Erro ao buscar o usuário!",
    ..Mensagens::PADRAO
};

static ATUALIZAR: Mensagens = Mensagens {
    parametro_id: "Erro ao converter o parametro id em número inteiro",
    leitura_corpo: "Erro ao ler o corpo da requisição",
    conversao_json: "Erro ao converter o usuário para struct",
    conexao: "Erro ao conectar com o banco de dados",
    executar: "Erro ao atualizar o usuário!",
    ..Mensagens::PADRAO
};

static DELETAR: Mensagens = Mensagens {
    parametro_id: "Erro ao converter o parametro id em um número inteiro",
    conexao: "Erro ao conectar com o banco de dados",
    executar: "Erro ao remover usuário!",
    ..Mensagens::PADRAO
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UsuarioStore>,
    /// 查询不存在的用户时返回零值记录而不是 404
    pub legacy_responses: bool,
    /// 请求体上限，`None` 表示不限制
    pub max_body_bytes: Option<usize>,
}

impl AppState {
    pub fn new(store: Arc<dyn UsuarioStore>, legacy_responses: bool) -> Self {
        Self {
            store,
            legacy_responses,
            max_body_bytes: None,
        }
    }

    pub fn with_body_limit(mut self, max_body_bytes: Option<usize>) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// 解析路径中的 id：只接受十进制数字，且必须落在 u32 范围内
pub fn parse_id(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok()
}

fn path_id(
    path: Result<Path<String>, PathRejection>,
    mensagens: &'static Mensagens,
) -> Result<u32, AppError> {
    let raw = match path {
        Ok(Path(raw)) => raw,
        Err(rejection) => rejection.body_text(),
    };
    parse_id(&raw).ok_or(AppError::InvalidId { mensagens, raw })
}

fn decode_payload(
    body: Result<Bytes, BytesRejection>,
    mensagens: &'static Mensagens,
) -> Result<UsuarioPayload, AppError> {
    let body = body.map_err(|source| AppError::BodyRead { mensagens, source })?;
    UsuarioPayload::from_slice(&body).map_err(|source| AppError::JsonDecode { mensagens, source })
}

fn json_response<T: Serialize>(
    value: &T,
    mensagens: &'static Mensagens,
) -> Result<Response, AppError> {
    let body =
        serde_json::to_vec(value).map_err(|source| AppError::Encode { mensagens, source })?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// POST /usuarios
pub async fn criar_usuario(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, String), AppError> {
    let usuario = decode_payload(body, &CRIAR)?;

    let id = state
        .store
        .inserir(&usuario.nome, &usuario.email)
        .await
        .map_err(AppError::store(&CRIAR))?;

    info!("Usuário inserido: id={}", id);

    Ok((
        StatusCode::CREATED,
        format!("Usuário inserido com sucesso! ID: {}", id),
    ))
}

/// GET /usuarios
pub async fn buscar_usuarios(State(state): State<AppState>) -> Result<Response, AppError> {
    let usuarios = state
        .store
        .listar()
        .await
        .map_err(AppError::store(&LISTAR))?;

    json_response(&usuarios, &LISTAR)
}

/// GET /usuarios/{id}
pub async fn buscar_usuario(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let id = path_id(path, &BUSCAR)?;

    let usuario = state
        .store
        .buscar(id)
        .await
        .map_err(AppError::store(&BUSCAR))?;

    match usuario {
        Some(usuario) => json_response(&usuario, &BUSCAR),
        None if state.legacy_responses => json_response(&Usuario::default(), &BUSCAR),
        None => Err(AppError::NotFound),
    }
}

/// PUT /usuarios/{id}，id 不存在时同样返回 204
pub async fn atualizar_usuario(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path, &ATUALIZAR)?;
    let usuario = decode_payload(body, &ATUALIZAR)?;

    let linhas = state
        .store
        .atualizar(id, &usuario.nome, &usuario.email)
        .await
        .map_err(AppError::store(&ATUALIZAR))?;

    info!("Usuário atualizado: id={} linhas={}", id, linhas);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /usuarios/{id}，id 不存在时同样返回 204
pub async fn deletar_usuario(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path, &DELETAR)?;

    let linhas = state
        .store
        .deletar(id)
        .await
        .map_err(AppError::store(&DELETAR))?;

    info!("Usuário removido: id={} linhas={}", id, linhas);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_u32_range() {
        assert_eq!(parse_id("0"), Some(0));
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("007"), Some(7));
        assert_eq!(parse_id("4294967295"), Some(u32::MAX));
    }

    #[test]
    fn parse_id_rejects_everything_else() {
        for raw in ["", "abc", "-1", "+1", " 1", "1.5", "4294967296", "1e3"] {
            assert_eq!(parse_id(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn id_error_text_depends_on_operation() {
        let err = path_id(Ok(Path("x".to_string())), &ATUALIZAR).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Erro ao converter o parametro id em número inteiro"
        );

        let err = path_id(Ok(Path("x".to_string())), &DELETAR).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Erro ao converter o parametro id em um número inteiro"
        );
    }
}
