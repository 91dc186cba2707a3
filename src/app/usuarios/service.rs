//! 用户存储服务
//!
//! 每个操作只执行一条参数化语句。

use async_trait::async_trait;
use sqlx::{Executor, Statement};
use thiserror::Error;
use tracing::debug;

use super::model::{Usuario, UsuarioRow};
use crate::infrastructure::ConnectionProvider;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("prepare failed: {0}")]
    Prepare(#[source] sqlx::Error),

    #[error("statement failed: {0}")]
    Statement(#[source] sqlx::Error),

    /// 插入成功但无法取得新记录的 id
    #[error("inserted id unavailable: {0}")]
    InsertedId(String),

    #[error("scan failed: {0}")]
    Scan(String),
}

impl StoreError {
    /// 区分语句执行失败与结果读取失败
    fn from_query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StoreError::Scan(err.to_string()),
            other => StoreError::Statement(other),
        }
    }
}

/// 用户存储抽象，处理器只依赖这个 trait
#[async_trait]
pub trait UsuarioStore: Send + Sync {
    /// 插入一条记录，返回数据库分配的 id
    async fn inserir(&self, nome: &str, email: &str) -> Result<u32, StoreError>;

    /// 读取全部记录，顺序由存储决定
    async fn listar(&self) -> Result<Vec<Usuario>, StoreError>;

    /// 按 id 查询，不存在时返回 `None`
    async fn buscar(&self, id: u32) -> Result<Option<Usuario>, StoreError>;

    /// 按 id 更新，返回受影响的行数
    async fn atualizar(&self, id: u32, nome: &str, email: &str) -> Result<u64, StoreError>;

    /// 按 id 删除，返回受影响的行数
    async fn deletar(&self, id: u32) -> Result<u64, StoreError>;
}

/// 基于 PostgreSQL 的存储实现
#[derive(Clone)]
pub struct PgUsuarioStore {
    provider: ConnectionProvider,
}

impl PgUsuarioStore {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

fn scan(row: UsuarioRow) -> Result<Usuario, StoreError> {
    let id = row.id;
    Usuario::try_from(row).map_err(|e| StoreError::Scan(format!("id {}: {}", id, e)))
}

#[async_trait]
impl UsuarioStore for PgUsuarioStore {
    async fn inserir(&self, nome: &str, email: &str) -> Result<u32, StoreError> {
        let mut conn = self
            .provider
            .acquire()
            .await
            .map_err(StoreError::Connection)?;

        let statement = (&mut *conn)
            .prepare("INSERT INTO usuarios (nome, email) VALUES ($1, $2) RETURNING id")
            .await
            .map_err(StoreError::Prepare)?;

        let row: Option<(i32,)> = statement
            .query_as()
            .bind(nome)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| match StoreError::from_query(e) {
                StoreError::Scan(msg) => StoreError::InsertedId(msg),
                other => other,
            })?;

        let (id,) = row.ok_or_else(|| StoreError::InsertedId("no row returned".to_string()))?;
        u32::try_from(id).map_err(|e| StoreError::InsertedId(format!("id {}: {}", id, e)))
    }

    async fn listar(&self) -> Result<Vec<Usuario>, StoreError> {
        let mut conn = self
            .provider
            .acquire()
            .await
            .map_err(StoreError::Connection)?;

        let rows = sqlx::query_as::<_, UsuarioRow>("SELECT id, nome, email FROM usuarios")
            .fetch_all(&mut *conn)
            .await
            .map_err(StoreError::from_query)?;

        rows.into_iter().map(scan).collect()
    }

    async fn buscar(&self, id: u32) -> Result<Option<Usuario>, StoreError> {
        let mut conn = self
            .provider
            .acquire()
            .await
            .map_err(StoreError::Connection)?;

        let row = sqlx::query_as::<_, UsuarioRow>(
            "SELECT id, nome, email FROM usuarios WHERE id = $1",
        )
        .bind(i64::from(id))
        .fetch_optional(&mut *conn)
        .await
        .map_err(StoreError::from_query)?;

        row.map(scan).transpose()
    }

    async fn atualizar(&self, id: u32, nome: &str, email: &str) -> Result<u64, StoreError> {
        let mut conn = self
            .provider
            .acquire()
            .await
            .map_err(StoreError::Connection)?;

        let statement = (&mut *conn)
            .prepare("UPDATE usuarios SET nome = $1, email = $2 WHERE id = $3::bigint")
            .await
            .map_err(StoreError::Prepare)?;

        let result = statement
            .query()
            .bind(nome)
            .bind(email)
            .bind(i64::from(id))
            .execute(&mut *conn)
            .await
            .map_err(StoreError::Statement)?;

        debug!("update usuarios id={} rows={}", id, result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn deletar(&self, id: u32) -> Result<u64, StoreError> {
        let mut conn = self
            .provider
            .acquire()
            .await
            .map_err(StoreError::Connection)?;

        let statement = (&mut *conn)
            .prepare("DELETE FROM usuarios WHERE id = $1::bigint")
            .await
            .map_err(StoreError::Prepare)?;

        let result = statement
            .query()
            .bind(i64::from(id))
            .execute(&mut *conn)
            .await
            .map_err(StoreError::Statement)?;

        debug!("delete usuarios id={} rows={}", id, result.rows_affected());
        Ok(result.rows_affected())
    }
}
