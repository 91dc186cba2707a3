//! 内存存储实现，用于本地运行和测试

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::model::Usuario;
use super::service::{StoreError, UsuarioStore};

#[derive(Default)]
struct Tabela {
    proximo_id: u32,
    linhas: BTreeMap<u32, Usuario>,
}

/// 模拟自增主键的内存表，id 从 1 开始，列表按 id 排序
#[derive(Default)]
pub struct MemoryUsuarioStore {
    tabela: RwLock<Tabela>,
}

impl MemoryUsuarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsuarioStore for MemoryUsuarioStore {
    async fn inserir(&self, nome: &str, email: &str) -> Result<u32, StoreError> {
        let mut tabela = self.tabela.write().await;
        let id = tabela
            .proximo_id
            .checked_add(1)
            .ok_or_else(|| StoreError::InsertedId("id sequence exhausted".to_string()))?;
        tabela.proximo_id = id;
        tabela.linhas.insert(
            id,
            Usuario {
                id,
                nome: nome.to_string(),
                email: email.to_string(),
            },
        );
        Ok(id)
    }

    async fn listar(&self) -> Result<Vec<Usuario>, StoreError> {
        let tabela = self.tabela.read().await;
        Ok(tabela.linhas.values().cloned().collect())
    }

    async fn buscar(&self, id: u32) -> Result<Option<Usuario>, StoreError> {
        let tabela = self.tabela.read().await;
        Ok(tabela.linhas.get(&id).cloned())
    }

    async fn atualizar(&self, id: u32, nome: &str, email: &str) -> Result<u64, StoreError> {
        let mut tabela = self.tabela.write().await;
        match tabela.linhas.get_mut(&id) {
            Some(usuario) => {
                usuario.nome = nome.to_string();
                usuario.email = email.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn deletar(&self, id: u32) -> Result<u64, StoreError> {
        let mut tabela = self.tabela.write().await;
        Ok(tabela.linhas.remove(&id).map_or(0, |_| 1))
    }
}
