//! 用户管理：模型、存储、处理器

pub mod handler;
pub mod memory;
pub mod model;
pub mod service;

pub use handler::AppState;
pub use memory::MemoryUsuarioStore;
pub use model::Usuario;
pub use service::{PgUsuarioStore, StoreError, UsuarioStore};
