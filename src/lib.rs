//! # crud-usuarios
//!
//! 基于 Axum + SQLx 的用户 CRUD 服务。
//!
//! - `app`: 路由、处理器、存储实现
//! - `core`: 错误处理与中间件
//! - `infrastructure`: 数据库连接与日志
//! - `config`: TOML 配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod server;
