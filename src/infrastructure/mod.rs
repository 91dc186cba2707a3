//! 基础设施层：数据库连接、日志

pub mod database;
pub mod logger;

pub use database::ConnectionProvider;
pub use logger::Logger;
