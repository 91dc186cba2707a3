use crud_usuarios::config;
use crud_usuarios::infrastructure::Logger;
use crud_usuarios::server;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 可选参数：配置文件路径
    let config_path = env::args().nth(1).map(PathBuf::from);

    let mut config = config::load_config(config_path.as_deref())?;
    config.apply_env_overrides();
    config.validate()?;

    Logger::init(&config.logging)?;

    server::run(config).await
}
