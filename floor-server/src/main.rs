use floor_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 日志: 控制台 + {work_dir}/logs/app
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_path()))?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage_mode,
        grid_size = config.grid_size,
        "Floor server starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config)?;

    // 5. 启动 HTTP 服务器 (Server::run 会启动后台任务)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
