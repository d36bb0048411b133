use anyhow::Context;
use clap::Parser;
use demo_relay::config::cli::DEFAULT_BIND;
use demo_relay::config::Command;
use demo_relay::utils::{logger, validation::Validate};
use demo_relay::{
    CliConfig, DemoRequestHandler, InboundRequest, RelayConfig, RequestBody, ResendSender,
    TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting demo-relay CLI");

    let file = match &cli.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let config = RelayConfig::from_sources(file.as_ref(), |key| std::env::var(key).ok())?;
    tracing::debug!("Relay config: {:?}", config);

    // 驗證配置 (只檢查格式；strict 模式的缺漏設定由 handler 逐次回 500)
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let sender = ResendSender::from_config(&config);
    let handler = DemoRequestHandler::new(config, sender);

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind
                .or_else(|| file.as_ref().and_then(|f| f.bind_address().map(str::to_string)))
                .unwrap_or_else(|| DEFAULT_BIND.to_string());

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {}", bind))?;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                }
            };

            demo_relay::adapters::server::serve(listener, Arc::new(handler), shutdown).await?;
        }
        Command::Submit { file } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;

            let response = handler
                .handle(InboundRequest::new(http::Method::POST, RequestBody::Raw(body)))
                .await;

            println!("{}", response.status());
            println!("{}", response.body());

            if !response.status().is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
