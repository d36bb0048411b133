#[cfg(feature = "lambda")]
use demo_relay::adapters::lambda::{ApiGatewayRequest, ApiGatewayResponse};
#[cfg(feature = "lambda")]
use demo_relay::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use demo_relay::{DemoRequestHandler, RelayConfig, ResendSender};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &DemoRequestHandler<ResendSender>,
    event: LambdaEvent<ApiGatewayRequest>,
) -> Result<ApiGatewayResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Demo relay invocation");

    let response = handler.handle(event.payload.into_inbound()).await;
    Ok(ApiGatewayResponse::from(response))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 設定在 cold start 讀一次；格式錯誤讓 init 失敗，strict 模式的缺漏由 handler 逐次回 500
    let config = RelayConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let sender = ResendSender::from_config(&config);
    let handler = DemoRequestHandler::new(config, sender);
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<ApiGatewayRequest>| async move {
        function_handler(handler, event).await
    }))
    .await
}
