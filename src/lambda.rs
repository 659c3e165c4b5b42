use aws_config::BehaviorVersion;
use chrono::Utc;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use scan_transfer::utils::{logger, validation::Validate};
use scan_transfer::{
    HandlerConfig, HandlerResponse, S3ObjectStore, ScanResultHandler, SecretsManagerStore,
    SnsNotifier,
};

type AwsHandler = ScanResultHandler<S3ObjectStore, SecretsManagerStore, SnsNotifier>;

async fn function_handler(
    handler: &AwsHandler,
    event: LambdaEvent<serde_json::Value>,
) -> Result<HandlerResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Handling scan result");
    Ok(handler.handle_value(event.payload, Utc::now()).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = HandlerConfig::from_env()?;
    config.validate()?;
    tracing::info!(
        quarantine_bucket = config.quarantine_bucket.as_deref().unwrap_or("unset"),
        secret_prefix = %config.secret_prefix,
        "Starting scan result handler"
    );

    // Clients are built once per container and reused across invocations.
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let handler = ScanResultHandler::new(
        S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config)),
        SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config)),
        SnsNotifier::new(aws_sdk_sns::Client::new(&sdk_config)),
        config,
    );

    run(service_fn(|event| function_handler(&handler, event))).await
}
