use chrono::Utc;
use clap::Parser;
use scan_transfer::utils::error::ErrorSeverity;
use scan_transfer::utils::{logger, validation::Validate};
use scan_transfer::{
    CliArgs, LocalObjectStore, OutboxNotifier, ReplayConfig, ScanEvent, ScanResultHandler,
    ScanTransferError, StaticSecretStore,
};

fn exit_with(e: &ScanTransferError) -> ! {
    tracing::error!(
        "❌ Replay failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Loading configuration from: {}", args.config.display());

    let config = ReplayConfig::from_file(&args.config).unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    if args.verbose {
        tracing::debug!("Replay config: {:?}", config);
    }

    let content = tokio::fs::read_to_string(&args.event)
        .await
        .unwrap_or_else(|e| exit_with(&ScanTransferError::from(e)));
    let payload: serde_json::Value =
        serde_json::from_str(&content).unwrap_or_else(|e| exit_with(&ScanTransferError::from(e)));

    let handler = ScanResultHandler::new(
        LocalObjectStore::new(config.local.root.clone()),
        StaticSecretStore::new(config.local.secrets.clone()),
        OutboxNotifier::new(config.local.outbox.clone()),
        config.handler.clone(),
    );

    if args.dry_run {
        let event = ScanEvent::from_value(payload).unwrap_or_else(|e| exit_with(&e));
        let plan = handler
            .plan(&event, Utc::now())
            .await
            .unwrap_or_else(|e| exit_with(&e));
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let response = handler.handle_value(payload, Utc::now()).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
