use clap::Parser;
use twinfield::utils::error::ErrorSeverity;
use twinfield::utils::{logger, validation::Validate};
use twinfield::{BankTransactionApiConnector, BankTransactionsDocument, CliConfig, SendReport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting twinfield CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(Some(report)) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.has_rejections() {
                tracing::warn!("⚠️ {} of {} items rejected", report.rejected, report.items.len());
                std::process::exit(2);
            }
            tracing::info!("✅ All {} items accepted", report.accepted);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Sending failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> twinfield::Result<Option<SendReport>> {
    let config = cli.load_config()?;

    let mut transactions = cli.read_transactions()?;
    if let Some(config) = &config {
        for transaction in &mut transactions {
            config.apply_defaults(transaction);
        }
    }
    tracing::info!("📄 Loaded {} bank transactions", transactions.len());

    let config = match config {
        Some(config) if !cli.dry_run => config,
        _ => {
            println!("{}", BankTransactionsDocument::new(&transactions).to_xml()?);
            return Ok(None);
        }
    };

    config.validate()?;

    let client = config.build_client()?;
    tracing::debug!("Using ProcessXml endpoint {}", client.endpoint());
    let connector = BankTransactionApiConnector::new(client).with_chunk_size(config.chunk_size());

    let results = connector.send_all(transactions).await?;
    Ok(Some(SendReport::from_results(&results)))
}
