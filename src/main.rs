use burnthedev_bot::core::ConfigProvider;
use burnthedev_bot::utils::error::ErrorSeverity;
use burnthedev_bot::utils::{logger, validation::Validate};
use burnthedev_bot::{
    BotConfig, BotEngine, BotError, CommandHandler, FileConfig, SupabaseClient, TelegramClient,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    // .env 檔案不存在時直接使用系統環境變數
    let dotenv_result = dotenvy::dotenv();

    let mut config = BotConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if let Ok(path) = dotenv_result {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match FileConfig::from_file(&path) {
            Ok(file) => file.apply_to(&mut config),
            Err(e) => exit_with(&e),
        }
    }

    if config.verbose {
        tracing::debug!("Bot config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Bot stopped: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }

    tracing::info!("👋 Bot stopped");
}

async fn run(config: BotConfig) -> burnthedev_bot::Result<()> {
    let telegram = TelegramClient::new(&config)?;
    let supabase = SupabaseClient::new(&config)?;
    let handler = CommandHandler::new(supabase, config.retry_policy(), config.leaderboard_limit());

    let mut engine = BotEngine::new(telegram, handler, config.poll_timeout());
    engine
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}

fn exit_with(e: &BotError) -> ! {
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
