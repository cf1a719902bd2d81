use clap::Parser;
use small_toolkit::app::batch::{REPORT_CSV, REPORT_JSON};
use small_toolkit::config::TomlConfig;
use small_toolkit::core::ConfigProvider;
use small_toolkit::utils::error::ErrorSeverity;
use small_toolkit::utils::{logger, validation::Validate};
use small_toolkit::{BatchRunner, LocalStorage, ToolError};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-batch")]
#[command(about = "Run a list of toolkit jobs from a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "toolkit-batch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override output.directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(3);
        }
    };

    // 初始化日誌
    logger::init_batch_logger(
        args.verbose,
        args.json_logs || config.json_logs(),
        config.log_level(),
    );

    tracing::info!("🚀 Starting TOML batch runner");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output_path) = args.output_path {
        tracing::info!("🔧 Output directory overridden to: {}", output_path);
        config.output.directory = output_path;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    if config.jobs.is_empty() {
        exit_with(&ToolError::ConfigValidationError {
            field: "jobs".to_string(),
            message: "the file defines no [[jobs]]".to_string(),
        });
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        for (index, job) in config.jobs.iter().enumerate() {
            println!(
                "{:>3}. {} -> {}{}",
                index + 1,
                job.display_name(index),
                job.tool,
                job.file
                    .as_deref()
                    .map(|f| format!(" (file: {})", f))
                    .unwrap_or_default()
            );
        }
        return Ok(());
    }

    // 輸入檔相對於設定檔所在目錄
    let input_root = Path::new(&args.config)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    let input = LocalStorage::new(input_root);
    let output = LocalStorage::new(config.output_path());

    let jobs = config.jobs.clone();
    let output_dir = config.output_path().to_string();
    let runner = BatchRunner::new(input, output, config);

    match runner.run(&jobs).await {
        Ok(report) => {
            println!(
                "✅ {} succeeded, {} failed",
                report.succeeded(),
                report.failed()
            );
            println!("📁 Reports saved to: {}/{{{}, {}}}", output_dir, REPORT_CSV, REPORT_JSON);
            if report.failed() > 0 {
                // 部分失敗
                std::process::exit(2);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &ToolError) -> ! {
    tracing::error!(
        "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
