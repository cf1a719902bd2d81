use clap::Parser;
use serde_json::json;
use small_toolkit::app::apply_defaults;
use small_toolkit::config::{CliConfig, Command, TomlConfig};
use small_toolkit::core::{ConfigProvider, Storage};
use small_toolkit::domain::model::{Category, FieldKind, FileInput, ToolInput, ToolOutput};
use small_toolkit::utils::error::{ErrorSeverity, Result, ToolError};
use small_toolkit::utils::{logger, validation::Validate};
use small_toolkit::{LocalStorage, ToolEngine};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::debug!("CLI config: {:?}", config);

    // 載入設定檔，命令列參數優先
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path).and_then(|toml| toml.validate().map(|_| toml)) {
            Ok(toml) => config.merge_toml(&toml),
            Err(e) => exit_with(&e),
        }
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let engine = ToolEngine::builtin();
    if let Err(e) = execute(&engine, &config).await {
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &ToolError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,   // 輸入錯誤
        ErrorSeverity::High => 1,     // 檔案錯誤
        ErrorSeverity::Critical => 3, // 系統或設定錯誤
    };
    std::process::exit(exit_code);
}

async fn execute(engine: &ToolEngine, config: &CliConfig) -> Result<()> {
    match &config.command {
        Command::List { category } => list_tools(engine, config, category.as_deref()),
        Command::Describe { tool } => describe_tool(engine, config, tool),
        Command::Run {
            tool,
            inputs,
            file,
            save,
            data_url,
        } => {
            let options = RunOptions {
                save: *save,
                data_url: *data_url,
            };
            run_tool(engine, config, tool, inputs, file.as_deref(), options).await
        }
    }
}

fn list_tools(engine: &ToolEngine, config: &CliConfig, category: Option<&str>) -> Result<()> {
    let category = match category {
        Some(raw) => Some(Category::parse(raw).ok_or_else(|| {
            let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            ToolError::invalid_input("category", raw, format!("expected one of: {}", names.join(", ")))
        })?),
        None => None,
    };

    let tools = engine.registry().list(category);
    if config.json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let width = tools.iter().map(|t| t.id.len()).max().unwrap_or(0);
    for tool in &tools {
        println!("{:<width$}  [{}] {}", tool.id, tool.category, tool.description, width = width);
    }
    tracing::debug!("Listed {} tools", tools.len());
    Ok(())
}

fn describe_tool(engine: &ToolEngine, config: &CliConfig, id: &str) -> Result<()> {
    let tool = engine.registry().get(id)?;
    let descriptor = tool.descriptor();
    let fields = tool.fields();

    if config.json {
        let doc = json!({ "tool": descriptor, "fields": fields });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{} ({})", descriptor.name, descriptor.id);
    println!("{}", descriptor.description);
    println!();
    for field in &fields {
        let marker = if field.required { "*" } else { " " };
        let kind = match &field.kind {
            FieldKind::Select(options) => {
                format!("one of: {}", options.join(", "))
            }
            other => format!("{:?}", other).to_lowercase(),
        };
        let usage = if field.name == "file" {
            "--file <path>".to_string()
        } else {
            format!("-i {}=<value>", field.name)
        };
        println!("{} {:<28} {} ({})", marker, usage, field.label, kind);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct RunOptions {
    save: bool,
    data_url: bool,
}

async fn run_tool(
    engine: &ToolEngine,
    config: &CliConfig,
    id: &str,
    inputs: &[(String, String)],
    file: Option<&str>,
    options: RunOptions,
) -> Result<()> {
    let tool = engine.registry().get(id)?;
    let tool_id = tool.descriptor().id;

    let mut input = ToolInput::new();
    for (key, value) in inputs {
        input.set(key.clone(), value.clone());
    }
    if let Some(path) = file {
        // 輸入檔以目前目錄為準
        let reader = LocalStorage::new(".");
        let bytes = reader.read_file(path).await?;
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        input.set_file(FileInput::new(name, bytes));
    }
    apply_defaults(tool, &mut input, config);

    let mut session = engine.open(&tool_id)?;
    let output = session.submit(&input)?;

    let storage = LocalStorage::new(config.output_path());
    let precision = config.precision();

    let saved_path = match &output {
        ToolOutput::File(artifact) if !options.data_url => {
            storage.write_file(&artifact.file_name, &artifact.bytes).await?;
            Some(storage.resolve(&artifact.file_name).display().to_string())
        }
        ToolOutput::Rows(_) | ToolOutput::Text(_) if options.save => {
            let name = format!("{}.txt", tool_id);
            let body = render_plain(&output, precision);
            storage.write_file(&name, body.as_bytes()).await?;
            Some(storage.resolve(&name).display().to_string())
        }
        _ => None,
    };

    if config.json {
        let mut doc = json!({ "tool": tool_id, "output": output });
        if let ToolOutput::File(artifact) = &output {
            if options.data_url {
                doc["data_url"] = json!(artifact.to_data_url());
            }
        }
        if let Some(path) = &saved_path {
            doc["saved_to"] = json!(path);
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    match &output {
        ToolOutput::File(artifact) if options.data_url => println!("{}", artifact.to_data_url()),
        ToolOutput::File(_) => {}
        _ => println!("{}", render_plain(&output, precision)),
    }
    if let Some(path) = saved_path {
        tracing::info!("📁 Output saved to: {}", path);
        println!("📁 {}", path);
    }
    Ok(())
}

fn render_plain(output: &ToolOutput, precision: usize) -> String {
    match output {
        ToolOutput::Rows(rows) => rows
            .iter()
            .map(|r| format!("{}: {}", r.label, r.render(precision)))
            .collect::<Vec<_>>()
            .join("\n"),
        ToolOutput::Text(text) => text.clone(),
        ToolOutput::File(artifact) => artifact.file_name.clone(),
    }
}
