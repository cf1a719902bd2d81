use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::apply_defaults;
use crate::config::toml_config::ToolJob;
use crate::core::engine::ToolEngine;
use crate::domain::model::{FileInput, ToolInput, ToolOutput};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{Result, ToolError};

pub const REPORT_CSV: &str = "batch_report.csv";
pub const REPORT_JSON: &str = "batch_report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Ok,
    Failed,
}

/// 報表中的一列
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub index: usize,
    pub name: String,
    pub tool: String,
    pub status: JobStatus,
    pub summary: String,
    pub artifact: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.status == JobStatus::Ok).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }
}

/// 依序執行 `[[jobs]]`；單一工作失敗只記錄在報表中
pub struct BatchRunner<S: Storage, C: ConfigProvider> {
    engine: ToolEngine,
    input: S,
    output: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BatchRunner<S, C> {
    /// `input` 讀取工作指定的檔案，`output` 寫入產出檔與報表
    pub fn new(input: S, output: S, config: C) -> Self {
        Self {
            engine: ToolEngine::builtin(),
            input,
            output,
            config,
        }
    }

    pub async fn run(&self, jobs: &[ToolJob]) -> Result<BatchReport> {
        let started_at = Utc::now();
        tracing::info!("🚀 Running {} batch job(s)", jobs.len());

        let mut reports = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.iter().enumerate() {
            let name = job.display_name(index);
            let started = Instant::now();

            let outcome = self.run_job(index, &name, job).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            let report = match outcome {
                Ok((summary, artifact)) => {
                    tracing::info!("✅ [{}] {} finished in {} ms", index + 1, name, duration_ms);
                    JobReport {
                        index: index + 1,
                        name,
                        tool: job.tool.clone(),
                        status: JobStatus::Ok,
                        summary,
                        artifact,
                        error: None,
                        duration_ms,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "❌ [{}] {} failed: {} (Category: {:?})",
                        index + 1,
                        name,
                        e,
                        e.category()
                    );
                    JobReport {
                        index: index + 1,
                        name,
                        tool: job.tool.clone(),
                        status: JobStatus::Failed,
                        summary: String::new(),
                        artifact: None,
                        error: Some(e.user_friendly_message()),
                        duration_ms,
                    }
                }
            };
            reports.push(report);
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            jobs: reports,
        };
        self.write_reports(&report).await?;

        tracing::info!(
            "📊 Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    async fn run_job(&self, index: usize, name: &str, job: &ToolJob) -> Result<(String, Option<String>)> {
        let tool = self.engine.registry().get(&job.tool)?;

        let file = match &job.file {
            Some(path) => {
                let bytes = self.input.read_file(path).await?;
                let file_name = Path::new(path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(path.as_str());
                Some(FileInput::new(file_name, bytes))
            }
            None => None,
        };

        let mut input: ToolInput = job.to_input(file);
        apply_defaults(tool, &mut input, &self.config);

        let output = self.engine.run(&job.tool, &input)?;
        tracing::debug!("[{}] {} -> {}", index + 1, name, output.summary(self.config.precision()));

        match &output {
            ToolOutput::File(artifact) => {
                let path = format!("{:02}_{}", index + 1, artifact.file_name);
                self.output.write_file(&path, &artifact.bytes).await?;
                Ok((output.summary(self.config.precision()), Some(path)))
            }
            _ => Ok((output.summary(self.config.precision()), None)),
        }
    }

    async fn write_reports(&self, report: &BatchReport) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for job in &report.jobs {
            writer.serialize(job)?;
        }
        let csv_data = writer
            .into_inner()
            .map_err(|e| ToolError::IoError(e.into_error()))?;
        self.output.write_file(REPORT_CSV, &csv_data).await?;

        let json_data = serde_json::to_string_pretty(report)?;
        self.output.write_file(REPORT_JSON, json_data.as_bytes()).await?;

        tracing::debug!("Reports written: {}, {}", REPORT_CSV, REPORT_JSON);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().await.get(path).cloned().ok_or_else(|| {
                ToolError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn config(toml: &str) -> TomlConfig {
        TomlConfig::from_toml_str(toml).unwrap()
    }

    #[tokio::test]
    async fn test_failing_job_does_not_abort_batch() {
        let config = config(
            r#"
[output]
precision = 2

[[jobs]]
name = "roman"
tool = "number-to-roman"
inputs = { number = 2024 }

[[jobs]]
name = "broken"
tool = "no-such-tool"

[[jobs]]
tool = "bmi-calculator"
inputs = { weight = 70, height = 175 }
"#,
        );
        let output = MockStorage::default();
        let runner = BatchRunner::new(MockStorage::default(), output.clone(), config.clone());

        let report = runner.run(&config.jobs).await.unwrap();
        assert_eq!(report.jobs.len(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.jobs[0].summary, "MMXXIV");
        assert_eq!(report.jobs[1].status, JobStatus::Failed);
        assert!(report.jobs[1].error.as_deref().unwrap().contains("no-such-tool"));
        assert!(report.jobs[2].summary.contains("BMI: 22.9"));

        let csv_report = String::from_utf8(output.get(REPORT_CSV).await.unwrap()).unwrap();
        assert_eq!(csv_report.lines().count(), 4);
        assert!(output.get(REPORT_JSON).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_input_file_is_reported() {
        let config = config(
            r#"
[[jobs]]
tool = "image-grayscale"
file = "missing.png"
"#,
        );
        let runner = BatchRunner::new(MockStorage::default(), MockStorage::default(), config.clone());

        let report = runner.run(&config.jobs).await.unwrap();
        assert_eq!(report.failed(), 1);
        assert!(report.jobs[0].artifact.is_none());
    }
}
