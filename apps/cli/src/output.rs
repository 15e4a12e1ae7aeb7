use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::analysis::SignalPayload;
use crate::errors::AppError;
use crate::formatting::QualityReport;

pub const SIGNALS_FILE: &str = "signals.json";
pub const BULLETS_FILE: &str = "bullets.md";
pub const QUALITY_FILE: &str = "quality.json";

/// Persists run artefacts under one output directory, creating it on demand.
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn write_signals(&self, payload: &SignalPayload) -> Result<PathBuf, AppError> {
        self.write_json(SIGNALS_FILE, payload).await
    }

    pub async fn write_bullets(&self, markdown: &str) -> Result<PathBuf, AppError> {
        let mut contents = markdown.to_string();
        contents.push('\n');
        self.write(BULLETS_FILE, contents.as_bytes()).await
    }

    pub async fn write_quality(&self, report: &QualityReport) -> Result<PathBuf, AppError> {
        self.write_json(QUALITY_FILE, report).await
    }

    async fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, AppError> {
        let json = serde_json::to_vec_pretty(value)?;
        self.write(name, &json).await
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents).await?;
        info!("Saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::validate_output_quality;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_into_nested_directory() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("out/run"));

        let path = writer.write_bullets("## A").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## A\n");
        assert!(path.ends_with(BULLETS_FILE));
    }

    #[tokio::test]
    async fn test_quality_report_round_trips_as_json() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path());
        let report = validate_output_quality("no sections");

        let path = writer.write_quality(&report).await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["issues"][0], "No valid sections found");
        assert_eq!(value["quality_distribution"]["high"], 0);
    }
}
