//! JSONL writer for coplay pair totals - one serialized record per line

use super::writer_backend::{PairTotalRecord, ReportWriterBackend, ReportWriterError};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct JsonlReportWriter {
    writer: BufWriter<std::fs::File>,
}

impl JsonlReportWriter {
    /// Open (or create) `coplay_totals.jsonl` under the given directory.
    pub fn new(base_path: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&base_path)?;
        let file_path = base_path.join("coplay_totals.jsonl");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        log::info!("📝 Writing coplay totals to: {}", file_path.display());

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write_pair(&mut self, record: &PairTotalRecord) -> Result<(), ReportWriterError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for JsonlReportWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[async_trait]
impl ReportWriterBackend for JsonlReportWriter {
    async fn write_pair(&mut self, record: &PairTotalRecord) -> Result<(), ReportWriterError> {
        self.write_pair(record)
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        self.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_record(a: i64, b: i64, total: i64) -> PairTotalRecord {
        PairTotalRecord {
            player_a: a,
            player_b: b,
            total_seconds: total,
            computed_at: 1700000000,
        }
    }

    #[test]
    fn test_writes_one_record_per_line() {
        let dir = tempdir().unwrap();
        let mut writer = JsonlReportWriter::new(dir.path().to_path_buf()).unwrap();

        writer.write_pair(&create_test_record(1, 2, 14400)).unwrap();
        writer.write_pair(&create_test_record(3, 4, 18000)).unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(dir.path().join("coplay_totals.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["player_a"], 1);
        assert_eq!(first["player_b"], 2);
        assert_eq!(first["total_seconds"], 14400);
        assert_eq!(first["computed_at"], 1700000000);
    }
}
