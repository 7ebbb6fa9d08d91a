use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::data::types::{ExportFormat, RequestRecord};
use crate::errors::ExportError;
use crate::utils;

#[derive(Debug, Serialize)]
struct RecordRow {
    request_id: String,
    timestamp: u64,
    time_utc: String,
    sender: String,
    data_text: String,
    data_hex: String,
}

impl From<&RequestRecord> for RecordRow {
    fn from(record: &RequestRecord) -> Self {
        Self {
            request_id: record.request_id.to_string(),
            timestamp: record.timestamp,
            time_utc: utils::format_timestamp(record.timestamp),
            sender: format!("{:#x}", record.sender),
            data_text: utils::display_data(&record.data),
            data_hex: format!("{}", record.data),
        }
    }
}

/// Export request records to CSV.
pub fn export_records_csv(records: &[RequestRecord], path: &Path) -> Result<String, ExportError> {
    let file = fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for record in records {
        wtr.serialize(RecordRow::from(record))?;
    }
    wtr.flush()?;
    Ok(format!("Exported {} requests to {}", records.len(), path.display()))
}

/// Export request records to pretty-printed JSON.
pub fn export_records_json(records: &[RequestRecord], path: &Path) -> Result<String, ExportError> {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    let formatted = serde_json::to_string_pretty(&rows)?;
    let mut file = fs::File::create(path)?;
    file.write_all(formatted.as_bytes())?;
    Ok(format!("Exported {} requests to {}", records.len(), path.display()))
}

/// `<dir>/requests-<timestamp>.<ext>`
pub fn export_path(dir: &Path, format: ExportFormat) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("requests-{stamp}.{}", format.extension()))
}

pub fn export_records(
    records: &[RequestRecord],
    dir: &Path,
    format: ExportFormat,
) -> Result<String, ExportError> {
    fs::create_dir_all(dir)?;
    let path = export_path(dir, format);
    match format {
        ExportFormat::Csv => export_records_csv(records, &path),
        ExportFormat::Json => export_records_json(records, &path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Bytes, U256};

    fn records() -> Vec<RequestRecord> {
        vec![
            RequestRecord {
                request_id: U256::from(1),
                data: Bytes::from_static(b"first"),
                timestamp: 1_700_000_000,
                sender: Address::repeat_byte(0xaa),
            },
            RequestRecord {
                request_id: U256::from(2),
                data: Bytes::from_static(&[0xff, 0x00]),
                timestamp: 1_700_000_100,
                sender: Address::repeat_byte(0xaa),
            },
        ]
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("whitelist-tui-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_export_csv() {
        let dir = temp_dir("csv");
        let path = dir.join("out.csv");
        let msg = export_records_csv(&records(), &path).unwrap();
        assert!(msg.starts_with("Exported 2 requests"));

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "request_id,timestamp,time_utc,sender,data_text,data_hex"
        );
        assert!(lines.next().unwrap().starts_with("1,1700000000,"));
        assert_eq!(content.lines().count(), 3);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_json() {
        let dir = temp_dir("json");
        let path = dir.join("out.json");
        export_records_json(&records(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["data_text"], "first");
        assert_eq!(value[1]["data_hex"], "0xff00");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_path_extension() {
        let path = export_path(Path::new("/tmp"), ExportFormat::Json);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("requests-"));
        assert!(name.ends_with(".json"));
    }
}
