use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker used by the client descriptor for anything that could not be parsed.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub id: u64,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    pub external: u64,
    pub heap_total: u64,
    pub heap_used: u64,
    pub rss: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDescriptor {
    pub ua: String,
    pub browser: BrowserInfo,
    pub engine: EngineInfo,
    pub os: OsInfo,
    pub device: DeviceInfo,
    pub cpu: CpuInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
    pub major: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub vendor: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub architecture: String,
}

/// Caller form fields, in submission order; a repeated key keeps its last value.
pub type FormFields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDescriptor {
    #[serde(flatten)]
    pub fields: FormFields,
    pub original_name: String,
    pub size_bytes: u64,
}

impl UploadDescriptor {
    pub fn new(original_name: String, size_bytes: u64, mut fields: FormFields) -> Self {
        // Computed keys always win over caller text.
        fields.remove("originalName");
        fields.remove("sizeBytes");
        Self {
            fields,
            original_name,
            size_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatchDescriptor {
    #[serde(flatten)]
    pub fields: FormFields,
    pub file_count: usize,
}

impl UploadBatchDescriptor {
    pub fn new(file_count: usize, mut fields: FormFields) -> Self {
        fields.remove("fileCount");
        Self { fields, file_count }
    }
}

/// What the upload area reports after a file has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub stored_name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub ip: String,
    pub remote_address: String,
    pub x_forwarded_for: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_descriptor_overrides_caller_fields() {
        let mut fields = FormFields::new();
        fields.insert("note".to_string(), json!("hello"));
        fields.insert("sizeBytes".to_string(), json!("999999"));

        let descriptor = UploadDescriptor::new("a.txt".to_string(), 3, fields);
        let body = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(
            body,
            json!({"note": "hello", "originalName": "a.txt", "sizeBytes": 3})
        );
    }

    #[test]
    fn test_memory_snapshot_field_names() {
        let snapshot = MemorySnapshot {
            external: 1,
            heap_total: 2,
            heap_used: 3,
            rss: 4,
        };
        assert_eq!(
            serde_json::to_value(snapshot).unwrap(),
            json!({"external": 1, "heapTotal": 2, "heapUsed": 3, "rss": 4})
        );
    }
}
