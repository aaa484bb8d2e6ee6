use serde::Serialize;

use super::TopK;

/// Name used for the multipart part when the browser sends no filename
pub const DEFAULT_FILE_NAME: &str = "upload.csv";

/// A viewing-history file chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_FILE_NAME.to_string()
        } else {
            name
        };

        Self { name, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn summary(&self) -> SelectedFileSummary {
        SelectedFileSummary {
            name: self.name.clone(),
            size_bytes: self.len(),
        }
    }
}

/// What the page shows about the selected file
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectedFileSummary {
    pub name: String,
    pub size_bytes: usize,
}

/// One outgoing call to the recommendation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub top_k: TopK,
}
