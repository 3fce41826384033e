use pixpress_types::CompressResponse;

use crate::format::{format_duration, format_file_size, format_ratio};

pub const GENERIC_FAILURE_MESSAGE: &str = "Compression failed.";
pub const CONNECTIVITY_FAILURE_MESSAGE: &str = "Failed to communicate with the server.";

/// Lifecycle of a submission. `Success` and `Failed` are shown until the next
/// selection or submission.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success(ResultPanel),
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

/// Rendered contents of the result panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultPanel {
    pub original_size: String,
    pub compressed_size: String,
    pub compression_ratio: String,
    pub filename: String,
    pub download_url: Option<String>,
    pub processing_time: Option<String>,
}

impl From<&CompressResponse> for ResultPanel {
    fn from(response: &CompressResponse) -> Self {
        Self {
            original_size: format_file_size(response.original_size.unwrap_or(0)),
            compressed_size: format_file_size(response.compressed_size.unwrap_or(0)),
            compression_ratio: format_ratio(response.compression_ratio.unwrap_or(0.0)),
            filename: response.output_file.clone().unwrap_or_default(),
            download_url: response
                .download_url
                .clone()
                .filter(|url| !url.is_empty()),
            processing_time: response.processing_time.map(format_duration),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: String,
}

/// Everything the page needs to render, derived from controller state.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub file_info: Option<FileInfo>,
    pub preview: Option<String>,
    pub submit_enabled: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<ResultPanel>,
}
