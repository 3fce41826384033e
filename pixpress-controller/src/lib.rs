//! Browser-independent core of the pixpress upload page.
//!
//! [`UploadController`] owns the selected file and the submission lifecycle
//! (`Idle -> Submitting -> Success | Failed`). Hosts feed it user events,
//! drive requests through a [`CompressApi`] with [`run_submission`], and
//! render whatever [`UploadController::view`] returns.

pub mod api;
pub mod controller;
pub mod format;
pub mod preview;
pub mod state;
pub mod validation;

pub use api::{CompressApi, CompressReply, TransportError};
pub use controller::{run_submission, SelectedFile, SubmitRejected, SubmitTicket, UploadController};
pub use format::{format_file_size, format_ratio};
pub use preview::{data_url, PreviewTicket};
pub use state::{FileInfo, ResultPanel, SubmissionState, View};
pub use validation::{
    parse_params, FileMeta, Limits, ValidationError, ALLOWED_TYPES, MAX_FILE_SIZE,
};

// Re-export shared types
pub use pixpress_types::*;
