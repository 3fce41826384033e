use serde::{Deserialize, Serialize};

// Endpoint
pub const COMPRESS_PATH: &str = "/api/compress";

// Multipart field names
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_QUALITY: &str = "quality";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_HEIGHT: &str = "height";

// Request types
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompressParams {
    pub quality: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl CompressParams {
    /// Text fields to send alongside the image, skipping absent values.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            (FIELD_QUALITY, self.quality),
            (FIELD_WIDTH, self.width),
            (FIELD_HEIGHT, self.height),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v.to_string())))
        .collect()
    }
}

// Response types
//
// Failure bodies only carry `success` and `error`, so everything else is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CompressResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    /// Seconds spent compressing on the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}
