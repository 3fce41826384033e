use pixpress_types::CompressParams;
use thiserror::Error;

// Constants
pub const ALLOWED_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/gif"];
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB
pub const MAX_QUALITY: u32 = 100;

/// Metadata of a file picked by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Client-side acceptance rules for a selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub allowed_types: Vec<String>,
    pub max_file_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported file format. Only PNG, JPG, JPEG and GIF images are supported.")]
    UnsupportedType(String),

    #[error("File is too large. Please choose a file of {} MB or less.", .max / (1024 * 1024))]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("A compression is already in progress.")]
    Busy,
}

impl Limits {
    pub fn validate(&self, file: &FileMeta) -> Result<(), ValidationError> {
        if !self.allowed_types.iter().any(|t| t == &file.mime_type) {
            return Err(ValidationError::UnsupportedType(file.mime_type.clone()));
        }

        if file.size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size: file.size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}

/// Parse the optional quality/width/height form inputs. Blank inputs are absent.
pub fn parse_params(
    quality: &str,
    width: &str,
    height: &str,
) -> Result<CompressParams, ValidationError> {
    let params = CompressParams {
        quality: parse_field("quality", quality)?,
        width: parse_field("width", width)?,
        height: parse_field("height", height)?,
    };
    validate_params(&params)?;
    Ok(params)
}

pub fn validate_params(params: &CompressParams) -> Result<(), ValidationError> {
    if let Some(quality) = params.quality {
        if quality > MAX_QUALITY {
            return Err(ValidationError::InvalidParameter {
                field: "quality",
                reason: format!("must be between 0 and {}", MAX_QUALITY),
            });
        }
    }

    for (field, value) in [("width", params.width), ("height", params.height)] {
        if value == Some(0) {
            return Err(ValidationError::InvalidParameter {
                field,
                reason: "must be greater than 0".to_string(),
            });
        }
    }

    Ok(())
}

fn parse_field(field: &'static str, raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidParameter {
            field,
            reason: format!("'{}' is not a whole number", raw),
        })
}
