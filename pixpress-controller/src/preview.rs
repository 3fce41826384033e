use base64::{engine::general_purpose, Engine as _};

/// Encode file contents as a `data:` URL usable as an `<img>` source.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Identifies the selection a preview read was started for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewTicket {
    pub(crate) generation: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(
            data_url("image/png", &png_magic),
            "data:image/png;base64,iVBORw0KGgo="
        );
    }

    #[test]
    fn test_data_url_empty_file() {
        assert_eq!(data_url("image/gif", &[]), "data:image/gif;base64,");
    }
}
