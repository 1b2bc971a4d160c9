use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use regex::Regex;
use std::sync::OnceLock;

/// Files are embedded as base64 data URIs instead of being uploaded to a
/// separate object store, so everything stays in-band with the row.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB

fn data_uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:[a-z]+/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/]*={0,2}$")
            .expect("Failed to compile data URI pattern")
    })
}

pub fn encode_image(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<String, String> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(format!(
            "File {} is too large. Maximum size is 5MB.",
            file_name
        ));
    }
    if !mime_type.starts_with("image/") {
        return Err(format!("File {} is not an image.", file_name));
    }
    Ok(to_data_uri(mime_type, bytes))
}

pub fn encode_voice_note(mime_type: &str, bytes: &[u8]) -> Result<String, String> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err("Voice note is too large. Maximum size is 5MB.".to_string());
    }
    if !mime_type.starts_with("audio/") {
        return Err(format!("Unsupported voice note type: {}", mime_type));
    }
    Ok(to_data_uri(mime_type, bytes))
}

pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

pub fn is_data_uri(value: &str) -> bool {
    data_uri_pattern().is_match(value)
}

/// Nothing external is retained for embedded files.
pub fn delete_file(_file_name: &str) {}

/// Embedded files are their own URL.
pub fn public_url(file_name: &str) -> String {
    file_name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_oversized_image() {
        let bytes = vec![0u8; 6 * 1024 * 1024];
        let err = encode_image("holiday.png", "image/png", &bytes).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_accepts_small_image() {
        let bytes = vec![0u8; 1024];
        let uri = encode_image("holiday.png", "image/png", &bytes).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(is_data_uri(&uri));
    }

    #[test]
    fn test_rejects_non_image_regardless_of_size() {
        let bytes = vec![0u8; 16];
        assert!(encode_image("notes.pdf", "application/pdf", &bytes).is_err());
    }

    #[test]
    fn test_voice_note_requires_audio_mime() {
        let bytes = vec![0u8; 16];
        assert!(encode_voice_note("image/png", &bytes).is_err());
        let uri = encode_voice_note("audio/webm", &bytes).unwrap();
        assert!(uri.starts_with("data:audio/webm;base64,"));
    }

    #[test]
    fn test_data_uri_shape_check() {
        assert!(is_data_uri("data:image/jpeg;base64,AAAA"));
        assert!(!is_data_uri("https://example.com/image.png"));
        assert!(!is_data_uri("data:image/jpeg,AAAA"));
    }

    #[test]
    fn test_public_url_is_identity() {
        let uri = to_data_uri("image/png", &[1, 2, 3]);
        assert_eq!(uri, public_url(&uri));
    }
}
