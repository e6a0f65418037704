//! Background image payloads.
//!
//! Generated images arrive as bare base64 strings or as `data:` URIs such as
//! `data:image/jpeg;base64,/9j/4AAQ...`.

use base64::Engine;

use crate::error::{CompositorError, CompositorResult};

/// Decode an image payload given as a data URI or a bare base64 string.
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the base64 is invalid.
pub fn decode_image_source(source: &str) -> CompositorResult<Vec<u8>> {
    let source = source.trim();
    if source.starts_with("data:") {
        decode_data_uri(source)
    } else {
        decode_base64(source)
    }
}

/// Decode a `data:` URI into bytes.
///
/// # Errors
///
/// Returns an error if the URI has no payload separator or the payload fails
/// to decode.
pub fn decode_data_uri(uri: &str) -> CompositorResult<Vec<u8>> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| CompositorError::ImageSource("Not a data URI".to_string()))?;

    let (metadata, payload) = uri_data.split_once(',').ok_or_else(|| {
        CompositorError::ImageSource("Invalid data URI: missing comma".to_string())
    })?;

    if metadata.split(';').any(|part| part == "base64") {
        decode_base64(payload)
    } else {
        percent_decode(payload)
    }
}

fn decode_base64(payload: &str) -> CompositorResult<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(CompositorError::ImageSource("Empty image payload".to_string()));
    }
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CompositorError::ImageSource(format!("Failed to decode base64: {e}")))
}

fn percent_decode(input: &str) -> CompositorResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| CompositorError::ImageSource("Invalid URL encoding".to_string()))?;
            result.push(hex);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_bare_base64() {
        let bytes = decode_image_source(PNG_1X1).expect("decode");
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_base64_data_uri() {
        let uri = format!("data:image/png;base64,{PNG_1X1}");
        let bytes = decode_image_source(&uri).expect("decode");
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_base64_with_line_breaks() {
        let (head, tail) = PNG_1X1.split_at(20);
        let wrapped = format!("{head}\n{tail}\n");
        assert!(decode_image_source(&wrapped).is_ok());
    }

    #[test]
    fn test_percent_encoded_data_uri() {
        let bytes = decode_data_uri("data:text/plain,a%20b%2Cc").expect("decode");
        assert_eq!(bytes, b"a b,c");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(decode_image_source("data:image/png").is_err());
        assert!(decode_image_source("data:text/plain,%zz").is_err());
        assert!(decode_image_source("data:text/plain,%4").is_err());
        assert!(decode_image_source("!!not base64!!").is_err());
        assert!(decode_image_source("   ").is_err());
    }
}
