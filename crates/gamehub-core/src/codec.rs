//! Blob codec - transport encoding for stored images
//!
//! Blobs are stored as raw bytes and only ever leave the system embedded in
//! rendered pages as `data:` URIs. There is no decode path.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type declared for every embedded image, whatever the actual content.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Encode a blob as a `data:<mime>;base64,<payload>` string.
///
/// Returns `None` for an empty blob: callers omit the field rather than
/// emitting an empty URI.
pub fn encode_for_transport(blob: &[u8], mime: &str) -> Option<String> {
    if blob.is_empty() {
        return None;
    }

    Some(format!("data:{};base64,{}", mime, STANDARD.encode(blob)))
}

/// Encode an optional stored image with the default MIME hint.
pub fn encode_image(blob: Option<&[u8]>) -> Option<String> {
    blob.and_then(|bytes| encode_for_transport(bytes, DEFAULT_IMAGE_MIME))
}
