use axum::http::{header, HeaderMap};
use bankdesk_core::IncomingMessage;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::ApiError;

/// Only the `message` field is looked at. Everything else is skipped without
/// being decoded, so odd escapes or deep nesting elsewhere cannot fail the read.
#[derive(Deserialize)]
struct MessageEnvelope<'a> {
    #[serde(default, borrow)]
    message: Option<&'a RawValue>,
}

/// Extracts the chat message from a raw request. Bodies that are empty or not
/// declared as JSON carry no message; only declared JSON that is syntactically
/// broken is an error.
pub fn parse_incoming(headers: &HeaderMap, body: &[u8]) -> Result<IncomingMessage, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) || !is_json_content_type(headers) {
        return Ok(IncomingMessage::default());
    }

    serde_json::from_slice::<IgnoredAny>(body)?;
    Ok(IncomingMessage {
        message: read_message(body),
    })
}

/// `None` unless the body is an object whose `message` decodes to a string.
fn read_message(body: &[u8]) -> Option<String> {
    if body.iter().find(|byte| !byte.is_ascii_whitespace()) != Some(&b'{') {
        return None;
    }

    let envelope = serde_json::from_slice::<MessageEnvelope<'_>>(body).ok()?;
    serde_json::from_str::<String>(envelope.message?.get()).ok()
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
