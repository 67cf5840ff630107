//! Adapters that normalize Knative requests into events.
//!
//! Ingestion is a single fallible step returning a tagged
//! [`AdapterError`]; the conversion of a failure into a diagnostic event
//! happens in exactly one place, at the adapter boundary.

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use crate::core::{Body, Event};
use crate::errors::AdapterError;
use crate::knative::channel::{BODY_CHUNK_KIND, BodyChannel, RequestScope};

/// Source tag stamped on every event produced by this module.
pub const KNATIVE_SOURCE: &str = "knative";

/// Content-type prefixes whose payloads are decoded to text eagerly.
/// Anything else, including an absent content-type, stays binary.
const TEXT_CONTENT_TYPES: [&str; 5] = [
    "text/",
    "application/json",
    "application/xml",
    "application/x-www-form-urlencoded",
    "multipart/",
];

/// Parse a Knative HTTP request into a normalized [`Event`].
///
/// Drains `channel` to completion, decodes the scope's header pairs and
/// query string to text, and applies a best-effort content-type-driven
/// body conversion. JSON parsing stays lazy - it happens in
/// [`Event::get_json`], not here.
///
/// Connectivity, encoding, and missing-key faults never propagate; they
/// produce a degraded but valid event whose `x-error` header carries the
/// detail.
pub async fn adapt_http_request<C>(scope: &RequestScope, channel: &mut C) -> Event
where
    C: BodyChannel + Send,
{
    match ingest(scope, channel).await {
        Ok(event) => event,
        Err(err) => {
            error!("failed to normalize request: {}", err);
            diagnostic_event(scope, &err)
        }
    }
}

/// Parse a Knative Cloud Event into a normalized [`Event`].
///
/// Extension point for the structured-event protocol. The structured
/// parsing is not implemented yet; requests go through the HTTP adapter
/// unchanged.
pub async fn adapt_cloud_event<C>(scope: &RequestScope, channel: &mut C) -> Event
where
    C: BodyChannel + Send,
{
    // TODO: parse the Cloud Events binary/structured content modes
    // instead of delegating once a producer for them exists.
    debug!("cloud event adapter delegating to the HTTP adapter");
    adapt_http_request(scope, channel).await
}

async fn ingest<C>(scope: &RequestScope, channel: &mut C) -> Result<Event, AdapterError>
where
    C: BodyChannel + Send,
{
    let raw_body = drain_body(channel).await?;
    let headers = decode_headers(scope)?;
    let query_string = decode_query_string(scope)?;

    let content_type = headers.get("content-type").map_or("", String::as_str);
    let body = convert_body(raw_body, content_type);

    Ok(Event {
        method: scope.method.clone().unwrap_or_else(|| "GET".to_string()),
        path: scope.path.clone().unwrap_or_else(|| "/".to_string()),
        headers,
        query_string,
        body,
        source: KNATIVE_SOURCE.to_string(),
    })
}

/// Receives body chunks until the runtime signals no more data pending.
///
/// A first message of any other kind means the request has no body; that
/// is not an error. A message without a kind is a protocol violation and
/// maps to the missing-key failure class.
async fn drain_body<C>(channel: &mut C) -> Result<Vec<u8>, AdapterError>
where
    C: BodyChannel + Send,
{
    let message = channel.receive().await?;
    let kind = message
        .kind
        .clone()
        .ok_or_else(|| AdapterError::MissingKey("'kind'".to_string()))?;

    let mut accumulated = Vec::new();
    if kind == BODY_CHUNK_KIND {
        accumulated.extend(message.body.unwrap_or_default());

        let mut more_body = message.more_body.unwrap_or(false);
        while more_body {
            let next = channel.receive().await?;
            more_body = next.more_body.unwrap_or(false);
            accumulated.extend(next.body.unwrap_or_default());
        }
    } else {
        warn!(kind = %kind, "unexpected first message kind, treating request as bodyless");
    }

    Ok(accumulated)
}

/// Converts the protocol's raw header pairs into a text-keyed mapping,
/// decoding each key and value independently.
fn decode_headers(scope: &RequestScope) -> Result<IndexMap<String, String>, AdapterError> {
    let mut headers = IndexMap::with_capacity(scope.headers.len());
    for (name, value) in &scope.headers {
        let name = String::from_utf8(name.clone())?;
        let value = String::from_utf8(value.clone())?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn decode_query_string(scope: &RequestScope) -> Result<String, AdapterError> {
    match &scope.query_string {
        Some(raw) => Ok(String::from_utf8(raw.clone())?),
        None => Ok(String::new()),
    }
}

/// Simple body conversion: decode text-based content types to a string,
/// keep binary content as bytes, and map "no bytes at all" to no body.
fn convert_body(raw: Vec<u8>, content_type: &str) -> Option<Body> {
    if raw.is_empty() {
        return None;
    }

    let declared = content_type.to_ascii_lowercase();
    if TEXT_CONTENT_TYPES
        .iter()
        .any(|prefix| declared.starts_with(prefix))
    {
        return match String::from_utf8(raw) {
            Ok(text) => Some(Body::Text(text)),
            Err(err) => {
                warn!("failed to decode text content as UTF-8, keeping as bytes");
                Some(Body::Bytes(err.into_bytes()))
            }
        };
    }

    Some(Body::Bytes(raw))
}

/// Builds the degraded event for a caught ingestion failure. Metadata is
/// carried over best-effort, except when the failure says the metadata
/// itself is suspect.
fn diagnostic_event(scope: &RequestScope, error: &AdapterError) -> Event {
    let mut headers = IndexMap::new();
    headers.insert("x-error".to_string(), error.to_string());

    let (method, path) = match error {
        AdapterError::MissingKey(_) => ("GET".to_string(), "/".to_string()),
        _ => (
            scope.method.clone().unwrap_or_else(|| "GET".to_string()),
            scope.path.clone().unwrap_or_else(|| "/".to_string()),
        ),
    };

    Event {
        method,
        path,
        headers,
        query_string: String::new(),
        body: None,
        source: KNATIVE_SOURCE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_converts_to_no_body() {
        // "No body" and "empty body" must stay distinguishable.
        assert_eq!(convert_body(Vec::new(), "application/json"), None);
    }

    #[test]
    fn unlisted_content_type_stays_binary() {
        let body = convert_body(b"\x00\x01".to_vec(), "application/octet-stream");
        assert_eq!(body, Some(Body::Bytes(b"\x00\x01".to_vec())));
    }

    #[test]
    fn absent_content_type_stays_binary() {
        let body = convert_body(b"raw".to_vec(), "");
        assert_eq!(body, Some(Body::Bytes(b"raw".to_vec())));
    }

    #[test]
    fn text_content_type_decodes_to_text() {
        let body = convert_body(b"hello".to_vec(), "text/plain; charset=utf-8");
        assert_eq!(body, Some(Body::Text("hello".to_string())));
    }

    #[test]
    fn undecodable_text_content_keeps_bytes() {
        let body = convert_body(vec![0xff, 0xfe], "text/plain");
        assert_eq!(body, Some(Body::Bytes(vec![0xff, 0xfe])));
    }
}
