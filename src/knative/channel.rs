//! Transport-level contracts consumed by the Knative adapters.

use async_trait::async_trait;

use crate::errors::ChannelError;

/// Message kind that carries request-body chunks.
pub const BODY_CHUNK_KIND: &str = "http.request";

/// Metadata for one inbound request, as handed over by the serverless
/// runtime.
///
/// Every field is absent-tolerant; the adapter substitutes safe defaults
/// for anything missing.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    pub method: Option<String>,
    pub path: Option<String>,
    /// Raw, undecoded query component.
    pub query_string: Option<Vec<u8>>,
    /// Header pairs as raw byte sequences, in transport order.
    pub headers: Vec<(Vec<u8>, Vec<u8>)>,
}

/// One message pulled from a [`BodyChannel`].
///
/// Fields mirror the wire protocol, where any key may be absent. The
/// adapter only acts on messages whose kind is [`BODY_CHUNK_KIND`];
/// other kinds are treated as "no body".
#[derive(Debug, Clone, Default)]
pub struct ChannelMessage {
    pub kind: Option<String>,
    pub body: Option<Vec<u8>>,
    pub more_body: Option<bool>,
}

impl ChannelMessage {
    /// A body-chunk message with a continuation flag.
    #[must_use]
    pub fn chunk(body: impl Into<Vec<u8>>, more_body: bool) -> Self {
        Self {
            kind: Some(BODY_CHUNK_KIND.to_string()),
            body: Some(body.into()),
            more_body: Some(more_body),
        }
    }

    /// A disconnect notification.
    #[must_use]
    pub fn disconnect() -> Self {
        Self {
            kind: Some("http.disconnect".to_string()),
            ..Self::default()
        }
    }
}

/// Asynchronous pull source yielding request-body messages.
///
/// This is the seam between an adapter and the runtime's body delivery:
/// the adapter awaits [`BodyChannel::receive`] sequentially, once per
/// chunk, and it is the sole suspension point of an invocation. The
/// channel owns timeout and cancellation policy; the adapter only maps
/// its faults into a diagnostic event.
#[async_trait]
pub trait BodyChannel {
    async fn receive(&mut self) -> Result<ChannelMessage, ChannelError>;
}
