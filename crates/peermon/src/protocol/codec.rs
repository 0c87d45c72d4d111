//! Wire codec for metrics published on the gossip topic.

use thiserror::Error;

use super::types::Metric;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode metric: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode metric: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Turns metrics into gossip payloads and back.
pub trait MetricCodec: Send + Sync + 'static {
    fn encode(&self, metric: &Metric) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, payload: &[u8]) -> Result<Metric, CodecError>;
}

/// JSON encoding of the full metric field set
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl MetricCodec for JsonCodec {
    fn encode(&self, metric: &Metric) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(metric).map_err(CodecError::Encode)
    }

    fn decode(&self, payload: &[u8]) -> Result<Metric, CodecError> {
        serde_json::from_slice(payload).map_err(CodecError::Decode)
    }
}
