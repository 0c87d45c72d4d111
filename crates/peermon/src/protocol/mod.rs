//! Protocol module for peermon.
//!
//! Wire types and their encoding.

pub mod codec;
pub mod types;

pub use codec::{CodecError, JsonCodec, MetricCodec};
pub use types::{peerset_filter, Alert, Metric};

/// Topic every monitor publishes and subscribes to
pub const PUBSUB_TOPIC: &str = "pubsubmon";
