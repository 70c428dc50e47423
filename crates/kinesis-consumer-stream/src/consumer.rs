//! Message consumers.

use tracing::info;

/// A record read from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Shard the record was read from.
    pub shard_id: String,
    /// Partition key supplied by the producer.
    pub partition_key: String,
    /// Sequence number within the shard.
    pub sequence_number: String,
    /// Record data, decoded as UTF-8 with invalid sequences replaced.
    pub payload: String,
}

impl Message {
    /// Build a message from raw record data.
    pub fn from_bytes(
        shard_id: impl Into<String>,
        partition_key: impl Into<String>,
        sequence_number: impl Into<String>,
        data: &[u8],
    ) -> Self {
        Self {
            shard_id: shard_id.into(),
            partition_key: partition_key.into(),
            sequence_number: sequence_number.into(),
            payload: String::from_utf8_lossy(data).into_owned(),
        }
    }
}

/// Receives every record read by a poller.
///
/// An error is logged by the caller and does not stop consumption.
pub trait MessageConsumer: Send + Sync {
    /// Handle one message.
    fn accept(&self, message: &Message) -> anyhow::Result<()>;
}

/// Logs each payload at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConsumer;

impl MessageConsumer for LoggingConsumer {
    fn accept(&self, message: &Message) -> anyhow::Result<()> {
        info!(
            shard_id = %message.shard_id,
            partition_key = %message.partition_key,
            sequence_number = %message.sequence_number,
            "Event Payload: {}",
            message.payload
        );
        Ok(())
    }
}
