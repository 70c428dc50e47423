//! Record sources.
//!
//! [`RecordSource`] is the boundary between the poller and Kinesis, so the
//! polling loop can run against an in-memory source in tests.

use async_trait::async_trait;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::types::ShardIteratorType;
use tracing::debug;

use crate::consumer::Message;
use crate::error::{StreamError, StreamResult};

/// Records returned by one read of a shard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    /// Records in sequence order.
    pub messages: Vec<Message>,
    /// Iterator for the next read. `None` once the shard is closed.
    pub next_iterator: Option<String>,
}

/// Read access to the shards of a stream.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Ids of every shard in the stream.
    async fn list_shards(&self, stream_name: &str) -> StreamResult<Vec<String>>;

    /// An iterator positioned after the most recent record of a shard.
    async fn latest_iterator(&self, stream_name: &str, shard_id: &str) -> StreamResult<String>;

    /// Read the next batch of a shard.
    async fn read(&self, shard_id: &str, iterator: &str) -> StreamResult<RecordBatch>;
}

/// [`RecordSource`] backed by the Kinesis API.
#[derive(Debug, Clone)]
pub struct KinesisRecordSource {
    client: aws_sdk_kinesis::Client,
    batch_limit: i32,
}

impl KinesisRecordSource {
    /// Largest batch `GetRecords` returns.
    pub const MAX_BATCH_LIMIT: i32 = 10_000;

    /// Create a source reading up to `batch_limit` records per call.
    #[must_use]
    pub fn new(client: aws_sdk_kinesis::Client, batch_limit: i32) -> Self {
        Self {
            client,
            batch_limit: batch_limit.clamp(1, Self::MAX_BATCH_LIMIT),
        }
    }
}

fn kinesis_error<E>(operation: &'static str) -> impl FnOnce(E) -> StreamError
where
    E: std::error::Error,
{
    move |e| StreamError::Kinesis {
        operation,
        message: DisplayErrorContext(&e).to_string(),
    }
}

#[async_trait]
impl RecordSource for KinesisRecordSource {
    async fn list_shards(&self, stream_name: &str) -> StreamResult<Vec<String>> {
        let mut shards = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            // The stream name and a continuation token are mutually exclusive.
            let request = match next_token.take() {
                Some(token) => self.client.list_shards().next_token(token),
                None => self.client.list_shards().stream_name(stream_name),
            };
            let output = request.send().await.map_err(kinesis_error("ListShards"))?;
            shards.extend(output.shards().iter().map(|s| s.shard_id().to_owned()));
            match output.next_token() {
                Some(token) => next_token = Some(token.to_owned()),
                None => break,
            }
        }
        debug!(stream_name, shards = shards.len(), "listed shards");
        Ok(shards)
    }

    async fn latest_iterator(&self, stream_name: &str, shard_id: &str) -> StreamResult<String> {
        let output = self
            .client
            .get_shard_iterator()
            .stream_name(stream_name)
            .shard_id(shard_id)
            .shard_iterator_type(ShardIteratorType::Latest)
            .send()
            .await
            .map_err(kinesis_error("GetShardIterator"))?;
        output
            .shard_iterator()
            .map(ToOwned::to_owned)
            .ok_or_else(|| StreamError::Kinesis {
                operation: "GetShardIterator",
                message: format!("no iterator returned for shard {shard_id}"),
            })
    }

    async fn read(&self, shard_id: &str, iterator: &str) -> StreamResult<RecordBatch> {
        let output = self
            .client
            .get_records()
            .shard_iterator(iterator)
            .limit(self.batch_limit)
            .send()
            .await
            .map_err(kinesis_error("GetRecords"))?;

        let messages = output
            .records()
            .iter()
            .map(|r| {
                Message::from_bytes(
                    shard_id,
                    r.partition_key().unwrap_or_default(),
                    r.sequence_number(),
                    r.data().as_ref(),
                )
            })
            .collect();

        Ok(RecordBatch {
            messages,
            next_iterator: output.next_shard_iterator().map(ToOwned::to_owned),
        })
    }
}
