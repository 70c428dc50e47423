//! Shard polling loop.
//!
//! Every shard starts at its latest position. Shards are read round-robin;
//! when a full round returns no records the poller sleeps for the poll
//! interval. Consecutive rounds are always at least
//! [`ShardPoller::DEFAULT_MIN_READ_INTERVAL`] apart, keeping each shard under
//! the Kinesis limit of five reads per second. The poller stops on a
//! shutdown signal, when the shutdown sender is dropped, or once every shard
//! is closed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::consumer::MessageConsumer;
use crate::error::{StreamError, StreamResult};
use crate::source::RecordSource;

/// Totals reported when a poller stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Shards that were read.
    pub shards: usize,
    /// Records handed to the consumer.
    pub records: u64,
}

/// Reads a stream and hands each record to a consumer.
#[derive(Debug)]
pub struct ShardPoller<S, C> {
    source: S,
    consumer: Arc<C>,
    stream_name: String,
    poll_interval: Duration,
    min_read_interval: Duration,
}

struct ShardCursor {
    shard_id: String,
    iterator: Option<String>,
}

impl<S, C> ShardPoller<S, C>
where
    S: RecordSource,
    C: MessageConsumer,
{
    /// Minimum time between two reads of the same shard.
    pub const DEFAULT_MIN_READ_INTERVAL: Duration = Duration::from_millis(200);

    /// Create a poller for `stream_name`.
    pub fn new(
        source: S,
        consumer: Arc<C>,
        stream_name: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            consumer,
            stream_name: stream_name.into(),
            poll_interval,
            min_read_interval: Self::DEFAULT_MIN_READ_INTERVAL,
        }
    }

    /// Override the minimum time between two reads of the same shard.
    #[must_use]
    pub fn with_min_read_interval(mut self, interval: Duration) -> Self {
        self.min_read_interval = interval;
        self
    }

    /// Name of the stream being read.
    #[must_use]
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Poll until shutdown or until every shard is closed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::NoShards`] for a stream without shards, and
    /// any error from the record source. Consumer errors are logged and
    /// skipped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> StreamResult<PollSummary> {
        let shard_ids = self.source.list_shards(&self.stream_name).await?;
        if shard_ids.is_empty() {
            return Err(StreamError::NoShards(self.stream_name.clone()));
        }

        let mut cursors = Vec::with_capacity(shard_ids.len());
        for shard_id in shard_ids {
            let iterator = self
                .source
                .latest_iterator(&self.stream_name, &shard_id)
                .await?;
            cursors.push(ShardCursor {
                shard_id,
                iterator: Some(iterator),
            });
        }
        info!(
            stream_name = %self.stream_name,
            shards = cursors.len(),
            "consuming stream from latest position"
        );

        let mut summary = PollSummary {
            shards: cursors.len(),
            records: 0,
        };

        loop {
            if *shutdown.borrow() {
                info!(stream_name = %self.stream_name, "shutdown requested");
                break;
            }

            let mut round = 0_u64;
            for cursor in &mut cursors {
                let Some(iterator) = cursor.iterator.as_deref() else {
                    continue;
                };
                let batch = self.source.read(&cursor.shard_id, iterator).await?;
                for message in &batch.messages {
                    if let Err(e) = self.consumer.accept(message) {
                        error!(
                            shard_id = %message.shard_id,
                            sequence_number = %message.sequence_number,
                            error = %e,
                            "failed to process record"
                        );
                    }
                    round += 1;
                }
                if batch.next_iterator.is_none() {
                    info!(shard_id = %cursor.shard_id, "shard closed");
                }
                cursor.iterator = batch.next_iterator;
            }
            summary.records += round;

            if cursors.iter().all(|c| c.iterator.is_none()) {
                info!(stream_name = %self.stream_name, "all shards closed");
                break;
            }

            let wait = if round == 0 {
                debug!(interval_ms = self.poll_interval.as_millis(), "no records, sleeping");
                self.poll_interval.max(self.min_read_interval)
            } else {
                self.min_read_interval
            };
            if !wait.is_zero() {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            info!(stream_name = %self.stream_name, "shutdown sender dropped");
                            break;
                        }
                    }
                    () = tokio::time::sleep(wait) => {}
                }
            }
        }

        info!(
            stream_name = %self.stream_name,
            records = summary.records,
            "stopped consuming stream"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Instant;

    use async_trait::async_trait;

    use super::*;
    use crate::consumer::Message;
    use crate::source::RecordBatch;

    /// Serves scripted batches per shard. Once a shard's script runs out it
    /// returns empty batches that keep the shard open.
    #[derive(Default)]
    struct ScriptedSource {
        shards: Vec<String>,
        batches: Mutex<HashMap<String, VecDeque<RecordBatch>>>,
        reads: Mutex<Vec<Instant>>,
    }

    impl ScriptedSource {
        fn with_shard(mut self, shard_id: &str, batches: Vec<RecordBatch>) -> Self {
            self.shards.push(shard_id.to_owned());
            self.batches
                .lock()
                .unwrap()
                .insert(shard_id.to_owned(), batches.into());
            self
        }
    }

    #[async_trait]
    impl RecordSource for ScriptedSource {
        async fn list_shards(&self, _stream_name: &str) -> StreamResult<Vec<String>> {
            Ok(self.shards.clone())
        }

        async fn latest_iterator(&self, _stream_name: &str, shard_id: &str) -> StreamResult<String> {
            Ok(format!("{shard_id}/0"))
        }

        async fn read(&self, shard_id: &str, iterator: &str) -> StreamResult<RecordBatch> {
            self.reads.lock().unwrap().push(Instant::now());
            let next = self
                .batches
                .lock()
                .unwrap()
                .get_mut(shard_id)
                .and_then(VecDeque::pop_front);
            Ok(next.unwrap_or_else(|| RecordBatch {
                messages: Vec::new(),
                next_iterator: Some(iterator.to_owned()),
            }))
        }
    }

    #[derive(Default)]
    struct Collecting {
        payloads: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl MessageConsumer for Collecting {
        fn accept(&self, message: &Message) -> anyhow::Result<()> {
            if self.fail_on == Some(message.payload.as_str()) {
                anyhow::bail!("rejected {}", message.payload);
            }
            self.payloads.lock().unwrap().push(message.payload.clone());
            Ok(())
        }
    }

    fn batch(shard_id: &str, payloads: &[&str], open: bool) -> RecordBatch {
        RecordBatch {
            messages: payloads
                .iter()
                .enumerate()
                .map(|(i, p)| Message::from_bytes(shard_id, "pk", i.to_string(), p.as_bytes()))
                .collect(),
            next_iterator: open.then(|| format!("{shard_id}/next")),
        }
    }

    fn poller(source: ScriptedSource, consumer: Arc<Collecting>) -> ShardPoller<ScriptedSource, Collecting> {
        ShardPoller::new(source, consumer, "events", Duration::from_millis(5))
            .with_min_read_interval(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_should_fail_on_stream_without_shards() {
        let (_tx, rx) = watch::channel(false);
        let err = poller(ScriptedSource::default(), Arc::default())
            .run(rx)
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::NoShards(name) if name == "events"));
    }

    #[tokio::test]
    async fn test_should_consume_until_shards_close() {
        let source = ScriptedSource::default()
            .with_shard(
                "shardId-0",
                vec![batch("shardId-0", &["a", "b"], true), batch("shardId-0", &["c"], false)],
            )
            .with_shard("shardId-1", vec![batch("shardId-1", &["d"], false)]);
        let consumer = Arc::new(Collecting::default());
        let (_tx, rx) = watch::channel(false);

        let summary = poller(source, Arc::clone(&consumer)).run(rx).await.unwrap();

        assert_eq!(summary, PollSummary { shards: 2, records: 4 });
        let mut payloads = consumer.payloads.lock().unwrap().clone();
        payloads.sort();
        assert_eq!(payloads, ["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_should_continue_after_consumer_error() {
        let source = ScriptedSource::default()
            .with_shard("shardId-0", vec![batch("shardId-0", &["ok", "bad", "fine"], false)]);
        let consumer = Arc::new(Collecting {
            fail_on: Some("bad"),
            ..Collecting::default()
        });
        let (_tx, rx) = watch::channel(false);

        let summary = poller(source, Arc::clone(&consumer)).run(rx).await.unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(*consumer.payloads.lock().unwrap(), ["ok", "fine"]);
    }

    #[tokio::test]
    async fn test_should_stop_when_shutdown_already_signalled() {
        let source = ScriptedSource::default().with_shard("shardId-0", Vec::new());
        let (_tx, rx) = watch::channel(true);

        let summary = poller(source, Arc::default()).run(rx).await.unwrap();
        assert_eq!(summary, PollSummary { shards: 1, records: 0 });
    }

    #[tokio::test]
    async fn test_should_stop_on_shutdown_while_idle() {
        let source = ScriptedSource::default().with_shard("shardId-0", Vec::new());
        let poller = poller(source, Arc::default());
        let (tx, rx) = watch::channel(false);

        let (summary, ()) = tokio::join!(poller.run(rx), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(true).unwrap();
        });
        assert_eq!(summary.unwrap().records, 0);
    }

    #[tokio::test]
    async fn test_should_stop_when_shutdown_sender_dropped() {
        let source = ScriptedSource::default().with_shard("shardId-0", Vec::new());
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let summary = poller(source, Arc::default()).run(rx).await.unwrap();
        assert_eq!(summary.shards, 1);
    }

    #[tokio::test]
    async fn test_should_space_reads_of_busy_shard() {
        let source = ScriptedSource::default().with_shard(
            "shardId-0",
            vec![
                batch("shardId-0", &["a"], true),
                batch("shardId-0", &["b"], true),
                batch("shardId-0", &["c"], false),
            ],
        );
        let poller = ShardPoller::new(source, Arc::new(Collecting::default()), "events", Duration::ZERO)
            .with_min_read_interval(Duration::from_millis(30));
        let (_tx, rx) = watch::channel(false);

        let summary = poller.run(rx).await.unwrap();
        assert_eq!(summary.records, 3);

        let reads = poller.source.reads.lock().unwrap().clone();
        assert_eq!(reads.len(), 3);
        for pair in reads.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(30));
        }
    }

    #[test]
    fn test_should_default_to_kinesis_read_limit() {
        let poller = poller(ScriptedSource::default(), Arc::default());
        assert_eq!(
            ShardPoller::<ScriptedSource, Collecting>::DEFAULT_MIN_READ_INTERVAL,
            Duration::from_millis(200)
        );
        assert_eq!(poller.min_read_interval, Duration::ZERO);
    }
}
