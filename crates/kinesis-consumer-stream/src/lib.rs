//! Kinesis consumption for the Kinesis consumer service.
//!
//! [`ShardPoller`] reads every shard of a stream from its latest position
//! through a [`RecordSource`] and hands each record to a
//! [`MessageConsumer`]. The bundled [`LoggingConsumer`] logs payloads.
//!
//! Clients for Kinesis and CloudWatch are built per
//! [`Deployment`](kinesis_consumer_core::Deployment) in [`clients`].

pub mod clients;
pub mod consumer;
pub mod error;
pub mod poller;
pub mod source;

pub use clients::{cloudwatch_client, kinesis_client};
pub use consumer::{LoggingConsumer, Message, MessageConsumer};
pub use error::{StreamError, StreamResult};
pub use poller::{PollSummary, ShardPoller};
pub use source::{KinesisRecordSource, RecordBatch, RecordSource};
