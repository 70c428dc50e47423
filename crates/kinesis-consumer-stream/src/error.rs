//! Error types for stream consumption.

/// Errors raised while reading a stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// A Kinesis API call failed.
    #[error("Kinesis {operation} failed: {message}")]
    Kinesis {
        /// Kinesis operation name.
        operation: &'static str,
        /// Underlying error, rendered with its full source chain.
        message: String,
    },

    /// The stream has no shards to read.
    #[error("stream {0} has no shards")]
    NoShards(String),
}

/// Convenience result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
