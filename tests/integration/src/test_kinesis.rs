//! Kinesis consumption tests against a running local server.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use aws_sdk_kinesis::primitives::Blob;
    use kinesis_consumer_stream::{
        KinesisRecordSource, Message, MessageConsumer, RecordSource, ShardPoller, StreamError,
        kinesis_client,
    };
    use tokio::sync::watch;

    use crate::{local_deployment, test_credentials, test_resource_name};

    #[derive(Default)]
    struct Collecting {
        payloads: Mutex<Vec<String>>,
    }

    impl MessageConsumer for Collecting {
        fn accept(&self, message: &Message) -> anyhow::Result<()> {
            self.payloads.lock().unwrap().push(message.payload.clone());
            Ok(())
        }
    }

    fn client() -> aws_sdk_kinesis::Client {
        kinesis_client(&local_deployment(), &test_credentials())
    }

    /// Create a single-shard stream and wait until its shards are listed.
    async fn create_stream(client: &aws_sdk_kinesis::Client, stream_name: &str) {
        client
            .create_stream()
            .stream_name(stream_name)
            .shard_count(1)
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to create stream {stream_name}: {e}"));

        let source = KinesisRecordSource::new(client.clone(), 100);
        for _ in 0..50 {
            if let Ok(shards) = source.list_shards(stream_name).await
                && !shards.is_empty()
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        panic!("stream {stream_name} never became active");
    }

    async fn delete_stream(client: &aws_sdk_kinesis::Client, stream_name: &str) {
        let _ = client.delete_stream().stream_name(stream_name).send().await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_consume_record_put_after_start() {
        let client = client();
        let stream_name = test_resource_name("events");
        create_stream(&client, &stream_name).await;

        let consumer = Arc::new(Collecting::default());
        let poller = ShardPoller::new(
            KinesisRecordSource::new(client.clone(), 100),
            Arc::clone(&consumer),
            stream_name.clone(),
            Duration::from_millis(100),
        );
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move { poller.run(rx).await });

        // Iterators start at LATEST; give the poller time to obtain them.
        tokio::time::sleep(Duration::from_secs(1)).await;
        client
            .put_record()
            .stream_name(&stream_name)
            .partition_key("pk-1")
            .data(Blob::new(b"{\"id\":1}".to_vec()))
            .send()
            .await
            .unwrap();

        let mut received = false;
        for _ in 0..50 {
            if !consumer.payloads.lock().unwrap().is_empty() {
                received = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tx.send(true).unwrap();
        let summary = handle.await.unwrap().unwrap();
        delete_stream(&client, &stream_name).await;

        assert!(received, "record was not consumed");
        assert_eq!(summary.shards, 1);
        assert_eq!(*consumer.payloads.lock().unwrap(), ["{\"id\":1}"]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_for_unknown_stream() {
        let poller = ShardPoller::new(
            KinesisRecordSource::new(client(), 100),
            Arc::new(Collecting::default()),
            test_resource_name("unknown"),
            Duration::from_millis(100),
        );
        let (_tx, rx) = watch::channel(false);

        let err = poller.run(rx).await.unwrap_err();
        assert!(matches!(
            err,
            StreamError::Kinesis {
                operation: "ListShards",
                ..
            }
        ));
    }
}
