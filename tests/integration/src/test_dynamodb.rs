//! DynamoDB client tests against a running local server.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aws_sdk_dynamodb::types::{
        AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
    };
    use kinesis_consumer_dynamodb::{connect_dynamodb, verify_tables};

    use crate::{local_properties, test_credentials, test_resource_name};

    async fn create_table(client: &aws_sdk_dynamodb::Client, table_name: &str) {
        client
            .create_table()
            .table_name(table_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("pk")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("pk")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to create table {table_name}: {e}"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_describe_configured_table() {
        let table_name = test_resource_name("orders");
        let properties = local_properties(&table_name);
        let client = connect_dynamodb(&properties, &test_credentials()).await;

        create_table(&client, &table_name).await;

        let failing = verify_tables(&client, &properties).await;
        assert!(failing.is_empty(), "unexpected failures: {failing:?}");

        let table = properties.table_by_key("orders").unwrap();
        assert_eq!(table.name(), table_name);
        assert_eq!(
            table.time_to_live("retention").unwrap(),
            Duration::from_secs(86_400)
        );

        client
            .delete_table()
            .table_name(&table_name)
            .send()
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_missing_table() {
        let table_name = test_resource_name("missing");
        let properties = local_properties(&table_name);
        let client = connect_dynamodb(&properties, &test_credentials()).await;

        let failing = verify_tables(&client, &properties).await;
        assert_eq!(failing, [table_name]);
    }
}
