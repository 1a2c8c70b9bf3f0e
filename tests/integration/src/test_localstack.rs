//! Publish tests against a running LocalStack.

#[cfg(test)]
mod tests {
    use minisns_model::{
        MessageAttributeValue, MessageAttributes, PublishBatchRequest, PublishBatchRequestEntry,
        PublishRequest,
    };

    use crate::{endpoint_url, sns_client, test_topic_name};

    /// Create a topic with a raw query call and return its ARN.
    async fn create_topic(name: &str) -> String {
        let body = format!("Action=CreateTopic&Name={name}&Version=2010-03-31");
        let text = reqwest::Client::new()
            .post(endpoint_url())
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("CreateTopic request")
            .text()
            .await
            .expect("CreateTopic body");

        let tree = minisns_xml::parse_simplified(&text).expect("CreateTopic XML");
        tree.path(&["CreateTopicResponse", "CreateTopicResult", "TopicArn"])
            .and_then(minisns_xml::XmlValue::as_text)
            .unwrap_or_else(|| panic!("no TopicArn in {text}"))
            .to_owned()
    }

    #[tokio::test]
    #[ignore = "requires running LocalStack"]
    async fn test_should_publish_message() {
        let topic_arn = create_topic(&test_topic_name("publish")).await;
        let client = sns_client(&endpoint_url());

        let request = PublishRequest::builder()
            .topic_arn(topic_arn)
            .message("Hello World! (it's *here*)")
            .message_attributes(
                MessageAttributes::new()
                    .with("test", MessageAttributeValue::string("test"))
                    .with("blob", MessageAttributeValue::binary(vec![0xde, 0xad, 0xbe, 0xef])),
            )
            .build();
        let response = client.publish_message(&request).await.unwrap();
        assert!(!response.message_id.is_empty());

        client.destroy(true).await;
    }

    #[tokio::test]
    #[ignore = "requires running LocalStack"]
    async fn test_should_publish_batch_of_fifteen() {
        let topic_arn = create_topic(&test_topic_name("batch")).await;
        let client = sns_client(&endpoint_url());

        let entries = (0..15)
            .map(|i| PublishBatchRequestEntry::builder().message(format!("message {i}")).build())
            .collect();
        let response = client
            .publish_message_batch(PublishBatchRequest::new(topic_arn, entries))
            .await
            .unwrap();

        assert_eq!(response.successful_count(), 15);
        assert_eq!(response.failed_count(), 0);

        client.destroy(true).await;
    }

    #[tokio::test]
    #[ignore = "requires running LocalStack"]
    async fn test_should_fail_for_missing_topic() {
        let client = sns_client(&endpoint_url());
        let request = PublishRequest::builder()
            .topic_arn("arn:aws:sns:us-east-1:000000000000:does-not-exist")
            .message("nobody listens")
            .build();

        let err = client.publish_message(&request).await.unwrap_err();
        assert!(err.status().is_some());
        assert!(err.to_string().contains("Topic does not exist"), "{err}");
    }
}
