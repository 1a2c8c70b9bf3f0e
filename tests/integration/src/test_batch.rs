//! Batch publish against a loopback server.

#[cfg(test)]
mod tests {
    use minisns_model::{PublishBatchRequest, PublishBatchRequestEntry};

    use crate::{LoopbackServer, batch_response_for, sns_client};

    const TOPIC: &str = "arn:aws:sns:us-east-1:000000000000:test";

    fn entries(count: usize) -> Vec<PublishBatchRequestEntry> {
        (0..count)
            .map(|i| {
                PublishBatchRequestEntry::builder()
                    .id(format!("entry-{i}"))
                    .message(format!("message {i}"))
                    .build()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_should_split_large_batch_into_sequential_chunks() {
        let server = LoopbackServer::start(|_, request| (200, batch_response_for(request)))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());

        let response = client
            .publish_message_batch(PublishBatchRequest::new(TOPIC, entries(15)))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        let member_ids = |index: usize| {
            requests[index]
                .form()
                .into_iter()
                .filter(|(k, _)| k.ends_with(".Id"))
                .count()
        };
        assert_eq!(member_ids(0), 10);
        assert_eq!(member_ids(1), 5);
        for request in &requests {
            assert!(request.body.ends_with(
                "&TopicArn=arn%3Aaws%3Asns%3Aus-east-1%3A000000000000%3Atest&Action=PublishBatch&Version=2010-03-31"
            ));
        }

        let successful = response.successful.unwrap();
        assert_eq!(successful.len(), 15);
        assert_eq!(successful[0].id, "entry-0");
        assert_eq!(successful[10].id, "entry-10");
        assert!(response.failed.is_none());
    }

    #[tokio::test]
    async fn test_should_generate_missing_entry_ids() {
        let server = LoopbackServer::start(|_, request| (200, batch_response_for(request)))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());
        let entries = vec![
            PublishBatchRequestEntry::builder().message("first").build(),
            PublishBatchRequestEntry::builder().message("second").build(),
        ];

        let response = client
            .publish_message_batch(PublishBatchRequest::new(TOPIC, entries))
            .await
            .unwrap();

        let successful = response.successful.unwrap();
        assert_eq!(successful.len(), 2);
        assert_ne!(successful[0].id, successful[1].id);
        assert!(uuid::Uuid::parse_str(&successful[0].id).is_ok());
    }

    #[tokio::test]
    async fn test_should_discard_partial_results_on_chunk_failure() {
        let server = LoopbackServer::start(|index, request| {
            if index == 1 {
                (
                    400,
                    "<ErrorResponse><Error><Code>InvalidParameter</Code>\
                     <Message>Invalid parameter: Message</Message></Error></ErrorResponse>"
                        .to_owned(),
                )
            } else {
                (200, batch_response_for(request))
            }
        })
        .await
        .unwrap();
        let client = sns_client(&server.endpoint());

        let err = client
            .publish_message_batch(PublishBatchRequest::new(TOPIC, entries(30)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid parameter: Message");
        assert_eq!(server.requests().len(), 2);
    }
}
