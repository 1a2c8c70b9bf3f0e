//! Single publish against a loopback server.

#[cfg(test)]
mod tests {
    use minisns_core::SnsError;
    use minisns_model::{MessageAttributeValue, MessageAttributes, PublishRequest};

    use crate::{LoopbackServer, publish_response, sns_client};

    const TOPIC: &str = "arn:aws:sns:us-east-1:000000000000:test";

    fn request(message: &str) -> PublishRequest {
        PublishRequest::builder()
            .message(message)
            .topic_arn(TOPIC)
            .build()
    }

    #[tokio::test]
    async fn test_should_send_signed_form_request() {
        let server = LoopbackServer::start(|_, _| (200, publish_response("m-1")))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());

        let response = client
            .publish_message(&request("Hello World!"))
            .await
            .unwrap();
        assert_eq!(response.message_id, "m-1");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.method, http::Method::POST);
        assert_eq!(sent.path, "/");
        assert_eq!(
            sent.body,
            "Message=Hello%20World%21&TopicArn=arn%3Aaws%3Asns%3Aus-east-1%3A000000000000%3Atest&Action=Publish&Version=2010-03-31"
        );
        assert_eq!(
            sent.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            sent.header("content-length"),
            Some(sent.body.len().to_string().as_str())
        );
        assert_eq!(sent.header("host"), Some(client.host()));
        assert!(sent.header("x-amz-date").is_some());
        assert!(sent.header("x-amz-content-sha256").is_some());
        let authorization = sent.header("authorization").unwrap();
        assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=test/"));
        assert!(authorization.contains("/us-east-1/sns/aws4_request"));

        client.destroy(true).await;
    }

    #[tokio::test]
    async fn test_should_send_attributes_and_fifo_fields() {
        let server = LoopbackServer::start(|_, _| (200, publish_response("m-2")))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());

        let mut publish = request("it's (almost) *done*");
        publish.message_group_id = Some("group-1".to_owned());
        publish.message_deduplication_id = Some("dedup-1".to_owned());
        publish.message_attributes = Some(
            MessageAttributes::new()
                .with("test", MessageAttributeValue::string("test"))
                .with("blob", MessageAttributeValue::binary(vec![0xde, 0xad, 0xbe, 0xef])),
        );
        client.publish_message(&publish).await.unwrap();

        let sent = &server.requests()[0];
        assert!(sent.body.starts_with("Message=it%27s%20%28almost%29%20%2Adone%2A&"));
        assert!(sent.body.contains("MessageAttributes.entry.2.Value.BinaryValue=3q2%2B7w%3D%3D"));

        let form = sent.form();
        let field = |name: &str| {
            form.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(field("Message"), Some("it's (almost) *done*"));
        assert_eq!(field("MessageGroupId"), Some("group-1"));
        assert_eq!(field("MessageDeduplicationId"), Some("dedup-1"));
        assert_eq!(field("MessageAttributes.entry.1.Name"), Some("test"));
        assert_eq!(field("MessageAttributes.entry.1.Value.StringValue"), Some("test"));
        assert_eq!(field("MessageAttributes.entry.2.Value.DataType"), Some("Binary"));
        assert_eq!(field("Version"), Some("2010-03-31"));
    }

    #[tokio::test]
    async fn test_should_surface_xml_error_message() {
        let server = LoopbackServer::start(|_, _| {
            (
                404,
                "<ErrorResponse><Error><Type>Sender</Type><Code>NotFound</Code>\
                 <Message>Topic does not exist</Message></Error></ErrorResponse>"
                    .to_owned(),
            )
        })
        .await
        .unwrap();
        let client = sns_client(&server.endpoint());

        let err = client.publish_message(&request("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Topic does not exist");
        assert_eq!(err.code(), Some("NotFound"));
        assert_eq!(err.status(), Some(http::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_should_surface_plain_text_error() {
        let server = LoopbackServer::start(|_, _| (500, "Generic Error".to_owned()))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());

        let err = client.publish_message(&request("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Generic Error");
    }

    #[tokio::test]
    async fn test_should_fail_on_redirect_without_following_it() {
        let server = LoopbackServer::start(|index, _| {
            if index == 0 {
                (307, "Moved".to_owned())
            } else {
                (200, publish_response("followed-redirect"))
            }
        })
        .await
        .unwrap();
        let client = sns_client(&server.endpoint());

        let err = client.publish_message(&request("x")).await.unwrap_err();
        assert!(matches!(err, SnsError::Service { .. }));
        assert_eq!(err.status(), Some(http::StatusCode::TEMPORARY_REDIRECT));
        assert_eq!(err.to_string(), "Moved");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/");
    }

    #[tokio::test]
    async fn test_should_reject_publish_after_destroy() {
        let server = LoopbackServer::start(|_, _| (200, publish_response("m")))
            .await
            .unwrap();
        let client = sns_client(&server.endpoint());

        client.destroy(true).await;
        client.destroy(true).await;

        let err = client.publish_message(&request("x")).await.unwrap_err();
        assert!(matches!(err, SnsError::Closed));
        assert!(server.requests().is_empty());
    }
}
