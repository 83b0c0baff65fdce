#[cfg(test)]
mod tests {
    use crate::client::LlmClient;
    use sahpaathi_core::{HistoryEntry, Role};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> LlmClient {
        LlmClient::new("test-key".to_owned(), server.uri()).unwrap()
    }

    fn reply_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": {
                    "content": content,
                    "role": "assistant"
                }
            }]
        })
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("hello student")))
            .mount(&server)
            .await;

        let result = client.generate_reply("You are a tutor.", &[], "hi").await.unwrap();
        assert_eq!(result, "hello student");
    }

    #[tokio::test]
    async fn test_history_and_instruction_are_forwarded() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        let history = vec![
            HistoryEntry { role: Role::User, content: "what is x?".to_owned() },
            HistoryEntry { role: Role::Assistant, content: "x is a variable".to_owned() },
        ];

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "Be patient."},
                    {"role": "user", "content": "what is x?"},
                    {"role": "assistant", "content": "x is a variable"},
                    {"role": "user", "content": "and y?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("y too")))
            .mount(&server)
            .await;

        let result = client.generate_reply("Be patient.", &history, "and y?").await.unwrap();
        assert_eq!(result, "y too");
    }

    #[tokio::test]
    async fn test_retry_on_503_then_success() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("recovered")))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let result = client.probe().await.unwrap();
        assert_eq!(result, "recovered");
    }

    #[tokio::test]
    async fn test_non_transient_status_fails_fast() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.probe().await.unwrap_err();
        match err {
            crate::LlmError::HttpStatus { code, .. } => assert_eq!(code, 401),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = client.probe().await.unwrap_err();
        assert!(matches!(err, crate::LlmError::EmptyResponse));
    }
}
