#[cfg(test)]
mod tests {
    use crate::{api::parse_stream_list, StreamsApiClient};
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;
    use streams_core::{CoreError, StreamApiError, StreamSource};

    fn stream(name: &str, game: &str) -> serde_json::Value {
        json!({
            "username": name,
            "twitch": name.to_lowercase(),
            "id": "1",
            "logo": format!("https://static.example/{name}.png"),
            "url": format!("https://twitch.tv/{}", name.to_lowercase()),
            "status": format!("{name} doing runs"),
            "game": game
        })
    }

    fn client_for(server: &mockito::Server) -> StreamsApiClient {
        StreamsApiClient::new(format!("{}/streams", server.url()), "test-key".to_string())
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_streams_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([stream("Alice", "Spelunky"), stream("Bob", "Spelunky 2")]).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let records = client.fetch_streams().await.unwrap();

        assert_eq!(records.len(), 2);
        let alice = &records["https://twitch.tv/alice"];
        assert_eq!(alice.username, "Alice");
        assert_eq!(alice.game, "Spelunky");
        assert_eq!(records["https://twitch.tv/bob"].game, "Spelunky 2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_streams_through_trait() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let source: Box<dyn StreamSource> = Box::new(client_for(&server));
        let records = source.fetch_streams().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_streams_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let result = client_for(&server).fetch_streams().await;
        assert!(matches!(
            result,
            Err(CoreError::StreamApi(StreamApiError::UnexpectedStatus { status_code: 500 }))
        ));
    }

    #[tokio::test]
    async fn test_fetch_streams_requires_exactly_200() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::Any)
            .with_status(203)
            .with_body(json!([stream("Alice", "Spelunky")]).to_string())
            .create_async()
            .await;

        let result = client_for(&server).fetch_streams().await;
        assert!(matches!(
            result,
            Err(CoreError::StreamApi(StreamApiError::UnexpectedStatus { status_code: 203 }))
        ));
    }

    #[tokio::test]
    async fn test_fetch_streams_malformed_record_fails_whole_fetch() {
        let mut server = mockito::Server::new_async().await;
        let mut broken = stream("Bob", "Spelunky");
        broken.as_object_mut().unwrap().remove("logo");
        let _mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!([stream("Alice", "Spelunky"), broken]).to_string())
            .create_async()
            .await;

        let result = client_for(&server).fetch_streams().await;
        match result {
            Err(CoreError::StreamApi(StreamApiError::MalformedRecord { index, field, .. })) => {
                assert_eq!(index, 1);
                assert_eq!(field, "logo");
            }
            other => panic!("Expected MalformedRecord error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_streams_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/streams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client_for(&server).fetch_streams().await;
        assert!(matches!(
            result,
            Err(CoreError::StreamApi(StreamApiError::InvalidResponse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_fetch_streams_unreachable() {
        let client = StreamsApiClient::with_timeout(
            "http://127.0.0.1:9/streams".to_string(),
            "test-key".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = client.fetch_streams().await;
        assert!(matches!(
            result,
            Err(CoreError::Network(_)) | Err(CoreError::StreamApi(StreamApiError::RequestTimeout))
        ));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_stream_list(&json!({ "streams": [] }));
        assert!(matches!(result, Err(StreamApiError::InvalidResponse { .. })));
    }

    #[test]
    fn test_parse_duplicate_urls_keep_last() {
        let body = json!([stream("Alice", "Spelunky"), stream("Alice", "Spelunky 2")]);
        let records = parse_stream_list(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records["https://twitch.tv/alice"].game, "Spelunky 2");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = StreamsApiClient::new(
            "https://api.example.com/streams".to_string(),
            "super-secret-key".to_string(),
        )
        .unwrap();
        let debug_output = format!("{:?}", client);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-key"));
        assert_eq!(client.endpoint(), "https://api.example.com/streams");
    }
}
