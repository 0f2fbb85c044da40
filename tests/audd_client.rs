//! `AuddClient` against a mock AudD endpoint.

use std::time::Duration;

use music_recognition_bot::config::RecognitionConfig;
use music_recognition_bot::recognition::{AuddClient, RecognitionError, Recognizer};
use music_recognition_bot::song::StreamingProvider;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEDIA_URL: &str = "https://api.telegram.org/file/bot1:x/voice/file_1.oga";

fn client(server: &MockServer) -> AuddClient {
    let config = RecognitionConfig {
        base_url: format!("{}/", server.uri()),
        timeout_secs: 1,
        ..RecognitionConfig::default()
    };
    AuddClient::from_config(&config, "audd-key")
}

#[tokio::test]
async fn match_is_mapped_with_links() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("api_token=audd-key"))
        .and(body_string_contains("return=apple_music%2Cspotify"))
        .and(body_string_contains("url=https%3A%2F%2Fapi.telegram.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "result": {
                "artist": "Queen",
                "title": "We Will Rock You",
                "album": "News of the World",
                "release_date": "1977-10-07",
                "spotify": {
                    "external_urls": { "spotify": "https://open.spotify.com/track/54flyrjcdnQdco7300avMJ" }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let song = client(&server).recognize(MEDIA_URL).await.unwrap();

    assert_eq!(song.title, "We Will Rock You");
    assert_eq!(song.artist, "Queen");
    assert_eq!(song.album.as_deref(), Some("News of the World"));
    assert_eq!(song.streaming_links.len(), 1);
    assert!(song.streaming_links.contains_key(&StreamingProvider::Spotify));
}

#[tokio::test]
async fn null_result_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "result": null })),
        )
        .mount(&server)
        .await;

    let err = client(&server).recognize(MEDIA_URL).await.unwrap_err();
    assert!(err.is_no_match());
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error": { "error_code": 900, "error_message": "Recognition failed: authorization failed" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).recognize(MEDIA_URL).await.unwrap_err();
    match err {
        RecognitionError::Status(status) => assert_eq!(status.as_deref(), Some("error")),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).recognize(MEDIA_URL).await.unwrap_err();
    assert!(matches!(err, RecognitionError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).recognize(MEDIA_URL).await.unwrap_err();
    assert!(matches!(err, RecognitionError::Request(_)), "got {err:?}");
    assert!(!err.is_no_match());
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "result": null }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client(&server).recognize(MEDIA_URL).await.unwrap_err();
    assert!(matches!(err, RecognitionError::Timeout), "got {err:?}");
}
