use std::time::Duration;

use concierge_client::{
    ChatRequest, ClientConfig, ClientError, ConciergeBackend, HttpBackend, RatingRequest,
    ToggleRequest, TrainingRequest,
};
use concierge_core::{EnergyContext, Language};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        history: vec![],
        lang: Some("en-US".to_string()),
        energy_context: Some(EnergyContext {
            message_count: 0,
            drink_mentions: 0,
        }),
    }
}

#[tokio::test]
async fn test_chat_posts_body_and_parses_menu_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "Anything spicy?",
            "history": [],
            "lang": "en-US",
            "energy_context": {"message_count": 0, "drink_mentions": 0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Try the karaage.",
            "menu_items": [{"name": "Karaage", "price": 680, "category": "Fried"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .chat(&chat_request("Anything spicy?"))
        .await
        .unwrap();

    assert_eq!(response.reply, "Try the karaage.");
    let items = response.menu_items.unwrap();
    assert_eq!(items[0].name, "Karaage");
    assert_eq!(items[0].display_price(), Some(680.0));
}

#[tokio::test]
async fn test_chat_reply_survives_sheet_rows_and_bad_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "唐揚げがおすすめです",
            "menu_items": [
                {"提供中": "TRUE", "メニュー名": "唐揚げ", "カテゴリー": "揚げ物",
                 "魅力・特徴": "サクサク", "アレルギー・注意": "小麦", "価格": 800},
                {"name": "Karaage", "price": "800"},
                {"price": 500}
            ]
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .chat(&chat_request("おすすめは?"))
        .await
        .unwrap();

    assert_eq!(response.reply, "唐揚げがおすすめです");
    let items = response.menu_items.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "唐揚げ");
    assert_eq!(items[0].category.as_deref(), Some("揚げ物"));
    assert_eq!(items[0].display_price(), Some(800.0));
    assert_eq!(items[1].name, "Karaage");
    assert_eq!(items[1].display_price(), Some(800.0));
}

#[tokio::test]
async fn test_chat_rate_limit_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .chat(&chat_request("Hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RateLimited));
}

#[tokio::test]
async fn test_chat_server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .chat(&chat_request("Hi"))
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_without_reply_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"menu_items": []})))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .chat(&chat_request("Hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(50),
    })
    .unwrap();

    let err = backend.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = HttpBackend::new(ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = backend.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_) | ClientError::Timeout));
}

#[tokio::test]
async fn test_health_non_success_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(backend_for(&server).health().await.is_err());
}

#[tokio::test]
async fn test_talk_theme_present_and_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config/talk-theme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"theme": "Autumn sake"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config/talk-theme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert_eq!(
        backend.talk_theme().await.unwrap().as_deref(),
        Some("Autumn sake")
    );
    assert_eq!(backend.talk_theme().await.unwrap(), None);
}

#[tokio::test]
async fn test_availability_parses_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/menu/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"name": "Karaage", "available": false},
                {"name": "Edamame", "available": true}
            ]
        })))
        .mount(&server)
        .await;

    let items = backend_for(&server).availability().await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(!items[0].available);
}

#[tokio::test]
async fn test_train_returns_feedback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/train"))
        .and(body_json(json!({"message": "Welcome!", "history": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customer_reply": "I'll take a highball.",
            "feedback_to_staff": "Great energy."
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .train(&TrainingRequest {
            message: "Welcome!".to_string(),
            history: vec![],
        })
        .await
        .unwrap();
    assert_eq!(response.customer_reply, "I'll take a highball.");
    assert_eq!(response.feedback_to_staff.as_deref(), Some("Great energy."));
}

#[tokio::test]
async fn test_synthesize_returns_audio_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .and(body_json(json!({"text": "こんにちは", "lang": "ja-JP"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x49, 0x44, 0x33]))
        .mount(&server)
        .await;

    let audio = backend_for(&server)
        .synthesize("こんにちは", Language::Japanese)
        .await
        .unwrap();
    assert_eq!(audio, vec![0x49, 0x44, 0x33]);
}

#[tokio::test]
async fn test_synthesize_empty_body_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .synthesize("hello", Language::English)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_rating_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rating"))
        .and(body_json(json!({"rating": 5, "message_count": 3, "lang": "ja-JP"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .rate(&RatingRequest {
            rating: 5,
            message_count: 3,
            lang: "ja-JP".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_staff_menu_sends_bearer_and_reads_sheet_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/menu/staff"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"メニュー名": "Karaage", "カテゴリー": "Fried", "提供中": true}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/menu/staff"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let items = backend.staff_menu(Some("s3cret")).await.unwrap();
    assert_eq!(items[0].name, "Karaage");
    assert_eq!(items[0].category, "Fried");
    assert!(items[0].available);

    let err = backend.staff_menu(Some("wrong")).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_toggle_posts_menu_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/menu/toggle"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(json!({"menu_name": "Karaage", "available": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server)
        .toggle_menu(
            Some("s3cret"),
            &ToggleRequest {
                menu_name: "Karaage".to_string(),
                available: false,
            },
        )
        .await
        .unwrap();
}
