//! Tests for the API client: envelopes, request bodies, message splitting.

use crate::api::{ApiResponse, BotApi};
use crate::media::SendVideo;
use crate::util::split_message;
use serde_json::json;
use tgfeed_core::config::{BotConfig, PlatformConfig};
use tgfeed_core::error::TgfeedError;
use tgfeed_core::update::{Update, UpdateId};

fn test_bot(token: &str) -> BotConfig {
    BotConfig {
        name: "orders".into(),
        token: token.into(),
        enabled: true,
        allowed_updates: Vec::new(),
    }
}

#[test]
fn test_split_keeps_short_messages_whole() {
    let text = "ack: order 17 shipped";
    assert_eq!(split_message(text, 4096), vec![text]);
}

#[test]
fn test_split_reassembles_to_the_original() {
    let text = "order line\n".repeat(1200);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|chunk| chunk.len() <= 4096));
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_prefers_newline_breaks() {
    let text = format!("{}\n{}", "a".repeat(10), "b".repeat(10));
    let chunks = split_message(&text, 16);
    assert_eq!(chunks[0], format!("{}\n", "a".repeat(10)));
    assert_eq!(chunks[1], "b".repeat(10));
}

#[test]
fn test_split_never_breaks_inside_a_char() {
    // Four-byte scalar values straddling the limit.
    let text = "🦀".repeat(2000);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in chunks {
        assert!(chunk.len() <= 4096);
        assert!(chunk.chars().all(|c| c == '🦀'));
    }
}

#[test]
fn test_api_response_ok_unwraps_result() {
    let resp: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
        "ok": true,
        "result": [{"update_id": 7}]
    }))
    .unwrap();
    let updates = resp.into_result("getUpdates").unwrap();
    assert_eq!(updates[0].update_id, Some(UpdateId(7)));
}

#[test]
fn test_api_response_error_carries_description_and_code() {
    let resp: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
        "ok": false,
        "error_code": 409,
        "description": "Conflict: terminated by other getUpdates request"
    }))
    .unwrap();
    let err = resp.into_result("getUpdates").unwrap_err();
    let display = format!("{err}");
    assert!(display.contains("getUpdates"), "got: {display}");
    assert!(display.contains("409"), "got: {display}");
    assert!(display.contains("Conflict"), "got: {display}");
}

#[test]
fn test_api_response_ok_without_result_is_an_error() {
    let resp: ApiResponse<Vec<Update>> =
        serde_json::from_value(json!({"ok": true})).unwrap();
    assert!(matches!(
        resp.into_result("getUpdates"),
        Err(TgfeedError::Api(_))
    ));
}

#[test]
fn test_bot_api_base_url() {
    let api = BotApi::new(
        reqwest::Client::new(),
        &PlatformConfig::default(),
        &test_bot("123456:AAA"),
    );
    assert_eq!(api.base_url, "https://api.telegram.org/bot123456:AAA");

    // Trailing slashes on the configured base collapse cleanly.
    let platform = PlatformConfig {
        base_url: "http://localhost:8081/".into(),
        ..PlatformConfig::default()
    };
    let api = BotApi::new(reqwest::Client::new(), &platform, &test_bot("9:B"));
    assert_eq!(api.base_url, "http://localhost:8081/bot9:B");
}

#[test]
fn test_updates_body_always_carries_the_offset() {
    let api = BotApi::new(
        reqwest::Client::new(),
        &PlatformConfig::default(),
        &test_bot("1:A"),
    );
    assert_eq!(
        api.updates_body(UpdateId::BACKLOG),
        json!({"offset": 0, "timeout": 30})
    );
    assert_eq!(
        api.updates_body(UpdateId(88)),
        json!({"offset": 88, "timeout": 30})
    );
}

#[test]
fn test_updates_body_includes_allowed_updates_when_configured() {
    let bot = BotConfig {
        allowed_updates: vec!["message".into()],
        ..test_bot("1:A")
    };
    let api = BotApi::new(reqwest::Client::new(), &PlatformConfig::default(), &bot);
    assert_eq!(
        api.updates_body(UpdateId(5)),
        json!({"offset": 5, "timeout": 30, "allowed_updates": ["message"]})
    );
}

#[test]
fn test_send_video_params_full() {
    let request = SendVideo::from_file_id(42, "BAACAgIAAxkBAAIB")
        .duration(30)
        .caption("launch recap")
        .width(1280)
        .height(720)
        .disable_notification()
        .reply_to(55);

    assert_eq!(
        serde_json::Value::Object(request.params()),
        json!({
            "chat_id": 42,
            "duration": 30,
            "caption": "launch recap",
            "width": 1280,
            "height": 720,
            "disable_notification": true,
            "reply_to_message_id": 55
        })
    );
}

#[test]
fn test_send_video_params_minimal() {
    let request = SendVideo::from_bytes(42, "clip.mp4", vec![0u8; 4]);
    // Unset optionals stay off the wire entirely.
    assert_eq!(
        serde_json::Value::Object(request.params()),
        json!({"chat_id": 42})
    );
}
