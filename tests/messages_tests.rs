// Wire-shape tests for data-channel and backend messages.

use voicelink::backend::types::{Credential, HistoryEntry, SessionCreated};
use voicelink::media::{decode_transcription, DataMessage};

#[test]
fn test_transcription_payload_decodes() {
    let payload = br#"{"type":"transcription","text":"Hi","is_final":false}"#;

    let event = decode_transcription(payload).unwrap().unwrap();
    assert_eq!(event.text, "Hi");
    assert!(!event.is_final);
}

#[test]
fn test_missing_is_final_means_final() {
    // Senders that only produce finished text omit the flag entirely.
    let payload = br#"{"type":"transcription","text":"Done"}"#;

    let event = decode_transcription(payload).unwrap().unwrap();
    assert!(event.is_final);
}

#[test]
fn test_other_message_kinds_are_not_transcriptions() {
    let payload = br#"{"type":"ping","text":""}"#;

    assert!(decode_transcription(payload).unwrap().is_none());
}

#[test]
fn test_missing_text_is_malformed() {
    let payload = br#"{"type":"transcription","is_final":true}"#;

    assert!(decode_transcription(payload).is_err());
}

#[test]
fn test_garbage_payload_is_malformed() {
    assert!(decode_transcription(b"\xff\xfe not json").is_err());
    assert!(decode_transcription(b"[1,2,3]").is_err());
}

#[test]
fn test_data_message_serializes_with_type_tag() {
    let message = DataMessage {
        kind: "transcription".to_string(),
        text: "Hello".to_string(),
        is_final: false,
    };

    let json = serde_json::to_string(&message).unwrap();
    assert!(json.contains(r#""type":"transcription""#));
    assert!(json.contains(r#""is_final":false"#));
}

#[test]
fn test_credential_response_shape() {
    let json = r#"{"url":"wss://media.example.com","token":"abc.def.ghi"}"#;

    let credential: Credential = serde_json::from_str(json).unwrap();
    assert_eq!(credential.url, "wss://media.example.com");
    assert_eq!(credential.token, "abc.def.ghi");
}

#[test]
fn test_session_created_response_shape() {
    let json = r#"{"session_id":"0b0e7a66-4b3e-4c62-9a55-8f6f3c0c2b1d"}"#;

    let session: SessionCreated = serde_json::from_str(json).unwrap();
    assert_eq!(session.session_id, "0b0e7a66-4b3e-4c62-9a55-8f6f3c0c2b1d");
}

#[test]
fn test_history_entry_shape() {
    let json = r#"{
        "speaker": "AI",
        "text": "Welcome back",
        "timestamp": "2026-08-05T14:30:00Z"
    }"#;

    let entry: HistoryEntry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.speaker, "AI");
    assert_eq!(entry.text, "Welcome back");
    assert_eq!(entry.timestamp, "2026-08-05T14:30:00Z");
}
