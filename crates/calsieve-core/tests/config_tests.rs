//! Tests for loading and saving the JSON configuration document.

use calsieve_core::{
    Action, AddEventPolicy, Config, Event, Pattern, SieveError, SourceSpec, Time,
};
use std::path::{Path, PathBuf};

fn sample() -> &'static str {
    r#"{
        "src_cals": ["file", "lectures.ics", "/file", "url", "https://example.com/cal.ics", "/url"],
        "filters": [
            {
                "pattern": ["has_text", "Lab", "SUMMARY", "/has_text"],
                "action": ["remove_event"]
            },
            {
                "pattern": ["not", "in_time", "20240101T000000Z", "20240201T000000Z", "/not"],
                "action": ["multiple", "write_field", "STATUS", "TENTATIVE", "remove_field", "URL", "/multiple"]
            }
        ]
    }"#
}

#[test]
fn loads_sources_and_filters() {
    let config = Config::from_json(sample()).unwrap();

    assert_eq!(
        config.sources,
        vec![
            SourceSpec::File(PathBuf::from("lectures.ics")),
            SourceSpec::Url("https://example.com/cal.ics".into()),
        ]
    );
    assert_eq!(config.filters.len(), 2);
    assert_eq!(
        config.filters[0].pattern,
        Pattern::has_text_in("Lab", ["SUMMARY"])
    );
    assert_eq!(config.filters[0].action, Action::RemoveEvent);
    assert_eq!(
        config.filters[1].pattern,
        Pattern::not(Pattern::in_time(
            Time::new(2024, 1, 1, 0, 0),
            Time::new(2024, 2, 1, 0, 0)
        ))
    );
    assert_eq!(config.add_event_policy, AddEventPolicy::Shared);
}

#[test]
fn missing_sections_default_to_empty() {
    let config = Config::from_json("{}").unwrap();
    assert!(config.sources.is_empty());
    assert!(config.filters.is_empty());
}

#[test]
fn save_then_load_is_identity() {
    let config = Config::from_json(sample()).unwrap();
    let json = config.to_json().unwrap();
    assert_eq!(Config::from_json(&json).unwrap(), config);
}

#[test]
fn saved_tokens_match_loaded_tokens() {
    let original: serde_json::Value = serde_json::from_str(sample()).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&Config::from_json(sample()).unwrap().to_json().unwrap()).unwrap();
    assert_eq!(saved, original);
}

#[test]
fn default_policy_is_not_written() {
    let json = Config::from_json(sample()).unwrap().to_json().unwrap();
    assert!(!json.contains("add_event_policy"));
}

#[test]
fn copy_policy_applies_to_every_add_event() {
    let json = r#"{
        "add_event_policy": "copy",
        "filters": [
            { "pattern": ["and", "/and"], "action": ["add_event", "SUMMARY", "x", "/add_event"] }
        ]
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.add_event_policy, AddEventPolicy::Copy);
    assert_eq!(
        config.filters[0].action,
        Action::AddEvent {
            event: Event::from_fields([("SUMMARY", "x")]),
            policy: AddEventPolicy::Copy,
        }
    );
    assert!(config.to_json().unwrap().contains(r#""add_event_policy": "copy""#));
}

#[test]
fn malformed_rule_rejects_whole_document() {
    let json = r#"{
        "filters": [
            { "pattern": ["has_text", "ok", "/has_text"], "action": ["remove_event"] },
            { "pattern": ["and", "has_text", "x", "/has_text"], "action": ["remove_event"] }
        ]
    }"#;
    match Config::from_json(json) {
        Err(SieveError::MalformedRule { position, message }) => {
            assert_eq!(position, 4);
            assert!(message.starts_with("filter 1 pattern:"), "message: {}", message);
        }
        other => panic!("expected MalformedRule, got {:?}", other),
    }
}

#[test]
fn malformed_action_names_the_action() {
    let json = r#"{ "filters": [ { "pattern": ["and", "/and"], "action": ["write_field", "X"] } ] }"#;
    let err = Config::from_json(json).unwrap_err();
    assert!(err.to_string().contains("filter 0 action:"), "got: {}", err);
}

#[test]
fn unknown_policy_is_json_error() {
    let json = r#"{ "add_event_policy": "sometimes" }"#;
    assert!(matches!(Config::from_json(json), Err(SieveError::Json(_))));
}

#[test]
fn invalid_json_is_json_error() {
    assert!(matches!(Config::from_json("{"), Err(SieveError::Json(_))));
}

#[test]
fn bad_source_tokens_are_config_errors() {
    let json = r#"{ "src_cals": ["file", "a.ics"] }"#;
    assert!(matches!(Config::from_json(json), Err(SieveError::Config(_))));
}

#[test]
fn pipeline_uses_configured_filters() {
    let config = Config::from_json(sample()).unwrap();
    let pipeline = config.pipeline(Some(Path::new("/srv/cals")));
    assert_eq!(pipeline.filters(), config.filters.as_slice());
    assert_eq!(pipeline.sources()[0].name(), "/srv/cals/lectures.ics");
    assert_eq!(pipeline.sources()[1].name(), "https://example.com/cal.ics");
}
