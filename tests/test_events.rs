//! Unit tests for stream event parsing and interpretation

use serde_json::json;
use task_agents::{StreamEvent, StreamInterpreter, parse_line};

fn line(value: serde_json::Value) -> String {
    value.to_string()
}

#[test]
fn parse_init_event() {
    let event = parse_line(&line(json!({
        "type": "system",
        "subtype": "init",
        "session_id": "sess-42"
    })));

    match event {
        StreamEvent::System { subtype, session_id } => {
            assert_eq!(subtype, "init");
            assert_eq!(session_id.as_deref(), Some("sess-42"));
        }
        other => panic!("expected system event, got {other:?}"),
    }
}

#[test]
fn parse_tolerates_garbage_and_unknown_types() {
    assert!(matches!(parse_line("not json at all"), StreamEvent::Unrecognized));
    assert!(matches!(parse_line(""), StreamEvent::Unrecognized));
    assert!(matches!(
        parse_line(&line(json!({"type": "user", "message": {}}))),
        StreamEvent::Unrecognized
    ));
    // Unknown content block types inside a valid assistant event are skipped
    let event = parse_line(&line(json!({
        "type": "assistant",
        "message": {"content": [
            {"type": "thinking", "thinking": "hmm", "signature": "s"},
            {"type": "text", "text": "kept"}
        ]}
    })));
    let mut interp = StreamInterpreter::new();
    interp.apply(event);
    assert_eq!(interp.answer().as_deref(), Some("kept"));
}

#[test]
fn result_text_replaces_accumulated_segments() {
    let mut interp = StreamInterpreter::new();

    interp.apply(parse_line(&line(json!({
        "type": "system", "subtype": "init", "session_id": "S"
    }))));
    interp.apply(parse_line(&line(json!({
        "type": "assistant",
        "message": {"content": [{"type": "text", "text": "a"}]}
    }))));
    let tool_notice = interp.apply(parse_line(&line(json!({
        "type": "assistant",
        "message": {"content": [{"type": "tool_use", "name": "X", "id": "t1", "input": {}}]}
    }))));
    let done_notice = interp.apply(parse_line(&line(json!({
        "type": "result",
        "result": "b",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    }))));

    assert_eq!(tool_notice.as_deref(), Some("🔧 Using tool: X (#1)"));
    assert_eq!(done_notice.as_deref(), Some("✅ Task completed!"));
    assert_eq!(interp.session_id(), Some("S"));
    assert_eq!(interp.answer().as_deref(), Some("b"));
    assert_eq!(interp.tools_used(), ["X".to_string()]);
    let usage = interp.usage().unwrap();
    assert_eq!(usage.total(), 15);
}

#[test]
fn segments_concatenate_with_newlines_without_result() {
    let mut interp = StreamInterpreter::new();
    for text in ["hello ", "world"] {
        interp.apply(parse_line(&line(json!({
            "type": "assistant",
            "message": {"content": [{"type": "text", "text": text}]}
        }))));
    }
    assert_eq!(interp.answer().as_deref(), Some("hello \nworld"));
}

#[test]
fn later_init_overwrites_session_id() {
    let mut interp = StreamInterpreter::new();
    interp.apply(parse_line(&line(json!({
        "type": "system", "subtype": "init", "session_id": "first"
    }))));
    interp.apply(parse_line(&line(json!({
        "type": "system", "subtype": "init", "session_id": "second"
    }))));
    assert_eq!(interp.session_id(), Some("second"));
}

#[test]
fn tool_notices_carry_ordinals() {
    let mut interp = StreamInterpreter::new();
    let mut notices = Vec::new();
    for name in ["Read", "Bash", "Read"] {
        let notice = interp.apply(parse_line(&line(json!({
            "type": "assistant",
            "message": {"content": [{"type": "tool_use", "name": name, "id": "t", "input": {}}]}
        }))));
        notices.extend(notice);
    }
    assert_eq!(
        notices,
        [
            "🔧 Using tool: Read (#1)",
            "🔧 Using tool: Bash (#2)",
            "🔧 Using tool: Read (#3)"
        ]
    );
    assert!(interp.answer().is_none());
}

#[test]
fn result_without_text_keeps_segments() {
    let mut interp = StreamInterpreter::new();
    interp.apply(parse_line(&line(json!({
        "type": "assistant",
        "message": {"content": [{"type": "text", "text": "partial"}]}
    }))));
    interp.apply(parse_line(&line(json!({
        "type": "result",
        "usage": {"input_tokens": 3, "output_tokens": 4}
    }))));
    assert_eq!(interp.answer().as_deref(), Some("partial"));
    assert_eq!(interp.usage().unwrap().total(), 7);
}
