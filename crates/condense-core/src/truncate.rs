//! Payload truncation for tool blocks kept in truncate mode

use serde_json::Value;

pub const MAX_LINES: usize = 3;
pub const MAX_CHARS: usize = 250;
pub const TRUNCATION_MARKER: &str = "\n[... truncated]";

/// Shorten text to at most [`MAX_LINES`] lines and [`MAX_CHARS`] characters,
/// followed by the marker. `None` when the text already fits.
pub fn truncate_text(text: &str) -> Option<String> {
    let mut head = text;

    if let Some((pos, _)) = text.match_indices('\n').nth(MAX_LINES - 1) {
        if !text[pos + 1..].is_empty() {
            head = &text[..pos];
        }
    }

    if let Some((pos, _)) = head.char_indices().nth(MAX_CHARS) {
        head = &head[..pos];
    }

    if head.len() == text.len() {
        return None;
    }

    let truncated = format!("{head}{TRUNCATION_MARKER}");
    if truncated == text {
        None
    } else {
        Some(truncated)
    }
}

/// Truncate every string leaf of a JSON value (tool inputs)
pub fn truncate_json(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => truncate_text(s).map(Value::String),
        Value::Array(items) => {
            let mut changed = false;
            let items = items
                .iter()
                .map(|item| match truncate_json(item) {
                    Some(v) => {
                        changed = true;
                        v
                    }
                    None => item.clone(),
                })
                .collect();
            changed.then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let mut changed = false;
            let map = map
                .iter()
                .map(|(k, v)| match truncate_json(v) {
                    Some(new) => {
                        changed = true;
                        (k.clone(), new)
                    }
                    None => (k.clone(), v.clone()),
                })
                .collect();
            changed.then_some(Value::Object(map))
        }
        _ => None,
    }
}

/// Truncate a tool result's output: the string itself, or each nested text
/// block. Nested images and other blocks are left alone.
pub fn truncate_tool_output(content: &Value) -> Option<Value> {
    match content {
        Value::String(s) => truncate_text(s).map(Value::String),
        Value::Array(items) => {
            let mut changed = false;
            let items = items
                .iter()
                .map(|item| {
                    let is_text = item.get("type").and_then(Value::as_str) == Some("text");
                    let truncated = if is_text {
                        item.get("text")
                            .and_then(Value::as_str)
                            .and_then(truncate_text)
                    } else {
                        None
                    };
                    match truncated {
                        Some(text) => {
                            changed = true;
                            let mut item = item.clone();
                            item["text"] = Value::String(text);
                            item
                        }
                        None => item.clone(),
                    }
                })
                .collect();
            changed.then_some(Value::Array(items))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_text("one\ntwo\nthree"), None);
        assert_eq!(truncate_text("one\ntwo\nthree\n"), None);
        assert_eq!(truncate_text(&"x".repeat(MAX_CHARS)), None);
    }

    #[test]
    fn test_line_limit() {
        let out = truncate_text("1\n2\n3\n4\n5").unwrap();
        assert_eq!(out, format!("1\n2\n3{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_char_limit() {
        let out = truncate_text(&"y".repeat(1000)).unwrap();
        assert_eq!(out.len(), MAX_CHARS + TRUNCATION_MARKER.len());
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let once = truncate_text(&"line\n".repeat(20)).unwrap();
        assert_eq!(truncate_text(&once), None);
        let once = truncate_text(&"z".repeat(600)).unwrap();
        assert_eq!(truncate_text(&once), None);
    }

    #[test]
    fn test_multibyte_boundary() {
        let out = truncate_text(&"é".repeat(300)).unwrap();
        assert_eq!(out.chars().count(), MAX_CHARS + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn test_json_leaves() {
        let input = json!({"command": "a\nb\nc\nd\ne", "timeout": 5, "path": "short"});
        let out = truncate_json(&input).unwrap();
        assert_eq!(out["command"], format!("a\nb\nc{TRUNCATION_MARKER}"));
        assert_eq!(out["timeout"], 5);
        assert_eq!(out["path"], "short");
        assert_eq!(truncate_json(&json!({"path": "short"})), None);
    }

    #[test]
    fn test_tool_output_nested_blocks() {
        let content = json!([
            {"type": "text", "text": "x".repeat(400)},
            {"type": "image", "source": {"data": "y".repeat(400)}}
        ]);
        let out = truncate_tool_output(&content).unwrap();
        assert!(out[0]["text"].as_str().unwrap().ends_with(TRUNCATION_MARKER));
        assert_eq!(out[1], content[1]);
    }
}
