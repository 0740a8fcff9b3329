//! Transcript record types
//!
//! One [`Record`] per JSONL line. The fields the pipeline reasons about are
//! typed; everything else rides along in `extra` and is written back verbatim.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record discriminator (`type` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "file-history-snapshot")]
    Snapshot,
    #[serde(rename = "queue-operation")]
    QueueOperation,
    #[serde(rename = "system")]
    System,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Assistant => "assistant",
            RecordKind::Summary => "summary",
            RecordKind::Snapshot => "file-history-snapshot",
            RecordKind::QueueOperation => "queue-operation",
            RecordKind::System => "system",
        }
    }
}

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A typed fragment of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Thinking {
        thinking: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    RedactedThinking {
        #[serde(default)]
        data: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ToolResult {
        tool_use_id: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        content: Value,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Image {
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }

    pub fn thinking(thinking: impl Into<String>) -> Self {
        ContentBlock::Thinking {
            thinking: thinking.into(),
            extra: Map::new(),
        }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
            extra: Map::new(),
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, output: impl Into<String>) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: Value::String(output.into()),
            extra: Map::new(),
        }
    }

    pub fn image(media_type: &str, data: &str) -> Self {
        let mut extra = Map::new();
        extra.insert(
            "source".to_string(),
            serde_json::json!({"type": "base64", "media_type": media_type, "data": data}),
        );
        ContentBlock::Image { extra }
    }

    /// The wire tag of this block
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Thinking { .. } => "thinking",
            ContentBlock::RedactedThinking { .. } => "redacted_thinking",
            ContentBlock::ToolUse { .. } => "tool_use",
            ContentBlock::ToolResult { .. } => "tool_result",
            ContentBlock::Image { .. } => "image",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentBlock::Text { .. })
    }

    /// Thinking and redacted thinking
    pub fn is_reasoning(&self) -> bool {
        matches!(
            self,
            ContentBlock::Thinking { .. } | ContentBlock::RedactedThinking { .. }
        )
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, ContentBlock::ToolResult { .. })
    }

    pub fn is_tool_block(&self) -> bool {
        matches!(
            self,
            ContentBlock::ToolUse { .. } | ContentBlock::ToolResult { .. }
        )
    }
}

/// Message content: either a bare string or an ordered block list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match self {
            MessageContent::Blocks(blocks) => Some(blocks),
            MessageContent::Text(_) => None,
        }
    }

    /// True for string content and for block lists holding a `text` block
    pub fn has_text(&self) -> bool {
        match self {
            MessageContent::Text(_) => true,
            MessageContent::Blocks(blocks) => blocks.iter().any(ContentBlock::is_text),
        }
    }

    pub fn has_tool_result(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Blocks(blocks) => blocks.iter().any(ContentBlock::is_tool_result),
        }
    }

    /// The textual portion: the string itself, or text blocks joined by a blank line
    pub fn text(&self) -> Option<String> {
        match self {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Blocks(blocks) => {
                let parts: Vec<&str> = blocks.iter().filter_map(ContentBlock::as_text).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n\n"))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self {
            role,
            content,
            extra: Map::new(),
        }
    }
}

/// One line of a session transcript
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub parent_uuid: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_meta: Option<bool>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// `parentUuid` is written as null on chained records, omitted elsewhere.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if self.uuid.is_some() || self.parent_uuid.is_some() {
            map.serialize_entry("parentUuid", &self.parent_uuid)?;
        }
        if let Some(is_meta) = self.is_meta {
            map.serialize_entry("isMeta", &is_meta)?;
        }
        if let Some(session_id) = &self.session_id {
            map.serialize_entry("sessionId", session_id)?;
        }
        map.serialize_entry("type", &self.kind)?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        if let Some(uuid) = &self.uuid {
            map.serialize_entry("uuid", uuid)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Record {
    /// Bare record of the given kind, no identity and no message
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            uuid: None,
            parent_uuid: None,
            session_id: None,
            is_meta: None,
            message: None,
            extra: Map::new(),
        }
    }

    /// User record with plain string content
    pub fn user_text(uuid: &str, parent: Option<&str>, text: &str) -> Self {
        Self::new(RecordKind::User)
            .with_identity(uuid, parent)
            .with_message(Role::User, MessageContent::Text(text.to_string()))
    }

    /// User record with block content
    pub fn user_blocks(uuid: &str, parent: Option<&str>, blocks: Vec<ContentBlock>) -> Self {
        Self::new(RecordKind::User)
            .with_identity(uuid, parent)
            .with_message(Role::User, MessageContent::Blocks(blocks))
    }

    /// Assistant record with block content
    pub fn assistant(uuid: &str, parent: Option<&str>, blocks: Vec<ContentBlock>) -> Self {
        Self::new(RecordKind::Assistant)
            .with_identity(uuid, parent)
            .with_message(Role::Assistant, MessageContent::Blocks(blocks))
    }

    pub fn with_identity(mut self, uuid: &str, parent: Option<&str>) -> Self {
        self.uuid = Some(uuid.to_string());
        self.parent_uuid = parent.map(str::to_string);
        self
    }

    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn with_meta(mut self, is_meta: bool) -> Self {
        self.is_meta = Some(is_meta);
        self
    }

    pub fn with_message(mut self, role: Role, content: MessageContent) -> Self {
        self.message = Some(Message::new(role, content));
        self
    }

    /// Copy of this record with its message content swapped out
    pub fn with_content(&self, content: MessageContent) -> Self {
        let mut record = self.clone();
        if let Some(message) = record.message.as_mut() {
            message.content = content;
        }
        record
    }

    pub fn is_meta(&self) -> bool {
        self.is_meta.unwrap_or(false)
    }

    pub fn content(&self) -> Option<&MessageContent> {
        self.message.as_ref().map(|m| &m.content)
    }

    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        self.content().and_then(MessageContent::blocks)
    }

    pub fn text(&self) -> Option<String> {
        self.content().and_then(MessageContent::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSISTANT_LINE: &str = r#"{"parentUuid":"u1","isSidechain":false,"sessionId":"s1","type":"assistant","message":{"id":"msg_1","role":"assistant","model":"claude","content":[{"type":"thinking","thinking":"hmm","signature":"sig"},{"type":"text","text":"hi"},{"type":"tool_use","id":"toolu_1","name":"Read","input":{"file_path":"a.rs"}}]},"uuid":"a1","timestamp":"2025-01-01T00:00:00Z"}"#;

    #[test]
    fn test_parse_assistant_record() {
        let record: Record = serde_json::from_str(ASSISTANT_LINE).unwrap();
        assert_eq!(record.kind, RecordKind::Assistant);
        assert_eq!(record.uuid.as_deref(), Some("a1"));
        assert_eq!(record.parent_uuid.as_deref(), Some("u1"));
        assert_eq!(record.session_id.as_deref(), Some("s1"));
        assert!(!record.is_meta());

        let blocks = record.blocks().unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].is_reasoning());
        assert_eq!(blocks[1].as_text(), Some("hi"));
        assert_eq!(blocks[2].kind(), "tool_use");
    }

    #[test]
    fn test_unknown_fields_survive() {
        let record: Record = serde_json::from_str(ASSISTANT_LINE).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "2025-01-01T00:00:00Z");
        assert_eq!(json["isSidechain"], false);
        assert_eq!(json["message"]["model"], "claude");
        assert_eq!(json["message"]["content"][0]["signature"], "sig");
        assert_eq!(json["message"]["content"][2]["input"]["file_path"], "a.rs");
    }

    #[test]
    fn test_parent_uuid_null_kept_on_chain_root() {
        let line = r#"{"parentUuid":null,"type":"user","message":{"role":"user","content":"hello"},"uuid":"u1"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.parent_uuid, None);
        let out = serde_json::to_string(&record).unwrap();
        assert!(out.contains(r#""parentUuid":null"#));
    }

    #[test]
    fn test_snapshot_has_no_chain_fields() {
        let line = r#"{"type":"file-history-snapshot","messageId":"m1","snapshot":{},"isSnapshotUpdate":false}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.kind, RecordKind::Snapshot);
        assert!(record.uuid.is_none());
        let out = serde_json::to_string(&record).unwrap();
        assert!(!out.contains("parentUuid"));
        assert!(out.contains("messageId"));
    }

    #[test]
    fn test_tool_result_with_nested_blocks() {
        let line = r#"{"parentUuid":"a1","type":"user","message":{"role":"user","content":[{"tool_use_id":"toolu_1","type":"tool_result","content":[{"type":"text","text":"file body"}],"is_error":false}]},"uuid":"u2"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        let content = record.content().unwrap();
        assert!(content.has_tool_result());
        assert!(!content.has_text());
        match &record.blocks().unwrap()[0] {
            ContentBlock::ToolResult {
                tool_use_id, extra, ..
            } => {
                assert_eq!(tool_use_id, "toolu_1");
                assert_eq!(extra["is_error"], false);
            }
            other => panic!("expected tool_result, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let line = r#"{"type":"mystery","uuid":"x"}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn test_message_text_joins_blocks() {
        let content = MessageContent::Blocks(vec![
            ContentBlock::text("one"),
            ContentBlock::tool_use("t1", "Bash", serde_json::json!({})),
            ContentBlock::text("two"),
        ]);
        assert_eq!(content.text().as_deref(), Some("one\n\ntwo"));
        assert_eq!(MessageContent::Blocks(vec![]).text(), None);
    }
}
