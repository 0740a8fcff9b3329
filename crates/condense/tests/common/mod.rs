#![allow(dead_code)]

use condense_transcript::{ContentBlock, Record};
use serde_json::json;

/// A chained conversation where every turn runs one tool round-trip:
/// prompt, tool_use, tool_result, final answer (four records per turn).
pub fn tool_conversation(turns: usize) -> Vec<Record> {
    let mut records = Vec::new();
    let mut parent: Option<String> = None;

    for i in 0..turns {
        let ids = [
            format!("u{i}"),
            format!("a{i}"),
            format!("r{i}"),
            format!("f{i}"),
        ];
        records.push(
            Record::user_text(&ids[0], parent.as_deref(), &format!("question {i}"))
                .with_session("session-1"),
        );
        records.push(
            Record::assistant(
                &ids[1],
                Some(&ids[0]),
                vec![
                    ContentBlock::thinking(format!("planning step {i}")),
                    ContentBlock::tool_use(
                        format!("tool-{i}"),
                        "Bash",
                        json!({"command": format!("cat file{i}.rs")}),
                    ),
                ],
            )
            .with_session("session-1"),
        );
        records.push(
            Record::user_blocks(
                &ids[2],
                Some(&ids[1]),
                vec![ContentBlock::tool_result(format!("tool-{i}"), "line\n".repeat(20))],
            )
            .with_session("session-1"),
        );
        records.push(
            Record::assistant(
                &ids[3],
                Some(&ids[2]),
                vec![ContentBlock::text(format!("answer {i}. ").repeat(30))],
            )
            .with_session("session-1"),
        );
        parent = Some(ids[3].clone());
    }

    records
}

pub fn count_blocks(records: &[Record], kind: &str) -> usize {
    records
        .iter()
        .filter_map(Record::blocks)
        .flatten()
        .filter(|b| b.kind() == kind)
        .count()
}
