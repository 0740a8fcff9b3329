mod common;

use common::{count_blocks, tool_conversation};
use condense_core::{chain_is_intact, fork_session, remove_content, RemovalConfig, ToolMode};
use condense_transcript::{ContentBlock, LogStore, Record, RecordKind};

#[test]
fn test_half_of_four_turns_loses_tools() {
    let records = tool_conversation(4);
    let config = RemovalConfig::new(50, ToolMode::Remove, 0);

    let outcome = remove_content(&records, &config).unwrap();

    assert_eq!(outcome.stats.tool_boundary, 2);
    assert_eq!(outcome.stats.tool_uses_removed, 2);
    assert_eq!(outcome.stats.tool_results_removed, 2);
    // the two later turns keep theirs
    assert_eq!(count_blocks(&outcome.records, "tool_use"), 2);
    assert_eq!(count_blocks(&outcome.records, "tool_result"), 2);
    // thinking kept, so invoking records survive; result-only records go
    assert_eq!(outcome.stats.records_removed, 2);
    assert!(chain_is_intact(&outcome.records));
    assert!(outcome.stats.tokens_after < outcome.stats.tokens_before);
}

#[test]
fn test_full_removal_pairs_every_id() {
    let records = tool_conversation(3);
    let config = RemovalConfig::new(100, ToolMode::Remove, 100);

    let outcome = remove_content(&records, &config).unwrap();

    assert_eq!(count_blocks(&outcome.records, "tool_use"), 0);
    assert_eq!(count_blocks(&outcome.records, "tool_result"), 0);
    assert_eq!(count_blocks(&outcome.records, "thinking"), 0);
    // prompts and answers remain
    assert_eq!(outcome.records.len(), 6);
    assert!(chain_is_intact(&outcome.records));
}

#[test]
fn test_truncate_keeps_structure() {
    let records = tool_conversation(2);
    let config = RemovalConfig::new(100, ToolMode::Truncate, 0);

    let outcome = remove_content(&records, &config).unwrap();

    assert_eq!(outcome.records.len(), records.len());
    assert_eq!(count_blocks(&outcome.records, "tool_use"), 2);
    assert_eq!(count_blocks(&outcome.records, "tool_result"), 2);
    assert!(outcome.stats.tool_blocks_truncated >= 2);
}

#[test]
fn test_fork_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = LogStore::new(dir.path());
    store.write_log("session-1", &tool_conversation(4)).unwrap();

    let records = store.read_log("session-1").unwrap();
    let outcome = remove_content(&records, &RemovalConfig::new(50, ToolMode::Remove, 50)).unwrap();
    let forked = fork_session(&outcome.records, "session-2");
    store.write_log("session-2", &forked).unwrap();

    let reread = store.read_log("session-2").unwrap();
    assert_eq!(reread, forked);
    assert!(reread
        .iter()
        .all(|r| r.session_id.as_deref() == Some("session-2")));
    assert!(reread.iter().all(|r| r.kind != RecordKind::Summary));
    // source log untouched
    assert_eq!(store.read_log("session-1").unwrap(), records);
}

#[test]
fn test_tools_only_in_first_half() {
    let mut records = tool_conversation(2);
    records.push(Record::user_text("u2", Some("f1"), "thanks"));
    records.push(Record::assistant(
        "f2",
        Some("u2"),
        vec![ContentBlock::text("welcome")],
    ));
    records.push(Record::user_text("u3", Some("f2"), "bye"));

    let outcome = remove_content(&records, &RemovalConfig::new(50, ToolMode::Remove, 0)).unwrap();

    assert_eq!(outcome.stats.turns, 4);
    assert_eq!(outcome.stats.tool_uses_removed, 2);
    assert_eq!(count_blocks(&outcome.records, "tool_use"), 0);
    assert_eq!(count_blocks(&outcome.records, "tool_result"), 0);
}
