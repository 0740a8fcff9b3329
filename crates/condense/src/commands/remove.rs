use crate::cli::{RemovalArgs, TargetArgs};
use condense_core::{remove_content, RemovalStats};

pub fn run(session: &str, args: &RemovalArgs, target: &TargetArgs) -> anyhow::Result<()> {
    let store = super::open_store(target.dir.as_deref())?;
    let records = store.read_log(session)?;

    let config = args.config();
    let outcome = remove_content(&records, &config)?;

    if target.dry_run {
        println!("dry run: {}", summary(&outcome.stats));
        return Ok(());
    }

    let new_session = super::write_fork(&store, &outcome.records)?;
    println!("{new_session}");
    println!("{}", summary(&outcome.stats));
    Ok(())
}

pub fn summary(stats: &RemovalStats) -> String {
    format!(
        "{} turns; tools {} turns ({} uses, {} results removed, {} truncated); \
         thinking {} turns ({} removed); {} records dropped; {} -> {} tokens",
        stats.turns,
        stats.tool_boundary,
        stats.tool_uses_removed,
        stats.tool_results_removed,
        stats.tool_blocks_truncated,
        stats.thinking_boundary,
        stats.thinking_removed,
        stats.records_removed,
        stats.tokens_before,
        stats.tokens_after
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use condense_core::ToolMode;
    use condense_transcript::{ContentBlock, LogStore, Record};
    use serde_json::json;

    fn seed(store: &LogStore) {
        let records = vec![
            Record::user_text("u1", None, "list files").with_session("s"),
            Record::assistant(
                "a1",
                Some("u1"),
                vec![ContentBlock::tool_use("t1", "Bash", json!({"command": "ls"}))],
            )
            .with_session("s"),
            Record::user_blocks("r1", Some("a1"), vec![ContentBlock::tool_result("t1", "a\nb")])
                .with_session("s"),
            Record::assistant("a2", Some("r1"), vec![ContentBlock::text("two files")])
                .with_session("s"),
        ];
        store.write_log("s", &records).unwrap();
    }

    #[test]
    fn test_remove_writes_fork_and_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        seed(&store);

        let args = RemovalArgs {
            tool_removal: 100,
            tool_mode: ToolMode::Remove,
            thinking_removal: 0,
        };
        let target = TargetArgs {
            dir: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        run("s", &args, &target).unwrap();

        let logs: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(logs.len(), 2);
        assert_eq!(store.read_log("s").unwrap().len(), 4);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path());
        seed(&store);

        let target = TargetArgs {
            dir: Some(dir.path().to_path_buf()),
            dry_run: true,
        };
        let args = RemovalArgs {
            tool_removal: 100,
            ..Default::default()
        };
        run("s", &args, &target).unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_out_of_range_percent_fails() {
        let dir = tempfile::tempdir().unwrap();
        seed(&LogStore::new(dir.path()));
        let args = RemovalArgs {
            tool_removal: 150,
            ..Default::default()
        };
        let target = TargetArgs {
            dir: Some(dir.path().to_path_buf()),
            dry_run: false,
        };
        assert!(run("s", &args, &target).is_err());
    }
}
