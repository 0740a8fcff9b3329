use condense_core::{chain_is_intact, identify_turns};
use condense_transcript::{estimate_record_tokens, Record};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(session: &str, dir: Option<&Path>) -> anyhow::Result<()> {
    let store = super::open_store(dir)?;
    let records = store.read_log(session)?;
    println!("{}", describe(session, &records));
    Ok(())
}

fn describe(session: &str, records: &[Record]) -> serde_json::Value {
    let turns = identify_turns(records);

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *kinds.entry(record.kind.as_str()).or_default() += 1;
    }

    let per_turn: Vec<serde_json::Value> = turns
        .iter()
        .map(|turn| {
            let tokens: usize = records[turn.range()].iter().map(estimate_record_tokens).sum();
            serde_json::json!({
                "turn": turn.index,
                "records": turn.len(),
                "tokens": tokens,
            })
        })
        .collect();

    serde_json::json!({
        "session": session,
        "records": records.len(),
        "turns": turns.len(),
        "tokens": records.iter().map(estimate_record_tokens).sum::<usize>(),
        "kinds": kinds,
        "chain_intact": chain_is_intact(records),
        "per_turn": per_turn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use condense_transcript::ContentBlock;

    #[test]
    fn test_describe_counts() {
        let records = vec![
            Record::user_text("u1", None, &"x".repeat(40)),
            Record::assistant("a1", Some("u1"), vec![ContentBlock::text("y".repeat(8))]),
            Record::user_text("u2", Some("a1"), "next"),
        ];
        let out = describe("s", &records);

        assert_eq!(out["records"], 3);
        assert_eq!(out["turns"], 2);
        assert_eq!(out["tokens"], 13);
        assert_eq!(out["kinds"]["user"], 2);
        assert_eq!(out["kinds"]["assistant"], 1);
        assert_eq!(out["chain_intact"], true);
        assert_eq!(out["per_turn"][0]["records"], 2);
        assert_eq!(out["per_turn"][0]["tokens"], 12);
    }
}
