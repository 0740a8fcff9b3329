pub fn run() -> anyhow::Result<()> {
    println!("condense {}", env!("CARGO_PKG_VERSION"));
    println!("Removal and compression of Claude Code session logs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
