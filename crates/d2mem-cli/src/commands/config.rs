//! Init-config command: write the built-in target configuration to a file.

use std::path::Path;

use anyhow::{Result, bail};
use d2mem_core::TargetConfig;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    TargetConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d2mem.json");

        run(&path, false).unwrap();
        assert_eq!(TargetConfig::load(&path).unwrap(), TargetConfig::default());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d2mem.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(run(&path, false).is_err());
        run(&path, true).unwrap();
    }
}
