use crate::cli::ConfigCommands;
use crate::config::LottoConfig;
use anyhow::Result;
use std::path::Path;

pub async fn run(cmd: ConfigCommands, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Validate => validate(config_path),
        ConfigCommands::Show => show(config_path),
    }
}

fn validate(config_path: &Path) -> Result<()> {
    let config = LottoConfig::load(config_path)
        .map_err(|e| anyhow::anyhow!("❌ Failed to parse {}: {}", config_path.display(), e))?;

    let errors = config.validate();
    if !errors.is_empty() {
        println!("❌ Validation errors in {}:", config_path.display());
        for e in &errors {
            println!("  - {}", e);
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    println!("✅ {} is valid.", config_path.display());
    Ok(())
}

fn show(config_path: &Path) -> Result<()> {
    let config = LottoConfig::load_or_default(config_path);
    let text = toml::to_string_pretty(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_good_and_bad_files() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "[cache]\nttl_secs = 60").unwrap();
        assert!(run(ConfigCommands::Validate, good.path()).await.is_ok());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[resolver]\nmax_span = 0").unwrap();
        assert!(run(ConfigCommands::Validate, bad.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_validate_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(ConfigCommands::Validate, &dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[tokio::test]
    async fn test_show_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(ConfigCommands::Show, &dir.path().join("absent.toml")).await.is_ok());
    }
}
