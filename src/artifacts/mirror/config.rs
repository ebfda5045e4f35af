use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted mirror settings (`.bak/mirror.yml`)
///
/// Written after the first successful sync so scheduled runs can be invoked
/// with no arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub destination: PathBuf,
}

impl MirrorConfig {
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read mirror config {}", path.display()))?;
        let config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid mirror config {}", path.display()))?;

        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = serde_yaml::to_string(self).context("Unable to serialize mirror config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Unable to write mirror config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = assert_fs::TempDir::new().unwrap();
        let loaded = MirrorConfig::load(&dir.path().join("mirror.yml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn destination_roundtrips_through_disk() {
        let dir = assert_fs::TempDir::new().unwrap();
        let config_path = dir.path().join("mirror.yml");

        let config = MirrorConfig {
            destination: PathBuf::from("/mnt/mirror"),
        };
        config.save(&config_path).unwrap();

        let loaded = MirrorConfig::load(&config_path).unwrap().unwrap();
        assert_eq!(loaded.destination, config.destination);
    }
}
