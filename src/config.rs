//! Implementation of the configuration module.

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use fluxboot_rm::ManagerKind;
use serde::Deserialize;
use serde::Serialize;

/// Represents the configuration for the fluxboot CLI tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields, default)]
pub struct Config {
    /// Configuration for resource manager selection and the backends.
    #[serde(rename = "manager")]
    pub manager_config: fluxboot_rm::Config,
}

impl Config {
    /// Validate a configuration.
    pub fn validate(&self) -> Result<()> {
        self.manager_config
            .validate()
            .context("invalid `manager` configuration")
    }

    /// Read a configuration file from the specified path.
    pub fn read_config(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| {
            format!(
                "failed to read config file `{path}`",
                path = path.display()
            )
        })?;
        let config: Self = toml::from_str(&text).with_context(|| {
            format!(
                "failed to parse config file `{path}`",
                path = path.display()
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Gets the resource manager configuration.
    ///
    /// A manager given on the command line overrides the configured one.
    pub fn manager_for(&self, kind: Option<ManagerKind>) -> fluxboot_rm::Config {
        let mut config = self.manager_config.clone();
        if kind.is_some() {
            config.kind = kind;
        }
        config
    }
}

#[cfg(test)]
mod test {
    use fluxboot_rm::config::SlurmSubmitMode;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.manager_for(None), fluxboot_rm::Config::default());
    }

    #[test]
    fn read() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"
[manager]
kind = "slurm"

[manager.slurm]
mode = "interactive"
srun = "/opt/slurm/bin/srun"
extra_args = ["--exclusive"]
"#,
        )
        .unwrap();

        let config = Config::read_config(file.path()).unwrap();
        assert_eq!(config.manager_config.kind, Some(ManagerKind::Slurm));
        assert_eq!(config.manager_config.slurm.mode, SlurmSubmitMode::Interactive);
        assert_eq!(config.manager_config.slurm.srun, "/opt/slurm/bin/srun");
        assert_eq!(config.manager_config.slurm.sbatch, "sbatch");

        assert_eq!(config.manager_for(None), config.manager_config);
        let manager = config.manager_for(Some(ManagerKind::Lsf));
        assert_eq!(manager.kind, Some(ManagerKind::Lsf));
        assert_eq!(manager.slurm.extra_args, ["--exclusive"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(toml::from_str::<Config>("[slurm]\nmode = \"batch\"\n").is_err());
        assert!(toml::from_str::<Config>("[manager.slurm]\nqueue = \"debug\"\n").is_err());
        assert!(toml::from_str::<Config>("[manager]\nkind = \"pbs\"\n").is_err());
    }

    #[test]
    fn rejects_invalid() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[manager.slurm]\ntimeout_secs = 0\n").unwrap();
        let e = Config::read_config(file.path()).unwrap_err();
        assert!(format!("{e:?}").contains("timeout_secs"));

        assert!(Config::read_config("/this/config/does/not/exist.toml").is_err());
    }
}
