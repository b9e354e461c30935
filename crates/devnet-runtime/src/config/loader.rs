//! Configuration loading: TOML file first, then environment overrides.

use std::path::Path;

use tracing::info;

use super::{ConfigError, DevnetConfig};

/// Environment variables applied on top of the file.
pub const ENV_OVERRIDES: [&str; 4] = [
    "DN_CHAIN_ID",
    "DN_ETH_CHAIN_ID",
    "DN_EXPOSE_PORTS",
    "DN_NUM_VALIDATORS",
];

/// Load configuration from `path` (defaults when absent) and the process
/// environment.
pub fn load_config(path: Option<&Path>) -> Result<DevnetConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => DevnetConfig::default(),
    };
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn parse_file(path: &Path) -> Result<DevnetConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "loaded devnet config");
    Ok(config)
}

pub(crate) fn apply_overrides<F>(mut config: DevnetConfig, lookup: F) -> Result<DevnetConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(chain_id) = lookup("DN_CHAIN_ID") {
        config.chain.chain_id = chain_id;
    }
    if let Some(value) = lookup("DN_ETH_CHAIN_ID") {
        config.chain.eth_chain_id = parse_override("DN_ETH_CHAIN_ID", value)?;
    }
    if let Some(value) = lookup("DN_EXPOSE_PORTS") {
        config.assembler.expose_ports = match value.to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(ConfigError::InvalidOverride {
                    key: "DN_EXPOSE_PORTS",
                    value,
                })
            }
        };
    }
    if let Some(value) = lookup("DN_NUM_VALIDATORS") {
        config.topology.validators.count = parse_override("DN_NUM_VALIDATORS", value)?;
    }
    Ok(config)
}

fn parse_override<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [chain]
            chain_id = "beacond-80069"

            [topology.validators]
            count = 2
            image = "beacond:local"

            [topology.full_nodes]
            count = 3

            [assembler]
            expose_ports = false
            "#
        )
        .unwrap();

        let config = parse_file(file.path()).unwrap();
        assert_eq!(config.chain.chain_id, "beacond-80069");
        assert_eq!(config.chain.eth_chain_id, 80087);
        assert_eq!(config.topology.validators.count, 2);
        assert_eq!(config.topology.validators.image, "beacond:local");
        assert_eq!(config.topology.full_nodes.count, 3);
        assert_eq!(config.topology.seeds.count, 1);
        assert!(!config.assembler.expose_ports);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[topology.validators]\ncount = \"many\"\n").unwrap();
        assert!(matches!(
            parse_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_overrides(
            DevnetConfig::default(),
            lookup(&[
                ("DN_CHAIN_ID", "beacond-1"),
                ("DN_ETH_CHAIN_ID", "1337"),
                ("DN_EXPOSE_PORTS", "false"),
                ("DN_NUM_VALIDATORS", "7"),
            ]),
        )
        .unwrap();

        assert_eq!(config.chain.chain_id, "beacond-1");
        assert_eq!(config.chain.eth_chain_id, 1337);
        assert!(!config.assembler.expose_ports);
        assert_eq!(config.topology.validators.count, 7);
    }

    #[test]
    fn test_invalid_override() {
        let err = apply_overrides(DevnetConfig::default(), lookup(&[("DN_NUM_VALIDATORS", "x")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOverride {
                key: "DN_NUM_VALIDATORS",
                ..
            }
        ));
    }
}
