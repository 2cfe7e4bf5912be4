//! Configuration file loading (`config.toml`).

use cellcalc_engine::engine::{CycleCheck, DEFAULT_MAX_DEPTH, ResolveOptions};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    max_depth: Option<usize>,
    cycle_check: Option<CycleCheck>,
    log_level: Option<String>,
    store: Option<PathBuf>,
}

/// Effective settings after applying the config file over defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub options: ResolveOptions,
    pub log_level: String,
    /// Sheet file used when `--store` is not given
    pub store: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: ResolveOptions::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            store: None,
        }
    }
}

/// Load configuration from `config_file`, or from the user config dir.
/// Problems are returned as warnings and the defaults are kept.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (Config::default(), warnings);
        }
    };

    match parse_config(&content) {
        Ok((config, mut parse_warnings)) => {
            warnings.append(&mut parse_warnings);
            (config, warnings)
        }
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", path.display(), err));
            (Config::default(), warnings)
        }
    }
}

/// Parse config text. Out-of-range values fall back to defaults with a warning.
pub fn parse_config(content: &str) -> Result<(Config, Vec<String>), toml::de::Error> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut warnings = Vec::new();
    let mut config = Config::default();

    match file.max_depth {
        Some(0) => warnings.push(format!(
            "max_depth must be at least 1, using {}",
            DEFAULT_MAX_DEPTH
        )),
        Some(depth) => config.options.max_depth = depth,
        None => {}
    }
    if let Some(check) = file.cycle_check {
        config.options.cycle_check = check;
    }
    if let Some(level) = file.log_level.map(|l| l.trim().to_string())
        && !level.is_empty()
    {
        config.log_level = level;
    }
    config.store = file.store;

    Ok((config, warnings))
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellcalc")?;
    Some(proj.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
max_depth = 16
cycle_check = "root"
log_level = "debug"
store = "/tmp/sheets.cells"
"#;
        let (config, warnings) = parse_config(content).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.options.max_depth, 16);
        assert_eq!(config.options.cycle_check, CycleCheck::Root);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.store, Some(PathBuf::from("/tmp/sheets.cells")));
    }

    #[test]
    fn test_zero_depth_is_ignored_with_warning() {
        let (config, warnings) = parse_config("max_depth = 0").unwrap();
        assert_eq!(config.options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config("colour = \"red\"").is_err());
        assert!(parse_config("cycle_check = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join(format!(
            "cellcalc_missing_config_{}.toml",
            std::process::id()
        ));
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
    }
}
