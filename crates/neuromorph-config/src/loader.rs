// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NeuromorphConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name searched for on disk
pub const CONFIG_FILE_NAME: &str = "neuromorph.toml";

/// Find the neuromorph configuration file
///
/// Search order:
/// 1. `NEUROMORPH_CONFIG_PATH` environment variable
/// 2. Current working directory: `./neuromorph.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEUROMORPH_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NEUROMORPH_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NEUROMORPH_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuromorphConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NeuromorphConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEUROMORPH_LOG_LEVEL` -> `logging.level`
/// - `NEUROMORPH_LOG_DIR` -> `logging.log_dir`
/// - `NEUROMORPH_STRICT_NAMING` -> `loader.strict_naming`
/// - `NEUROMORPH_ROOT_NAME` -> `loader.root_name`
/// - `NEUROMORPH_DEFAULT_NSEG` -> `loader.default_nseg`
pub fn apply_environment_overrides(config: &mut NeuromorphConfig) {
    if let Ok(value) = env::var("NEUROMORPH_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("NEUROMORPH_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("NEUROMORPH_STRICT_NAMING") {
        config.loader.strict_naming = parse_bool(&value);
    }
    if let Ok(value) = env::var("NEUROMORPH_ROOT_NAME") {
        config.loader.root_name = value;
    }
    if let Ok(value) = env::var("NEUROMORPH_DEFAULT_NSEG") {
        if let Ok(nseg) = value.parse::<u32>() {
            config.loader.default_nseg = nseg;
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognized keys: `log_level`, `log_format`, `log_dir`, `strict_naming`,
/// `root_name`, `default_nseg`.
pub fn apply_cli_overrides(config: &mut NeuromorphConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.log_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("strict_naming") {
        config.loader.strict_naming = parse_bool(value);
    }
    if let Some(value) = cli_args.get("root_name") {
        config.loader.root_name = value.clone();
    }
    if let Some(value) = cli_args.get("default_nseg") {
        if let Ok(nseg) = value.parse::<u32>() {
            config.loader.default_nseg = nseg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: [&str; 5] = [
        "NEUROMORPH_LOG_LEVEL",
        "NEUROMORPH_LOG_DIR",
        "NEUROMORPH_STRICT_NAMING",
        "NEUROMORPH_ROOT_NAME",
        "NEUROMORPH_DEFAULT_NSEG",
    ];

    fn clear_override_vars() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var("NEUROMORPH_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("NEUROMORPH_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();

        env::set_var("NEUROMORPH_CONFIG_PATH", dir.path().join("nope.toml"));
        let result = find_config_file();
        env::remove_var("NEUROMORPH_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(msg)) if msg.contains("nope.toml")));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[loader]").unwrap();
        writeln!(file, "strict_naming = true").unwrap();
        writeln!(file, "section_prefixes = [\"dend\"]").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "format = \"json\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert!(config.loader.strict_naming);
        assert_eq!(config.loader.section_prefixes, vec!["dend".to_string()]);
        assert_eq!(config.loader.root_name, "soma");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[loader\nstrict_naming = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = NeuromorphConfig::default();

        env::set_var("NEUROMORPH_LOG_LEVEL", "debug");
        env::set_var("NEUROMORPH_STRICT_NAMING", "YES");
        env::set_var("NEUROMORPH_DEFAULT_NSEG", "3");
        env::set_var("NEUROMORPH_ROOT_NAME", "cell_body");

        apply_environment_overrides(&mut config);
        clear_override_vars();

        assert_eq!(config.logging.level, "debug");
        assert!(config.loader.strict_naming);
        assert_eq!(config.loader.default_nseg, 3);
        assert_eq!(config.loader.root_name, "cell_body");
    }

    #[test]
    fn test_unparseable_env_value_is_ignored() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = NeuromorphConfig::default();

        env::set_var("NEUROMORPH_DEFAULT_NSEG", "many");
        apply_environment_overrides(&mut config);
        clear_override_vars();

        assert_eq!(config.loader.default_nseg, 1);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = NeuromorphConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("log_level".to_string(), "trace".to_string());
        cli_args.insert("strict_naming".to_string(), "1".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.logging.level, "trace");
        assert!(config.loader.strict_naming);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();
        writeln!(file, "[loader]").unwrap();
        writeln!(file, "default_nseg = 2").unwrap();

        env::set_var("NEUROMORPH_LOG_LEVEL", "debug");
        env::set_var("NEUROMORPH_DEFAULT_NSEG", "4");

        let mut cli_args = HashMap::new();
        cli_args.insert("log_level".to_string(), "error".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_override_vars();

        // CLI wins for level, env wins for nseg
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.loader.default_nseg, 4);
    }
}
