use clap::Parser;
use dupescan::cli::Cli;
use dupescan::config::{Config, ConfigError};
use dupescan::scanner::{DigestFunction, SymlinkPolicy};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
recursive = true
all_files = true
symlinks = "args-only"
excess = true
header_format = ""
digest = "sha512"
thorough = true
sample_limit = 65536
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert!(config.recursive);
    assert!(config.all_files);
    assert_eq!(config.symlinks, SymlinkPolicy::ArgsOnly);
    assert!(config.excess);
    assert!(config.header_format.is_empty());
    assert_eq!(config.digest, DigestFunction::Sha512);
    assert!(config.thorough);
    assert_eq!(config.sample_limit, 65_536);
    // Unset keys keep their defaults.
    assert!(!config.physical);
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "ignore_empty = false\nsample_limit = 10\n").unwrap();

    std::env::set_var("DUPESCAN_IGNORE_EMPTY", "true");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed("DUPESCAN_"));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("DUPESCAN_IGNORE_EMPTY");

    assert!(config.ignore_empty);
    assert_eq!(config.sample_limit, 10);
}

#[test]
fn test_config_cli_has_final_say() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "digest = \"sha256\"\nheader_format = \"%n\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "dupescan",
        "--config",
        config_path.to_str().unwrap(),
        "-d",
        "blake3",
        "-r",
    ])
    .unwrap();
    let config = Config::load(&cli).unwrap();

    assert_eq!(config.digest, DigestFunction::Blake3);
    assert_eq!(config.header_format, "%n");
    assert!(config.recursive);
}

#[test]
fn test_config_missing_explicit_file() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    let cli = Cli::try_parse_from(["dupescan", "--config", missing.to_str().unwrap()]).unwrap();
    let err = Config::load(&cli).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(_)));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "symlinks = \"sometimes\"").unwrap();

    let cli = Cli::try_parse_from(["dupescan", "--config", config_path.to_str().unwrap()]).unwrap();
    assert!(matches!(Config::load(&cli), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_save_toml_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config = Config {
        physical: true,
        symlinks: SymlinkPolicy::Always,
        ..Default::default()
    };
    fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("physical = true"));
    assert!(saved.contains("symlinks = \"always\""));
}
