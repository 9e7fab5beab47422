use super::types::*;
use crate::config::{env_var_pattern, expand_env_vars, expand_tilde};
use crate::resolver::NameResolver;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// S3 refuses presigned URLs that live longer than a week
const MAX_LINK_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Read, expand and validate the config file at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })?;

    // Syntax errors carry the file name so `serve` output points at it
    parse_config(&text).map_err(|e| match e {
        ConfigError::YamlParse(source) => ConfigError::Validation(format!(
            "{} is not valid config YAML: {}",
            path.display(),
            source
        )),
        other => other,
    })
}

/// Parse and validate a config from YAML text
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    let yaml = expand_env_vars(yaml);
    reject_unset_vars(&yaml)?;

    let mut config: Config = serde_yaml::from_str(&yaml)?;
    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Any `$env{NAME}` left after expansion names a variable that is not set.
/// Placeholders inside YAML comments are ignored.
fn reject_unset_vars(yaml: &str) -> Result<(), ConfigError> {
    let mut missing: Vec<&str> = yaml
        .lines()
        .map(strip_comment)
        .flat_map(|line| env_var_pattern().captures_iter(line))
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect();
    missing.sort_unstable();
    missing.dedup();

    match missing.as_slice() {
        [] => Ok(()),
        [name] => Err(ConfigError::Validation(format!(
            "$env{{{name}}} is referenced but {name} is not set. \
             Export it (export {name}=...) or write the value into the config file"
        ))),
        names => Err(ConfigError::Validation(format!(
            "config references unset environment variables: {}. \
             Export them or write the values into the config file",
            names.join(", ")
        ))),
    }
}

/// The part of a YAML line before a `#` comment. A `#` only starts a comment
/// at the beginning of the line or after whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

fn expand_paths(config: &mut Config) {
    if let Some(AuthConfig::Duckdb { path }) = config.auth.as_mut() {
        *path = expand_tilde(path);
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.logs.max_entries == 0 {
        errors.push("logs.max_entries must be greater than zero".to_string());
    }
    if config.logs.max_pages == 0 {
        errors.push("logs.max_pages must be greater than zero".to_string());
    }

    if let Some(publish) = &config.publish {
        if publish.bucket.trim().is_empty() {
            errors.push("publish.bucket cannot be empty".to_string());
        }
        if publish.link_ttl.is_zero() || publish.link_ttl > MAX_LINK_TTL {
            errors.push(format!(
                "publish.link_ttl must be between 1s and 7 days, got {}s",
                publish.link_ttl.as_secs()
            ));
        }
    }

    if let Some(AuthConfig::Static { super_users }) = &config.auth {
        if super_users.iter().any(|id| id.is_nil()) {
            errors.push("auth.super_users cannot contain the nil UUID".to_string());
        }
    }

    if config.web.listen.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "web.listen '{}' is not a valid socket address",
            config.web.listen
        ));
    }

    if let Err(e) = NameResolver::from_config(config.mappings.as_deref()) {
        errors.push(format!("mappings: {}", e));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

/// The sections only the HTTP service needs, or every one that is missing
pub fn validate_for_serving(config: &Config) -> Result<(&PublishConfig, &AuthConfig), ConfigError> {
    match (&config.publish, &config.auth) {
        (Some(publish), Some(auth)) => Ok((publish, auth)),
        (publish, auth) => {
            let mut errors = Vec::new();
            if publish.is_none() {
                errors.push("'publish' section is required to serve requests".to_string());
            }
            if auth.is_none() {
                errors.push("'auth' section is required to serve requests".to_string());
            }
            Err(ConfigError::ValidationList(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
aws:
  region: af-south-1
logs:
  max_entries: 500
  max_pages: 5
publish:
  bucket: reports-bucket
  link_ttl: 30m
auth:
  backend: static
  super_users:
    - 6f1c1f7e-1d2a-4a44-9a53-2b1b8f4b3f10
web:
  listen: 127.0.0.1:9000
mappings:
  - category: jobs
    name: Nightly
    group: /ecs/nightly
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL).unwrap();

        assert_eq!(config.aws.region.as_deref(), Some("af-south-1"));
        assert_eq!(config.logs.max_entries, 500);
        assert_eq!(config.logs.max_pages, 5);

        let publish = config.publish.unwrap();
        assert_eq!(publish.bucket, "reports-bucket");
        assert_eq!(publish.key_prefix, "log-reports");
        assert_eq!(publish.link_ttl, Duration::from_secs(1800));

        assert!(matches!(config.auth, Some(AuthConfig::Static { ref super_users }) if super_users.len() == 1));
        assert_eq!(config.web.listen, "127.0.0.1:9000");
        assert_eq!(config.mappings.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("{}").unwrap();

        assert_eq!(config.logs.max_entries, 10_000);
        assert_eq!(config.logs.max_pages, 50);
        assert_eq!(config.web.listen, "0.0.0.0:8080");
        assert!(config.publish.is_none());
        assert!(config.mappings.is_none());
        assert!(validate_for_serving(&config).is_err());
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let yaml = r#"
logs:
  max_entries: 0
publish:
  bucket: ""
  link_ttl: 8days
web:
  listen: not-an-address
"#;
        match parse_config(yaml) {
            Err(ConfigError::ValidationList(errors)) => {
                assert_eq!(errors.len(), 4, "{errors:?}");
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_mappings_rejected() {
        let yaml = r#"
mappings:
  - { category: jobs, name: Nightly, group: /a }
  - { category: JOBS, name: nightly, group: /b }
"#;
        let err = parse_config(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate mapping"));
    }

    #[test]
    fn test_unset_env_var_is_reported() {
        let yaml = "publish:\n  bucket: $env{LOGSHARE_TEST_SURELY_UNSET}\n";
        let err = parse_config(yaml).unwrap_err();
        assert!(err.to_string().contains("LOGSHARE_TEST_SURELY_UNSET"));
    }

    #[test]
    fn test_commented_placeholder_needs_no_variable() {
        let yaml = "# bucket may be $env{LOGSHARE_TEST_SURELY_UNSET}\n\
                    publish:\n  bucket: reports # or $env{LOGSHARE_TEST_ALSO_UNSET}\n";

        let config = parse_config(yaml).unwrap();

        assert_eq!(config.publish.unwrap().bucket, "reports");
    }

    #[test]
    fn test_placeholder_after_inline_hash_is_still_checked() {
        let yaml = "publish:\n  bucket: a#$env{LOGSHARE_TEST_SURELY_UNSET}\n";

        let err = parse_config(yaml).unwrap_err();

        assert!(err.to_string().contains("LOGSHARE_TEST_SURELY_UNSET"));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("# heading"), "");
        assert_eq!(strip_comment("  bucket: x # note"), "  bucket: x ");
        assert_eq!(strip_comment("url: http://h/#frag"), "url: http://h/#frag");
    }

    #[test]
    fn test_duckdb_path_tilde_expanded() {
        let config = parse_config("auth:\n  backend: duckdb\n  path: ~/users.duckdb\n").unwrap();

        match config.auth {
            Some(AuthConfig::Duckdb { path }) => {
                if let Some(home) = dirs::home_dir() {
                    assert_eq!(path, home.join("users.duckdb"));
                }
            }
            other => panic!("unexpected auth config: {other:?}"),
        }
    }

    #[test]
    fn test_load_config_reports_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "logs: [not, a, map]\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("config.yml"));
    }
}
