//! Tests for configuration discovery

use ctx_core::config::DEFAULT_CONFIG_TEMPLATE;
use ctx_core::{Config, ConfigResolver, ConfigSource, Error};
use ctx_test_utils::Workspace;
use ctx_test_utils::tree::write_file;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn resolver(ws: &Workspace) -> ConfigResolver {
    ConfigResolver::new()
        .with_config_dir(ws.config_dir())
        .with_home_dir(ws.home())
        .with_current_dir(ws.project())
        .with_env(HashMap::<String, String>::new())
}

#[test]
fn test_template_parses_to_defaults() {
    let ws = Workspace::new();
    let path = write_file(&ws.config_dir(), "ctx-tool/config.yaml", DEFAULT_CONFIG_TEMPLATE);

    let resolved = resolver(&ws).resolve().unwrap();
    assert_eq!(resolved.config, Config::default());
    assert_eq!(resolved.source, ConfigSource::Xdg(path));
}

#[test]
fn test_missing_config_writes_default_file() {
    let ws = Workspace::new();

    let resolved = resolver(&ws).resolve().unwrap();

    let expected = ws.config_dir().join("ctx-tool/config.yaml");
    assert_eq!(resolved.source, ConfigSource::CreatedDefault(expected.clone()));
    assert_eq!(resolved.config, Config::default());
    assert_eq!(
        std::fs::read_to_string(expected).unwrap(),
        DEFAULT_CONFIG_TEMPLATE
    );
}

#[test]
fn test_xdg_beats_legacy_locations() {
    let ws = Workspace::new();
    write_file(&ws.config_dir(), "ctx-tool/config.yaml", "repository:\n  branch: xdg\n");
    write_file(&ws.home(), ".ctx-tool.yaml", "repository:\n  branch: home\n");
    write_file(&ws.project(), ".ctx-tool.yaml", "repository:\n  branch: cwd\n");

    let resolved = resolver(&ws).resolve().unwrap();
    assert_eq!(resolved.config.repository.branch, "xdg");
}

#[test]
fn test_legacy_home_beats_legacy_cwd() {
    let ws = Workspace::new();
    let home_file = write_file(&ws.home(), ".ctx-tool.yaml", "repository:\n  branch: home\n");
    write_file(&ws.project(), ".ctx-tool.yaml", "repository:\n  branch: cwd\n");

    let resolver = resolver(&ws);
    let resolved = resolver.resolve().unwrap();

    assert_eq!(resolved.config.repository.branch, "home");
    assert_eq!(resolved.source, ConfigSource::Legacy(home_file));
}

#[test]
fn test_explicit_path_wins_and_must_exist() {
    let ws = Workspace::new();
    write_file(&ws.config_dir(), "ctx-tool/config.yaml", "tracking:\n  file: xdg.json\n");
    let explicit = write_file(ws.root(), "custom.yaml", "tracking:\n  file: custom.json\n");

    let resolved = resolver(&ws)
        .with_explicit_path(&explicit)
        .resolve()
        .unwrap();
    assert_eq!(resolved.config.tracking.file, "custom.json");

    let err = resolver(&ws)
        .with_explicit_path(ws.root().join("nope.yaml"))
        .resolve()
        .unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn test_empty_file_means_defaults() {
    let ws = Workspace::new();
    write_file(&ws.config_dir(), "ctx-tool/config.yaml", "\n");

    let resolved = resolver(&ws).resolve().unwrap();
    assert_eq!(resolved.config, Config::default());
}

#[test]
fn test_invalid_yaml_is_a_parse_error() {
    let ws = Workspace::new();
    write_file(&ws.config_dir(), "ctx-tool/config.yaml", "behavior: [unclosed\n");

    let err = resolver(&ws).resolve().unwrap_err();
    assert!(
        matches!(err, Error::Fs(ctx_fs::Error::ConfigParse { .. })),
        "got {err:?}"
    );
}

#[test]
fn test_environment_overrides_file_values() {
    let ws = Workspace::new();
    write_file(&ws.config_dir(), "ctx-tool/config.yaml", "behavior:\n  verify_md5: true\n");

    let resolved = resolver(&ws)
        .with_env([
            ("CTX_TOOL_BEHAVIOR_VERIFY_MD5", "false"),
            ("CTX_TOOL_REPOSITORY_URL", "https://example.com/c.git"),
            ("CTX_TOOL_I18N_LANGUAGE", "zh-Hans"),
        ])
        .resolve()
        .unwrap();

    assert!(!resolved.config.behavior.verify_md5);
    assert_eq!(resolved.config.repository.url, "https://example.com/c.git");
    assert_eq!(resolved.config.i18n.language, "zh-Hans");
}

#[test]
fn test_malformed_boolean_override_is_rejected() {
    let ws = Workspace::new();

    let err = resolver(&ws)
        .with_env([("CTX_TOOL_BEHAVIOR_CLEAN_EMPTY_DIRS", "sometimes")])
        .resolve()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { ref key, .. } if key == "CTX_TOOL_BEHAVIOR_CLEAN_EMPTY_DIRS"));
}
