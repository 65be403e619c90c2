use super::*;
use figment::Jail;

/// Point HOME into the jail so a developer's own config never leaks in
fn isolate_home(jail: &mut Jail) {
    let home = jail.directory().to_path_buf();
    jail.set_env("HOME", home.display());
}

#[test]
fn test_embedded_defaults_match_rust_defaults() {
    let config: MarkguardConfig = Figment::new()
        .merge(Yaml::string(DEFAULT_CONFIG))
        .extract()
        .expect("embedded defaults should parse");

    assert_eq!(config, MarkguardConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_loads_defaults() {
    Jail::expect_with(|jail| {
        isolate_home(jail);
        let config = MarkguardConfig::load(None).expect("defaults should load");

        assert_eq!(config.guard.marker, "NO_COMMIT");
        assert_eq!(config.scan_mode(), ScanMode::Exhaustive);
        assert_eq!(config.hook_count(), 1);
        assert!(config.hooks.repos[0].is_local());
        Ok(())
    });
}

#[test]
fn test_template_is_valid() {
    let config: MarkguardConfig = Figment::new()
        .merge(Yaml::string(CONFIG_TEMPLATE))
        .extract()
        .expect("template should parse");

    config.validate().expect("template should validate");
    assert_eq!(config.hooks.repos.len(), 3);

    let isort = &config.hooks.repos[1];
    assert_eq!(isort.rev.as_deref(), Some("5.10.1"));
    assert_eq!(isort.hooks[0].args, vec!["--profile", "black"]);
}

#[test]
fn test_repo_config_overrides_defaults() {
    Jail::expect_with(|jail| {
        isolate_home(jail);
        jail.create_file(
            "markguard.yaml",
            r#"
guard:
  marker: DO-NOT-MERGE
  report_all: false
"#,
        )?;

        let config = MarkguardConfig::load(None).expect("repo config should load");
        assert_eq!(config.marker().unwrap().as_str(), "DO-NOT-MERGE");
        assert_eq!(config.scan_mode(), ScanMode::FirstMatch);
        // untouched sections keep their defaults
        assert_eq!(config.hooks, HooksConfig::default());
        Ok(())
    });
}

#[test]
fn test_env_overrides_files() {
    Jail::expect_with(|jail| {
        isolate_home(jail);
        jail.create_file("markguard.toml", "[guard]\nmarker = \"FROM_FILE\"\n")?;
        jail.set_env("MARKGUARD_GUARD__MARKER", "FROM_ENV");

        let config = MarkguardConfig::load(None).expect("env config should load");
        assert_eq!(config.guard.marker, "FROM_ENV");
        Ok(())
    });
}

#[test]
fn test_custom_config_by_extension() {
    Jail::expect_with(|jail| {
        isolate_home(jail);
        jail.create_file("custom.json", r#"{ "guard": { "marker": "JSON_MARK" } }"#)?;

        let config = MarkguardConfig::load(Some(Path::new("custom.json")))
            .expect("json config should load");
        assert_eq!(config.guard.marker, "JSON_MARK");
        Ok(())
    });
}

#[test]
fn test_missing_custom_config_is_an_error() {
    Jail::expect_with(|jail| {
        isolate_home(jail);
        let err = MarkguardConfig::load(Some(Path::new("missing.yaml"))).unwrap_err();
        assert!(matches!(err, GuardError::Config(_)));
        Ok(())
    });
}

#[test]
fn test_empty_marker_fails_validation() {
    let mut config = MarkguardConfig::default();
    config.guard.marker.clear();
    assert!(matches!(config.validate(), Err(GuardError::EmptyMarker)));
}

#[test]
fn test_remote_repo_requires_rev() {
    let mut config = MarkguardConfig::default();
    config.hooks.repos.push(RepoConfig {
        repo: "https://github.com/psf/black".to_string(),
        rev: None,
        hooks: vec![HookEntry {
            id: "black".to_string(),
            ..HookEntry::default()
        }],
    });

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("must pin a `rev`"));
}

#[test]
fn test_local_hook_needs_entry_or_builtin() {
    let mut config = MarkguardConfig::default();
    config.hooks.repos[0].hooks.push(HookEntry {
        id: "lonely".to_string(),
        ..HookEntry::default()
    });

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("lonely"));
}

#[test]
fn test_unknown_builtin_is_rejected() {
    let mut config = MarkguardConfig::default();
    config.hooks.repos[0].hooks[0].builtin = Some("spellcheck".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_file_pattern_is_rejected() {
    let mut config = MarkguardConfig::default();
    config.hooks.repos[0].hooks.push(HookEntry {
        id: "broken".to_string(),
        entry: Some("true".to_string()),
        files: Some("(unclosed".to_string()),
        ..HookEntry::default()
    });

    assert!(matches!(
        config.validate(),
        Err(GuardError::InvalidPattern { .. })
    ));
}

#[test]
fn test_serializes_to_every_format() {
    let config = MarkguardConfig::default();

    assert!(config.to_yaml().unwrap().contains("marker: NO_COMMIT"));
    assert!(config.to_json().unwrap().contains("\"marker\": \"NO_COMMIT\""));
    assert!(config.to_toml().unwrap().contains("marker = \"NO_COMMIT\""));
}
