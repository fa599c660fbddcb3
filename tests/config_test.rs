use std::fs;

use release_publish::config::{load_config, CommitterIdentity, Config, ReleaseSpec};

#[test]
fn test_config_defaults_when_sections_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("releasepublish.toml");
    fs::write(&path, "").unwrap();

    let config = load_config(path.to_str()).unwrap();
    assert_eq!(config.committer.name, None);
    assert_eq!(config.committer.email, None);
    assert_eq!(config.git.remote, None);
    assert_eq!(config.host.api_url, None);
}

#[test]
fn test_config_partial_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("releasepublish.toml");
    fs::write(
        &path,
        r#"
[git]
remote = "upstream"
"#,
    )
    .unwrap();

    let config = load_config(path.to_str()).unwrap();
    assert_eq!(config.git.remote.as_deref(), Some("upstream"));
    assert_eq!(config.committer.name, None);
}

#[test]
fn test_config_serializes_round_trip() {
    let mut config = Config::default();
    config.committer.name = Some("release-bot".to_string());
    config.host.api_url = Some("https://github.example.com/api/v3".to_string());

    let rendered = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed.committer.name.as_deref(), Some("release-bot"));
    assert_eq!(
        parsed.host.api_url.as_deref(),
        Some("https://github.example.com/api/v3")
    );
}

#[test]
fn test_committer_identity_from_config_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("releasepublish.toml");
    fs::write(
        &path,
        r#"
[committer]
name = "deploy[bot]"
"#,
    )
    .unwrap();

    let config = load_config(path.to_str()).unwrap();
    let identity =
        CommitterIdentity::resolve(config.committer.name.as_deref(), config.committer.email.as_deref());

    assert_eq!(identity.name, "deploy[bot]");
    assert_eq!(identity.email, "github-actions@github.com");
}

#[test]
fn test_release_spec_from_action_style_inputs() {
    // Mirrors how the CLI assembles a spec: comma separated file list,
    // commit flag with a versioned file.
    let spec = ReleaseSpec::new("1.4.0", "Bug fixes")
        .with_artifact_list("dist/plugin.zip, dist/readme.txt")
        .with_version_bump("plugin.php");

    assert_eq!(spec.version, "1.4.0");
    assert_eq!(spec.artifact_paths.len(), 2);
    assert!(spec.commit_version_bump);
}
