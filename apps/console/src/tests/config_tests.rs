use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("missing.toml"), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("console.toml");
    fs::write(
        &path,
        "data_file = \"/srv/console/data.json\"\nactor = \"ops@agency.test\"\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.data_file, PathBuf::from("/srv/console/data.json"));
    assert_eq!(settings.actor, "ops@agency.test");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("console.toml");
    fs::write(&path, "actor = \"from-file\"\nlog = \"warn\"\n").expect("write settings");

    let env = |key: &str| match key {
        "CONSOLE_ACTOR" => Some("from-console-env".to_string()),
        "APP__ACTOR" => Some("from-app-env".to_string()),
        "CONSOLE_LOG" => Some("debug".to_string()),
        _ => None,
    };
    let settings = load_settings_from(&path, env);
    assert_eq!(settings.actor, "from-app-env");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn malformed_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("console.toml");
    fs::write(&path, "actor = [1, 2]\n").expect("write settings");
    assert_eq!(load_settings_from(&path, no_env), Settings::default());
}

#[test]
fn creates_parent_dir_for_data_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_file = dir.path().join("nested").join("console.json");
    ensure_parent_dir_exists(&data_file).expect("create parent");
    assert!(dir.path().join("nested").is_dir());
    ensure_parent_dir_exists(Path::new("console.json")).expect("bare file name");
}
