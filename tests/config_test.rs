use std::io::Write;
use studyloop_lib::backend::{self, Backend as _};
use studyloop_lib::config::app::{AppConfig, BackendMode, LogFormat};
use studyloop_lib::lessons::lesson::{load_lessons, Difficulty};

#[test]
fn test_defaults_when_empty() {
    let config = AppConfig::from_toml_str("").expect("empty config parses");
    assert_eq!(config.backend, BackendMode::Mock);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.weekly_goal_target, 3);
    assert_eq!(config.recommendation_limit, 3);
    assert!(config.lessons_path.is_none());
}

#[test]
fn test_remote_section_parses() {
    let config = AppConfig::from_toml_str(
        r#"
        backend = "remote"
        log_format = "pretty"
        weekly_goal_target = 5

        [remote]
        base_url = "https://data.example.com/api"
        api_key = "secret"
        "#,
    )
    .expect("config parses");

    assert_eq!(config.backend, BackendMode::Remote);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(config.weekly_goal_target, 5);
    assert_eq!(config.remote.base_url, "https://data.example.com/api");
    assert_eq!(config.remote.api_key.as_deref(), Some("secret"));
    assert_eq!(config.remote.timeout_secs, 10);
}

#[test]
fn test_unknown_backend_is_rejected() {
    assert!(AppConfig::from_toml_str(r#"backend = "firebase""#).is_err());
}

#[test]
fn test_env_override() {
    let config = AppConfig::default().apply_env_override(Some("Remote"));
    assert_eq!(config.backend, BackendMode::Remote);

    let config = AppConfig::default().apply_env_override(Some("nonsense"));
    assert_eq!(config.backend, BackendMode::Mock);

    let config = AppConfig::default().apply_env_override(None);
    assert_eq!(config.backend, BackendMode::Mock);
}

#[test]
fn test_backend_selected_by_flag() {
    let mock = backend::from_config(&AppConfig::default()).expect("mock backend");
    assert_eq!(mock.name(), "mock");

    let remote_config = AppConfig::default().apply_env_override(Some("remote"));
    let remote = backend::from_config(&remote_config).expect("remote backend");
    assert_eq!(remote.name(), "remote");
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "backend = \"remote\"\nrecommendation_limit = 5\n").expect("write config");

    let config = AppConfig::from_file(file.path()).expect("config loads");
    assert_eq!(config.backend, BackendMode::Remote);
    assert_eq!(config.recommendation_limit, 5);
}

#[test]
fn test_config_from_file_names_path_on_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "weekly_goal_target = \"many\"").expect("write config");

    let err = AppConfig::from_file(file.path()).expect_err("bad value");
    let chain = format!("{:#}", err);
    assert!(chain.contains("Failed to parse"));
    assert!(chain.contains(&file.path().display().to_string()));

    let missing = file.path().with_extension("absent");
    let err = AppConfig::from_file(&missing).expect_err("missing file");
    assert!(format!("{}", err).contains("Failed to read"));
}

#[test]
fn test_load_lessons_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"[
            {{"id": "intro", "title": "Intro", "difficulty": "beginner"}},
            {{"id": "next", "difficulty": "intermediate", "prerequisites": ["intro"], "tags": ["web"]}},
            {{"id": "intro", "difficulty": "advanced"}}
        ]"#
    )
    .expect("write lessons");

    let lessons = load_lessons(file.path()).expect("lessons load");
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].difficulty, Difficulty::Beginner);
    assert_eq!(lessons[1].prerequisites, vec!["intro".to_string()]);
}

#[test]
fn test_load_lessons_reports_bad_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "not json").expect("write");
    let err = load_lessons(file.path()).expect_err("parse error");
    assert_eq!(err.stage, "json_parse");
}
