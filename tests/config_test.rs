use std::path::Path;

use skpkg::config::loader::{load_project_config, load_user_config_from};

#[test]
fn load_user_config_records_its_source() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".skpkgrc");
    std::fs::write(
        &path,
        r#"{"url_to_repo_info": "~/repo-info", "github_api_url": "http://localhost:9999"}"#,
    )
    .unwrap();

    let config = load_user_config_from(&path).unwrap();
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
    assert_eq!(config.repo_info_location(), Some("~/repo-info"));
    assert_eq!(config.github_api_url.as_deref(), Some("http://localhost:9999"));
}

#[test]
fn empty_user_config_is_default() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".skpkgrc");
    std::fs::write(&path, "").unwrap();

    let config = load_user_config_from(&path).unwrap();
    assert!(config.url_to_repo_info.is_none());
    assert!(config.extra.is_empty());
    assert!(config.source.is_some());
}

#[test]
fn invalid_json_mentions_the_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".skpkgrc");
    std::fs::write(&path, "{ url_to_repo_info = 1 }").unwrap();

    let err = load_user_config_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains(".skpkgrc"));
}

#[test]
fn missing_user_config_file_is_an_error() {
    assert!(load_user_config_from(Path::new("/nonexistent/.skpkgrc")).is_err());
}

#[test]
fn project_config_is_optional() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(load_project_config(tmp.path()).unwrap().is_none());

    std::fs::write(
        tmp.path().join(".skpkgrc"),
        r#"{"project_name": "diffpy.utils", "keywords": "[diffraction]"}"#,
    )
    .unwrap();
    let project = load_project_config(tmp.path()).unwrap().unwrap();
    assert_eq!(project.extra_context(), vec!["project_name=diffpy.utils".to_owned()]);
}
