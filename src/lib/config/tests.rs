use tempfile::TempDir;

use super::{CONFIG_FILE, Site};

#[test]
fn defaults_apply_when_config_is_missing() {
    let tmp = TempDir::new().expect("tempdir");
    let site = Site::load(tmp.path()).expect("load");
    assert_eq!(site, Site::default());
    assert!(!site.url.ends_with('/'));
}

#[test]
fn site_toml_overrides_defaults_and_trims_url() {
    let tmp = TempDir::new().expect("tempdir");
    std::fs::write(
        tmp.path().join(CONFIG_FILE),
        r#"
title = "Notebook"
tagline = "field notes"
author = "Jane Doe"
url = "https://notes.example.org/"
twitter = "@notes"
cdn_cloud_name = "notes-cloud"
"#,
    )
    .unwrap();

    let site = Site::load(tmp.path()).expect("load");
    assert_eq!(site.title, "Notebook");
    assert_eq!(site.tagline, "field notes");
    assert_eq!(site.author, "Jane Doe");
    assert_eq!(site.url, "https://notes.example.org");
    assert_eq!(site.twitter, "@notes");
    assert_eq!(site.cdn_cloud_name.as_deref(), Some("notes-cloud"));
    // Unset keys keep their defaults.
    assert_eq!(site.locale, Site::default().locale);
    assert_eq!(site.description, Site::default().description);
}

#[test]
fn unknown_keys_are_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    std::fs::write(
        tmp.path().join(CONFIG_FILE),
        "title = \"x\"\nnot_a_setting = true\n",
    )
    .unwrap();

    assert!(Site::load(tmp.path()).is_err());
}
