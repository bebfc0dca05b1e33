use std::path::PathBuf;

use proptest::{
    prelude::*,
    string::string_regex,
    test_runner::{Config, TestRunner},
};

use super::{Href, PublishDate, RelPath, Tag};

prop_compose! {
    fn rel_components()(segments in proptest::collection::vec("[A-Za-z0-9]{1,10}", 1..4)) -> PathBuf {
        let mut p = PathBuf::new();
        for seg in segments {
            p.push(seg);
        }
        p
    }
}

#[test]
fn publish_date_roundtrips_bare_dates() {
    let mut runner = TestRunner::new(Config {
        cases: 32,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&(1970i32..=2100, 1u32..=12, 1u32..=28), |(year, month, day)| {
            let s = format!("{year:04}-{month:02}-{day:02}");
            let parsed = PublishDate::parse(&s).expect("valid date");
            prop_assert_eq!(parsed.date_str(), s.clone());
            prop_assert_eq!(parsed.year(), year);
            // Bare dates mean midnight UTC.
            prop_assert_eq!(parsed.utc_stamp(), format!("{s}T00:00:00+00:00"));
            Ok(())
        })
        .unwrap();
}

#[test]
fn publish_date_rejects_out_of_range() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&(1970i32..=2100, 13u32..=99, 32u32..=99), |(year, month, day)| {
            let s = format!("{year:04}-{month:02}-{day:02}");
            prop_assert!(PublishDate::parse(&s).is_none());
            Ok(())
        })
        .unwrap();
}

#[test]
fn publish_date_parses_rfc3339_and_drops_millis() {
    let parsed = PublishDate::parse("2015-02-20T00:00:00.000Z").expect("valid timestamp");
    assert_eq!(parsed.utc_stamp(), "2015-02-20T00:00:00+00:00");
    assert_eq!(parsed.date_str(), "2015-02-20");
}

#[test]
fn publish_date_normalizes_offsets_to_utc() {
    let parsed = PublishDate::parse("2015-02-20T01:30:00+02:00").expect("valid timestamp");
    assert_eq!(parsed.utc_stamp(), "2015-02-19T23:30:00+00:00");
    assert_eq!(parsed.date_str(), "2015-02-19");
}

#[test]
fn publish_date_orders_chronologically() {
    let older = PublishDate::parse("2024-01-01").unwrap();
    let newer = PublishDate::parse("2024-01-01T06:00:00Z").unwrap();
    assert!(older < newer);
}

#[test]
fn tag_parse_accepts_valid() {
    let mut runner = TestRunner::new(Config {
        cases: 32,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&string_regex("[A-Za-z0-9_-]{1,16}").unwrap(), |s| {
            let tag = Tag::parse(&s).expect("should parse");
            prop_assert_eq!(tag.as_str(), s);
            Ok(())
        })
        .unwrap();
}

#[test]
fn tag_parse_rejects_invalid() {
    let mut runner = TestRunner::new(Config {
        cases: 32,
        failure_persistence: None,
        ..Config::default()
    });
    let bad_chars = prop_oneof![
        Just(" "), Just("!"), Just("@"), Just("#"), Just("$"), Just("%"), Just("^"), Just("&"),
        Just("*"), Just("+"), Just("="), Just("?"), Just(","), Just(";"), Just(":"), Just("/"), Just(".")
    ];
    runner
        .run(
            &(string_regex("[\\p{Alphabetic}\\p{Number}_-]{0,6}").unwrap(), bad_chars, string_regex("[\\p{Alphabetic}\\p{Number}_-]{0,6}").unwrap()),
            |(prefix, bad, suffix)| {
                let s = format!("{prefix}{bad}{suffix}");
                prop_assert!(Tag::parse(&s).is_none());
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn rel_path_accepts_relative() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&rel_components(), |p| {
            prop_assume!(!p.is_absolute());
            let rel = RelPath::new(p.clone()).expect("must accept relative");
            prop_assert_eq!(rel.as_path(), p.as_path());
            Ok(())
        })
        .unwrap();
}

#[test]
fn rel_path_rejects_absolute() {
    let abs = PathBuf::from("/tmp/abs/path");
    assert!(abs.is_absolute());
    assert!(RelPath::new(abs).is_none());
}

#[test]
fn href_uses_forward_slashes() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });
    runner
        .run(&rel_components(), |p| {
            let rel = RelPath::new(p.clone()).expect("relative");
            let href = Href::from_rel(&rel).as_str().to_string();
            prop_assert!(!href.contains('\\'));
            let expected = p.to_string_lossy().replace('\\', "/");
            prop_assert_eq!(href, expected);
            Ok(())
        })
        .unwrap();
}
