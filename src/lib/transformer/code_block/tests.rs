use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use crate::transformer::{WithTransformer, code_block::CodeHighlightTransformer};

#[test]
fn code_highlight_replaces_block() {
    let mut runner = TestRunner::new(Config {
        cases: 8,
        failure_persistence: None,
        ..Config::default()
    });

    runner
        .run(&".*", |body| {
            let events = vec![
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::from("rs")))),
                Event::Text(CowStr::from(body.clone())),
                Event::End(TagEnd::CodeBlock),
            ];
            let out: Vec<_> = events
                .into_iter()
                .with_transformer::<CodeHighlightTransformer<'_, _>>()
                .collect();
            prop_assert_eq!(out.len(), 1);
            prop_assert!(matches!(out[0], Event::Html(_)));
            Ok(())
        })
        .unwrap();
}

#[test]
fn unknown_language_falls_back_to_plain() {
    let events = vec![
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::from(
            "no-such-language",
        )))),
        Event::Text(CowStr::from("<script>alert(1)</script>")),
        Event::End(TagEnd::CodeBlock),
    ];
    let out: Vec<_> = events
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<'_, _>>()
        .collect();

    let html = match &out[0] {
        Event::Html(html) => html.to_string(),
        _ => panic!("expected Html"),
    };
    assert!(html.starts_with("<pre class=\"code"));
    assert!(!html.contains("<script>"));
}

#[test]
fn non_code_events_pass_through() {
    let events = vec![
        Event::Text(CowStr::from("plain paragraph")),
        Event::SoftBreak,
    ];
    let out: Vec<_> = events
        .clone()
        .into_iter()
        .with_transformer::<CodeHighlightTransformer<'_, _>>()
        .collect();
    assert_eq!(out, events);
}
