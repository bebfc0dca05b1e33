use std::path::PathBuf;

use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};

use crate::{
    article::{Article, render_listing_body},
    types::{Href, PublishDate, RelPath},
};

fn article(title: &str, date: Option<PublishDate>) -> Article {
    Article {
        title: title.to_string(),
        ctime: date,
        updated: None,
        summary: None,
        content_html: String::new(),
        href: Href::from_rel(&RelPath::new(PathBuf::from(format!("{title}.html"))).unwrap()),
        tags: vec![],
    }
}

#[test]
fn listing_groups_by_year() {
    let mut runner = TestRunner::new(Config {
        failure_persistence: None,
        ..Config::default()
    });

    runner
        .run(
            &proptest::collection::vec(("[A-Za-z0-9]{3,8}", 1990i32..=2025), 1..5),
            |items| {
                let mut articles = Vec::new();
                for (title, year) in items.iter() {
                    let date = PublishDate::parse(&format!("{year:04}-01-01")).unwrap();
                    articles.push(article(title, Some(date)));
                }
                articles.sort_by(|a, b| b.ctime.cmp(&a.ctime));
                let body = render_listing_body(&articles, "");
                for a in &articles {
                    let year_str = a.ctime.as_ref().unwrap().year().to_string();
                    prop_assert!(body.contains(&year_str));
                    prop_assert!(body.contains(&a.title));
                }
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn listing_prefixes_hrefs() {
    let articles = vec![article("hello", PublishDate::parse("2024-05-05"))];
    let body = render_listing_body(&articles, "../");
    assert!(body.contains(r#"<a href="../hello.html">"#));
    assert!(body.contains(r#"<time datetime="2024-05-05">"#));
}

#[test]
fn undated_articles_get_no_year_heading() {
    let articles = vec![article("floating", None)];
    let body = render_listing_body(&articles, "");
    assert!(!body.contains("<h2>"));
    assert!(!body.contains("<time"));
    assert!(body.contains("floating"));
}
