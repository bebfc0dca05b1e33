use criterion::{Criterion, black_box, criterion_group, criterion_main};
use libsitegen::{
    config::Site,
    header::Header,
    seo,
    transformer::{
        WithTransformer, code_block::CodeHighlightTransformer, figure::FigureTransformer,
    },
};
use pulldown_cmark::{Options, Parser};

const DOC: &str = r#"---
title: Bench post
description: A post used for benchmarking
type: article
date: 2025-01-01
tags: [bench]
---
# Heading

Some prose with a picture:

![A bench](benches/park.jpg "Park bench")

```rust
fn main() {
    println!("hello");
}
```

More prose after the code block.
"#;

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_GFM);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_TABLES);
    options
}

fn bench_render(c: &mut Criterion) {
    let options = parser_options();

    c.bench_function("render_markdown", |b| {
        b.iter(|| {
            let parser = Parser::new_ext(black_box(DOC), options);
            let transformed = parser
                .with_transformer::<CodeHighlightTransformer<'_, _>>()
                .with_transformer::<FigureTransformer<_>>();
            let mut out = String::new();
            pulldown_cmark::html::push_html(&mut out, transformed);
            out
        })
    });
}

fn bench_seo_derive(c: &mut Criterion) {
    let site = Site::default();
    let header = Header::try_from(DOC).unwrap_or_default();
    let page = header.page_context("/posts/bench-post.html");

    c.bench_function("seo_derive", |b| {
        b.iter(|| seo::derive(black_box(&site), black_box(&page)))
    });
}

criterion_group!(benches, bench_render, bench_seo_derive);
criterion_main!(benches);
