use std::sync::OnceLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::{
    transformer::Transformer,
    utils::{escape_attr, escape_html},
};

/// State of the highlighter within the event stream.
enum State<'a> {
    /// Not in a code block, pass the event through as-is.
    Passthrough,
    /// Inside a code block of language `lang`; accumulate events until the
    /// matching `Event::End(TagEnd::CodeBlock)`.
    Accumulating { lang: CodeBlockKind<'a> },
}

/// A transformer that replaces fenced and indented code blocks with
/// class-styled highlighted HTML.
pub struct CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    inner: I,
    /// Buffer accumulating the raw code of the current block.
    buffer: String,
    state: State<'a>,
}

impl<'a, I> Iterator for CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // A whole code block collapses into one HTML event, so we loop,
        // swallowing events until the block closes.
        loop {
            let event = self.inner.next()?;
            match &self.state {
                State::Passthrough => match event {
                    Event::Start(Tag::CodeBlock(lang)) => {
                        self.state = State::Accumulating { lang };
                        self.buffer.clear();
                        continue;
                    }
                    other => return Some(other),
                },
                State::Accumulating { lang: _ } => match event {
                    Event::End(TagEnd::CodeBlock) => {
                        let State::Accumulating { lang } =
                            std::mem::replace(&mut self.state, State::Passthrough)
                        else {
                            unreachable!()
                        };

                        let language = match lang {
                            CodeBlockKind::Fenced(ref l) => Some(l.as_ref()),
                            CodeBlockKind::Indented => None,
                        };

                        let rendered = highlight(&self.buffer, language);
                        return Some(Event::Html(CowStr::from(rendered)));
                    }
                    Event::Text(text) | Event::Code(text) => {
                        self.buffer.push_str(text.as_ref());
                        continue;
                    }
                    Event::SoftBreak | Event::HardBreak => {
                        self.buffer.push('\n');
                        continue;
                    }
                    Event::Html(html) | Event::InlineHtml(html) => {
                        self.buffer.push_str(html.as_ref());
                        continue;
                    }
                    _ => continue,
                },
            }
        }
    }
}

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

static THEME: OnceLock<Theme> = OnceLock::new();
fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let mut themes = ThemeSet::load_defaults();
        themes
            .themes
            .remove("InspiredGitHub")
            .unwrap_or_default()
    })
}

static HIGHLIGHT_CSS: OnceLock<String> = OnceLock::new();
/// Return the CSS needed for class-based syntax highlighting.
pub fn highlight_css() -> &'static str {
    HIGHLIGHT_CSS.get_or_init(|| {
        css_for_theme_with_class_style(theme(), ClassStyle::Spaced).unwrap_or_default()
    })
}

/// Highlight `source`, falling back to an escaped plain block when syntect
/// cannot handle it.
fn highlight(source: &str, language: Option<&str>) -> String {
    let syntax_set = syntax_set();
    let syntax: &SyntaxReference = language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    render_classed_html(source, syntax_set, syntax, language)
        .unwrap_or_else(|| fallback_plain(source, language))
}

fn render_classed_html(
    source: &str,
    syntax_set: &SyntaxSet,
    syntax: &SyntaxReference,
    language: Option<&str>,
) -> Option<String> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, ClassStyle::Spaced);

    for line in LinesWithEndings::from(source) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .ok()?;
    }

    let mut out = String::with_capacity(source.len() + 48);
    out.push_str("<pre class=\"code");
    if let Some(lang) = language {
        out.push(' ');
        out.push_str("language-");
        out.push_str(&escape_attr(lang));
    }
    out.push_str("\"><code>");
    out.push_str(&generator.finalize());
    out.push_str("</code></pre>\n");
    Some(out)
}

/// Backup renderer in case syntect fails for whatever reason
pub fn fallback_plain(source: &str, language: Option<&str>) -> String {
    let mut out = String::with_capacity(source.len() + 32);
    out.push_str("<pre class=\"code\"><code");
    if let Some(lang) = language {
        out.push_str(" class=\"language-");
        out.push_str(&escape_attr(lang));
        out.push('"');
    }
    out.push('>');
    out.push_str(&escape_html(source));
    out.push_str("</code></pre>\n");
    out
}

impl<'a, I> Transformer<'a, I> for CodeHighlightTransformer<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn transform(inner: I) -> Self {
        Self {
            inner,
            buffer: String::new(),
            state: State::Passthrough,
        }
    }
}

#[cfg(test)]
mod tests;
