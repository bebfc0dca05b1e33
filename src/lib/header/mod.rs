use color_eyre::Section;
use gray_matter::{Matter, engine::YAML};
use serde::Deserialize;

use crate::{
    seo::{ImageOverride, PageContext, PageKind},
    types::{PublishDate, Tag, Tags},
    utils::{escape_attr, escape_text},
};

/// Front matter for one content file. Every field is optional; a file
/// with no front matter (or an unparsable block) gets the defaults.
#[derive(Deserialize, Default, Debug)]
pub struct Header {
    title: Option<String>,
    subtitle: Option<String>,
    description: Option<String>,
    #[serde(alias = "type", alias = "seo_page_type")]
    page_type: Option<String>,
    image: Option<ImageMeta>,
    #[serde(alias = "date")]
    ctime: Option<String>,
    #[serde(alias = "updated")]
    mtime: Option<String>,
    tags: Option<Vec<String>>,
}

/// Structured social-card image reference from front matter.
#[derive(Deserialize, Clone, Debug)]
pub struct ImageMeta {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl TryFrom<&str> for Header {
    type Error = color_eyre::Report;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let matter = Matter::<YAML>::new();
        matter
            .parse::<Header>(value)
            .with_note(|| "While parsing frontmatter.")
            .map(|res| res.data.unwrap_or_default())
    }
}

impl Header {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn ctime(&self) -> Option<PublishDate> {
        self.ctime.as_deref().and_then(PublishDate::parse)
    }

    pub fn mtime(&self) -> Option<PublishDate> {
        self.mtime.as_deref().and_then(PublishDate::parse)
    }

    pub fn kind(&self) -> PageKind {
        match self.page_type.as_deref() {
            Some("article") => PageKind::Article,
            _ => PageKind::Website,
        }
    }

    pub fn tags(&self) -> Tags {
        let parsed = self
            .tags
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter_map(|t| Tag::parse(t))
            .collect();
        Tags::new(parsed)
    }

    /// Assemble the context the SEO deriver consumes for this page. `url`
    /// is the site-relative page URL, `/`-prefixed (empty for the root).
    pub fn page_context(&self, url: &str) -> PageContext {
        PageContext {
            url: url.to_string(),
            date: self.ctime(),
            kind: self.kind(),
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.as_ref().map(|img| ImageOverride {
                path: img.path.trim_start_matches('/').to_string(),
                width: img.width,
                height: img.height,
            }),
        }
    }

    pub fn generate_body_head(&self, href_prefix: &str) -> String {
        let mut result = String::new();

        let title = self
            .title
            .as_ref()
            .map(|title| {
                format!(
                    r#"<h1>{}</h1>
"#,
                    escape_text(title)
                )
            })
            .unwrap_or_default();

        let subtitle = self
            .subtitle
            .as_ref()
            .map(|sub| {
                format!(
                    r#"<p class="subtitle">{}</p>
"#,
                    escape_text(sub)
                )
            })
            .unwrap_or_default();

        let index_link = format!(
            r#"<p class="meta"><a href="{0}index.html">Index</a></p>
"#,
            escape_attr(href_prefix)
        );

        let meta = self.render_body_meta(href_prefix);
        result.push_str(&title);
        result.push_str(&subtitle);
        result.push_str(&index_link);
        result.push_str(&meta);

        result
    }

    fn render_body_meta(&self, href_prefix: &str) -> String {
        let has_any = self.ctime.is_some() || self.mtime.is_some() || !self.tags().is_empty();

        if !has_any {
            return String::new();
        }

        let mut parts: Vec<String> = Vec::new();

        if let Some(ctime) = self.ctime() {
            let ctime = ctime.date_str();
            parts.push(format!(
                r#"<span class="meta-item">Created: <time datetime="{0}">{0}</time></span>"#,
                escape_attr(&ctime)
            ));
        }

        if let Some(mtime) = self.mtime() {
            let mtime = mtime.date_str();
            parts.push(format!(
                r#"<span class="meta-item">Updated: <time datetime="{0}">{0}</time></span>"#,
                escape_attr(&mtime)
            ));
        }

        if !self.tags().is_empty() {
            let rendered_tags = self
                .tags()
                .0
                .iter()
                .map(|t| {
                    let href = format!(r#"{href_prefix}tags/{t}.html"#);
                    format!(
                        r#"<a class="tag" href="{}">{}</a>"#,
                        escape_attr(&href),
                        escape_text(t.as_str())
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");

            parts.push(format!(
                r#"<span class="meta-item">Tags: {}</span>"#,
                rendered_tags
            ));
        }

        format!(
            r#"<p class="meta">{}</p>
"#,
            parts.join(r#"<span class="meta-sep">·</span>"#)
        )
    }
}
