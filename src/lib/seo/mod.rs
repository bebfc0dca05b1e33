//! Per-page SEO metadata.
//!
//! Everything crawlers and social platforms read about a page is derived
//! here in one pure pass over the page context: title variants, meta
//! description, canonical URL, publish date, card image, and the JSON-LD
//! payload. The site configuration is an explicit parameter and no global
//! state is touched, so deriving twice for the same page yields
//! byte-identical output.

use serde_json::json;

use crate::{
    config::Site,
    types::PublishDate,
    utils::{escape_attr, escape_text},
};

/// How a page presents itself to crawlers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageKind {
    /// A dated blog post; gets `BlogPosting` structured data.
    Article,
    /// Anything else: the front index, tag listings, standalone pages.
    #[default]
    Website,
}

/// Structured social-card image reference, as authored in front matter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageOverride {
    /// Site-relative path, no leading slash.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Everything the deriver needs to know about one page: the computed
/// site-relative URL (`/`-prefixed, or empty for the site root), the
/// publication date if any, and the front-matter overrides.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    pub url: String,
    pub date: Option<PublishDate>,
    pub kind: PageKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageOverride>,
}

/// Absolute card image descriptor, for `og:image` and friends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeoImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// The derived metadata record for one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeoFields {
    /// Full `<title>` text: `"{page title} - {site title}"`, or
    /// `"{site title} - {tagline}"` when the page has no title of its own.
    pub title: String,
    /// The bare page title (site title when the page has none).
    pub page_title: String,
    pub site_title: String,
    /// Meta description, double quotes rewritten to `&quot;`.
    pub description: String,
    pub canonical_url: String,
    /// UTC publish stamp, articles only.
    pub date: Option<String>,
    pub image: Option<SeoImage>,
    pub twitter_account: String,
    /// Compact JSON-LD payload (`BlogPosting` or `WebSite`).
    pub json_ld: String,
}

/// Derive the full metadata record for one page.
pub fn derive(site: &Site, page: &PageContext) -> SeoFields {
    let title = match page.title.as_deref() {
        Some(t) => format!("{t} - {}", site.title),
        None => format!("{} - {}", site.title, site.tagline),
    };

    let page_title = page
        .title
        .clone()
        .unwrap_or_else(|| site.title.clone());

    let description = escape_quotes(page.description.as_deref().unwrap_or(&site.description));

    let canonical_url = if page.url.is_empty() {
        site.url.clone()
    } else {
        format!("{}{}", site.url, page.url)
    };

    let date = match page.kind {
        PageKind::Article => page.date.as_ref().map(PublishDate::utc_stamp),
        PageKind::Website => None,
    };

    let image = page.image.as_ref().map(|img| SeoImage {
        url: format!("{}/{}", site.url, img.path),
        width: img.width,
        height: img.height,
    });

    let json_ld = build_json_ld(
        site,
        page.kind,
        &canonical_url,
        &page_title,
        &description,
        date.as_deref(),
    );

    SeoFields {
        title,
        page_title,
        site_title: site.title.clone(),
        description,
        canonical_url,
        date,
        image,
        twitter_account: site.twitter.clone(),
        json_ld,
    }
}

/// The one rewrite the description carries: a double quote would terminate
/// the `content="..."` attribute, so it becomes `&quot;`. Nothing else is
/// touched.
fn escape_quotes(s: &str) -> String {
    s.replace('"', "&quot;")
}

fn build_json_ld(
    site: &Site,
    kind: PageKind,
    canonical_url: &str,
    page_title: &str,
    description: &str,
    date: Option<&str>,
) -> String {
    let schema_type = match kind {
        PageKind::Article => "BlogPosting",
        PageKind::Website => "WebSite",
    };

    let mut doc = json!({
        "@context": "https://schema.org",
        "@type": schema_type,
        "url": canonical_url,
        "headline": page_title,
        "description": description,
    });

    match kind {
        PageKind::Article => {
            if let Some(date) = date {
                doc["datePublished"] = json!(date);
                doc["dateModified"] = json!(date);
            }
            doc["mainEntityOfPage"] = json!({
                "@type": "WebPage",
                "@id": canonical_url,
            });
            doc["author"] = json!({
                "@type": "Person",
                "name": site.author,
            });
        }
        PageKind::Website => {
            doc["name"] = json!(site.title);
        }
    }

    doc.to_string()
}

/// Render the derived fields as a head fragment: title, description,
/// canonical link, Open Graph / Twitter Card tags, and the JSON-LD script.
///
/// The description is inserted verbatim (it already carries its own quote
/// rewrite); every other field is attribute-escaped here.
pub fn render_head(fields: &SeoFields, site: &Site, kind: PageKind) -> String {
    let og_type = match kind {
        PageKind::Article => "article",
        PageKind::Website => "website",
    };
    let twitter_card = if fields.image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    let mut out = String::new();

    out.push_str(&format!(
        "\n<title>{}</title>",
        escape_text(&fields.title)
    ));
    out.push_str(&format!(
        r#"
<meta name="description" content="{}">"#,
        fields.description
    ));
    out.push_str(&format!(
        r#"
<link rel="canonical" href="{}">"#,
        escape_attr(&fields.canonical_url)
    ));

    out.push_str(&format!(
        r#"
<meta property="og:title" content="{}">"#,
        escape_attr(&fields.page_title)
    ));
    out.push_str(&format!(
        r#"
<meta property="og:description" content="{}">"#,
        fields.description
    ));
    out.push_str(&format!(
        r#"
<meta property="og:type" content="{og_type}">"#
    ));
    out.push_str(&format!(
        r#"
<meta property="og:url" content="{}">"#,
        escape_attr(&fields.canonical_url)
    ));
    out.push_str(&format!(
        r#"
<meta property="og:site_name" content="{}">"#,
        escape_attr(&fields.site_title)
    ));
    out.push_str(&format!(
        r#"
<meta property="og:locale" content="{}">"#,
        escape_attr(&site.locale)
    ));

    if let Some(image) = &fields.image {
        out.push_str(&format!(
            r#"
<meta property="og:image" content="{}">
<meta property="og:image:width" content="{}">
<meta property="og:image:height" content="{}">"#,
            escape_attr(&image.url),
            image.width,
            image.height
        ));
        out.push_str(&format!(
            r#"
<meta name="twitter:image" content="{}">"#,
            escape_attr(&image.url)
        ));
    }

    if let Some(date) = &fields.date {
        out.push_str(&format!(
            r#"
<meta property="article:published_time" content="{}">"#,
            escape_attr(date)
        ));
    }

    out.push_str(&format!(
        r#"
<meta name="twitter:card" content="{twitter_card}">"#
    ));
    out.push_str(&format!(
        r#"
<meta name="twitter:title" content="{}">"#,
        escape_attr(&fields.page_title)
    ));
    out.push_str(&format!(
        r#"
<meta name="twitter:description" content="{}">"#,
        fields.description
    ));
    if !fields.twitter_account.is_empty() {
        out.push_str(&format!(
            r#"
<meta name="twitter:site" content="{0}">
<meta name="twitter:creator" content="{0}">"#,
            escape_attr(&fields.twitter_account)
        ));
    }

    out.push_str(&format!(
        r#"
<script type="application/ld+json">{}</script>"#,
        fields.json_ld
    ));

    out
}
