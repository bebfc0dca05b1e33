use crate::{
    types::{Href, PublishDate, Tag},
    utils::{escape_attr, escape_text},
};

/// One entry in the site's listings and feeds.
#[derive(Clone, Debug)]
pub struct Article {
    pub title: String,
    pub ctime: Option<PublishDate>,
    pub updated: Option<PublishDate>,
    pub summary: Option<String>,
    /// Rendered body HTML, carried for full-content feeds.
    pub content_html: String,
    pub href: Href,
    pub tags: Vec<Tag>,
}

/// Render the inner listing body: articles grouped under year headings,
/// newest first, each with its date and link.
pub fn render_listing_body(articles: &[Article], href_prefix: &str) -> String {
    let mut body = String::new();

    let mut current_year: Option<i32> = None;

    for a in articles {
        let year = a.ctime.as_ref().map(|d| d.year());
        if year != current_year {
            if let Some(y) = year {
                body.push_str("<h2>");
                body.push_str(&escape_text(&y.to_string()));
                body.push_str("</h2>\n");
                current_year = year;
            } else {
                current_year = None;
            }
        }

        body.push_str(r#"<p class="meta">"#);
        if let Some(ctime) = &a.ctime {
            let ctime_str = ctime.date_str();
            body.push_str(r#" <time datetime=""#);
            body.push_str(&escape_attr(&ctime_str));
            body.push_str(r#"">"#);
            body.push_str(&escape_text(&ctime_str));
            body.push_str("</time>");
            body.push_str(r#"<span class="meta-sep">·</span>"#);
        }

        let full_href = format!("{href_prefix}{}", a.href.as_str());
        body.push_str(r#"<a href=""#);
        body.push_str(&escape_attr(&full_href));
        body.push_str(r#"">"#);
        body.push_str(&escape_text(&a.title));
        body.push_str("</a>");
        body.push_str("</p>\n");
    }

    body
}

/// Render a complete listing page around the grouped article body.
pub fn render_listing_page(
    heading: &str,
    articles: &[Article],
    head_common: &str,
    head_fragment: &str,
    href_prefix: &str,
) -> String {
    let body = render_listing_body(articles, href_prefix);
    crate::templates::listing_page(heading, &body, head_common, head_fragment, href_prefix)
}

#[cfg(test)]
mod tests;
