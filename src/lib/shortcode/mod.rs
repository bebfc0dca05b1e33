//! Figure helpers for content images.
//!
//! Two entry points mirror the two ways this site hosts images: under the
//! local `/img/` root, or on a CDN where the delivery URL joins a cloud
//! name, an optional transformation segment, and the asset path. Both
//! render the same `<figure>` block. All attribute values are escaped
//! here; callers never pre-escape.

use std::fmt::Write as _;

use crate::utils::{escape_attr, escape_text};

/// Root under which locally-hosted content images live.
pub const IMG_ROOT: &str = "/img/";

const CDN_BASE: &str = "https://res.cloudinary.com";

/// Loading strategy for the rendered `<img>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Loading {
    /// Load immediately, with high fetch priority. For above-the-fold art.
    Eager,
    #[default]
    Lazy,
}

/// Full description of one figure block.
pub struct FigureSpec<'a> {
    pub src: &'a str,
    pub srcset: Option<&'a str>,
    pub alt: &'a str,
    pub title: &'a str,
    pub loading: Loading,
    pub dimensions: Option<(u32, u32)>,
    /// Pre-rendered caption HTML; empty means no `<figcaption>`.
    pub caption_html: &'a str,
}

/// Render a figure for an image stored under the site's `/img/` root.
pub fn figure_image(path: &str, title: &str, caption: &str) -> String {
    let src = format!("{IMG_ROOT}{}", path.trim_start_matches('/'));
    render_figure(&FigureSpec {
        src: &src,
        srcset: None,
        alt: title,
        title: "",
        loading: Loading::Lazy,
        dimensions: None,
        caption_html: &escape_text(caption),
    })
}

/// Render a figure for a CDN-hosted image. The `srcset` carries a
/// `dpr_2.0` variant so dense displays get the retina rendition without
/// any client-side swapping.
pub fn cdn_figure_image(
    cloud_name: &str,
    transforms: Option<&str>,
    path: &str,
    title: &str,
    caption: &str,
) -> String {
    let src = cdn_url(cloud_name, transforms, path);
    let srcset = cdn_srcset(cloud_name, transforms, path);
    render_figure(&FigureSpec {
        src: &src,
        srcset: Some(&srcset),
        alt: title,
        title: "",
        loading: Loading::Lazy,
        dimensions: None,
        caption_html: &escape_text(caption),
    })
}

/// Build a CDN delivery URL: base, cloud name, upload prefix, optional
/// transformation segment, then the asset path.
pub fn cdn_url(cloud_name: &str, transforms: Option<&str>, path: &str) -> String {
    let path = path.trim_start_matches('/');
    match transforms {
        Some(t) if !t.is_empty() => {
            format!("{CDN_BASE}/{cloud_name}/image/upload/{t}/{path}")
        }
        _ => format!("{CDN_BASE}/{cloud_name}/image/upload/{path}"),
    }
}

/// `srcset` pairing the 1x delivery URL with a `dpr_2.0` 2x variant.
pub fn cdn_srcset(cloud_name: &str, transforms: Option<&str>, path: &str) -> String {
    let one_x = cdn_url(cloud_name, transforms, path);
    let dpr = match transforms {
        Some(t) if !t.is_empty() => format!("{t},dpr_2.0"),
        _ => "dpr_2.0".to_string(),
    };
    let two_x = cdn_url(cloud_name, Some(&dpr), path);
    format!("{one_x} 1x, {two_x} 2x")
}

/// Render the `<figure>` block itself.
pub fn render_figure(spec: &FigureSpec<'_>) -> String {
    let mut html = String::new();
    let _ = write!(html, r#"<figure><img src="{}""#, escape_attr(spec.src));

    if let Some(srcset) = spec.srcset {
        let _ = write!(html, r#" srcset="{}""#, escape_attr(srcset));
    }

    let _ = write!(html, r#" alt="{}""#, escape_attr(spec.alt));
    if !spec.title.is_empty() {
        let _ = write!(html, r#" title="{}""#, escape_attr(spec.title));
    }

    let loading = match spec.loading {
        Loading::Eager => "eager",
        Loading::Lazy => "lazy",
    };
    let _ = write!(html, r#" loading="{loading}" decoding="async""#);

    if let Some((w, h)) = spec.dimensions {
        let _ = write!(html, r#" width="{w}" height="{h}""#);
    }
    if spec.loading == Loading::Eager {
        html.push_str(r#" fetchpriority="high""#);
    }
    html.push_str(" />");

    if !spec.caption_html.is_empty() {
        let _ = write!(html, "<figcaption>{}</figcaption>", spec.caption_html);
    }
    html.push_str("</figure>");
    html
}

#[cfg(test)]
mod tests;
