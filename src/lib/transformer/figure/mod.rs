use std::path::PathBuf;

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use crate::{
    config::Site,
    shortcode::{FigureSpec, IMG_ROOT, Loading, cdn_srcset, cdn_url, render_figure},
    transformer::Transformer,
};

/// CDN delivery settings, cloned out of the site configuration so the
/// transformer owns its state.
#[derive(Clone, Debug)]
pub struct CdnConfig {
    pub cloud_name: String,
    pub transforms: Option<String>,
}

impl CdnConfig {
    pub fn from_site(site: &Site) -> Option<Self> {
        site.cdn_cloud_name.as_ref().map(|cloud| Self {
            cloud_name: cloud.clone(),
            transforms: site.cdn_transforms.clone(),
        })
    }
}

/// Replaces Markdown images with `<figure>` blocks.
///
/// Destinations resolve three ways: `cdn:` prefixed paths go through the
/// CDN delivery URL (with a retina srcset), absolute `http(s)` URLs pass
/// through untouched, and everything else lands under the `/img/` root.
/// The first image on a page loads eagerly, the rest lazily. Local files
/// are probed for intrinsic dimensions and an `@2x` retina sibling when an
/// asset root is configured.
pub struct FigureTransformer<I> {
    inner: I,
    seen_first: bool,
    cdn: Option<CdnConfig>,
    asset_root: Option<PathBuf>,
}

impl<I> FigureTransformer<I> {
    /// Enable CDN delivery for `cdn:` destinations.
    pub fn with_cdn(mut self, cdn: Option<CdnConfig>) -> Self {
        self.cdn = cdn;
        self
    }

    /// Directory that local image paths are resolved against for dimension
    /// and retina-sibling probing.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    fn render_image(
        &self,
        dest: &str,
        title: &str,
        alt_text: &str,
        caption_html: &str,
        loading: Loading,
    ) -> String {
        if let Some(rest) = dest.strip_prefix("cdn:") {
            if let Some(cdn) = &self.cdn {
                let src = cdn_url(&cdn.cloud_name, cdn.transforms.as_deref(), rest);
                let srcset = cdn_srcset(&cdn.cloud_name, cdn.transforms.as_deref(), rest);
                return render_figure(&FigureSpec {
                    src: &src,
                    srcset: Some(&srcset),
                    alt: alt_text,
                    title,
                    loading,
                    dimensions: None,
                    caption_html,
                });
            }
            // No CDN configured: treat the path as a local asset.
            return self.render_local(rest, title, alt_text, caption_html, loading);
        }

        if dest.starts_with("http://") || dest.starts_with("https://") {
            return render_figure(&FigureSpec {
                src: dest,
                srcset: None,
                alt: alt_text,
                title,
                loading,
                dimensions: None,
                caption_html,
            });
        }

        self.render_local(dest, title, alt_text, caption_html, loading)
    }

    fn render_local(
        &self,
        path: &str,
        title: &str,
        alt_text: &str,
        caption_html: &str,
        loading: Loading,
    ) -> String {
        let src = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{IMG_ROOT}{path}")
        };

        let dimensions = self.probe_dimensions(&src);
        let srcset = self.retina_srcset(&src);

        render_figure(&FigureSpec {
            src: &src,
            srcset: srcset.as_deref(),
            alt: alt_text,
            title,
            loading,
            dimensions,
            caption_html,
        })
    }

    fn probe_dimensions(&self, src: &str) -> Option<(u32, u32)> {
        let root = self.asset_root.as_ref()?;
        let path = root.join(src.trim_start_matches('/'));
        imagesize::size(path)
            .ok()
            .map(|dim| (dim.width as u32, dim.height as u32))
    }

    /// `srcset` pointing at an `@2x` sibling, when one exists on disk.
    fn retina_srcset(&self, src: &str) -> Option<String> {
        let root = self.asset_root.as_ref()?;
        let (stem, ext) = src.rsplit_once('.')?;
        let retina = format!("{stem}@2x.{ext}");
        let on_disk = root.join(retina.trim_start_matches('/'));
        on_disk
            .exists()
            .then(|| format!("{src} 1x, {retina} 2x"))
    }
}

impl<'a, I> Iterator for FigureTransformer<I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.inner.next()?;

        match event {
            Event::Start(Tag::Image {
                link_type: _,
                dest_url,
                title,
                id: _,
            }) => {
                let loading = if self.seen_first {
                    Loading::Lazy
                } else {
                    Loading::Eager
                };
                self.seen_first = true;

                // Everything up to the matching end tag is the alt text,
                // which doubles as the caption.
                let mut alt_events = Vec::new();
                let mut nesting = 0;

                loop {
                    match self.inner.next() {
                        Some(Event::End(TagEnd::Image)) if nesting == 0 => break,
                        Some(e) => {
                            if let Event::Start(Tag::Image { .. }) = &e {
                                nesting += 1;
                            } else if let Event::End(TagEnd::Image) = &e {
                                nesting -= 1;
                            }
                            alt_events.push(e);
                        }
                        None => break,
                    }
                }

                let mut caption_html = String::new();
                pulldown_cmark::html::push_html(&mut caption_html, alt_events.iter().cloned());

                let mut alt_text = String::new();
                for e in &alt_events {
                    match e {
                        Event::Text(t) | Event::Code(t) => alt_text.push_str(t),
                        _ => {}
                    }
                }

                let html =
                    self.render_image(&dest_url, &title, &alt_text, caption_html.trim_end(), loading);
                Some(Event::Html(CowStr::from(html)))
            }
            other => Some(other),
        }
    }
}

impl<'a, I> Transformer<'a, I> for FigureTransformer<I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn transform(inner: I) -> Self {
        Self {
            inner,
            seen_first: false,
            cdn: None,
            asset_root: None,
        }
    }
}
