//! Site-wide configuration: directory layout, feed limits, and the `Site`
//! metadata record loaded from `site.toml`.

use std::{fs, path::Path};

use color_eyre::Section;
use serde::Deserialize;

pub const INPUT_DIR: &str = "contents";
pub const OUTPUT_DIR: &str = "public";
pub const POSTS_DIR: &str = "posts";
pub const TAGS_DIR: &str = "tags";

/// Name of the per-project configuration file, looked up at the root.
pub const CONFIG_FILE: &str = "site.toml";

// Maximum number of items to include in feeds.
pub const FEED_ITEM_LIMIT: usize = 50;

/// Build-wide site metadata, loaded once per build and handed to whatever
/// needs it. Nothing reads this through a global.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Site {
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub author: String,
    pub locale: String,
    /// Base origin for absolute links. Normalized at load time to carry no
    /// trailing slash, so joining with a `/`-prefixed page URL is safe.
    pub url: String,
    /// Twitter handle, `@`-prefixed. May be empty.
    pub twitter: String,
    /// Cloud name for CDN-hosted images; unset means no CDN delivery.
    pub cdn_cloud_name: Option<String>,
    /// Transformation segment inserted into CDN delivery URLs.
    pub cdn_transforms: Option<String>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            tagline: "Yet another blog".to_string(),
            description: "Writing about code, the web, and everything in between".to_string(),
            author: "Site Author".to_string(),
            locale: "en_US".to_string(),
            url: "https://example.com".to_string(),
            twitter: "@example".to_string(),
            cdn_cloud_name: None,
            cdn_transforms: None,
        }
    }
}

impl Site {
    /// Load `site.toml` from the project root, falling back to the built-in
    /// defaults when the file is absent.
    pub fn load(root: &Path) -> color_eyre::Result<Self> {
        let path = root.join(CONFIG_FILE);
        let mut site = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_note(|| format!("While reading {}", path.display()))?;
            toml::from_str::<Site>(&raw)
                .with_note(|| format!("While parsing {}", path.display()))?
        } else {
            Self::default()
        };

        site.url = site.url.trim_end_matches('/').to_string();
        Ok(site)
    }
}

#[cfg(test)]
mod tests;
