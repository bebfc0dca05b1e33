use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use color_eyre::{Section, eyre::eyre};
use itertools::{Either, Itertools};
use minify_html::{Cfg, minify};
use pulldown_cmark::{Event, Options, Parser};
use tracing::info;
use walkdir::{DirEntry, WalkDir};

use crate::{
    article::{Article, render_listing_page},
    config::{INPUT_DIR, OUTPUT_DIR, POSTS_DIR, Site, TAGS_DIR},
    css::build_css,
    feed::write_feeds,
    header::Header,
    seo::{self, PageContext, PageKind},
    templates::page_shell,
    transformer::{
        WithTransformer,
        code_block::CodeHighlightTransformer,
        figure::{CdnConfig, FigureTransformer},
    },
    types::{Href, RelPath, Tag},
    utils::prefix_to_root,
};

type SourceDoc = (PathBuf, String);
type RenderedPage = (PathBuf, String);
type RenderOutcome = (Vec<RenderedPage>, Vec<Article>);

/// Build once into OUTPUT_DIR using the current working directory.
pub fn build_once() -> color_eyre::Result<()> {
    let root =
        std::env::current_dir().with_note(|| "While getting the current working directory")?;
    build_at(&root)
}

pub fn build_at(root: &Path) -> color_eyre::Result<()> {
    let ctx = BuildCtx::load_at(root)?;
    fs::create_dir_all(&ctx.output_dir)?;

    Pipeline::new(ctx)
        .discover()?
        .parse()?
        .render()?
        .emit()
}

struct BuildCtx {
    current_dir: PathBuf,
    input_dir: PathBuf,
    output_dir: PathBuf,
    site: Site,
    head_html: String,
    footer_html: String,
    parser_options: Options,
    min_cfg: Cfg,
}

impl BuildCtx {
    fn load_at(root: &Path) -> color_eyre::Result<Self> {
        let current_dir = root.to_path_buf();
        let input_dir = current_dir.join(INPUT_DIR);
        let output_dir = current_dir.join(OUTPUT_DIR);

        let site = Site::load(root)?;

        let head_html = fs::read_to_string(current_dir.join("header").with_extension("html"))
            .unwrap_or_default();
        let footer_html = fs::read_to_string(current_dir.join("footer").with_extension("html"))
            .unwrap_or_default();

        let mut options = Options::empty();
        options.insert(Options::ENABLE_GFM);
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_SUPERSCRIPT);
        options.insert(Options::ENABLE_SUBSCRIPT);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Ok(Self {
            current_dir,
            input_dir,
            output_dir,
            site,
            head_html,
            footer_html,
            parser_options: options,
            min_cfg: Cfg::new(),
        })
    }
}

fn discover_sources(ctx: &BuildCtx) -> color_eyre::Result<Vec<SourceDoc>> {
    let (dir_entries, errors): (Vec<DirEntry>, Vec<walkdir::Error>) =
        WalkDir::new(&ctx.input_dir)
            .sort_by_file_name()
            .into_iter()
            .partition_map(|r| match r {
                Ok(v) => Either::Left(v),
                Err(e) => Either::Right(e),
            });

    if !errors.is_empty() {
        return Err(eyre!("Failed to open some directory entries: {errors:?}"));
    }

    let (docs, errors): (Vec<SourceDoc>, Vec<(PathBuf, io::Error)>) = dir_entries
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .partition_map(|e| match fs::read_to_string(e.path()) {
            Ok(content) => Either::Left((e.path().to_path_buf(), content)),
            Err(err) => Either::Right((e.path().to_path_buf(), err)),
        });

    if !errors.is_empty() {
        return Err(eyre!("Failed to open some files: {errors:?}"));
    }

    info!(count = docs.len(), "discovered content files");
    Ok(docs)
}

fn parse_sources(
    ctx: &BuildCtx,
    sources: Vec<SourceDoc>,
) -> color_eyre::Result<Vec<SourceDoc>> {
    let mut parsed = Vec::with_capacity(sources.len());
    for (full_path, content) in sources {
        let rel_src = full_path
            .strip_prefix(&ctx.input_dir)
            .map(|p| p.to_owned())
            .map_err(|_| eyre!("Path outside input_dir"))?;
        parsed.push((rel_src, content));
    }
    Ok(parsed)
}

fn render_docs(ctx: &BuildCtx, items: Vec<SourceDoc>) -> color_eyre::Result<RenderOutcome> {
    let mut articles: Vec<Article> = Vec::new();
    let mut rendered_pages = Vec::new();

    for (rel_src, content) in items {
        let rel_out = PathBuf::from(POSTS_DIR)
            .join(&rel_src)
            .with_extension("html");
        let rel_out = RelPath::new(rel_out).ok_or_else(|| eyre!("Output path must be relative"))?;
        let out_path = ctx.output_dir.join(rel_out.as_path());

        let href = Href::from_rel(&rel_out);
        let prefix = prefix_to_root(rel_out.as_path());
        let css_href = format!("{prefix}style.css");

        let header = Header::try_from(content.as_str()).unwrap_or_default();
        let body_header = header.generate_body_head(&prefix);

        let parser = Parser::new_ext(content.as_str(), ctx.parser_options);
        let events: Vec<Event<'_>> = parser.collect();

        let transformed = events
            .into_iter()
            .with_transformer::<CodeHighlightTransformer<'_, _>>()
            .with_transformer::<FigureTransformer<_>>()
            .with_cdn(CdnConfig::from_site(&ctx.site))
            .with_asset_root(ctx.current_dir.clone());

        let mut rendered = String::new();
        pulldown_cmark::html::push_html(&mut rendered, transformed);

        let page = header.page_context(&format!("/{href}"));
        let fields = seo::derive(&ctx.site, &page);
        let mut head_fragment = seo::render_head(&fields, &ctx.site, page.kind);
        head_fragment.push_str(&format!(
            r#"
<link rel="stylesheet" href="{css_href}">"#
        ));

        let title = header
            .title()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| rel_out.as_path().to_string_lossy().to_string());

        let article = Article {
            title,
            ctime: header.ctime(),
            updated: header.mtime(),
            summary: header.description().map(ToOwned::to_owned),
            content_html: format!("{body_header}{rendered}"),
            href,
            tags: header.tags().0,
        };
        articles.push(article);

        let page_html = page_shell(
            &ctx.head_html,
            &head_fragment,
            &body_header,
            &rendered,
            &ctx.footer_html,
        );
        rendered_pages.push((out_path, page_html));
    }

    // Sort by time first, then title
    articles.sort_by(|a, b| b.ctime.cmp(&a.ctime).then_with(|| a.title.cmp(&b.title)));

    info!(pages = rendered_pages.len(), "rendered pages");
    Ok((rendered_pages, articles))
}

fn emit_docs(
    ctx: &BuildCtx,
    rendered: Vec<RenderedPage>,
    articles: &[Article],
) -> color_eyre::Result<()> {
    for (out_path, page_html) in rendered {
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out_path, minify(page_html.as_bytes(), &ctx.min_cfg))?;
    }

    build_index(ctx, articles)?;
    build_tag_indices(ctx, articles)?;

    write_feeds(&ctx.output_dir, articles, &ctx.site)?;

    // Minify and copy over style.css
    let stylesheet_in_path = ctx.current_dir.join("style").with_extension("css");
    if stylesheet_in_path.exists() {
        let stylesheet_out_path = ctx.output_dir.join("style").with_extension("css");
        let stylesheet = build_css(stylesheet_in_path.as_path())?;
        fs::write(stylesheet_out_path, stylesheet)?;
    }

    info!("site written to {}", ctx.output_dir.display());
    Ok(())
}

/// Head fragment for a listing page: derived metadata plus nothing else —
/// the listing template adds its own stylesheet link.
fn listing_head(ctx: &BuildCtx, url: &str, title: Option<&str>) -> String {
    let page = PageContext {
        url: url.to_string(),
        date: None,
        kind: PageKind::Website,
        title: title.map(ToOwned::to_owned),
        description: None,
        image: None,
    };
    let fields = seo::derive(&ctx.site, &page);
    seo::render_head(&fields, &ctx.site, page.kind)
}

fn build_index(ctx: &BuildCtx, articles: &[Article]) -> color_eyre::Result<()> {
    let index_rel = Path::new("index.html");
    let index_prefix = prefix_to_root(index_rel);

    // The front index is the site root; its canonical URL is the bare
    // site URL.
    let head_fragment = listing_head(ctx, "", None);

    let index_html = render_listing_page(
        "Index",
        articles,
        &ctx.head_html,
        &head_fragment,
        &index_prefix,
    );

    fs::write(
        ctx.output_dir.join("index.html"),
        minify(index_html.as_bytes(), &ctx.min_cfg),
    )?;
    Ok(())
}

fn build_tag_indices(ctx: &BuildCtx, articles: &[Article]) -> color_eyre::Result<()> {
    let mut by_tag: BTreeMap<Tag, Vec<Article>> = BTreeMap::new();
    for a in articles {
        for t in &a.tags {
            by_tag.entry(t.clone()).or_default().push(a.clone());
        }
    }

    let tags_dir = ctx.output_dir.join(TAGS_DIR);
    fs::create_dir_all(&tags_dir)?;
    for (tag, tagged) in by_tag {
        let tag_rel = PathBuf::from(TAGS_DIR).join(format!("{tag}.html"));
        let tag_prefix = prefix_to_root(&tag_rel);

        let heading = format!("Tag: {tag}");
        let head_fragment = listing_head(ctx, &format!("/{TAGS_DIR}/{tag}.html"), Some(&heading));

        let html = render_listing_page(
            &heading,
            &tagged,
            &ctx.head_html,
            &head_fragment,
            &tag_prefix,
        );

        fs::write(
            ctx.output_dir.join(tag_rel),
            minify(html.as_bytes(), &ctx.min_cfg),
        )?;
    }

    Ok(())
}

trait PipelineStage {}
/// Pipeline typestate driver
struct Pipeline<S: PipelineStage> {
    ctx: BuildCtx,
    state: S,
}

// initial state
impl Pipeline<()> {
    fn new(ctx: BuildCtx) -> Self {
        Self { ctx, state: () }
    }

    fn discover(self) -> color_eyre::Result<Pipeline<Discovered>> {
        let docs = discover_sources(&self.ctx)?;
        Ok(Pipeline {
            ctx: self.ctx,
            state: Discovered(docs),
        })
    }
}

struct Discovered(Vec<SourceDoc>);
impl PipelineStage for Discovered {}
struct Parsed(Vec<SourceDoc>);
impl PipelineStage for Parsed {}
struct Rendered {
    pages: Vec<RenderedPage>,
    articles: Vec<Article>,
}
impl PipelineStage for Rendered {}
impl PipelineStage for () {}

impl Pipeline<Discovered> {
    fn parse(self) -> color_eyre::Result<Pipeline<Parsed>> {
        let parsed = parse_sources(&self.ctx, self.state.0)?;
        Ok(Pipeline {
            ctx: self.ctx,
            state: Parsed(parsed),
        })
    }
}

impl Pipeline<Parsed> {
    fn render(self) -> color_eyre::Result<Pipeline<Rendered>> {
        let (pages, articles) = render_docs(&self.ctx, self.state.0)?;
        Ok(Pipeline {
            ctx: self.ctx,
            state: Rendered { pages, articles },
        })
    }
}

impl Pipeline<Rendered> {
    fn emit(self) -> color_eyre::Result<()> {
        emit_docs(&self.ctx, self.state.pages, &self.state.articles)
    }
}
