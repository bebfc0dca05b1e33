use std::env::{self, current_dir};

use axum::Router;
use color_eyre::Section;
use libsitegen::{
    config::{CONFIG_FILE, INPUT_DIR, OUTPUT_DIR},
    pipeline::{build_at, build_once},
};
use notify::{EventKind, RecursiveMode, Watcher};
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    if env::args().any(|a| a == "serve") {
        serve().await?;
    } else {
        build_once()?;
    }

    Ok(())
}

async fn serve() -> color_eyre::Result<()> {
    info!("building site");
    build_once()?;

    let current_dir = current_dir().with_note(|| "While getting the current working directory")?;
    let public_dir = current_dir.join(OUTPUT_DIR);
    let contents_dir = current_dir.join(INPUT_DIR);
    let config_src = current_dir.join(CONFIG_FILE);
    let css_src = current_dir.join("style.css");

    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    let watch_root = current_dir.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                // Ignore Access events (triggered when reading files) to
                // prevent infinite loops
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }

                info!("change detected, rebuilding");
                // Build errors must not kill the server in watch mode.
                if let Err(e) = build_at(&watch_root) {
                    error!("build failed: {e}");
                } else {
                    info!("rebuild complete");
                    reloader.reload();
                }
            }
            Err(e) => error!("watch error: {e}"),
        }
    })?;

    watcher.watch(&contents_dir, RecursiveMode::Recursive)?;
    if config_src.exists() {
        watcher.watch(&config_src, RecursiveMode::NonRecursive)?;
    }
    if css_src.exists() {
        watcher.watch(&css_src, RecursiveMode::NonRecursive)?;
    }

    let app = Router::new()
        .fallback_service(ServeDir::new(public_dir))
        .layer(livereload);

    info!("serving on http://localhost:3000");
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    axum::serve(listener, app).await?;

    Ok(())
}
