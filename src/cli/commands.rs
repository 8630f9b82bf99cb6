use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::domain::FeedSnapshot;
use crate::normalizer::Normalizer;
use crate::stats::StatsView;
use crate::store::{SqliteStore, Store};
use crate::web;

pub async fn serve(mut config: Config, bind: Option<String>, open_browser: bool) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let ctx = Arc::new(AppContext::new(config)?);

    tracing::info!("Binding to {}", ctx.config.server.bind);
    let listener = TcpListener::bind(&ctx.config.server.bind).await?;

    if open_browser {
        let url = format!("{}/", ctx.config.server.public_url.trim_end_matches('/'));
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser at {}: {}", url, e);
        }
    }

    web::serve(ctx, listener).await
}

/// Prints each requested view as `"{count} {label}"` lines.
pub fn report(path: &Path, views: &[StatsView], out: &mut impl Write) -> Result<()> {
    let body = std::fs::read(path)?;
    let snapshot = FeedSnapshot::new(Normalizer::new().normalize(&body)?);

    writeln!(out, "{} posts in {}", snapshot.len(), path.display())?;
    for view in views {
        let report = view.report(&snapshot)?;
        writeln!(out, "\n{}", report.heading)?;
        for entry in &report.entries {
            writeln!(out, "{}", entry)?;
        }
    }

    Ok(())
}

pub fn db(config: &Config, out: &mut impl Write) -> Result<()> {
    let store = SqliteStore::new(AppContext::db_path(config)?)?;
    for tick in store.ping()? {
        writeln!(out, "Read from DB: {}", tick.to_rfc3339())?;
    }
    Ok(())
}
