use crate::auth::maybe_login;
use crate::context::CrawlContext;
use crate::download::download;
use crate::fetch::fetch_page;
use crate::page::{normalize_http_url, resolve_against_host, Page};
use crate::slug::slugify;
use crate::{CrawlError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output root plus the thread's slug; fixed for the whole walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContext {
    pub output_root: PathBuf,
    pub slug: String,
}

impl ThreadContext {
    pub fn thread_dir(&self) -> PathBuf {
        self.output_root.join(&self.slug)
    }

    pub fn page_dir(&self, page_number: usize) -> PathBuf {
        self.thread_dir().join(page_number.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WalkOutcome {
    /// The last page had no "next" link.
    Completed,
    /// A page could not be fetched; pages before it stay on disk.
    Aborted { url: String, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct WalkSummary {
    pub thread_dir: Option<String>,
    pub pages_visited: usize,
    pub assets_downloaded: usize,
    pub assets_failed: usize,
    pub outcome: WalkOutcome,
}

impl WalkSummary {
    fn new() -> Self {
        Self {
            thread_dir: None,
            pages_visited: 0,
            assets_downloaded: 0,
            assets_failed: 0,
            outcome: WalkOutcome::Completed,
        }
    }

    fn abort(mut self, err: CrawlError) -> Result<Self> {
        match err {
            CrawlError::FetchFailed { url, reason, .. } => {
                warn!(%url, %reason, "thread walk aborted");
                self.outcome = WalkOutcome::Aborted { url, reason };
                Ok(self)
            }
            other => Err(other),
        }
    }
}

/// Walks a thread from `start_url`, page by page, mirroring it under
/// `output_root/<slug>/<page>/`.
///
/// A page that cannot be fetched ends the walk with [`WalkOutcome::Aborted`]. Missing
/// title or pagination markup is returned as [`CrawlError::StructuralMismatch`].
pub fn walk_thread(ctx: &mut CrawlContext, start_url: &str, output_root: &Path) -> Result<WalkSummary> {
    let start_url = normalize_http_url(start_url)?.to_string();
    let summary = WalkSummary::new();

    let first = match fetch_page(ctx, &start_url) {
        Ok(page) => page,
        Err(err) => return summary.abort(err),
    };
    let first = maybe_login(ctx, first)?;

    let thread = ThreadContext {
        output_root: output_root.to_path_buf(),
        slug: slugify(&first.thread_title()?),
    };
    std::fs::create_dir_all(thread.thread_dir())?;

    walk_pages(ctx, &thread, first, summary)
}

fn walk_pages(
    ctx: &mut CrawlContext,
    thread: &ThreadContext,
    first: Page,
    mut summary: WalkSummary,
) -> Result<WalkSummary> {
    summary.thread_dir = Some(thread.thread_dir().to_string_lossy().to_string());
    let mut visited: HashSet<String> = HashSet::new();
    let mut page = first;
    let mut page_number = 1_usize;

    loop {
        visited.insert(page.url().to_string());
        info!(url = page.url(), page = page_number, "processing page");

        let page_dir = thread.page_dir(page_number);
        std::fs::create_dir_all(&page_dir)?;
        summary.pages_visited += 1;

        for asset in ctx.extractor.extract(&page) {
            match download(ctx, &asset, &page_dir) {
                Ok(_) => summary.assets_downloaded += 1,
                Err(err) => {
                    warn!(url = %asset.url, error = %err, "skipping asset");
                    summary.assets_failed += 1;
                }
            }
        }

        let Some(href) = page.next_page_href()? else {
            return Ok(summary);
        };
        let next_url = resolve_against_host(page.url(), &href)?;
        if visited.contains(&next_url) {
            warn!(url = %next_url, "next page was already visited; stopping");
            return Ok(summary);
        }

        let next = match fetch_page(ctx, &next_url) {
            Ok(next) => next,
            Err(err) => return summary.abort(err),
        };
        page = maybe_login(ctx, next)?;
        page_number += 1;
    }
}
