use crate::context::CrawlContext;
use crate::page::Page;
use crate::{CrawlError, Result};
use tracing::{debug, warn};

/// GET a forum page with the context's session, retrying per the configured policy.
///
/// Error statuses, transport errors and unreadable bodies all count as failed attempts.
pub fn fetch_page(ctx: &CrawlContext, url: &str) -> Result<Page> {
    let policy = ctx.config.retry_policy();
    let outcome = policy.run(|attempt| {
        debug!(url, attempt, "fetching page");
        let response = ctx
            .transport
            .get(&ctx.session, url)
            .map_err(|e| e.to_string())?;
        if !response.is_success() {
            let reason = format!("status={}", response.status);
            warn!(url, attempt, %reason, "page fetch failed");
            return Err(reason);
        }
        response.into_text().map_err(|e| {
            warn!(url, attempt, error = %e, "page body read failed");
            e.to_string()
        })
    });

    match outcome {
        Ok(markup) => Ok(Page::parse(url, &markup)),
        Err(exhausted) => Err(CrawlError::FetchFailed {
            url: url.to_string(),
            attempts: exhausted.attempts,
            reason: exhausted.last,
        }),
    }
}
