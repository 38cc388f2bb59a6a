use crate::context::CrawlContext;
use crate::extract::ExtractedAsset;
use crate::{CrawlError, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Streams one asset into `output_dir`, retrying per the configured policy.
///
/// An existing file of the same name is overwritten. A failed attempt can leave
/// a partial file behind; the next attempt truncates it.
pub fn download(ctx: &CrawlContext, asset: &ExtractedAsset, output_dir: &Path) -> Result<PathBuf> {
    let url = asset.url.as_str();
    let Some(file_name) = asset.file_name() else {
        return Err(CrawlError::DownloadFailed {
            url: url.to_string(),
            attempts: 0,
            reason: "url has no file name".to_string(),
        });
    };
    let out_path = output_dir.join(file_name);

    let policy = ctx.config.retry_policy();
    let outcome = policy.run(|attempt| {
        debug!(url, attempt, "downloading asset");
        download_once(ctx, url, &out_path).map_err(|reason| {
            warn!(url, attempt, %reason, "asset download attempt failed");
            reason
        })
    });

    match outcome {
        Ok(bytes) => {
            info!(path = %out_path.display(), bytes, "downloaded");
            Ok(out_path)
        }
        Err(exhausted) => Err(CrawlError::DownloadFailed {
            url: url.to_string(),
            attempts: exhausted.attempts,
            reason: exhausted.last,
        }),
    }
}

fn download_once(ctx: &CrawlContext, url: &str, out_path: &Path) -> std::result::Result<u64, String> {
    let mut response = ctx
        .transport
        .get(&ctx.session, url)
        .map_err(|e| e.to_string())?;
    if !response.is_success() {
        return Err(format!("status={}", response.status));
    }

    let mut file = std::fs::File::create(out_path)
        .map_err(|e| format!("cannot create {}: {e}", out_path.display()))?;
    let mut buf = vec![0u8; ctx.config.chunk_size.max(1)];
    let mut total = 0_u64;
    loop {
        let n = response.body.read(&mut buf).map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(|e| e.to_string())?;
        total += n as u64;
    }
    file.flush().map_err(|e| e.to_string())?;
    Ok(total)
}
