//! Size-triggered event-log rotation (spec §4.6).

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tap_core::service::ServiceAction;
use tap_hostctl::HostAdapter;

use crate::error::RetentionError;

pub const DEFAULT_ROTATE_THRESHOLD_BYTES: u64 = 500 * 1024 * 1024;

/// If `path` exceeds `threshold_bytes`, rename it aside with a timestamp
/// suffix, gzip it in fixed-size chunks, and reload `reload_service` so its
/// producer reopens the (now-absent) original path. Returns the gzip path
/// if rotation happened.
pub async fn rotate_if_oversized(
    path: &Path,
    threshold_bytes: u64,
    host: &dyn HostAdapter,
    reload_service: &str,
) -> Result<Option<PathBuf>, RetentionError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if meta.len() < threshold_bytes {
        return Ok(None);
    }

    let suffix = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let rotated = path.with_file_name(format!(
        "{}.{suffix}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("eventlog")
    ));
    tokio::fs::rename(path, &rotated).await?;

    let gz_path = rotated.clone();
    let gz_path = tokio::task::spawn_blocking(move || gzip_in_place(&gz_path))
        .await
        .map_err(|_| RetentionError::Io(std::io::Error::other("gzip worker task panicked")))??;

    host.service_action(reload_service, ServiceAction::Reload).await?;
    Ok(Some(gz_path))
}

const CHUNK_SIZE: usize = 256 * 1024;

/// Gzip `src` to `src.gz` in fixed-size chunks (so multi-hundred-megabyte
/// files never load fully into memory), then remove the plaintext copy.
fn gzip_in_place(src: &Path) -> std::io::Result<PathBuf> {
    let dest = PathBuf::from(format!("{}.gz", src.display()));
    let mut reader = std::io::BufReader::new(std::fs::File::open(src)?);
    let output = std::fs::File::create(&dest)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        encoder.write_all(&buf[..read])?;
    }
    encoder.finish()?;
    std::fs::remove_file(src)?;
    Ok(dest)
}

#[cfg(test)]
#[path = "rotate_tests.rs"]
mod tests;
