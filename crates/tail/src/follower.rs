//! Rotation-aware producer loop (spec §4.3).

use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tap_core::TailCursor;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::classify_io_error;
use crate::parser::LineParser;

pub const DEFAULT_TICK: Duration = Duration::from_millis(200);

/// Handle to a running [`follow`] producer. Dropping it leaves the task
/// running; call [`FollowerHandle::stop`] for a clean shutdown.
pub struct FollowerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl FollowerHandle {
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.join.await;
    }
}

/// Start following `path`, feeding parsed events to `sink` (C4's ingest
/// channel) under a logical `source_name` used only for log context.
pub fn follow(
    path: PathBuf,
    parser: Arc<dyn LineParser>,
    sink: mpsc::Sender<tap_core::AlertEvent>,
    source_name: String,
    tick: Duration,
) -> FollowerHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let join = tokio::spawn(run(path, parser, sink, source_name, tick, task_cancel));
    FollowerHandle { cancel, join }
}

struct FollowState {
    cursor: Option<TailCursor>,
    error_count: u64,
}

async fn run(
    path: PathBuf,
    parser: Arc<dyn LineParser>,
    sink: mpsc::Sender<tap_core::AlertEvent>,
    source_name: String,
    tick: Duration,
    cancel: CancellationToken,
) {
    let mut state = FollowState { cursor: None, error_count: 0 };
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(source = %source_name, path = %path.display(), "tail follower stopped");
                return;
            }
            _ = interval.tick() => {
                match tick_once(&path, &mut state, &parser, &sink).await {
                    Ok(()) => {}
                    Err(SinkClosed) => {
                        debug!(source = %source_name, "tail follower sink closed, stopping");
                        return;
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
struct SinkClosed;

async fn tick_once(
    path: &Path,
    state: &mut FollowState,
    parser: &Arc<dyn LineParser>,
    sink: &mpsc::Sender<tap_core::AlertEvent>,
) -> Result<(), SinkClosed> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "tail source file missing, skipping tick");
            return Ok(());
        }
        Err(e) => {
            let err = classify_io_error(e);
            debug!(path = %path.display(), error = %err, "tail tick stat failed");
            return Ok(());
        }
    };

    let inode = meta.ino();
    let size = meta.len();

    let needs_reset = match &state.cursor {
        Some(cursor) => cursor.is_rotation(inode, size),
        None => true,
    };
    if needs_reset {
        state.cursor = Some(TailCursor::new(path.to_path_buf(), inode));
    }
    let cursor = state.cursor.as_mut().expect("just initialized above");
    cursor.last_seen_size = size;

    if size <= cursor.offset {
        return Ok(());
    }

    let mut file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %classify_io_error(e), "tail open failed");
            return Ok(());
        }
    };
    if let Err(e) = file.seek(std::io::SeekFrom::Start(cursor.offset)).await {
        debug!(path = %path.display(), error = %classify_io_error(e), "tail seek failed");
        return Ok(());
    }
    let mut buf = Vec::new();
    if let Err(e) = file.read_to_end(&mut buf).await {
        debug!(path = %path.display(), error = %classify_io_error(e), "tail read failed");
        return Ok(());
    }

    let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
        // No complete line yet; leave offset untouched so the bytes are
        // re-read (with whatever gets appended) on the next tick.
        return Ok(());
    };
    let complete = &buf[..=last_newline];

    for line in complete.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(_) => {
                state.error_count += 1;
                continue;
            }
        };
        match parser.parse(text) {
            Ok(event) => {
                if sink.send(event).await.is_err() {
                    return Err(SinkClosed);
                }
            }
            Err(_) => {
                state.error_count += 1;
                warn!(path = %path.display(), errors = state.error_count, "tail line failed to parse");
            }
        }
    }

    cursor.offset += complete.len() as u64;
    Ok(())
}

#[cfg(test)]
#[path = "follower_tests.rs"]
mod tests;
