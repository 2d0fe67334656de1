use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::queue::EventSender;
use super::types::{Snapshot, SourceMessage};
use crate::error::Result;

/// Fallback poll in case the platform watcher drops a notification
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Tails a JSON-lines file where every line is a full status snapshot
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl FileWatcher {
    /// Start watching `path`, delivering its latest line as the first snapshot
    pub fn spawn(path: impl AsRef<Path>, tx: EventSender) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        if !file_path.exists() {
            std::fs::write(&file_path, "")?;
        }

        // Coalescing wake-up channel; the notify callback runs on its own thread
        let (change_tx, mut change_rx) = mpsc::channel::<()>(1);
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if res.is_ok() {
                    let _ = change_tx.try_send(());
                }
            },
            Config::default(),
        )?;
        watcher.watch(&file_path, RecursiveMode::NonRecursive)?;

        let mut position = 0;
        let initial = read_new_lines(&file_path, &mut position)?;
        tracing::info!(path = %file_path.display(), lines = initial.len(), "watching snapshot file");

        let task = tokio::spawn(async move {
            if tx.send(SourceMessage::Connected).await.is_err() {
                return;
            }
            if let Some(latest) = initial.into_iter().last() {
                if tx.send(SourceMessage::Snapshot(latest)).await.is_err() {
                    return;
                }
            }

            let mut readable = true;
            let mut poll = tokio::time::interval(POLL_INTERVAL);
            loop {
                tokio::select! {
                    changed = change_rx.recv() => {
                        if changed.is_none() {
                            break;
                        }
                    }
                    _ = poll.tick() => {}
                }

                for message in poll_file(&file_path, &mut position, &mut readable) {
                    if tx.send(message).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// One read of the file as source messages.
///
/// Connectivity is reported on transitions only: `Disconnected` when a read
/// first fails, `Connected` on the first read that succeeds afterwards.
fn poll_file(path: &Path, position: &mut u64, readable: &mut bool) -> Vec<SourceMessage> {
    match read_new_lines(path, position) {
        Ok(snapshots) => {
            let mut messages = Vec::with_capacity(snapshots.len() + 1);
            if !*readable {
                tracing::info!(path = %path.display(), "snapshot file readable again");
                *readable = true;
                messages.push(SourceMessage::Connected);
            }
            messages.extend(snapshots.into_iter().map(SourceMessage::Snapshot));
            messages
        }
        Err(e) if *readable => {
            tracing::warn!(error = %e, "snapshot file unreadable");
            *readable = false;
            vec![SourceMessage::Disconnected(e.to_string())]
        }
        Err(_) => Vec::new(),
    }
}

/// Read complete lines appended since `last_position`
fn read_new_lines(path: &Path, last_position: &mut u64) -> Result<Vec<Snapshot>> {
    let mut snapshots = Vec::new();

    let mut file = File::open(path)?;
    let current_size = file.metadata()?.len();

    // If file was truncated, start from beginning
    if current_size < *last_position {
        *last_position = 0;
    }

    file.seek(SeekFrom::Start(*last_position))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        // A line without its newline is still being written
        if read == 0 || !line.ends_with('\n') {
            break;
        }
        *last_position += read as u64;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) => snapshots.push(Snapshot::from_value(&value)),
            Err(e) => tracing::warn!(error = %e, line = trimmed, "skipping unparseable snapshot line"),
        }
    }

    Ok(snapshots)
}
