use super::traits::{AggregateStore, StoreFuture};
use super::types::{RatingAggregate, RatingEvent, StoredRating};
use crate::catalog::Catalog;
use crate::error::StoreError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Flat JSON-lines backend. Each line is one complete rating event, so an
/// event is either fully on disk or absent. Aggregates are rebuilt by replay
/// on open and kept in memory afterwards.
pub struct TextLogStore {
    path: PathBuf,
    state: Mutex<LogState>,
}

#[derive(Default)]
struct LogState {
    aggregates: BTreeMap<(String, String), RatingAggregate>,
    events: Vec<StoredRating>,
    next_id: i64,
    /// Byte length of the acknowledged prefix of the log file
    committed_len: u64,
}

impl LogState {
    fn apply(&mut self, stored: StoredRating) {
        let rating = stored.event.rating.value();
        for (category, tag) in stored.event.selections.pairs() {
            let aggregate = self
                .aggregates
                .entry((category.to_string(), tag.to_string()))
                .or_insert_with(|| RatingAggregate::empty(category, tag));
            aggregate.total_score += rating;
            aggregate.rating_count += 1;
        }
        self.next_id = self.next_id.max(stored.id + 1);
        self.events.push(stored);
    }
}

impl TextLogStore {
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let mut state = LogState {
            next_id: 1,
            ..LogState::default()
        };

        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let valid_len = replay(&contents, &mut state)?;
                state.committed_len = valid_len as u64;
                if valid_len < contents.len() {
                    // Drop the partial write so the next append starts on a clean line.
                    let file = tokio::fs::OpenOptions::new()
                        .write(true)
                        .open(path)
                        .await
                        .map_err(StoreError::Io)?;
                    file.set_len(valid_len as u64).await.map_err(StoreError::Io)?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StoreError::Io(e))
                    .with_context(|| format!("Failed to read rating log: {}", path.display()));
            }
        }

        tracing::debug!(
            path = %path.display(),
            events = state.events.len(),
            "rating log replayed"
        );

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    /// Append one line after the acknowledged prefix. Bytes past
    /// `committed_len` are leftovers of a failed write and are cut first; a
    /// write that fails part-way is cut back to `committed_len`.
    async fn append_line(&self, line: &str, committed_len: u64) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open rating log: {}", self.path.display()))?;

        let on_disk = file.metadata().await.map_err(StoreError::Io)?.len();
        if on_disk < committed_len {
            return Err(StoreError::CorruptLog {
                line: 0,
                message: format!(
                    "log shrank to {on_disk} bytes, {committed_len} were acknowledged"
                ),
            }
            .into());
        }
        if on_disk > committed_len {
            tracing::warn!(
                path = %self.path.display(),
                dropped = on_disk - committed_len,
                "dropping unacknowledged bytes from rating log"
            );
            file.set_len(committed_len).await.map_err(StoreError::Io)?;
        }

        if let Err(e) = write_synced(&mut file, line).await {
            if let Err(rollback) = file.set_len(committed_len).await {
                tracing::error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "failed to roll back partial rating log append"
                );
            }
            return Err(StoreError::Io(e).into());
        }
        Ok(())
    }
}

async fn write_synced(file: &mut File, line: &str) -> std::io::Result<()> {
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    file.sync_data().await
}

/// Replay every line into `state`. Returns the byte length of the valid
/// prefix. A malformed final line is a torn write and is skipped; a
/// malformed line anywhere else is corruption.
fn replay(contents: &str, state: &mut LogState) -> Result<usize> {
    let mut offset = 0usize;
    let mut lines = contents.split_inclusive('\n').enumerate().peekable();

    while let Some((index, raw)) = lines.next() {
        let line = raw.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            offset += raw.len();
            continue;
        }

        match serde_json::from_str::<StoredRating>(line) {
            Ok(stored) => {
                state.apply(stored);
                offset += raw.len();
            }
            Err(e) if lines.peek().is_none() => {
                tracing::warn!(line = index + 1, error = %e, "skipping truncated rating log line");
                return Ok(offset);
            }
            Err(e) => {
                return Err(StoreError::CorruptLog {
                    line: index + 1,
                    message: e.to_string(),
                }
                .into());
            }
        }
    }

    Ok(offset)
}

impl AggregateStore for TextLogStore {
    fn name(&self) -> &str {
        "text_log"
    }

    fn seed<'a>(&'a self, catalog: &'a Catalog) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            for category in catalog.categories() {
                for tag in &category.tags {
                    state
                        .aggregates
                        .entry((category.name.clone(), tag.name.clone()))
                        .or_insert_with(|| RatingAggregate::empty(&category.name, &tag.name));
                }
            }
            Ok(())
        })
    }

    fn aggregates<'a>(&'a self, category: &'a str) -> StoreFuture<'a, Vec<RatingAggregate>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state
                .aggregates
                .values()
                .filter(|a| a.category == category)
                .cloned()
                .collect())
        })
    }

    fn record_event<'a>(&'a self, event: &'a RatingEvent) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            // Held across the append so replay order matches id order.
            let mut state = self.state.lock().await;
            let stored = StoredRating {
                id: state.next_id,
                event: event.clone(),
            };
            let mut line =
                serde_json::to_string(&stored).context("Failed to serialize rating event")?;
            line.push('\n');

            self.append_line(&line, state.committed_len).await?;
            state.committed_len += line.len() as u64;
            state.apply(stored);
            Ok(())
        })
    }

    fn recent_events(&self, limit: usize) -> StoreFuture<'_, Vec<StoredRating>> {
        Box::pin(async move {
            let state = self.state.lock().await;
            Ok(state.events.iter().rev().take(limit).cloned().collect())
        })
    }
}
