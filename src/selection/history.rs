use super::gating::HistoryCounts;
use super::types::Selection;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// One line of the prompt history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub created_at: DateTime<Utc>,
    pub prompt: String,
    /// Categories drawn for this generation
    pub categories: Vec<String>,
}

impl PromptRecord {
    pub fn new(prompt: impl Into<String>, selection: &Selection) -> Self {
        Self {
            created_at: Utc::now(),
            prompt: prompt.into(),
            categories: selection.categories().map(str::to_string).collect(),
        }
    }
}

/// Running counts over the complete lines read so far.
#[derive(Debug, Default)]
struct Tally {
    /// Byte offset just past the last complete line counted
    scanned: u64,
    lines: usize,
    total: u64,
    per_category: HashMap<String, u64>,
}

impl Tally {
    fn absorb(&mut self, chunk: &str) {
        for line in chunk.lines() {
            self.lines += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PromptRecord>(line) {
                Ok(record) => {
                    self.total += 1;
                    for category in record.categories {
                        *self.per_category.entry(category).or_default() += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(line = self.lines, error = %e, "skipping malformed prompt history line");
                }
            }
        }
    }
}

/// Append-only JSON-lines log of generated prompts. Feeds history gating.
pub struct PromptHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
    tally: Mutex<Tally>,
}

impl PromptHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            tally: Mutex::new(Tally::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &PromptRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("Failed to serialize prompt record")?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create prompt history directory")?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open prompt history {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .context("Failed to append prompt record")?;
        file.flush().await.context("Failed to flush prompt history")?;
        Ok(())
    }

    /// Every readable record, oldest first. Malformed lines are skipped.
    pub async fn records(&self) -> Result<Vec<PromptRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read prompt history {}", self.path.display())
                });
            }
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PromptRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "skipping malformed prompt history line");
                }
            }
        }
        Ok(records)
    }

    /// Total generations and how many of them drew `category`. Only lines
    /// appended since the previous call are parsed.
    pub async fn counts(&self, category: &str) -> Result<HistoryCounts> {
        let mut tally = self.tally.lock().await;
        let mut file = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                *tally = Tally::default();
                return Ok(HistoryCounts::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open prompt history {}", self.path.display())
                });
            }
        };

        let len = file
            .metadata()
            .await
            .context("Failed to stat prompt history")?
            .len();
        if len < tally.scanned {
            tracing::debug!(path = %self.path.display(), "prompt history shrank; recounting");
            *tally = Tally::default();
        }

        file.seek(SeekFrom::Start(tally.scanned))
            .await
            .context("Failed to seek prompt history")?;
        let mut tail = Vec::new();
        file.read_to_end(&mut tail)
            .await
            .context("Failed to read prompt history")?;

        // A line still being written is left for the next call.
        if let Some(end) = tail.iter().rposition(|b| *b == b'\n') {
            let complete = &tail[..=end];
            tally.absorb(&String::from_utf8_lossy(complete));
            tally.scanned += complete.len() as u64;
        }

        Ok(HistoryCounts {
            total: tally.total,
            with_primary: tally.per_category.get(category).copied().unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_log_counts_as_empty() {
        let tmp = TempDir::new().unwrap();
        let history = PromptHistory::new(tmp.path().join("prompt_history.log"));
        assert_eq!(history.counts("villain").await.unwrap(), HistoryCounts::default());
    }

    #[tokio::test]
    async fn counts_track_category_occurrences() {
        let tmp = TempDir::new().unwrap();
        let history = PromptHistory::new(tmp.path().join("nested/prompt_history.log"));

        let plain = Selection::new().with("actors", &["a wise old owl"]);
        let gated = plain.clone().with("villain", &["a cranky lady yelling"]);
        history.append(&PromptRecord::new("one", &plain)).await.unwrap();
        history.append(&PromptRecord::new("two", &gated)).await.unwrap();
        history.append(&PromptRecord::new("three", &plain)).await.unwrap();

        let counts = history.counts("villain").await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.with_primary, 1);

        let records = history.records().await.unwrap();
        assert_eq!(records[1].prompt, "two");
        assert_eq!(records[1].categories, vec!["actors", "villain"]);
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompt_history.log");
        let history = PromptHistory::new(&path);
        history
            .append(&PromptRecord::new("ok", &Selection::new().with("areas", &["at a dive bar"])))
            .await
            .unwrap();
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{\"created_at\": broken\n");
        std::fs::write(&path, contents).unwrap();

        assert_eq!(history.counts("areas").await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn counts_pick_up_lines_appended_after_a_previous_call() {
        let tmp = TempDir::new().unwrap();
        let history = PromptHistory::new(tmp.path().join("prompt_history.log"));
        let plain = Selection::new().with("actors", &["a wise old owl"]);
        let gated = plain.clone().with("villain", &["a cranky lady yelling"]);

        history.append(&PromptRecord::new("one", &plain)).await.unwrap();
        assert_eq!(
            history.counts("villain").await.unwrap(),
            HistoryCounts {
                total: 1,
                with_primary: 0
            }
        );

        history.append(&PromptRecord::new("two", &gated)).await.unwrap();
        history.append(&PromptRecord::new("three", &gated)).await.unwrap();
        assert_eq!(
            history.counts("villain").await.unwrap(),
            HistoryCounts {
                total: 3,
                with_primary: 2
            }
        );
        assert_eq!(history.counts("actors").await.unwrap().with_primary, 3);
    }

    #[tokio::test]
    async fn unfinished_line_is_counted_once_complete() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompt_history.log");
        let history = PromptHistory::new(&path);
        let selection = Selection::new().with("villain", &["a cranky lady yelling"]);
        history.append(&PromptRecord::new("one", &selection)).await.unwrap();

        let line = serde_json::to_string(&PromptRecord::new("two", &selection)).unwrap();
        let (head, rest) = line.split_at(10);
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str(head);
        std::fs::write(&path, &contents).unwrap();
        assert_eq!(history.counts("villain").await.unwrap().total, 1);

        contents.push_str(rest);
        contents.push('\n');
        std::fs::write(&path, &contents).unwrap();
        let counts = history.counts("villain").await.unwrap();
        assert_eq!((counts.total, counts.with_primary), (2, 2));
    }

    #[tokio::test]
    async fn truncated_log_is_recounted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prompt_history.log");
        let history = PromptHistory::new(&path);
        let selection = Selection::new().with("areas", &["at a dive bar"]);
        for prompt in ["one", "two"] {
            history.append(&PromptRecord::new(prompt, &selection)).await.unwrap();
        }
        assert_eq!(history.counts("areas").await.unwrap().total, 2);

        std::fs::write(&path, "").unwrap();
        history.append(&PromptRecord::new("fresh", &selection)).await.unwrap();
        assert_eq!(history.counts("areas").await.unwrap().total, 1);
    }
}
