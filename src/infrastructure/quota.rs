//! File-backed daily engine usage accounting.
//!
//! One JSON file keyed by calendar day, each day holding per-engine task
//! and fix attempt counters. The read-increment-write sequence runs under
//! an exclusive file lock, so concurrent orchestrator processes cannot
//! lose increments; the limits remain a soft guardrail, not hard quota
//! enforcement. All operations are best-effort: failures are logged and
//! swallowed.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::models::Engine;
use crate::domain::ports::QuotaTracker;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct UsageRecord {
    #[serde(default)]
    tasks: u64,
    #[serde(default)]
    fixes: u64,
}

impl UsageRecord {
    fn total(&self) -> u64 {
        self.tasks + self.fixes
    }
}

type QuotaData = BTreeMap<String, BTreeMap<Engine, UsageRecord>>;

enum AttemptKind {
    Task,
    Fix,
}

/// Quota store persisting to a single JSON file.
pub struct FileQuotaStore {
    path: PathBuf,
    limits: BTreeMap<Engine, u64>,
}

impl FileQuotaStore {
    pub fn new(path: PathBuf, limits: BTreeMap<Engine, u64>) -> Self {
        Self { path, limits }
    }

    /// `~/.hermes/quota.json`, falling back to the current directory when
    /// no home directory is resolvable.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hermes")
            .join("quota.json")
    }

    fn today() -> String {
        chrono::Local::now().date_naive().to_string()
    }

    fn record(&self, engine: Engine, kind: &AttemptKind) {
        if let Err(err) = self.record_inner(engine, kind) {
            warn!(engine = %engine, error = %err, "failed to record engine usage");
        }
    }

    fn record_inner(&self, engine: Engine, kind: &AttemptKind) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        FileExt::lock_exclusive(&file)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let mut data: QuotaData = serde_json::from_str(&contents).unwrap_or_default();

        let record = data
            .entry(Self::today())
            .or_default()
            .entry(engine)
            .or_default();
        match kind {
            AttemptKind::Task => record.tasks += 1,
            AttemptKind::Fix => record.fixes += 1,
        }

        let serialized = serde_json::to_string_pretty(&data)?;
        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(serialized.as_bytes())?;
        FileExt::unlock(&file)?;
        Ok(())
    }

    fn read_usage(&self, engine: Engine) -> std::io::Result<u64> {
        let mut file = match OpenOptions::new().read(true).open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err),
        };
        FileExt::lock_shared(&file)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let data: QuotaData = serde_json::from_str(&contents).unwrap_or_default();
        FileExt::unlock(&file)?;

        Ok(data
            .get(&Self::today())
            .and_then(|day| day.get(&engine))
            .map(UsageRecord::total)
            .unwrap_or(0))
    }
}

impl QuotaTracker for FileQuotaStore {
    fn record_task(&self, engine: Engine) {
        self.record(engine, &AttemptKind::Task);
    }

    fn record_fix(&self, engine: Engine) {
        self.record(engine, &AttemptKind::Fix);
    }

    fn usage(&self, engine: Engine) -> u64 {
        self.read_usage(engine).unwrap_or_else(|err| {
            warn!(engine = %engine, error = %err, "failed to read engine usage");
            0
        })
    }

    fn exceeded(&self) -> bool {
        self.limits
            .iter()
            .any(|(engine, limit)| self.usage(*engine) >= *limit)
    }
}
