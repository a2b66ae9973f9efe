#![deny(warnings)]

//! Persistence layer: JSON snapshots of profile, progress, and analytics.
//!
//! The persisted layout is a single document written whole after each
//! accepted event. Writes are last-write-wins with no transactional
//! guarantee between fields; a missing, corrupt, or version-mismatched file
//! degrades to a fresh snapshot rather than an error.

use arcade_core::{AnalyticsLog, GameId, GameProgress, UserProfile};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Version stamped into every snapshot; bumped on layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Default username for a fresh snapshot.
const DEFAULT_USERNAME: &str = "Player";

/// Errors produced when writing a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot could not be encoded.
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The whole persisted application state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Layout version; snapshots from other versions are discarded.
    pub version: u32,
    pub profile: UserProfile,
    /// Per-game progress records.
    pub progress: BTreeMap<GameId, GameProgress>,
    /// Best score per game.
    pub high_scores: BTreeMap<GameId, u32>,
    /// Ring of the most recent analytics events.
    pub analytics: AnalyticsLog,
}

impl Snapshot {
    /// A fresh snapshot with a default profile.
    pub fn fresh() -> Self {
        Self {
            version: SCHEMA_VERSION,
            profile: UserProfile::new(DEFAULT_USERNAME, Utc::now()),
            progress: BTreeMap::new(),
            high_scores: BTreeMap::new(),
            analytics: AnalyticsLog::new(),
        }
    }
}

/// File-backed snapshot storage.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Where the snapshot lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, falling back to a fresh one on any problem.
    pub fn load(&self) -> Snapshot {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no snapshot yet, starting fresh");
                return Snapshot::fresh();
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "snapshot unreadable, starting fresh");
                return Snapshot::fresh();
            }
        };
        match serde_json::from_str::<Snapshot>(&text) {
            Ok(snapshot) if snapshot.version == SCHEMA_VERSION => {
                debug!(path = %self.path.display(), "snapshot loaded");
                snapshot
            }
            Ok(snapshot) => {
                warn!(
                    found = snapshot.version,
                    expected = SCHEMA_VERSION,
                    "snapshot version mismatch, starting fresh"
                );
                Snapshot::fresh()
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "snapshot corrupt, starting fresh");
                Snapshot::fresh()
            }
        }
    }

    /// Write the whole snapshot, creating parent directories as needed.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
