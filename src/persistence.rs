/// High-score persistence behind a small trait so the game loop never
/// touches the filesystem directly.

use std::cell::Cell;
use std::path::PathBuf;

use log::warn;

use crate::error::Result;

pub trait HighScoreStore {
    fn load(&self) -> Result<u32>;
    fn save(&self, score: u32) -> Result<()>;
}

/// Load, treating any failure as a zero score.
pub fn load_or_zero(store: &dyn HighScoreStore) -> u32 {
    match store.load() {
        Ok(score) => score,
        Err(err) => {
            warn!("could not load high score, starting from 0: {}", err);
            0
        }
    }
}

/// Save, logging instead of failing.
pub fn save_logged(store: &dyn HighScoreStore, score: u32) {
    if let Err(err) = store.save(score) {
        warn!("could not save high score {}: {}", score, err);
    }
}

// ── File-backed ──────────────────────────────────────────────────────────────

/// Plain-text score file, `~/.galaga_shooter_score` by default.
#[derive(Clone, Debug)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileHighScoreStore { path: path.into() }
    }

    pub fn in_home() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(PathBuf::from(home).join(".galaga_shooter_score"))
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        Ok(text.trim().parse().unwrap_or(0))
    }

    fn save(&self, score: u32) -> Result<()> {
        std::fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Keeps the score in memory; used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    score: Cell<u32>,
    saves: Cell<u32>,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        MemoryHighScoreStore {
            score: Cell::new(score),
            saves: Cell::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32> {
        Ok(self.score.get())
    }

    fn save(&self, score: u32) -> Result<()> {
        self.score.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
