//! Profile persistence
//!
//! Features:
//! - Versioned JSON document with pass-through migration
//! - Atomic save (tmp sibling, then rename)
//! - Corruption recovery: an unreadable profile loads as defaults

pub mod profile;

pub use profile::{CURRENT_VERSION, Milestones, Profile, Scores};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::highscores::{HighScoreEntry, Leaderboard};
use crate::settings::{Settings, SettingsUpdate};
use crate::sim::RunSummary;
use crate::unix_timestamp;

/// Default profile location, relative to the working directory
pub const DEFAULT_PROFILE_PATH: &str = "save/profile.json";

/// A profile bound to its file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    pub profile: Profile,
}

impl ProfileStore {
    /// In-memory defaults for `path`; nothing is read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            profile: Profile::default(),
        }
    }

    /// Load the profile at `path`
    ///
    /// A missing file yields defaults. An unreadable or corrupt file also
    /// yields defaults, with a warning; it is overwritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let profile = match fs::read_to_string(&path) {
            Ok(text) => Profile::from_json(&text).unwrap_or_else(|e| {
                log::warn!("Corrupt profile {}: {e}; using defaults", path.display());
                Profile::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Profile::default(),
            Err(e) => {
                log::warn!("Cannot read profile {}: {e}; using defaults", path.display());
                Profile::default()
            }
        };
        Self { path, profile }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write atomically: `<name>.tmp` next to the target, then rename
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
        let encoded = self
            .profile
            .to_json()
            .context("failed encoding profile")?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded).with_context(|| format!("failed writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed replacing {}", self.path.display()))?;
        log::debug!("Profile saved to {}", self.path.display());
        Ok(())
    }

    pub fn high_score(&self) -> u64 {
        self.profile.scores.high_score
    }

    /// Raise the stored record; never lowers it
    pub fn set_high_score(&mut self, score: u64) {
        let scores = &mut self.profile.scores;
        scores.high_score = scores.high_score.max(score);
    }

    pub fn settings(&self) -> &Settings {
        &self.profile.settings
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.profile.scores.leaderboard
    }

    pub fn milestones(&self) -> &Milestones {
        &self.profile.scores.milestones
    }

    /// Record a finished run; returns the leaderboard rank if it placed
    pub fn submit_score(
        &mut self,
        name: &str,
        score: u64,
        level: u32,
        bombs_used: u32,
    ) -> Option<usize> {
        let rank = self.profile.scores.leaderboard.add_score(HighScoreEntry {
            name: name.to_string(),
            score,
            level,
            bombs_used,
            timestamp: unix_timestamp(),
        });
        self.set_high_score(score);
        rank
    }

    /// Add one run's totals to the lifetime milestones
    pub fn record_milestones(
        &mut self,
        asteroids_destroyed: u32,
        bombs_used: u32,
        pickups_collected: u32,
        time_survived: f32,
    ) {
        let m = &mut self.profile.scores.milestones;
        m.total_asteroids_destroyed += asteroids_destroyed as u64;
        m.total_bombs_used += bombs_used as u64;
        m.total_pickups_collected += pickups_collected as u64;
        m.total_time_survived += time_survived.max(0.0) as f64;
    }

    /// Submit the score and milestones of a finished run
    pub fn record_run(&mut self, summary: &RunSummary) -> Option<usize> {
        self.record_milestones(
            summary.asteroids_destroyed,
            summary.bombs_used,
            summary.pickups_collected,
            summary.time_survived,
        );
        let name = self.profile.settings.player_name.clone();
        self.submit_score(&name, summary.score, summary.level_reached, summary.bombs_used)
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.profile.settings.apply(update);
    }

    /// Replace settings wholesale (e.g. with a run's final settings)
    pub fn store_settings(&mut self, settings: &Settings) {
        self.profile.settings = settings.clone().sanitized();
    }
}
