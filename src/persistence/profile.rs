//! Profile document: scores, milestones and settings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::highscores::Leaderboard;
use crate::settings::Settings;

/// Current on-disk format
pub const CURRENT_VERSION: u32 = 2;

/// Lifetime totals accumulated across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestones {
    pub total_asteroids_destroyed: u64,
    pub total_bombs_used: u64,
    pub total_pickups_collected: u64,
    /// Seconds
    pub total_time_survived: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub high_score: u64,
    pub leaderboard: Leaderboard,
    pub milestones: Milestones,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub version: u32,
    pub scores: Scores,
    pub settings: Settings,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            scores: Scores::default(),
            settings: Settings::default(),
        }
    }
}

impl Profile {
    /// Parse a profile of any version, upgrading it to the current format
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        let version = raw.get("version").and_then(Value::as_u64).unwrap_or(0);
        let raw = if version < CURRENT_VERSION as u64 {
            migrate(raw)
        } else {
            raw
        };
        let mut profile: Profile = serde_json::from_value(raw)?;
        if version != CURRENT_VERSION as u64 {
            log::info!(
                "Profile migrated from version {} to {}",
                version,
                CURRENT_VERSION
            );
        }
        profile.version = CURRENT_VERSION;
        profile.normalize();
        Ok(profile)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp settings and re-sort the leaderboard after loading
    pub fn normalize(&mut self) {
        self.settings = std::mem::take(&mut self.settings).sanitized();
        self.scores.leaderboard.normalize();
        if let Some(top) = self.scores.leaderboard.top_score() {
            self.scores.high_score = self.scores.high_score.max(top);
        }
    }
}

/// Upgrade a pre-v2 document in place
///
/// Older saves stored leaderboard timestamps as ISO-8601 strings and had no
/// milestones; timestamps that are not unix seconds become 0 and milestones
/// are filled in by serde defaults.
fn migrate(mut raw: Value) -> Value {
    let entries = raw
        .get_mut("scores")
        .and_then(|s| s.get_mut("leaderboard"))
        .and_then(Value::as_array_mut);
    if let Some(entries) = entries {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            let numeric = entry.get("timestamp").is_some_and(Value::is_u64);
            if !numeric {
                entry.insert("timestamp".to_string(), Value::from(0u64));
            }
        }
    }
    raw
}
