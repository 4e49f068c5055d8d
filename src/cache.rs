//! Shot data cache: one pretty-printed JSON file per (player, team, season),
//! named after a hash of the query and expired by file age.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use crate::nba::params::Season;
use crate::shots::Shot;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: DateTime<Local>,
    player_id: i64,
    team_id: i64,
    season: Season,
    #[serde(default)]
    shot_data: Vec<Shot>,
}

pub struct ShotCache {
    dir: PathBuf,
    max_age: Duration,
}

pub fn cache_key(player_id: i64, team_id: i64, season: &Season) -> String {
    let key_string = format!("{}_{}_{}", player_id, team_id, season.as_str());
    format!("{:x}", Sha256::digest(key_string.as_bytes()))
}

impl ShotCache {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating cache directory {}", dir.display()))?;
        Ok(ShotCache { dir, max_age })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return false,
        };
        // a file stamped in the future counts as brand new
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        age < self.max_age
    }

    /// Cached shots for the query, if present and not expired. Unreadable
    /// entries count as a miss.
    pub fn get(&self, player_id: i64, team_id: i64, season: &Season) -> Option<Vec<Shot>> {
        let path = self.entry_path(&cache_key(player_id, team_id, season));
        if !self.is_fresh(&path) {
            debug!("cache miss for {}", path.display());
            return None;
        }
        match read_entry(&path) {
            Ok(entry) => {
                info!("shots loaded from cache (saved {})", entry.timestamp.to_rfc3339());
                Some(entry.shot_data)
            }
            Err(e) => {
                warn!("error reading cache entry {}: {:#}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, player_id: i64, team_id: i64, season: &Season, shots: &[Shot]) -> Result<()> {
        let path = self.entry_path(&cache_key(player_id, team_id, season));
        let entry = CacheEntry {
            timestamp: Local::now(),
            player_id,
            team_id,
            season: season.clone(),
            shot_data: shots.to_vec(),
        };
        let body = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        info!("{} shots saved to cache", shots.len());
        Ok(())
    }

    /// Remove every `.json` entry, leaving anything else in the directory.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        info!("cache cleared ({} entries)", removed);
        Ok(removed)
    }
}

fn read_entry(path: &Path) -> Result<CacheEntry> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
