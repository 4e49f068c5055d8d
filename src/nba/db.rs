use crate::nba::endpoints::{CommonAllPlayers, StatsTransport};
use crate::nba::params::Season;
use crate::nba::static_data;

use anyhow::{anyhow, Result};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex, time::Instant};

/// One row of the `commonallplayers` result set, as kept in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub person_id: i64,
    pub full_name: String,
    pub is_active: bool,
    pub team_id: i64,
}

/// Player names and ids, stored in SQLite after a `sync`. Until the table has
/// rows, lookups answer from the bundled player list.
pub struct Directory {
    conn: Mutex<Connection>,
}

impl Directory {
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS players (
                person_id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL,
                is_active INTEGER NOT NULL,
                team_id INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS players_full_name ON players (full_name COLLATE NOCASE);",
        )?;
        Ok(Directory { conn: Mutex::new(conn) })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().map_err(|_| anyhow!("player directory lock poisoned"))?;
        f(&mut conn)
    }

    pub fn player_count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM players", [], |r| r.get(0))?;
            Ok(n as usize)
        })
    }

    /// Replace the directory contents with `rows`.
    pub fn save_players(&self, rows: &[PlayerRow]) -> Result<()> {
        let load_start = Instant::now();
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM players", [])?;
            {
                let mut insert = tx.prepare(
                    "INSERT OR REPLACE INTO players (person_id, full_name, is_active, team_id) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for row in rows {
                    insert.execute(params![row.person_id, row.full_name, row.is_active, row.team_id])?;
                }
            }
            tx.commit()?;
            Ok(())
        })?;
        info!("saved {} players in {:?}", rows.len(), load_start.elapsed());
        Ok(())
    }

    /// Fetch `commonallplayers` and store it. Returns the number of players.
    pub fn sync(&self, transport: &dyn StatsTransport, season: &Season) -> Result<usize> {
        let endpoint = CommonAllPlayers { league_id: Default::default(), season: season.clone() };
        let rows = endpoint.fetch_players(transport)?;
        self.save_players(&rows)?;
        Ok(rows.len())
    }

    /// Full names of active players, sorted.
    pub fn active_players(&self) -> Result<Vec<String>> {
        if self.player_count()? == 0 {
            return Ok(static_data::active_player_names());
        }
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT full_name FROM players WHERE is_active = 1 ORDER BY full_name")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(names)
        })
    }

    /// Player id by full name, ignoring case.
    pub fn find_player_id(&self, full_name: &str) -> Result<Option<i64>> {
        if self.player_count()? == 0 {
            return Ok(static_data::find_player_id(full_name));
        }
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT person_id FROM players WHERE full_name = ?1 COLLATE NOCASE ORDER BY is_active DESC LIMIT 1",
                    params![full_name.trim()],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    /// Players whose name contains `keyword`.
    pub fn search_players(&self, keyword: &str) -> Result<Vec<PlayerRow>> {
        if self.player_count()? == 0 {
            let needle = keyword.to_lowercase();
            return Ok(static_data::PLAYERS
                .iter()
                .filter(|p| p.full_name.to_lowercase().contains(&needle))
                .map(|p| PlayerRow {
                    person_id: p.id,
                    full_name: p.full_name.to_string(),
                    is_active: true,
                    team_id: p.team_id,
                })
                .collect());
        }
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT person_id, full_name, is_active, team_id FROM players
                 WHERE full_name LIKE ?1 ORDER BY is_active DESC, full_name",
            )?;
            let pattern = format!("%{}%", keyword.trim());
            let rows = stmt
                .query_map(params![pattern], |row| {
                    Ok(PlayerRow {
                        person_id: row.get(0)?,
                        full_name: row.get(1)?,
                        is_active: row.get(2)?,
                        team_id: row.get(3)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<PlayerRow>>>()?;
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nba::endpoints::tests::StubTransport;
    use serde_json::json;

    fn rows() -> Vec<PlayerRow> {
        vec![
            PlayerRow { person_id: 1629029, full_name: "Luka Dončić".into(), is_active: true, team_id: 1610612747 },
            PlayerRow { person_id: 201939, full_name: "Stephen Curry".into(), is_active: true, team_id: 1610612744 },
            PlayerRow { person_id: 2544, full_name: "LeBron James".into(), is_active: true, team_id: 1610612747 },
            PlayerRow { person_id: 76375, full_name: "Wilt Chamberlain".into(), is_active: false, team_id: 0 },
        ]
    }

    #[test]
    fn reopening_keeps_the_players_table() {
        let path = crate::cache::tests::scratch_dir("db").with_extension("db");
        Directory::open(&path).unwrap().save_players(&rows()).unwrap();
        assert_eq!(Directory::open(&path).unwrap().player_count().unwrap(), 4);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_directory_answers_from_bundled_list() {
        let dir = Directory::open_in_memory().unwrap();
        assert_eq!(dir.player_count().unwrap(), 0);
        assert_eq!(dir.find_player_id("Luka Dončić").unwrap(), Some(1629029));
        assert!(dir.active_players().unwrap().contains(&"Luka Dončić".to_string()));
        assert!(!dir.search_players("curry").unwrap().is_empty());
    }

    #[test]
    fn saved_players_are_searchable() {
        let dir = Directory::open_in_memory().unwrap();
        dir.save_players(&rows()).unwrap();
        assert_eq!(dir.player_count().unwrap(), 4);
        assert_eq!(dir.find_player_id("stephen curry").unwrap(), Some(201939));
        assert_eq!(dir.find_player_id("Nobody Here").unwrap(), None);

        let hits = dir.search_players("Ch").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Wilt Chamberlain");
        assert!(!hits[0].is_active);
    }

    #[test]
    fn active_players_are_sorted_and_filtered() {
        let dir = Directory::open_in_memory().unwrap();
        dir.save_players(&rows()).unwrap();
        assert_eq!(
            dir.active_players().unwrap(),
            vec!["LeBron James".to_string(), "Luka Dončić".to_string(), "Stephen Curry".to_string()]
        );
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = Directory::open_in_memory().unwrap();
        dir.save_players(&rows()).unwrap();
        dir.save_players(&rows()[..1]).unwrap();
        assert_eq!(dir.player_count().unwrap(), 1);
    }

    #[test]
    fn sync_stores_fetched_players() {
        let transport = StubTransport::new(vec![Ok(json!({
            "resultSets": [{
                "name": "CommonAllPlayers",
                "headers": ["PERSON_ID", "DISPLAY_FIRST_LAST", "ROSTERSTATUS", "TEAM_ID"],
                "rowSet": [[1629029, "Luka Dončić", 1, 1610612747], [2544, "LeBron James", 1, 1610612747]]
            }]
        }))]);
        let dir = Directory::open_in_memory().unwrap();
        assert_eq!(dir.sync(&transport, &"2024-25".parse().unwrap()).unwrap(), 2);
        assert_eq!(dir.find_player_id("LeBron James").unwrap(), Some(2544));
    }
}
