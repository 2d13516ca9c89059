//! SQLite gym store.
//!
//! Schema is created on open. `update` writes the enrichment subset and
//! stamps `enriched_at`; phone uses COALESCE so a candidate without one
//! keeps the existing number.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use gymscout_core::error::{GymScoutError, Result};
use gymscout_core::traits::GymStore;
use gymscout_core::types::{GymRecord, GymUpdate};

pub struct SqliteGymStore {
    conn: Mutex<Connection>,
}

impl SqliteGymStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn =
            Connection::open(path).map_err(|e| GymScoutError::Store(e.to_string()))?;
        Self::init(conn)
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| GymScoutError::Store(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS gyms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL DEFAULT '',
                phone TEXT,
                latitude REAL NOT NULL DEFAULT 0,
                longitude REAL NOT NULL DEFAULT 0,
                facilities TEXT,
                operating_hours TEXT,
                has_gx INTEGER NOT NULL DEFAULT 0,
                has_pt INTEGER NOT NULL DEFAULT 0,
                has_group_pt INTEGER NOT NULL DEFAULT 0,
                has_parking INTEGER NOT NULL DEFAULT 0,
                has_shower INTEGER NOT NULL DEFAULT 0,
                enriched_at TEXT
            );",
        )
        .map_err(|e| GymScoutError::Store(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a gym by name (seeding helper). Returns the new row id.
    pub fn insert(&self, name: &str, address: &str) -> Result<i64> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GymScoutError::Store(e.to_string()))?;
        conn.execute(
            "INSERT INTO gyms (name, address) VALUES (?1, ?2)",
            rusqlite::params![name, address],
        )
        .map_err(|e| GymScoutError::Store(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    pub fn count(&self) -> usize {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.query_row("SELECT COUNT(*) FROM gyms", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }
}

fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl GymStore for SqliteGymStore {
    async fn find_all(&self) -> Result<Vec<GymRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GymScoutError::Store(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, address, phone, latitude, longitude, facilities,
                        operating_hours, has_gx, has_pt, has_group_pt, has_parking,
                        has_shower, enriched_at
                 FROM gyms ORDER BY id",
            )
            .map_err(|e| GymScoutError::Store(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(GymRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    phone: row.get(3)?,
                    latitude: row.get(4)?,
                    longitude: row.get(5)?,
                    facilities: row.get(6)?,
                    operating_hours: row.get(7)?,
                    has_gx: row.get(8)?,
                    has_pt: row.get(9)?,
                    has_group_pt: row.get(10)?,
                    has_parking: row.get(11)?,
                    has_shower: row.get(12)?,
                    enriched_at: parse_timestamp(row.get(13)?),
                })
            })
            .map_err(|e| GymScoutError::Store(e.to_string()))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| GymScoutError::Store(e.to_string()))
    }

    async fn update(&self, id: i64, update: &GymUpdate) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GymScoutError::Store(e.to_string()))?;
        let changed = conn
            .execute(
                "UPDATE gyms SET
                    address = ?1,
                    phone = COALESCE(?2, phone),
                    latitude = ?3,
                    longitude = ?4,
                    facilities = ?5,
                    has_gx = ?6,
                    has_pt = ?7,
                    has_group_pt = ?8,
                    has_parking = ?9,
                    has_shower = ?10,
                    enriched_at = ?11
                 WHERE id = ?12",
                rusqlite::params![
                    update.address,
                    update.phone,
                    update.latitude,
                    update.longitude,
                    update.facilities,
                    update.has_gx,
                    update.has_pt,
                    update.has_group_pt,
                    update.has_parking,
                    update.has_shower,
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .map_err(|e| GymScoutError::Store(e.to_string()))?;

        if changed == 0 {
            return Err(GymScoutError::Store(format!("no gym with id {id}")));
        }
        Ok(())
    }
}
