use super::{ChangeEvent, ChangeFeed, ChangeKind, RemoteStore};
use crate::error::{Result, TagmarksError};
use crate::models::{Bookmark, NewBookmark, Owner};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 256;

const COLUMNS: &str = "id, user_id, url, title, tags, favicon, created_at";

/// Local SQLite-backed store
///
/// All owners share one table; every statement filters on `user_id`. Change
/// events go out on a broadcast channel once the write has committed.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    events: broadcast::Sender<ChangeEvent>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, db_path.to_path_buf())
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        setup_tables(&conn)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            events,
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TagmarksError::remote("database connection lock poisoned"))
    }

    fn notify(&self, kind: ChangeKind, owner: &Owner, id: &str) {
        // no subscribers is fine
        let _ = self.events.send(ChangeEvent {
            kind,
            owner: owner.clone(),
            id: id.to_string(),
        });
    }
}

fn setup_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookmarks (
            seq integer PRIMARY KEY AUTOINCREMENT,
            id text NOT NULL UNIQUE,
            user_id text NOT NULL,
            url text NOT NULL,
            title text NOT NULL,
            tags text NOT NULL DEFAULT '[]',
            favicon text DEFAULT NULL,
            created_at text NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_owner ON bookmarks (user_id, created_at)",
        [],
    )?;
    Ok(())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_bookmark(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    let tags: String = row.get(4)?;
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let created_at: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Bookmark {
        id: row.get(0)?,
        owner: Owner::new(row.get::<_, String>(1)?),
        url: row.get(2)?,
        title: row.get(3)?,
        tags,
        favicon: row.get(5)?,
        created_at: Some(created_at),
    })
}

fn get_rec(conn: &Connection, owner: &Owner, id: &str) -> rusqlite::Result<Option<Bookmark>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM bookmarks WHERE id = ?1 AND user_id = ?2"),
        params![id, owner.as_str()],
        row_to_bookmark,
    )
    .optional()
}

fn encode_tags(tags: &[String]) -> Result<String> {
    serde_json::to_string(tags).map_err(TagmarksError::remote)
}

fn not_found(id: &str, owner: &Owner) -> TagmarksError {
    TagmarksError::Remote(format!("bookmark {} not found for owner {}", id, owner))
}

#[async_trait]
impl RemoteStore for SqliteStore {
    async fn list(&self, owner: &Owner) -> Result<Vec<Bookmark>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM bookmarks WHERE user_id = ?1
                 ORDER BY created_at DESC, seq DESC"
            ))
            .map_err(TagmarksError::remote)?;
        let rows = stmt
            .query_map([owner.as_str()], row_to_bookmark)
            .map_err(TagmarksError::remote)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(TagmarksError::remote)?);
        }
        Ok(records)
    }

    async fn insert(&self, owner: &Owner, bookmark: NewBookmark) -> Result<Bookmark> {
        let record = Bookmark {
            id: Uuid::new_v4().to_string(),
            owner: owner.clone(),
            url: bookmark.url,
            title: bookmark.title,
            tags: bookmark.tags,
            favicon: bookmark.favicon,
            created_at: Some(Utc::now().trunc_subsecs(6)),
        };
        let created_at = record.created_at.as_ref().map(format_timestamp);

        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO bookmarks (id, user_id, url, title, tags, favicon, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    owner.as_str(),
                    record.url,
                    record.title,
                    encode_tags(&record.tags)?,
                    record.favicon,
                    created_at,
                ],
            )
            .map_err(TagmarksError::remote)?;
        }

        debug!("Inserted bookmark {} for {}", record.id, owner);
        self.notify(ChangeKind::Insert, owner, &record.id);
        Ok(record)
    }

    async fn update(&self, owner: &Owner, id: &str, bookmark: NewBookmark) -> Result<Bookmark> {
        let updated = {
            let conn = self.lock()?;
            let tx = conn.unchecked_transaction().map_err(TagmarksError::remote)?;

            let changed = tx
                .execute(
                    "UPDATE bookmarks SET url = ?1, title = ?2, tags = ?3, favicon = ?4
                     WHERE id = ?5 AND user_id = ?6",
                    params![
                        bookmark.url,
                        bookmark.title,
                        encode_tags(&bookmark.tags)?,
                        bookmark.favicon,
                        id,
                        owner.as_str(),
                    ],
                )
                .map_err(TagmarksError::remote)?;
            if changed == 0 {
                return Err(not_found(id, owner));
            }

            let updated = get_rec(&tx, owner, id)
                .map_err(TagmarksError::remote)?
                .ok_or_else(|| not_found(id, owner))?;
            tx.commit().map_err(TagmarksError::remote)?;
            updated
        };

        debug!("Updated bookmark {} for {}", id, owner);
        self.notify(ChangeKind::Update, owner, id);
        Ok(updated)
    }

    async fn delete(&self, owner: &Owner, id: &str) -> Result<()> {
        let changed = {
            let conn = self.lock()?;
            conn.execute(
                "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                params![id, owner.as_str()],
            )
            .map_err(TagmarksError::remote)?
        };
        if changed == 0 {
            return Err(not_found(id, owner));
        }

        debug!("Deleted bookmark {} for {}", id, owner);
        self.notify(ChangeKind::Delete, owner, id);
        Ok(())
    }

    async fn subscribe(&self, owner: &Owner) -> Result<ChangeFeed> {
        Ok(ChangeFeed::new(owner.clone(), self.events.subscribe()))
    }
}
