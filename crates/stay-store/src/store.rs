//! # Document Store
//!
//! SQLite-backed collections of JSON documents. Each collection is one table
//! of `(id, body)` rows; the `_id` field callers see is the row id, spliced
//! into the body on the way out. Filters are JSON paths resolved with
//! `json_extract`, which keeps the store schema-less for everything except
//! the identifying fields.

use crate::results::{DeleteResult, InsertOneResult, UpdateResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use stay_core::{ApiError, ApiResult};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// The three collections of the booking marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Rooms,
    Bookings,
}

impl Collection {
    /// Backing table name
    pub fn table(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Rooms => "rooms",
            Collection::Bookings => "bookings",
        }
    }
}

/// Shared handle to the document database.
///
/// One connection for the process lifetime, behind a mutex. Callers never
/// hold the lock across an await point; every operation is a single
/// synchronous closure.
pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(ApiError::store)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(ApiError::store)?;

        init_schema(&conn)?;

        info!("Document store opened at {}", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests
    pub fn in_memory() -> ApiResult<Self> {
        let conn = Connection::open_in_memory().map_err(ApiError::store)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> ApiResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::Internal(format!("store lock poisoned: {e}")))?;
        f(&conn)
    }

    /// Insert one document, generating its id
    pub fn insert_one(&self, coll: Collection, doc: &Value) -> ApiResult<InsertOneResult> {
        let body = body_without_id(doc)?;
        let id = Uuid::new_v4().to_string();

        self.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", coll.table()),
                params![id, body],
            )
            .map_err(ApiError::store)?;
            Ok(())
        })?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Full collection scan
    pub fn find_all(&self, coll: Collection) -> ApiResult<Vec<Value>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT id, body FROM {} ORDER BY rowid", coll.table()))
                .map_err(ApiError::store)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(ApiError::store)?;

            let mut docs = Vec::new();
            for row in rows {
                let (id, body) = row.map_err(ApiError::store)?;
                docs.push(attach_id(&id, &body)?);
            }
            Ok(docs)
        })
    }

    /// Documents whose `json_path` field equals `key`
    pub fn find(&self, coll: Collection, json_path: &str, key: &str) -> ApiResult<Vec<Value>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT id, body FROM {} WHERE json_extract(body, ?1) = ?2 ORDER BY rowid",
                    coll.table()
                ))
                .map_err(ApiError::store)?;
            let rows = stmt
                .query_map(params![json_path, key], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(ApiError::store)?;

            let mut docs = Vec::new();
            for row in rows {
                let (id, body) = row.map_err(ApiError::store)?;
                docs.push(attach_id(&id, &body)?);
            }
            Ok(docs)
        })
    }

    /// First document whose `json_path` field equals `key`, if any
    pub fn find_one(
        &self,
        coll: Collection,
        json_path: &str,
        key: &str,
    ) -> ApiResult<Option<Value>> {
        self.with_conn(|conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    &format!(
                        "SELECT id, body FROM {} WHERE json_extract(body, ?1) = ?2 LIMIT 1",
                        coll.table()
                    ),
                    params![json_path, key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(ApiError::store)?;

            row.map(|(id, body)| attach_id(&id, &body)).transpose()
        })
    }

    /// Point lookup by generated id
    pub fn find_by_id(&self, coll: Collection, id: &str) -> ApiResult<Option<Value>> {
        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(
                    &format!("SELECT body FROM {} WHERE id = ?1", coll.table()),
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(ApiError::store)?;

            body.map(|b| attach_id(id, &b)).transpose()
        })
    }

    /// Update-or-insert keyed on `json_path`.
    ///
    /// A match merges the document's top-level fields into the stored body;
    /// no match inserts the document under a fresh id.
    pub fn upsert_one(
        &self,
        coll: Collection,
        json_path: &str,
        key: &str,
        doc: &Value,
    ) -> ApiResult<UpdateResult> {
        let fields = doc
            .as_object()
            .ok_or_else(|| ApiError::InvalidRequest("document body must be an object".into()))?;

        self.with_conn(|conn| {
            let existing: Option<(String, String)> = conn
                .query_row(
                    &format!(
                        "SELECT id, body FROM {} WHERE json_extract(body, ?1) = ?2 LIMIT 1",
                        coll.table()
                    ),
                    params![json_path, key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(ApiError::store)?;

            match existing {
                Some((id, body)) => {
                    let mut current: Map<String, Value> = serde_json::from_str(&body)
                        .map_err(|e| ApiError::Serialization(e.to_string()))?;
                    let before = current.clone();
                    for (field, value) in fields {
                        current.insert(field.clone(), value.clone());
                    }
                    // A write that leaves the body identical does not count
                    // as a modification.
                    if current == before {
                        return Ok(UpdateResult::unchanged());
                    }
                    let merged = serde_json::to_string(&current)
                        .map_err(|e| ApiError::Serialization(e.to_string()))?;
                    conn.execute(
                        &format!("UPDATE {} SET body = ?1 WHERE id = ?2", coll.table()),
                        params![merged, id],
                    )
                    .map_err(ApiError::store)?;
                    Ok(UpdateResult::modified())
                }
                None => {
                    let id = Uuid::new_v4().to_string();
                    // The filter's equality field becomes part of the
                    // inserted document even when the body omits it, so the
                    // fresh record is always retrievable by its key.
                    let mut body = fields.clone();
                    body.remove("_id");
                    set_json_path(&mut body, json_path, key);
                    let body = serde_json::to_string(&body)
                        .map_err(|e| ApiError::Serialization(e.to_string()))?;
                    conn.execute(
                        &format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", coll.table()),
                        params![id, body],
                    )
                    .map_err(ApiError::store)?;
                    Ok(UpdateResult::upserted(id))
                }
            }
        })
    }

    /// Set one top-level field on the document with the given id
    pub fn set_field(
        &self,
        coll: Collection,
        id: &str,
        field: &str,
        value: &Value,
    ) -> ApiResult<UpdateResult> {
        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(
                    &format!("SELECT body FROM {} WHERE id = ?1", coll.table()),
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(ApiError::store)?;

            let Some(body) = body else {
                return Ok(UpdateResult::unmatched());
            };

            let mut current: Map<String, Value> = serde_json::from_str(&body)
                .map_err(|e| ApiError::Serialization(e.to_string()))?;
            if current.get(field) == Some(value) {
                return Ok(UpdateResult::unchanged());
            }
            current.insert(field.to_string(), value.clone());
            let updated = serde_json::to_string(&current)
                .map_err(|e| ApiError::Serialization(e.to_string()))?;

            conn.execute(
                &format!("UPDATE {} SET body = ?1 WHERE id = ?2", coll.table()),
                params![updated, id],
            )
            .map_err(ApiError::store)?;
            Ok(UpdateResult::modified())
        })
    }

    /// Delete by generated id. Missing ids are not an error.
    pub fn delete_by_id(&self, coll: Collection, id: &str) -> ApiResult<DeleteResult> {
        self.with_conn(|conn| {
            let deleted = conn
                .execute(
                    &format!("DELETE FROM {} WHERE id = ?1", coll.table()),
                    params![id],
                )
                .map_err(ApiError::store)?;
            Ok(DeleteResult {
                acknowledged: true,
                deleted_count: deleted as u64,
            })
        })
    }
}

fn init_schema(conn: &Connection) -> ApiResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_users_email
            ON users (json_extract(body, '$.email'));

        CREATE TABLE IF NOT EXISTS rooms (
            id          TEXT PRIMARY KEY,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_rooms_host_email
            ON rooms (json_extract(body, '$.host.email'));

        CREATE TABLE IF NOT EXISTS bookings (
            id          TEXT PRIMARY KEY,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_guest_email
            ON bookings (json_extract(body, '$.guest.email'));

        CREATE INDEX IF NOT EXISTS idx_bookings_host
            ON bookings (json_extract(body, '$.host'));
        ",
    )
    .map_err(ApiError::store)
}

/// Serialize a document body, stripping any caller-supplied `_id`.
/// The row id is authoritative and re-attached on every read.
fn body_without_id(doc: &Value) -> ApiResult<String> {
    let obj = doc
        .as_object()
        .ok_or_else(|| ApiError::InvalidRequest("document body must be an object".into()))?;

    let mut body = obj.clone();
    body.remove("_id");
    serde_json::to_string(&body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Set the value at a `$.a.b` style path, creating intermediate objects
/// as needed. Non-object intermediates are replaced.
fn set_json_path(body: &mut Map<String, Value>, json_path: &str, value: &str) {
    let Some(path) = json_path.strip_prefix("$.") else {
        return;
    };

    let mut current = body;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), Value::String(value.to_string()));
            return;
        }

        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            unreachable!();
        };
        current = map;
    }
}

fn attach_id(id: &str, body: &str) -> ApiResult<Value> {
    let mut doc: Map<String, Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
    doc.insert("_id".to_string(), Value::String(id.to_string()));
    Ok(Value::Object(doc))
}
