//! Append-only SQLite log of practice attempts.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::StoreError;
use crate::model::{PracticeMode, PracticeRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS practice_records (
    record_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL DEFAULT 'default_student',
    practice_mode TEXT NOT NULL,
    topic TEXT NOT NULL,
    input_text TEXT NOT NULL,
    suggested_text TEXT,
    score REAL NOT NULL DEFAULT 0.0,
    practice_time TEXT NOT NULL
)";

/// Owns the connection; every call after [`close`](Self::close) fails with
/// [`StoreError::Unavailable`].
pub struct RecordStore {
    conn: Option<Connection>,
    student_id: String,
}

impl RecordStore {
    /// Open (and create if needed) a store file.
    pub fn open(path: &Path, student_id: impl Into<String>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        tracing::debug!("opened record store at {}", path.display());
        Self::with_connection(conn, student_id.into())
    }

    /// A private in-memory store.
    pub fn open_in_memory(student_id: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, student_id.into())
    }

    fn with_connection(conn: Connection, student_id: String) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Some(conn),
            student_id,
        })
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Unavailable)
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Append one record stamped with the current time. Returns its id.
    pub fn save(
        &self,
        mode: PracticeMode,
        topic: &str,
        input_text: &str,
        suggested_text: &str,
        score: f64,
    ) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO practice_records
                (student_id, practice_mode, topic, input_text, suggested_text, score, practice_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.student_id,
                mode.name(),
                topic,
                input_text,
                suggested_text,
                score,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, %mode, score, "saved practice record");
        Ok(id)
    }

    /// Number of records for this student.
    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM practice_records WHERE student_id = ?1",
            [&self.student_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Up to `limit` records for this student, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<PracticeRecord>, StoreError> {
        let mut stmt = self.conn()?.prepare(
            "SELECT record_id, student_id, practice_mode, topic, input_text,
                    suggested_text, score, practice_time
             FROM practice_records
             WHERE student_id = ?1
             ORDER BY record_id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![self.student_id, limit as i64], RawRecord::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?.into_record()?);
        }
        Ok(result)
    }

    /// Release the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            tracing::debug!("closed record store");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

/// A row as stored, before mode and timestamp are decoded.
struct RawRecord {
    id: i64,
    student_id: String,
    mode: String,
    topic: String,
    input_text: String,
    suggested_text: Option<String>,
    score: f64,
    created_at: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            student_id: row.get(1)?,
            mode: row.get(2)?,
            topic: row.get(3)?,
            input_text: row.get(4)?,
            suggested_text: row.get(5)?,
            score: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<PracticeRecord, StoreError> {
        let mode: PracticeMode = self
            .mode
            .parse()
            .map_err(|e: String| StoreError::InvalidRecord(format!("record {}: {e}", self.id)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| {
                StoreError::InvalidRecord(format!("record {}: bad timestamp: {e}", self.id))
            })?
            .with_timezone(&Utc);
        Ok(PracticeRecord {
            id: self.id,
            student_id: self.student_id,
            mode,
            topic: self.topic,
            input_text: self.input_text,
            suggested_text: self.suggested_text.unwrap_or_default(),
            score: self.score,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_read_back_exactly() {
        let store = RecordStore::open_in_memory("default_student").unwrap();
        assert_eq!(store.count().unwrap(), 0);

        let input = "我有一隻可愛的小狗。";
        let suggested = "可以加入感受詞：我喜歡寵物，讓我覺得開心極了～";
        let id = store
            .save(PracticeMode::Composition, "我的寵物", input, suggested, 42.5)
            .unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let records = store.recent(10).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, id);
        assert_eq!(r.mode, PracticeMode::Composition);
        assert_eq!(r.topic, "我的寵物");
        assert_eq!(r.input_text, input);
        assert_eq!(r.suggested_text, suggested);
        assert_eq!(r.score, 42.5);
        assert_eq!(r.student_id, "default_student");
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let store = RecordStore::open_in_memory("amy").unwrap();
        for i in 0..4 {
            store
                .save(PracticeMode::SentenceMaking, &format!("t{i}"), "x", "", 80.0)
                .unwrap();
        }
        let recent = store.recent(2).unwrap();
        let topics: Vec<&str> = recent.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["t3", "t2"]);
    }

    #[test]
    fn records_are_scoped_by_student() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        let a = RecordStore::open(&path, "a").unwrap();
        a.save(PracticeMode::SpeechTranscription, "口語", "x", "y", 90.0)
            .unwrap();
        let b = RecordStore::open(&path, "b").unwrap();
        assert_eq!(b.count().unwrap(), 0);
        assert_eq!(a.count().unwrap(), 1);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        {
            let mut store = RecordStore::open(&path, "default_student").unwrap();
            store
                .save(PracticeMode::Composition, "題目", "內容", "", 55.0)
                .unwrap();
            store.close().unwrap();
        }
        let store = RecordStore::open(&path, "default_student").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn closed_store_is_unavailable() {
        let mut store = RecordStore::open_in_memory("default_student").unwrap();
        store.close().unwrap();
        assert!(store.is_closed());
        let err = store
            .save(PracticeMode::Composition, "t", "x", "", 1.0)
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(store.count().unwrap_err().is_unavailable());
        assert!(store.recent(1).unwrap_err().is_unavailable());
        store.close().unwrap();
    }
}
