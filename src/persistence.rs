use crate::char_log::CharLogRecord;
use crate::error::{PersistError, PersistResult};
use crate::reconciler::CharCounts;
use crate::result::TestResult;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Destination for finished results. Takes ownership of each result.
pub trait ResultSink {
    fn persist(&mut self, result: TestResult) -> PersistResult<()>;
}

/// Discards results.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn persist(&mut self, _result: TestResult) -> PersistResult<()> {
        Ok(())
    }
}

/// Forwards results over a channel to whoever owns the receiver.
impl ResultSink for Sender<TestResult> {
    fn persist(&mut self, result: TestResult) -> PersistResult<()> {
        self.send(result).map_err(|_| PersistError::Disconnected)
    }
}

/// Hands each result to every inner sink, reporting the first failure.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: ResultSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for Fanout {
    fn persist(&mut self, result: TestResult) -> PersistResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.persist(result.clone()) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// A stored result with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub id: i64,
    pub result: TestResult,
}

/// SQLite-backed result history.
#[derive(Debug)]
pub struct ResultDb {
    conn: Connection,
}

impl ResultDb {
    /// Open (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> PersistResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS test_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                wpm REAL NOT NULL,
                raw_wpm REAL NOT NULL,
                accuracy REAL NOT NULL,
                consistency REAL NOT NULL,
                test_type TEXT NOT NULL,
                duration INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                chars_correct INTEGER NOT NULL,
                chars_incorrect INTEGER NOT NULL,
                chars_extra INTEGER NOT NULL,
                chars_missed INTEGER NOT NULL,
                restarts INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS char_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                test_id INTEGER NOT NULL REFERENCES test_results(id) ON DELETE CASCADE,
                character TEXT NOT NULL,
                attempts INTEGER NOT NULL,
                errors INTEGER NOT NULL,
                total_time INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_char_logs_test ON char_logs(test_id);
            CREATE INDEX IF NOT EXISTS idx_test_results_timestamp ON test_results(timestamp);
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Store a result and its char logs in one transaction.
    pub fn insert(&mut self, result: &TestResult) -> PersistResult<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO test_results
            (wpm, raw_wpm, accuracy, consistency, test_type, duration, timestamp,
             chars_correct, chars_incorrect, chars_extra, chars_missed, restarts)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                result.wpm,
                result.raw_wpm,
                result.accuracy,
                result.consistency,
                result.test_type,
                result.duration,
                result.timestamp.to_rfc3339(),
                result.chars.correct,
                result.chars.incorrect,
                result.chars.extra,
                result.chars.missed,
                result.restarts,
            ],
        )?;
        let test_id = tx.last_insert_rowid();

        for log in &result.char_logs {
            tx.execute(
                r#"
                INSERT INTO char_logs (test_id, character, attempts, errors, total_time)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    test_id,
                    log.char.to_string(),
                    log.attempts,
                    log.errors,
                    log.total_time as i64,
                ],
            )?;
        }

        tx.commit()?;
        Ok(test_id)
    }

    /// All stored results, newest first.
    pub fn list(&self) -> PersistResult<Vec<StoredResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, wpm, raw_wpm, accuracy, consistency, test_type, duration, timestamp,
                   chars_correct, chars_incorrect, chars_extra, chars_missed, restarts
            FROM test_results
            ORDER BY timestamp DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                TestResult {
                    wpm: row.get(1)?,
                    raw_wpm: row.get(2)?,
                    accuracy: row.get(3)?,
                    consistency: row.get(4)?,
                    test_type: row.get(5)?,
                    duration: row.get(6)?,
                    char_logs: Vec::new(),
                    timestamp: DateTime::<Utc>::default(),
                    chars: CharCounts {
                        correct: row.get(8)?,
                        incorrect: row.get(9)?,
                        extra: row.get(10)?,
                        missed: row.get(11)?,
                    },
                    restarts: row.get(12)?,
                },
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut stored = Vec::new();
        for row in rows {
            let (id, mut result, timestamp) = row?;
            result.timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|_| PersistError::Timestamp(timestamp.clone()))?
                .with_timezone(&Utc);
            result.char_logs = self.char_logs(id)?;
            stored.push(StoredResult { id, result });
        }
        Ok(stored)
    }

    fn char_logs(&self, test_id: i64) -> PersistResult<Vec<CharLogRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT character, attempts, errors, total_time
            FROM char_logs
            WHERE test_id = ?1
            ORDER BY character
            "#,
        )?;
        let rows = stmt.query_map([test_id], |row| {
            Ok(CharLogRecord {
                char: row.get::<_, String>(0)?.chars().next().unwrap_or('\0'),
                attempts: row.get(1)?,
                errors: row.get(2)?,
                total_time: row.get::<_, i64>(3)? as u64,
            })
        })?;

        let mut logs = Vec::new();
        for log in rows {
            logs.push(log?);
        }
        Ok(logs)
    }

    pub fn count(&self) -> PersistResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM test_results", [], |row| row.get(0))?)
    }

    pub fn clear(&self) -> PersistResult<()> {
        self.conn.execute("DELETE FROM char_logs", [])?;
        self.conn.execute("DELETE FROM test_results", [])?;
        Ok(())
    }
}

impl ResultSink for ResultDb {
    fn persist(&mut self, result: TestResult) -> PersistResult<()> {
        self.insert(&result).map(|_| ())
    }
}

/// Append-only CSV of headline metrics. The header is written once, when
/// the file is created.
#[derive(Debug, Clone)]
pub struct CsvResultLog {
    path: PathBuf,
}

impl CsvResultLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, result: &TestResult) -> PersistResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record([
                "timestamp",
                "test_type",
                "duration",
                "wpm",
                "raw_wpm",
                "accuracy",
                "consistency",
                "restarts",
            ])?;
        }
        writer.write_record([
            result.timestamp.to_rfc3339(),
            result.test_type.clone(),
            result.duration.to_string(),
            result.wpm.to_string(),
            format!("{:.2}", result.raw_wpm),
            format!("{:.2}", result.accuracy),
            format!("{:.2}", result.consistency),
            result.restarts.to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

impl ResultSink for CsvResultLog {
    fn persist(&mut self, result: TestResult) -> PersistResult<()> {
        self.append(&result)
    }
}
