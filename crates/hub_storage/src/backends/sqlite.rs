use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;
use uuid::Uuid;

use hub_core::types::store_timestamp;
use hub_core::{Answer, Error, Question, QuestionStore, Result, SnapshotFeed, SnapshotHandler, Subscription};

use crate::StorageBackend;

const DEFAULT_PATH: &str = "questions.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id TEXT PRIMARY KEY,
        collection TEXT NOT NULL,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        question_id TEXT NOT NULL REFERENCES questions(id),
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (question_id, text, created_at)
    )
    "#,
];

fn store_error(action: &str, e: sqlx::Error) -> Error {
    Error::Store(format!("Failed to {}: {}", action, e))
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    // Fixed precision keeps lexical and chronological order identical.
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Store(format!("Failed to parse date {}: {}", raw, e)))
}

/// Questions persisted in a SQLite file, fanned out to subscribers like the
/// memory store.
pub struct SqliteStore {
    pool: SqlitePool,
    db_path: PathBuf,
    collection: String,
    feed: SnapshotFeed,
    writes: Mutex<()>,
}

impl SqliteStore {
    pub async fn new_with_path(db_path: &Path, collection: &str) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| store_error("connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::External(anyhow!("Failed to run migration {}: {}", i, e)))?;
        }

        let mut store = Self {
            pool,
            db_path: db_path.to_path_buf(),
            collection: collection.to_string(),
            feed: SnapshotFeed::new(Vec::new()),
            writes: Mutex::new(()),
        };
        store.feed = SnapshotFeed::new(store.load().await?);
        Ok(store)
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn load(&self) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            r#"
            SELECT id, text, created_at FROM questions
            WHERE collection = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("load questions", e))?;

        let answer_rows = sqlx::query(
            r#"
            SELECT a.question_id, a.text, a.created_at FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE q.collection = ?
            ORDER BY a.rowid
            "#,
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("load answers", e))?;

        let mut answers: HashMap<String, Vec<Answer>> = HashMap::new();
        for row in answer_rows {
            let created_at: String = row.get("created_at");
            answers
                .entry(row.get("question_id"))
                .or_default()
                .push(Answer {
                    text: row.get("text"),
                    created_at: parse_timestamp(&created_at)?,
                });
        }

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let created_at: String = row.get("created_at");
            questions.push(Question {
                answers: answers.remove(&id).unwrap_or_default(),
                text: row.get("text"),
                created_at: parse_timestamp(&created_at)?,
                id,
            });
        }
        Ok(questions)
    }

    async fn publish(&self) -> Result<()> {
        let snapshot = self.load().await?;
        self.feed.publish(snapshot);
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStore {
    fn get_error_message() -> &'static str {
        "SQLite question store should be available at ./questions.db"
    }

    async fn open(collection: &str, url: Option<&str>) -> Result<Self> {
        let path = url
            .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .unwrap_or(DEFAULT_PATH);
        Self::new_with_path(Path::new(path), collection).await
    }
}

#[async_trait]
impl QuestionStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn create_question(&self, text: &str) -> Result<Question> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("question text must not be empty".to_string()));
        }
        let question = Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            answers: Vec::new(),
            created_at: store_timestamp(Utc::now()),
        };

        let _guard = self.writes.lock().await;
        sqlx::query("INSERT INTO questions (id, collection, text, created_at) VALUES (?, ?, ?, ?)")
            .bind(&question.id)
            .bind(&self.collection)
            .bind(&question.text)
            .bind(timestamp(&question.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("store question", e))?;
        self.publish().await?;
        Ok(question)
    }

    async fn append_answer(&self, question_id: &str, answer: &Answer) -> Result<()> {
        if answer.text.trim().is_empty() {
            return Err(Error::InvalidInput("answer text must not be empty".to_string()));
        }

        let _guard = self.writes.lock().await;
        let exists = sqlx::query("SELECT 1 FROM questions WHERE id = ? AND collection = ?")
            .bind(question_id)
            .bind(&self.collection)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("look up question", e))?;
        if exists.is_none() {
            return Err(Error::Store(format!("Question {} not found in {}", question_id, self.collection)));
        }

        sqlx::query("INSERT OR IGNORE INTO answers (question_id, text, created_at) VALUES (?, ?, ?)")
            .bind(question_id)
            .bind(&answer.text)
            .bind(timestamp(&answer.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("store answer", e))?;
        self.publish().await
    }

    async fn snapshot(&self) -> Result<Vec<Question>> {
        self.load().await
    }

    fn subscribe(&self, handler: SnapshotHandler) -> Result<Subscription> {
        Ok(self.feed.subscribe(handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_store_persists() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("questions.db");

        let question_id = {
            let store = SqliteStore::new_with_path(&db_path, "questions").await.unwrap();
            let question = store.create_question("How do LiDARs work?").await.unwrap();
            store.append_answer(&question.id, &Answer::new("Time of flight.")).await.unwrap();
            question.id
        };

        let reopened = SqliteStore::new_with_path(&db_path, "questions").await.unwrap();
        let snapshot = reopened.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, question_id);
        assert_eq!(snapshot[0].answers.len(), 1);
        assert_eq!(snapshot[0].answers[0].text, "Time of flight.");
    }

    #[tokio::test]
    async fn test_sqlite_union_and_missing_question() {
        let temp_dir = tempdir().unwrap();
        let store = SqliteStore::new_with_path(&temp_dir.path().join("q.db"), "questions").await.unwrap();
        let question = store.create_question("Is RL sample efficient?").await.unwrap();
        let answer = Answer::new("Rarely.");

        store.append_answer(&question.id, &answer).await.unwrap();
        store.append_answer(&question.id, &answer).await.unwrap();
        assert_eq!(store.snapshot().await.unwrap()[0].answers.len(), 1);

        let err = store.append_answer("nope", &answer).await.unwrap_err();
        assert_eq!(err.kind(), hub_core::ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("q.db");
        let a = SqliteStore::new_with_path(&db_path, "a").await.unwrap();
        a.create_question("In a?").await.unwrap();

        let b = SqliteStore::new_with_path(&db_path, "b").await.unwrap();
        assert!(b.snapshot().await.unwrap().is_empty());
    }
}
