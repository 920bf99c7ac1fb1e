//! SQLite-backed article store
//!
//! The durable side of the pipeline. Identity is the article url: `upsert`
//! inserts a new row or refreshes the mutable fields of an existing one,
//! leaving the original creation timestamp untouched, so re-running
//! collection over overlapping sources never creates duplicates.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::debug;

use motorwatch_core::{Article, Category};

/// Article storage over a single SQLite connection
pub struct ArticleStore {
    conn: Mutex<Connection>,
}

impl ArticleStore {
    /// Open (or create) the store at the given path.
    ///
    /// Creates the parent directory and schema if missing.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path).map_err(StoreError::Database)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Database)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                summary TEXT,
                source TEXT,
                url TEXT NOT NULL,
                category TEXT,
                published_date TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(url)
            );

            CREATE INDEX IF NOT EXISTS idx_news_date ON news(published_date);
            CREATE INDEX IF NOT EXISTS idx_news_category ON news(category);
            "#,
        )
        .map_err(StoreError::Database)?;

        Ok(())
    }

    /// Insert the article or refresh the existing row with the same url.
    ///
    /// Atomic per call; `created_at` survives updates, `updated_at` moves.
    pub fn upsert(&self, article: &Article) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.execute(
            r#"
            INSERT INTO news (title, summary, source, url, category, published_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                summary = excluded.summary,
                source = excluded.source,
                category = excluded.category,
                published_date = excluded.published_date,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                article.title,
                article.summary,
                article.source,
                article.url,
                article.category.as_str(),
                article.published_date.map(|d| d.to_string()),
            ],
        )
        .map_err(StoreError::Database)?;

        debug!("Article saved/updated: {}", article.title);

        Ok(())
    }

    /// Most recent articles by publication date
    pub fn recent(&self, limit: usize) -> Result<Vec<Article>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let mut stmt = conn
            .prepare(
                r#"
            SELECT title, summary, source, url, category, published_date
            FROM news
            ORDER BY published_date DESC
            LIMIT ?1
            "#,
            )
            .map_err(StoreError::Database)?;

        let articles = stmt
            .query_map(params![limit as i64], row_to_article)
            .map_err(StoreError::Database)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(articles)
    }

    /// Articles in one category, newest first
    pub fn by_category(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Article>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let mut stmt = conn
            .prepare(
                r#"
            SELECT title, summary, source, url, category, published_date
            FROM news
            WHERE category = ?1
            ORDER BY published_date DESC
            LIMIT ?2 OFFSET ?3
            "#,
            )
            .map_err(StoreError::Database)?;

        let articles = stmt
            .query_map(
                params![category.as_str(), limit as i64, offset as i64],
                row_to_article,
            )
            .map_err(StoreError::Database)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(articles)
    }

    /// Substring search over title and summary
    pub fn search(&self, term: &str, limit: usize) -> Result<Vec<Article>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let pattern = format!("%{}%", term);

        let mut stmt = conn
            .prepare(
                r#"
            SELECT title, summary, source, url, category, published_date
            FROM news
            WHERE title LIKE ?1 OR summary LIKE ?1
            ORDER BY published_date DESC
            LIMIT ?2
            "#,
            )
            .map_err(StoreError::Database)?;

        let articles = stmt
            .query_map(params![pattern, limit as i64], row_to_article)
            .map_err(StoreError::Database)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(articles)
    }

    /// Article counts per category
    pub fn category_stats(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let mut stmt = conn
            .prepare(
                r#"
            SELECT category, COUNT(*) FROM news
            GROUP BY category
            ORDER BY COUNT(*) DESC
            "#,
            )
            .map_err(StoreError::Database)?;

        let stats = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(StoreError::Database)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(stats)
    }

    /// Total stored article count
    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))
            .map_err(StoreError::Database)
    }
}

/// Map a selected row back into an Article
fn row_to_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
    let category: Option<String> = row.get(4)?;
    let published_date: Option<String> = row.get(5)?;

    Ok(Article {
        title: row.get(0)?,
        summary: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        source: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        url: row.get(3)?,
        category: category
            .as_deref()
            .and_then(Category::from_name)
            .unwrap_or(Category::Tech),
        published_date: published_date.and_then(|d| d.parse().ok()),
        title_translated: None,
        summary_translated: None,
    })
}

/// Errors that can occur during article storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to acquire lock")]
    LockError,
}
