//! SQLite-based deck and card storage.
//!
//! Provides persistent storage for:
//! - Decks, scoped by owning user
//! - Cards, ordered by creation
//! - Key-value store for application state (guest mode, active study session)

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{data_dir, migrations};
use crate::deck::{CardDraft, Deck, DeckInput, DeckSummary, Flashcard};
use crate::error::DatabaseError;

type DbResult<T> = Result<T, DatabaseError>;

/// SQLite database for decks and cards.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/flashdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> DbResult<Self> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("flashdeck.db"))
    }

    pub fn open_at(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Decks ────────────────────────────────────────────────────────

    /// All decks owned by `user_id` with their card counts, oldest first.
    pub fn list_decks_for_user(&self, user_id: &str) -> DbResult<Vec<DeckSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.title, d.description, d.created_at, COUNT(c.id)
             FROM decks d
             LEFT JOIN cards c ON c.deck_id = d.id
             WHERE d.user_id = ?1
             GROUP BY d.id
             ORDER BY d.created_at, d.id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(DeckSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                created_at: parse_ts(row, 3)?,
                card_count: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_decks_for_user(&self, user_id: &str) -> DbResult<u64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM decks WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    /// Fetch a deck only if it belongs to `user_id`.
    pub fn get_deck(&self, deck_id: i64, user_id: &str) -> DbResult<Option<Deck>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, user_id, title, description, created_at, updated_at
                 FROM decks WHERE id = ?1 AND user_id = ?2",
                params![deck_id, user_id],
                deck_from_row,
            )
            .optional()?)
    }

    pub fn create_deck(&self, user_id: &str, input: &DeckInput) -> DbResult<Deck> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO decks (user_id, title, description, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, input.title, input.description, fmt_ts(&now)],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_deck(id, user_id)?
            .ok_or_else(|| DatabaseError::QueryFailed(format!("deck {id} vanished after insert")))
    }

    /// Rename or re-describe a deck. `None` if it is not the user's.
    pub fn update_deck(
        &self,
        deck_id: i64,
        user_id: &str,
        input: &DeckInput,
    ) -> DbResult<Option<Deck>> {
        let changed = self.conn.execute(
            "UPDATE decks SET title = ?1, description = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                input.title,
                input.description,
                fmt_ts(&Utc::now()),
                deck_id,
                user_id
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_deck(deck_id, user_id)
    }

    /// Delete a deck and, by cascade, its cards. Returns whether a row went.
    pub fn delete_deck(&self, deck_id: i64, user_id: &str) -> DbResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM decks WHERE id = ?1 AND user_id = ?2",
            params![deck_id, user_id],
        )?;
        Ok(changed > 0)
    }

    // ── Cards ────────────────────────────────────────────────────────

    /// Cards of a deck, oldest first.
    pub fn list_cards(&self, deck_id: i64) -> DbResult<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, deck_id, front, back, created_at, updated_at
             FROM cards WHERE deck_id = ?1
             ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![deck_id], card_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn get_card(&self, card_id: i64) -> DbResult<Option<Flashcard>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, deck_id, front, back, created_at, updated_at
                 FROM cards WHERE id = ?1",
                params![card_id],
                card_from_row,
            )
            .optional()?)
    }

    pub fn create_card(&self, deck_id: i64, draft: &CardDraft) -> DbResult<Flashcard> {
        insert_card(&self.conn, deck_id, draft, &fmt_ts(&Utc::now()))?;
        let id = self.conn.last_insert_rowid();
        self.get_card(id)?
            .ok_or_else(|| DatabaseError::QueryFailed(format!("card {id} vanished after insert")))
    }

    pub fn update_card(&self, card_id: i64, draft: &CardDraft) -> DbResult<Option<Flashcard>> {
        let changed = self.conn.execute(
            "UPDATE cards SET front = ?1, back = ?2, updated_at = ?3 WHERE id = ?4",
            params![draft.front, draft.back, fmt_ts(&Utc::now()), card_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_card(card_id)
    }

    pub fn delete_card(&self, card_id: i64) -> DbResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
        Ok(changed > 0)
    }

    /// Insert many cards in one transaction. All or nothing.
    pub fn bulk_create_cards(&self, deck_id: i64, drafts: &[CardDraft]) -> DbResult<Vec<Flashcard>> {
        let tx = self.conn.unchecked_transaction()?;
        let now = fmt_ts(&Utc::now());
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            insert_card(&tx, deck_id, draft, &now)?;
            ids.push(tx.last_insert_rowid());
        }
        tx.commit()?;

        let mut cards = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(card) = self.get_card(id)? {
                cards.push(card);
            }
        }
        Ok(cards)
    }

    // ── Key-value ────────────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn insert_card(conn: &Connection, deck_id: i64, draft: &CardDraft, at: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO cards (deck_id, front, back, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![deck_id, draft.front, draft.back, at],
    )
}

fn deck_from_row(row: &Row<'_>) -> rusqlite::Result<Deck> {
    Ok(Deck {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_ts(row, 4)?,
        updated_at: parse_opt_ts(row, 5)?,
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    Ok(Flashcard {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        created_at: parse_ts(row, 4)?,
        updated_at: parse_opt_ts(row, 5)?,
    })
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn fmt_ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_opt_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        None => Ok(None),
        Some(_) => parse_ts(row, idx).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(db: &Database, user: &str, title: &str) -> Deck {
        db.create_deck(user, &DeckInput::new(title, None)).unwrap()
    }

    #[test]
    fn create_and_list_decks_with_counts() {
        let db = Database::open_in_memory().unwrap();
        let spanish = deck(&db, "alice", "Spanish");
        deck(&db, "alice", "German");
        deck(&db, "bob", "French");
        db.create_card(spanish.id, &CardDraft::new("perro", "dog")).unwrap();
        db.create_card(spanish.id, &CardDraft::new("gato", "cat")).unwrap();

        let decks = db.list_decks_for_user("alice").unwrap();
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].title, "Spanish");
        assert_eq!(decks[0].card_count, 2);
        assert_eq!(decks[1].card_count, 0);
        assert_eq!(db.count_decks_for_user("alice").unwrap(), 2);
        assert_eq!(db.count_decks_for_user("nobody").unwrap(), 0);
    }

    #[test]
    fn decks_are_scoped_to_owner() {
        let db = Database::open_in_memory().unwrap();
        let d = deck(&db, "alice", "Private");
        assert!(db.get_deck(d.id, "bob").unwrap().is_none());
        assert!(db
            .update_deck(d.id, "bob", &DeckInput::new("Stolen", None))
            .unwrap()
            .is_none());
        assert!(!db.delete_deck(d.id, "bob").unwrap());
        assert_eq!(db.get_deck(d.id, "alice").unwrap().unwrap().title, "Private");
    }

    #[test]
    fn update_deck_sets_updated_at() {
        let db = Database::open_in_memory().unwrap();
        let d = deck(&db, "alice", "Old");
        assert!(d.updated_at.is_none());
        let updated = db
            .update_deck(d.id, "alice", &DeckInput::new("New", Some("desc".into())))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.description.as_deref(), Some("desc"));
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn delete_deck_cascades_to_cards() {
        let db = Database::open_in_memory().unwrap();
        let d = deck(&db, "alice", "Temp");
        let card = db.create_card(d.id, &CardDraft::new("q", "a")).unwrap();
        assert!(db.delete_deck(d.id, "alice").unwrap());
        assert!(db.get_card(card.id).unwrap().is_none());
    }

    #[test]
    fn card_crud_and_ordering() {
        let db = Database::open_in_memory().unwrap();
        let d = deck(&db, "alice", "Deck");
        let first = db.create_card(d.id, &CardDraft::new("1", "one")).unwrap();
        let second = db.create_card(d.id, &CardDraft::new("2", "two")).unwrap();

        let updated = db
            .update_card(first.id, &CardDraft::new("1", "uno"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.back, "uno");
        assert!(updated.updated_at.is_some());

        let ids: Vec<i64> = db.list_cards(d.id).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        assert!(db.delete_card(second.id).unwrap());
        assert!(!db.delete_card(second.id).unwrap());
        assert!(db.update_card(second.id, &CardDraft::new("x", "y")).unwrap().is_none());
        assert_eq!(db.list_cards(d.id).unwrap().len(), 1);
    }

    #[test]
    fn bulk_create_keeps_input_order() {
        let db = Database::open_in_memory().unwrap();
        let d = deck(&db, "alice", "Bulk");
        let drafts: Vec<CardDraft> = (0..5)
            .map(|i| CardDraft::new(format!("f{i}"), format!("b{i}")))
            .collect();
        let created = db.bulk_create_cards(d.id, &drafts).unwrap();
        assert_eq!(created.len(), 5);
        let fronts: Vec<String> = db.list_cards(d.id).unwrap().into_iter().map(|c| c.front).collect();
        assert_eq!(fronts, vec!["f0", "f1", "f2", "f3", "f4"]);
    }

    #[test]
    fn bulk_create_into_missing_deck_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result = db.bulk_create_cards(999, &[CardDraft::new("a", "b")]);
        assert!(result.is_err());
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM cards", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn kv_store() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }
}
