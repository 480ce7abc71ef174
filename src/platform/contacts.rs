//! The address book. Contacts live in a local SQLite database under the
//! user data dir, one row per contact plus a row per phone number, with the
//! raw record kept as JSON alongside the relational columns.

use directories::ProjectDirs;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Phone entry attached to a stored contact.
#[derive(Debug, Clone, Serialize)]
pub struct PhoneEntry {
    pub label: String,
    pub number: String,
}

/// Structured record handed to the address book.
#[derive(Debug, Clone, Serialize)]
pub struct NewContact {
    pub given_name: String,
    pub phone_numbers: Vec<PhoneEntry>,
}

impl NewContact {
    /// Single-number contact with the conventional "mobile" label.
    pub fn mobile(name: &str, number: &str) -> Self {
        Self {
            given_name: name.to_string(),
            phone_numbers: vec![PhoneEntry {
                label: "mobile".to_string(),
                number: number.to_string(),
            }],
        }
    }

    fn is_valid(&self) -> bool {
        !self.given_name.trim().is_empty()
            && self
                .phone_numbers
                .iter()
                .any(|phone| !phone.number.trim().is_empty())
    }
}

/// Opaque identifier handed back by the address book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactId(pub i64);

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact needs a name and a phone number")]
    InvalidRecord,
    #[error("no data directory available")]
    NoDataDir,
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

/// Device address book. Adding is attempted exactly once per call; callers
/// do not retry.
pub trait ContactStore: Send + Sync {
    fn add(&self, contact: &NewContact) -> Result<ContactId, ContactError>;
}

pub struct SqliteContactStore {
    path: PathBuf,
}

impl SqliteContactStore {
    pub fn open_default() -> Result<Self, ContactError> {
        let proj =
            ProjectDirs::from("com", "example", "QrContactsGtk").ok_or(ContactError::NoDataDir)?;
        Ok(Self::open_at(proj.data_dir().join("contacts.sqlite")))
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn conn(&self) -> Result<Connection, ContactError> {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        Ok(Connection::open(&self.path)?)
    }

    /// Creates the schema if missing. Called once at startup.
    pub fn init(&self) -> Result<(), ContactError> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                given_name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                raw_json TEXT
            );
            CREATE TABLE IF NOT EXISTS phone_numbers (
                contact_id INTEGER NOT NULL REFERENCES contacts(id),
                label TEXT NOT NULL,
                number TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl ContactStore for SqliteContactStore {
    fn add(&self, contact: &NewContact) -> Result<ContactId, ContactError> {
        if !contact.is_valid() {
            return Err(ContactError::InvalidRecord);
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        let raw = serde_json::to_string(contact).unwrap_or_default();
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO contacts (given_name, created_at, raw_json) VALUES (?1, ?2, ?3)",
            params![contact.given_name, now, raw],
        )?;
        let id = tx.last_insert_rowid();
        for phone in &contact.phone_numbers {
            tx.execute(
                "INSERT INTO phone_numbers (contact_id, label, number) VALUES (?1, ?2, ?3)",
                params![id, phone.label, phone.number],
            )?;
        }
        tx.commit()?;
        Ok(ContactId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SqliteContactStore {
        let store = SqliteContactStore::open_at(dir.path().join("contacts.sqlite"));
        store.init().unwrap();
        store
    }

    #[test]
    fn adds_assign_distinct_ids() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let first = store.add(&NewContact::mobile("Ada", "5551234")).unwrap();
        let second = store.add(&NewContact::mobile("Grace", "5559876")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn rows_persist_name_and_labeled_number() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let id = store.add(&NewContact::mobile("Ada", "5551234")).unwrap();

        let conn = Connection::open(dir.path().join("contacts.sqlite")).unwrap();
        let name: String = conn
            .query_row(
                "SELECT given_name FROM contacts WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "Ada");

        let (label, number): (String, String) = conn
            .query_row(
                "SELECT label, number FROM phone_numbers WHERE contact_id = ?1",
                params![id.0],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(label, "mobile");
        assert_eq!(number, "5551234");
    }

    #[test]
    fn empty_name_is_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let result = store.add(&NewContact::mobile("  ", "5551234"));
        assert!(matches!(result, Err(ContactError::InvalidRecord)));
    }

    #[test]
    fn empty_number_is_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let result = store.add(&NewContact::mobile("Ada", ""));
        assert!(matches!(result, Err(ContactError::InvalidRecord)));
    }

    #[test]
    fn init_twice_is_harmless() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.init().unwrap();
        store.add(&NewContact::mobile("Ada", "5551234")).unwrap();
    }
}
