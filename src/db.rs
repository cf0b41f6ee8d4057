use chrono::Utc;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

// Database connection singleton
static DB: Lazy<Mutex<Option<Connection>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    pub id: String,
    pub display_name: Option<String>,
    pub created_at: String,
}

/// Seven-dimensional energy-center self-assessment, scores 0-10.
/// Read-only once handed to the analyzers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChakraProfile {
    pub root: f64,
    pub sacral: f64,
    pub solar_plexus: f64,
    pub heart: f64,
    pub throat: f64,
    pub third_eye: f64,
    pub crown: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub content: String,
    pub gratitude: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Turn {
    pub role: String, // "user" | "coach"
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversationSession {
    pub id: String,
    pub coach_type: String,
    pub turns: Vec<Turn>,
}

pub fn init_database(db_path: &Path) -> Result<()> {
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;

    let mut db = DB.lock().unwrap();
    *db = Some(conn);

    Ok(())
}

/// In-memory database, used by tests and throwaway sessions.
pub fn init_database_in_memory() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;

    let mut db = DB.lock().unwrap();
    *db = Some(conn);

    Ok(())
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Users; created_at anchors the days-active calculation
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            display_name TEXT,
            created_at TEXT NOT NULL
        );

        -- At most one current chakra assessment per user
        CREATE TABLE IF NOT EXISTS chakra_profiles (
            user_id TEXT PRIMARY KEY,
            root REAL,
            sacral REAL,
            solar_plexus REAL,
            heart REAL,
            throat REAL,
            third_eye REAL,
            crown REAL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Journal entries; gratitude is a JSON array of phrases
        CREATE TABLE IF NOT EXISTS journal_entries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            gratitude TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Coach conversation sessions
        CREATE TABLE IF NOT EXISTS conversation_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            coach_type TEXT NOT NULL,
            started_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        -- Turns within a session, ordered by position
        CREATE TABLE IF NOT EXISTS conversation_turns (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY (session_id) REFERENCES conversation_sessions(id)
        );
        ",
    )?;

    Ok(())
}

fn with_connection<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let db = DB.lock().unwrap();
    let conn = db.as_ref().expect("Database not initialized");
    f(conn)
}

// ============ Users ============

pub fn create_user(id: &str, display_name: Option<&str>) -> Result<UserRecord> {
    let now = Utc::now().to_rfc3339();
    with_connection(|conn| {
        conn.execute(
            "INSERT INTO users (id, display_name, created_at) VALUES (?1, ?2, ?3)",
            params![id, display_name, now],
        )?;
        Ok(UserRecord {
            id: id.to_string(),
            display_name: display_name.map(|s| s.to_string()),
            created_at: now.clone(),
        })
    })
}

pub fn get_user(id: &str) -> Result<Option<UserRecord>> {
    with_connection(|conn| {
        conn.query_row(
            "SELECT id, display_name, created_at FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    display_name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()
    })
}

// ============ Chakra Profiles ============

pub fn save_chakra_profile(user_id: &str, profile: &ChakraProfile) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    with_connection(|conn| {
        conn.execute(
            "INSERT INTO chakra_profiles
                (user_id, root, sacral, solar_plexus, heart, throat, third_eye, crown, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(user_id) DO UPDATE SET
                root = ?2, sacral = ?3, solar_plexus = ?4, heart = ?5,
                throat = ?6, third_eye = ?7, crown = ?8, updated_at = ?9",
            params![
                user_id,
                profile.root,
                profile.sacral,
                profile.solar_plexus,
                profile.heart,
                profile.throat,
                profile.third_eye,
                profile.crown,
                now
            ],
        )?;
        Ok(())
    })
}

/// Returns None both when no assessment exists and when the stored row is
/// missing a score (a malformed record behaves as "no profile yet").
pub fn get_chakra_profile(user_id: &str) -> Result<Option<ChakraProfile>> {
    with_connection(|conn| {
        let row: Option<[Option<f64>; 7]> = conn
            .query_row(
                "SELECT root, sacral, solar_plexus, heart, throat, third_eye, crown
                 FROM chakra_profiles WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok([
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ])
                },
            )
            .optional()?;

        let profile = row.and_then(|scores| {
            Some(ChakraProfile {
                root: scores[0]?,
                sacral: scores[1]?,
                solar_plexus: scores[2]?,
                heart: scores[3]?,
                throat: scores[4]?,
                third_eye: scores[5]?,
                crown: scores[6]?,
            })
        });

        Ok(profile)
    })
}

// ============ Journal Entries ============

pub fn save_journal_entry(user_id: &str, content: &str, gratitude: &[String]) -> Result<JournalEntry> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let gratitude_json = serde_json::to_string(gratitude).unwrap_or_else(|_| "[]".to_string());
    with_connection(|conn| {
        conn.execute(
            "INSERT INTO journal_entries (id, user_id, content, gratitude, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, user_id, content, gratitude_json, now],
        )?;
        Ok(JournalEntry {
            id: id.clone(),
            content: content.to_string(),
            gratitude: gratitude.to_vec(),
            created_at: now.clone(),
        })
    })
}

/// Most recent first.
pub fn get_journal_entries(user_id: &str) -> Result<Vec<JournalEntry>> {
    with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, content, gratitude, created_at FROM journal_entries
             WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;

        let entries = stmt
            .query_map(params![user_id], |row| {
                let gratitude_json: String = row.get(2)?;
                Ok(JournalEntry {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    gratitude: serde_json::from_str(&gratitude_json).unwrap_or_default(),
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(entries)
    })
}

// ============ Conversations ============

pub fn create_session(user_id: &str, coach_type: &str) -> Result<ConversationSession> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    with_connection(|conn| {
        conn.execute(
            "INSERT INTO conversation_sessions (id, user_id, coach_type, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, user_id, coach_type, now],
        )?;
        Ok(ConversationSession {
            id: id.clone(),
            coach_type: coach_type.to_string(),
            turns: Vec::new(),
        })
    })
}

pub fn save_turn(session_id: &str, role: &str, content: &str) -> Result<()> {
    let id = uuid::Uuid::new_v4().to_string();
    with_connection(|conn| {
        let position: i64 = conn.query_row(
            "SELECT COUNT(*) FROM conversation_turns WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT INTO conversation_turns (id, session_id, role, content, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, session_id, role, content, position],
        )?;
        Ok(())
    })
}

/// Sessions for one user and coach type, turns in order.
pub fn get_sessions(user_id: &str, coach_type: &str) -> Result<Vec<ConversationSession>> {
    with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, coach_type FROM conversation_sessions
             WHERE user_id = ?1 AND coach_type = ?2 ORDER BY started_at ASC",
        )?;

        let shells = stmt
            .query_map(params![user_id, coach_type], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>>>()?;

        let mut turn_stmt = conn.prepare(
            "SELECT role, content FROM conversation_turns
             WHERE session_id = ?1 ORDER BY position ASC",
        )?;

        let mut sessions = Vec::with_capacity(shells.len());
        for (id, coach_type) in shells {
            let turns = turn_stmt
                .query_map(params![id], |row| {
                    Ok(Turn {
                        role: row.get(0)?,
                        content: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>>>()?;
            sessions.push(ConversationSession { id, coach_type, turns });
        }

        Ok(sessions)
    })
}

// ============ Maintenance ============

pub fn reset_all_data() -> Result<()> {
    with_connection(|conn| {
        conn.execute_batch(
            "
            DELETE FROM conversation_turns;
            DELETE FROM conversation_sessions;
            DELETE FROM journal_entries;
            DELETE FROM chakra_profiles;
            DELETE FROM users;
            ",
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test fn: the connection singleton is shared across the test binary
    #[test]
    fn test_malformed_chakra_row_reads_as_absent() {
        init_database_in_memory().unwrap();
        create_user("u1", None).unwrap();

        let profile = ChakraProfile {
            root: 5.0,
            sacral: 5.0,
            solar_plexus: 5.0,
            heart: 5.0,
            throat: 5.0,
            third_eye: 5.0,
            crown: 5.0,
        };
        save_chakra_profile("u1", &profile).unwrap();
        assert_eq!(get_chakra_profile("u1").unwrap(), Some(profile));

        // a row missing a score behaves as "no profile yet"
        with_connection(|conn| {
            conn.execute(
                "UPDATE chakra_profiles SET heart = NULL WHERE user_id = 'u1'",
                [],
            )?;
            Ok(())
        })
        .unwrap();
        assert_eq!(get_chakra_profile("u1").unwrap(), None);
    }
}
