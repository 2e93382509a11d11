use anyhow::Result;
use rusqlite::Connection;
use sojourn_types::models::{ConversationSummary, Message};

use crate::{Database, fmt_ts, parse_id, parse_ts};

impl Database {
    pub fn insert_message(&self, msg: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, partition, sender, receiver, text, profile, read, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    msg.id.to_string(),
                    msg.partition,
                    msg.sender,
                    msg.receiver,
                    msg.text,
                    msg.profile,
                    msg.read,
                    msg.role,
                    fmt_ts(msg.created_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Every message exchanged between `a` and `b`, in either direction,
    /// within partition `a`. Ascending by time: the natural order for a
    /// conversation view.
    pub fn conversation_history(&self, a: &str, b: &str) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_history(conn, a, b))
    }

    /// Flip every unread counterpart→viewer message of the given role to
    /// read, within one partition. Messages the counterpart addressed to
    /// anyone else are untouched: read-state belongs to the receiver.
    /// Returns the number of rows updated; calling again immediately
    /// updates zero.
    pub fn mark_read(
        &self,
        partition: &str,
        counterpart: &str,
        viewer: &str,
        role: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE messages SET read = 1
                 WHERE partition = ?1 AND sender = ?2 AND receiver = ?3 AND read = 0 AND role = ?4",
                rusqlite::params![partition, counterpart, viewer, role],
            )?;
            Ok(updated)
        })
    }

    /// Inbox summaries for a participant: one row per counterpart, carrying
    /// the latest message and the unread count for the given role.
    ///
    /// Single grouped aggregation over the participant's partition instead of
    /// a per-counterpart query fan-out. SQLite's bare-column rule makes
    /// `text`/`profile` come from the `MAX(created_at)` row.
    pub fn summarize(&self, participant: &str, role: &str) -> Result<Vec<ConversationSummary>> {
        self.with_conn(|conn| query_summaries(conn, participant, role))
    }
}

fn query_history(conn: &Connection, a: &str, b: &str) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, partition, sender, receiver, text, profile, read, role, created_at
         FROM messages
         WHERE partition = ?1
           AND ((sender = ?1 AND receiver = ?2) OR (sender = ?2 AND receiver = ?1))
         ORDER BY created_at ASC",
    )?;

    let rows = stmt
        .query_map([a, b], |row| {
            Ok(Message {
                id: parse_id(&row.get::<_, String>(0)?),
                partition: row.get(1)?,
                sender: row.get(2)?,
                receiver: row.get(3)?,
                text: row.get(4)?,
                profile: row.get(5)?,
                read: row.get(6)?,
                role: row.get(7)?,
                created_at: parse_ts(&row.get::<_, String>(8)?),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_summaries(conn: &Connection, participant: &str, role: &str) -> Result<Vec<ConversationSummary>> {
    let mut stmt = conn.prepare(
        "WITH convo AS (
             SELECT CASE WHEN sender = ?1 THEN receiver ELSE sender END AS counterpart,
                    text, profile, created_at, receiver, read, role
             FROM messages
             WHERE partition = ?1 AND (sender = ?1 OR receiver = ?1)
         )
         SELECT counterpart,
                text,
                MAX(created_at) AS last_time,
                profile,
                SUM(CASE WHEN receiver = ?1 AND read = 0 AND role = ?2 THEN 1 ELSE 0 END)
         FROM convo
         WHERE counterpart <> ?1
         GROUP BY counterpart
         ORDER BY last_time DESC",
    )?;

    let rows = stmt
        .query_map([participant, role], |row| {
            Ok(ConversationSummary {
                counterpart: row.get(0)?,
                last_text: row.get(1)?,
                last_time: row.get::<_, Option<String>>(2)?.map(|raw| parse_ts(&raw)),
                profile: row.get(3)?,
                unread_count: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
