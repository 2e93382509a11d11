use anyhow::Result;
use rusqlite::Connection;
use sojourn_types::models::Notification;

use crate::{Database, fmt_ts, parse_id, parse_ts};

impl Database {
    pub fn insert_notification(&self, notice: &Notification) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, sender, receiver, text, profile, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    notice.id.to_string(),
                    notice.sender,
                    notice.receiver,
                    notice.text,
                    notice.profile,
                    notice.role,
                    fmt_ts(notice.created_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Pending notices for a recipient, newest first.
    pub fn notifications_for(&self, receiver: &str) -> Result<Vec<Notification>> {
        self.with_conn(|conn| {
            query_notifications(conn, "receiver = ?1 ORDER BY created_at DESC", receiver)
        })
    }

    /// The role-wide inbox (all notices tagged for one console), newest first.
    pub fn notifications_for_role(&self, role: &str) -> Result<Vec<Notification>> {
        self.with_conn(|conn| {
            query_notifications(conn, "role = ?1 ORDER BY created_at DESC", role)
        })
    }

    /// Returns false when the id did not exist.
    pub fn delete_notification(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM notifications WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    /// Bulk-clear every notice matching the (sender, receiver, role) triple.
    /// Used by read-state reconciliation when a conversation is opened.
    pub fn delete_notifications_matching(
        &self,
        sender: &str,
        receiver: &str,
        role: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM notifications WHERE sender = ?1 AND receiver = ?2 AND role = ?3",
                rusqlite::params![sender, receiver, role],
            )?;
            Ok(deleted)
        })
    }
}

fn query_notifications(conn: &Connection, filter: &str, param: &str) -> Result<Vec<Notification>> {
    let sql = format!(
        "SELECT id, sender, receiver, text, profile, role, created_at FROM notifications WHERE {}",
        filter
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([param], |row| {
            Ok(Notification {
                id: parse_id(&row.get::<_, String>(0)?),
                sender: row.get(1)?,
                receiver: row.get(2)?,
                text: row.get(3)?,
                profile: row.get(4)?,
                role: row.get(5)?,
                created_at: parse_ts(&row.get::<_, String>(6)?),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sojourn_types::models::Message;
    use uuid::Uuid;

    fn notice(sender: &str, receiver: &str, role: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            text: format!("New message from {}", sender),
            profile: None,
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn lists_are_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();

        let mut old = notice("Raj Patel", "jane", "user");
        old.created_at = now - Duration::hours(2);
        let mut new = notice("Mina Okafor", "jane", "user");
        new.created_at = now;
        db.insert_notification(&old).unwrap();
        db.insert_notification(&new).unwrap();

        let listed = db.notifications_for("jane").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].sender, "Mina Okafor");
        assert_eq!(listed[1].sender, "Raj Patel");
    }

    #[test]
    fn role_inbox_spans_receivers() {
        let db = Database::open_in_memory().unwrap();
        db.insert_notification(&notice("jane", "admin", "admin")).unwrap();
        db.insert_notification(&notice("Raj Patel", "moderator", "admin")).unwrap();
        db.insert_notification(&notice("Raj Patel", "jane", "user")).unwrap();

        let listed = db.notifications_for_role("admin").unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|n| n.role == "admin"));
    }

    #[test]
    fn delete_by_id_reports_missing() {
        let db = Database::open_in_memory().unwrap();
        let n = notice("jane", "admin", "admin");
        db.insert_notification(&n).unwrap();

        assert!(db.delete_notification(&n.id.to_string()).unwrap());
        assert!(!db.delete_notification(&n.id.to_string()).unwrap());
        assert!(!db.delete_notification(&Uuid::new_v4().to_string()).unwrap());
    }

    #[test]
    fn delete_matching_clears_only_the_triple() {
        let db = Database::open_in_memory().unwrap();
        db.insert_notification(&notice("jane", "admin", "admin")).unwrap();
        db.insert_notification(&notice("jane", "admin", "admin")).unwrap();
        db.insert_notification(&notice("jane", "Raj Patel", "user")).unwrap();

        let deleted = db.delete_notifications_matching("jane", "admin", "admin").unwrap();
        assert_eq!(deleted, 2);
        assert!(db.notifications_for("admin").unwrap().is_empty());
        assert_eq!(db.notifications_for("Raj Patel").unwrap().len(), 1);
    }

    // The full reconciliation scenario: a user writes to the admin console,
    // the admin opens the conversation, the message flips to read and the
    // console notice disappears.
    #[test]
    fn opening_a_conversation_reconciles_read_state() {
        let db = Database::open_in_memory().unwrap();

        // Sent through the user surface: stored under the sender's partition
        db.insert_message(&Message {
            id: Uuid::new_v4(),
            partition: "Jane Doe".to_string(),
            text: "Hi".to_string(),
            sender: "Jane Doe".to_string(),
            receiver: "admin".to_string(),
            profile: None,
            read: false,
            role: "user".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();
        db.insert_notification(&notice("Jane Doe", "admin", "admin")).unwrap();

        let history = db.conversation_history("Jane Doe", "admin").unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].read);

        // What the admin-side open-conversation endpoint performs
        let marked = db.mark_read("Jane Doe", "Jane Doe", "admin", "user").unwrap();
        let cleared = db.delete_notifications_matching("Jane Doe", "admin", "admin").unwrap();
        assert_eq!(marked, 1);
        assert_eq!(cleared, 1);

        let history = db.conversation_history("Jane Doe", "admin").unwrap();
        assert!(history[0].read);
        assert!(db.notifications_for("admin").unwrap().is_empty());
    }
}
