use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- One table for all conversation stores. `partition` names the
        -- identity that owns the store: the sender for user-side sends,
        -- the receiver for admin-side sends.
        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            partition   TEXT NOT NULL,
            sender      TEXT NOT NULL,
            receiver    TEXT NOT NULL,
            text        TEXT NOT NULL,
            profile     TEXT,
            read        INTEGER NOT NULL DEFAULT 0,
            role        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(partition, sender, receiver, created_at);

        CREATE INDEX IF NOT EXISTS idx_messages_inbound
            ON messages(partition, receiver, sender);

        CREATE TABLE IF NOT EXISTS notifications (
            id          TEXT PRIMARY KEY,
            sender      TEXT NOT NULL,
            receiver    TEXT NOT NULL,
            text        TEXT NOT NULL,
            profile     TEXT,
            role        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_receiver
            ON notifications(receiver, created_at);

        CREATE INDEX IF NOT EXISTS idx_notifications_role
            ON notifications(role, created_at);

        CREATE TABLE IF NOT EXISTS volunteers (
            id          TEXT PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            gender      TEXT NOT NULL,
            countries   TEXT NOT NULL,
            cities      TEXT NOT NULL,
            university  TEXT NOT NULL,
            image       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_volunteers_name
            ON volunteers(first_name, last_name);

        CREATE TABLE IF NOT EXISTS users (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL UNIQUE,
            fullname     TEXT NOT NULL,
            email        TEXT NOT NULL,
            phone_number TEXT,
            pincode      TEXT,
            role         TEXT NOT NULL DEFAULT 'user'
        );

        -- Scholarship ids are client-assigned slugs, not uuids.
        CREATE TABLE IF NOT EXISTS scholarships (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL,
            photo        TEXT NOT NULL,
            funding      TEXT NOT NULL,
            eligibility  TEXT NOT NULL,
            process      TEXT NOT NULL,
            dates        TEXT,
            requirements TEXT NOT NULL,
            additional   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            summary     TEXT NOT NULL,
            content     TEXT NOT NULL,
            cover       TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
