use anyhow::Result;
use rusqlite::OptionalExtension;
use sojourn_types::models::{Post, Scholarship};

use crate::{Database, fmt_ts, parse_id, parse_ts};

impl Database {
    pub fn insert_scholarship(&self, s: &Scholarship) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scholarships (id, name, photo, funding, eligibility, process, dates, requirements, additional)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    s.id,
                    s.name,
                    s.photo,
                    s.funding,
                    s.eligibility,
                    s.process,
                    s.dates,
                    s.requirements,
                    s.additional,
                ],
            )?;
            Ok(())
        })
    }

    /// Full-row update keyed by the scholarship's slug. Returns false when
    /// the id is unknown.
    pub fn update_scholarship(&self, s: &Scholarship) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE scholarships
                 SET name = ?2, photo = ?3, funding = ?4, eligibility = ?5, process = ?6,
                     dates = ?7, requirements = ?8, additional = ?9
                 WHERE id = ?1",
                rusqlite::params![
                    s.id,
                    s.name,
                    s.photo,
                    s.funding,
                    s.eligibility,
                    s.process,
                    s.dates,
                    s.requirements,
                    s.additional,
                ],
            )?;
            Ok(updated > 0)
        })
    }

    pub fn get_scholarship(&self, id: &str) -> Result<Option<Scholarship>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, photo, funding, eligibility, process, dates, requirements, additional
                     FROM scholarships WHERE id = ?1",
                    [id],
                    map_scholarship,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_scholarships(&self) -> Result<Vec<Scholarship>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, photo, funding, eligibility, process, dates, requirements, additional
                 FROM scholarships",
            )?;
            let rows = stmt
                .query_map([], map_scholarship)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_post(&self, post: &Post) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, title, summary, content, cover, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    post.id.to_string(),
                    post.title,
                    post.summary,
                    post.content,
                    post.cover,
                    fmt_ts(post.created_at),
                ],
            )?;
            Ok(())
        })
    }

    pub fn update_post(&self, post: &Post) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE posts SET title = ?2, summary = ?3, content = ?4, cover = ?5 WHERE id = ?1",
                rusqlite::params![
                    post.id.to_string(),
                    post.title,
                    post.summary,
                    post.content,
                    post.cover,
                ],
            )?;
            Ok(updated > 0)
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, title, summary, content, cover, created_at FROM posts WHERE id = ?1",
                    [id],
                    map_post,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Front-page feed: the latest posts, newest first.
    pub fn list_posts(&self, limit: u32) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, summary, content, cover, created_at
                 FROM posts ORDER BY created_at DESC LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], map_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn map_scholarship(row: &rusqlite::Row<'_>) -> rusqlite::Result<Scholarship> {
    Ok(Scholarship {
        id: row.get(0)?,
        name: row.get(1)?,
        photo: row.get(2)?,
        funding: row.get(3)?,
        eligibility: row.get(4)?,
        process: row.get(5)?,
        dates: row.get(6)?,
        requirements: row.get(7)?,
        additional: row.get(8)?,
    })
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: parse_id(&row.get::<_, String>(0)?),
        title: row.get(1)?,
        summary: row.get(2)?,
        content: row.get(3)?,
        cover: row.get(4)?,
        created_at: parse_ts(&row.get::<_, String>(5)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn scholarship(id: &str) -> Scholarship {
        Scholarship {
            id: id.to_string(),
            name: "Field Research Grant".to_string(),
            photo: "/uploads/abc.png".to_string(),
            funding: "Full".to_string(),
            eligibility: "Undergraduates".to_string(),
            process: "Online application".to_string(),
            dates: Some("2026-10-01".to_string()),
            requirements: "Transcript".to_string(),
            additional: "".to_string(),
        }
    }

    fn post(title: &str, at: chrono::DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            summary: "summary".to_string(),
            content: "content".to_string(),
            cover: "/uploads/cover.png".to_string(),
            created_at: at,
        }
    }

    #[test]
    fn scholarship_update_reports_unknown_id() {
        let db = Database::open_in_memory().unwrap();
        db.insert_scholarship(&scholarship("grant-1")).unwrap();

        let mut s = scholarship("grant-1");
        s.funding = "Partial".to_string();
        assert!(db.update_scholarship(&s).unwrap());
        assert_eq!(db.get_scholarship("grant-1").unwrap().unwrap().funding, "Partial");

        let missing = scholarship("grant-2");
        assert!(!db.update_scholarship(&missing).unwrap());
    }

    #[test]
    fn post_feed_is_newest_first_and_capped() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        for i in 0..25i64 {
            db.insert_post(&post(&format!("post {}", i), now - Duration::minutes(i)))
                .unwrap();
        }

        let feed = db.list_posts(20).unwrap();
        assert_eq!(feed.len(), 20);
        assert_eq!(feed[0].title, "post 0");
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn post_update_keeps_created_at() {
        let db = Database::open_in_memory().unwrap();
        let original = post("before", Utc::now());
        db.insert_post(&original).unwrap();

        let mut edited = original.clone();
        edited.title = "after".to_string();
        edited.created_at = Utc::now() + Duration::days(1); // must be ignored
        assert!(db.update_post(&edited).unwrap());

        let stored = db.get_post(&original.id.to_string()).unwrap().unwrap();
        assert_eq!(stored.title, "after");
        assert_eq!(stored.created_at, parse_ts(&fmt_ts(original.created_at)));
    }
}
