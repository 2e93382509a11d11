use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use sojourn_types::models::{User, Volunteer};

use crate::{Database, parse_id};

impl Database {
    pub fn insert_volunteer(&self, v: &Volunteer) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO volunteers (id, first_name, last_name, gender, countries, cities, university, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    v.id.to_string(),
                    v.first_name,
                    v.last_name,
                    v.gender,
                    v.countries,
                    v.cities,
                    v.university,
                    v.image,
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
        self.with_conn(|conn| {
            query_volunteers(conn, "ORDER BY last_name, first_name", &[])
        })
    }

    /// Resolve a display name to volunteer profiles. Names are not unique,
    /// so this can match several records; no match is an empty list, not an
    /// error.
    pub fn find_volunteers(&self, first_name: &str, last_name: &str) -> Result<Vec<Volunteer>> {
        self.with_conn(|conn| {
            query_volunteers(
                conn,
                "WHERE first_name = ?1 AND last_name = ?2",
                &[first_name, last_name],
            )
        })
    }

    /// Written by the registration collaborator; exposed here so the whole
    /// schema has one owner.
    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, fullname, email, phone_number, pincode, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    user.id.to_string(),
                    user.name,
                    user.fullname,
                    user.email,
                    user.phone_number,
                    user.pincode,
                    user.role,
                ],
            )?;
            Ok(())
        })
    }

    /// Everyone except admins, alphabetical by name — the contact list shown
    /// to the admin console.
    pub fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, fullname, email, phone_number, pincode, role
                 FROM users WHERE role <> 'admin' ORDER BY name",
            )?;
            let rows = stmt
                .query_map([], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user(&self, name: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, fullname, email, phone_number, pincode, role
                     FROM users WHERE name = ?1",
                    [name],
                    map_user,
                )
                .optional()?;
            Ok(row)
        })
    }
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_id(&row.get::<_, String>(0)?),
        name: row.get(1)?,
        fullname: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        pincode: row.get(5)?,
        role: row.get(6)?,
    })
}

fn query_volunteers(conn: &Connection, tail: &str, params: &[&str]) -> Result<Vec<Volunteer>> {
    let sql = format!(
        "SELECT id, first_name, last_name, gender, countries, cities, university, image
         FROM volunteers {}",
        tail
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(Volunteer {
                id: parse_id(&row.get::<_, String>(0)?),
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                gender: row.get(3)?,
                countries: row.get(4)?,
                cities: row.get(5)?,
                university: row.get(6)?,
                image: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn volunteer(first: &str, last: &str) -> Volunteer {
        Volunteer {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender: "F".to_string(),
            countries: "Kenya".to_string(),
            cities: "Nairobi".to_string(),
            university: "Strathmore".to_string(),
            image: None,
        }
    }

    fn user(name: &str, role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            fullname: format!("{} Fullname", name),
            email: format!("{}@example.org", name),
            phone_number: None,
            pincode: None,
            role: role.to_string(),
        }
    }

    #[test]
    fn find_volunteers_matches_exact_name_only() {
        let db = Database::open_in_memory().unwrap();
        db.insert_volunteer(&volunteer("Jane", "Doe")).unwrap();
        db.insert_volunteer(&volunteer("Jane", "Roe")).unwrap();

        let found = db.find_volunteers("Jane", "Doe").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name, "Doe");

        assert!(db.find_volunteers("John", "Doe").unwrap().is_empty());
    }

    #[test]
    fn duplicate_display_names_all_resolve() {
        let db = Database::open_in_memory().unwrap();
        db.insert_volunteer(&volunteer("Jane", "Doe")).unwrap();
        db.insert_volunteer(&volunteer("Jane", "Doe")).unwrap();

        assert_eq!(db.find_volunteers("Jane", "Doe").unwrap().len(), 2);
    }

    #[test]
    fn user_listing_hides_admins_and_sorts() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&user("zoe", "user")).unwrap();
        db.insert_user(&user("root", "admin")).unwrap();
        db.insert_user(&user("amir", "user")).unwrap();

        let listed = db.list_users().unwrap();
        let names: Vec<_> = listed.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["amir", "zoe"]);
    }

    #[test]
    fn get_user_by_name() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&user("amir", "user")).unwrap();

        assert!(db.get_user("amir").unwrap().is_some());
        assert!(db.get_user("nobody").unwrap().is_none());
    }
}
