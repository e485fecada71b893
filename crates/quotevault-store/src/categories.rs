use quotevault_shared::Category;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::rows::{collect, fmt_ts, ts_at, uuid_at};

impl Database {
    pub fn insert_category(&self, category: &Category) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    category.id.to_string(),
                    category.name,
                    fmt_ts(&category.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "Category"))?;
        Ok(())
    }

    /// All categories by name.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, created_at FROM categories ORDER BY name COLLATE NOCASE ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: uuid_at(row, 0)?,
                name: row.get(1)?,
                created_at: ts_at(row, 2)?,
            })
        })?;
        Ok(collect(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn listed_by_name() {
        let db = Database::open_in_memory().unwrap();
        for name in ["Motivation", "love", "Humor"] {
            db.insert_category(&Category {
                id: Uuid::new_v4(),
                name: name.into(),
                created_at: Utc::now(),
            })
            .unwrap();
        }
        let names: Vec<_> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Humor", "love", "Motivation"]);
    }
}
