use quotevault_shared::UserFavorite;
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::rows::{collect, fmt_ts, now, ts_at, uuid_at};

impl Database {
    /// Marks `quote_id` as a favorite of `user_id`.
    ///
    /// Fails with [`StoreError::Duplicate`] if it already is one.
    pub fn insert_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<UserFavorite> {
        let favorite = UserFavorite {
            id: Uuid::new_v4(),
            user_id,
            quote_id,
            created_at: now(),
        };
        self.conn()
            .execute(
                "INSERT INTO user_favorites (id, user_id, quote_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    favorite.id.to_string(),
                    user_id.to_string(),
                    quote_id.to_string(),
                    fmt_ts(&favorite.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "Favorite"))?;
        Ok(favorite)
    }

    pub fn delete_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM user_favorites WHERE user_id = ?1 AND quote_id = ?2",
            params![user_id.to_string(), quote_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Favorites of `user_id`, most recently added first.
    pub fn list_favorites(&self, user_id: Uuid) -> Result<Vec<UserFavorite>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, quote_id, created_at
             FROM user_favorites
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id.to_string()], |row| {
            Ok(UserFavorite {
                id: uuid_at(row, 0)?,
                user_id: uuid_at(row, 1)?,
                quote_id: uuid_at(row, 2)?,
                created_at: ts_at(row, 3)?,
            })
        })?;
        Ok(collect(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quotevault_shared::Quote;

    fn db_with_quote() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let quote = Quote {
            id: Uuid::new_v4(),
            text: "Stay hungry".into(),
            author: "Stewart Brand".into(),
            category_id: None,
            created_at: Utc::now(),
        };
        db.insert_quote(&quote).unwrap();
        (db, quote.id)
    }

    #[test]
    fn insert_list_delete() {
        let (db, quote_id) = db_with_quote();
        let user = Uuid::new_v4();

        let fav = db.insert_favorite(user, quote_id).unwrap();
        assert_eq!(db.list_favorites(user).unwrap(), vec![fav]);
        assert!(db.list_favorites(Uuid::new_v4()).unwrap().is_empty());

        assert!(db.delete_favorite(user, quote_id).unwrap());
        assert!(!db.delete_favorite(user, quote_id).unwrap());
    }

    #[test]
    fn duplicate_favorite() {
        let (db, quote_id) = db_with_quote();
        let user = Uuid::new_v4();
        db.insert_favorite(user, quote_id).unwrap();
        assert!(matches!(
            db.insert_favorite(user, quote_id),
            Err(StoreError::Duplicate("Favorite"))
        ));
    }
}
