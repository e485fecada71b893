use quotevault_shared::{Collection, CollectionQuote};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::rows::{collect, fmt_ts, now, ts_at, uuid_at};

impl Database {
    pub fn insert_collection(&self, user_id: Uuid, name: &str) -> Result<Collection> {
        let collection = Collection {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            created_at: now(),
        };
        self.conn()
            .execute(
                "INSERT INTO collections (id, user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    collection.id.to_string(),
                    user_id.to_string(),
                    collection.name,
                    fmt_ts(&collection.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "Collection"))?;
        Ok(collection)
    }

    pub fn rename_collection(&self, id: Uuid, name: &str) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE collections SET name = ?1 WHERE id = ?2",
            params![name, id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Deletes the collection and, through the foreign key, its junction rows.
    pub fn delete_collection(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM collections WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Collections of `user_id`, newest first.
    pub fn list_collections(&self, user_id: Uuid) -> Result<Vec<Collection>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, name, created_at
             FROM collections
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id.to_string()], |row| {
            Ok(Collection {
                id: uuid_at(row, 0)?,
                user_id: uuid_at(row, 1)?,
                name: row.get(2)?,
                created_at: ts_at(row, 3)?,
            })
        })?;
        Ok(collect(rows)?)
    }

    /// Adds a quote to a collection.
    ///
    /// The unique `(collection_id, quote_id)` constraint makes a concurrent
    /// duplicate insert fail with [`StoreError::Duplicate`].
    pub fn insert_collection_quote(
        &self,
        collection_id: Uuid,
        quote_id: Uuid,
    ) -> Result<CollectionQuote> {
        let link = CollectionQuote {
            id: Uuid::new_v4(),
            collection_id,
            quote_id,
        };
        self.conn()
            .execute(
                "INSERT INTO collection_quotes (id, collection_id, quote_id, added_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    link.id.to_string(),
                    collection_id.to_string(),
                    quote_id.to_string(),
                    fmt_ts(&now()),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "Quote in collection"))?;
        Ok(link)
    }

    pub fn delete_collection_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM collection_quotes WHERE collection_id = ?1 AND quote_id = ?2",
            params![collection_id.to_string(), quote_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Junction rows of a collection, most recently added first.
    pub fn list_collection_quotes(&self, collection_id: Uuid) -> Result<Vec<CollectionQuote>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, collection_id, quote_id
             FROM collection_quotes
             WHERE collection_id = ?1
             ORDER BY added_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![collection_id.to_string()], |row| {
            Ok(CollectionQuote {
                id: uuid_at(row, 0)?,
                collection_id: uuid_at(row, 1)?,
                quote_id: uuid_at(row, 2)?,
            })
        })?;
        Ok(collect(rows)?)
    }
}
