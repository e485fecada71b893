//! Per-user rows: `profiles` and `user_settings`.

use quotevault_shared::{UserProfile, UserSettings};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::rows::{fmt_time, fmt_ts, time_at, ts_at, uuid_at};

impl Database {
    pub fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO profiles (id, name, avatar_url, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, avatar_url = excluded.avatar_url",
            params![
                profile.id.to_string(),
                profile.name,
                profile.avatar_url,
                fmt_ts(&profile.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let profile = self
            .conn()
            .query_row(
                "SELECT id, name, avatar_url, created_at FROM profiles WHERE id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok(UserProfile {
                        id: uuid_at(row, 0)?,
                        name: row.get(1)?,
                        avatar_url: row.get(2)?,
                        created_at: ts_at(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    pub fn upsert_settings(&self, settings: &UserSettings) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO user_settings
                (user_id, theme, font_size, accent_color, notification_enabled, notification_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                settings.user_id.to_string(),
                settings.theme.as_str(),
                settings.font_size.as_str(),
                settings.accent_color,
                settings.notification_enabled,
                fmt_time(&settings.notification_time),
            ],
        )?;
        Ok(())
    }

    pub fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>> {
        let settings = self
            .conn()
            .query_row(
                "SELECT user_id, theme, font_size, accent_color, notification_enabled, notification_time
                 FROM user_settings WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    let theme: String = row.get(1)?;
                    let font_size: String = row.get(2)?;
                    Ok(UserSettings {
                        user_id: uuid_at(row, 0)?,
                        // Unknown values fall back to defaults rather than failing the read.
                        theme: theme.parse().unwrap_or_default(),
                        font_size: font_size.parse().unwrap_or_default(),
                        accent_color: row.get(3)?,
                        notification_enabled: row.get(4)?,
                        notification_time: time_at(row, 5)?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }
}
