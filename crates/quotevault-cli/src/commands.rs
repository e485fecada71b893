use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use quotevault_shared::{FontSize, Theme};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "quotevault", version, about = "Browse, collect and share quotes")]
pub(crate) struct Cli {
    /// Hosted backend base URL (overrides QUOTEVAULT_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Local database file (overrides QUOTEVAULT_DB_PATH).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Acting user in local mode (overrides QUOTEVAULT_USER_ID).
    #[arg(long, global = true)]
    pub user: Option<Uuid>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Page through the quote feed.
    Feed {
        #[arg(long)]
        category: Option<Uuid>,
        /// Matched against quote text or author.
        #[arg(long)]
        search: Option<String>,
        /// Exact author.
        #[arg(long)]
        author: Option<String>,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Quote of the day.
    Daily {
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Quotes whose text or author contains the term.
    Search {
        term: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Categories,
    Authors,
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    Collections {
        #[command(subcommand)]
        action: CollectionsCommand,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Reschedule the daily reminder from the saved settings.
    Remind {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print a quote formatted for sharing.
    Share { quote_id: Uuid },
    /// Resolve a quotevault:// link.
    Link { url: String },
    /// Import categories and quotes into the local database.
    Seed { file: PathBuf },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    ResetPassword {
        #[command(subcommand)]
        action: ResetCommand,
    },
    Logout,
}

#[derive(Subcommand)]
pub(crate) enum FavoritesCommand {
    List,
    Add { quote_id: Uuid },
    Remove { quote_id: Uuid },
    Toggle { quote_id: Uuid },
}

#[derive(Subcommand)]
pub(crate) enum CollectionsCommand {
    List,
    Create {
        name: String,
    },
    Rename {
        collection_id: Uuid,
        name: String,
    },
    Delete {
        collection_id: Uuid,
    },
    Show {
        collection_id: Uuid,
    },
    Add {
        collection_id: Uuid,
        quote_id: Uuid,
    },
    Remove {
        collection_id: Uuid,
        quote_id: Uuid,
    },
    /// Quotes to pick from when adding to a collection.
    Candidates {
        #[arg(default_value = "")]
        term: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        font_size: Option<FontSize>,
        /// `#RRGGBB`
        #[arg(long)]
        accent_color: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        /// `HH:MM`
        #[arg(long, value_parser = parse_time)]
        notification_time: Option<NaiveTime>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    Show,
    SetName { name: String },
    SetAvatar { url: String },
}

#[derive(Subcommand)]
pub(crate) enum ResetCommand {
    /// Mail a recovery link.
    Request {
        #[arg(long)]
        email: String,
    },
    /// Exchange the link's code and set a new password.
    Complete {
        #[arg(long)]
        link: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "quotevault",
            "--db",
            "/tmp/q.db",
            "settings",
            "set",
            "--theme",
            "dark",
            "--notification-time",
            "07:45",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/q.db")));
        match cli.command {
            Command::Settings {
                action:
                    SettingsCommand::Set {
                        theme,
                        notification_time,
                        ..
                    },
            } => {
                assert_eq!(theme, Some(Theme::Dark));
                assert_eq!(notification_time, NaiveTime::from_hms_opt(7, 45, 0));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn rejects_bad_time() {
        assert!(Cli::try_parse_from([
            "quotevault",
            "settings",
            "set",
            "--notification-time",
            "7pm"
        ])
        .is_err());
    }
}
