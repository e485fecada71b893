use anyhow::Context;
use chrono::Local;
use quotevault_client::auth::SignUpOutcome;
use quotevault_client::backend::{LocalBackend, QuoteSource};
use quotevault_client::deeplink::DeepLink;
use quotevault_client::feed::FetchOutcome;
use quotevault_client::AppState;
use quotevault_shared::share::share_text;
use quotevault_shared::validation::SignUpForm;
use quotevault_shared::{Quote, QuoteFilter, QuoteQuery, SearchQuery};
use quotevault_store::SeedFile;
use tracing::info;

use crate::commands::{
    CollectionsCommand, Command, FavoritesCommand, ProfileCommand, ResetCommand, SettingsCommand,
};

pub(crate) async fn dispatch(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Feed {
            category,
            search,
            author,
            pages,
        } => {
            let filter = QuoteFilter::new(category, search, author);
            let mut outcome = state.feed.fetch_quotes(true, &filter).await;
            for _ in 1..pages {
                if !matches!(outcome, FetchOutcome::Loaded { has_more: true, .. }) {
                    break;
                }
                outcome = state.feed.load_more().await;
            }
            if let FetchOutcome::Failed { message, .. } = &outcome {
                anyhow::bail!("{message}");
            }
            print_quotes(&state.feed.quotes());
            if state.feed.has_more() {
                println!("-- more available (page {})", state.feed.current_page());
            }
        }

        Command::Daily { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            match state.daily.quote_for(date).await {
                Some(quote) => println!("{}", share_text(&quote)),
                None => println!("No quote of the day yet."),
            }
        }

        Command::Search {
            term,
            offset,
            limit,
        } => {
            let filter = QuoteFilter::new(None, Some(term), None);
            let Some(search) = SearchQuery::from_filter(&filter, offset, limit) else {
                anyhow::bail!("search term is empty");
            };
            print_quotes(&state.quotes.search_quotes(&search).await?);
        }

        Command::Categories => {
            let categories = state.quotes.list_categories().await?;
            for c in categories {
                println!("{}  {}", c.id, c.name);
            }
        }

        Command::Authors => {
            for author in state.quotes.list_authors().await? {
                println!("{author}");
            }
        }

        Command::Favorites { action } => favorites(state, action).await?,
        Command::Collections { action } => collections(state, action).await?,
        Command::Settings { action } => settings(state, action).await?,
        Command::Profile { action } => profile(state, action).await?,

        Command::Remind { date } => {
            let user_id = state.user_id()?;
            let settings = state.settings.load(user_id).await?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            match state.reminder.reschedule(&settings, today).await {
                Some(request) => println!(
                    "Reminder scheduled daily at {:02}:{:02}\n\n{}",
                    request.hour, request.minute, request.body
                ),
                None => println!("Daily reminder is off."),
            }
        }

        Command::Share { quote_id } => {
            let quotes = state
                .quotes
                .fetch_quotes(&QuoteQuery::default().ids_in(vec![quote_id]))
                .await?;
            let quote = quotes
                .first()
                .with_context(|| format!("quote {quote_id} not found"))?;
            println!("{}", share_text(quote));
        }

        Command::Link { url } => match DeepLink::parse(&url)? {
            DeepLink::QuoteOfTheDay => {
                let quote = state.daily.today().await;
                match quote {
                    Some(quote) => println!("{}", share_text(&quote)),
                    None => println!("No quote of the day yet."),
                }
            }
            DeepLink::ResetPassword { code } => {
                println!("Password reset code: {code}");
                println!("Finish with: quotevault reset-password complete --link '{url}' ...");
            }
        },

        Command::Seed { file } => {
            anyhow::ensure!(
                !state.config.is_remote(),
                "seeding only applies to the local database"
            );
            let seed = SeedFile::load(&file)
                .with_context(|| format!("reading seed file {}", file.display()))?;
            let backend = match &state.config.db_path {
                Some(path) => LocalBackend::open(path)?,
                None => LocalBackend::open_default()?,
            };
            let report = backend.import_seed(&seed)?;
            info!(
                categories = report.categories,
                quotes = report.quotes,
                "seed imported"
            );
            println!(
                "Imported {} categories and {} quotes.",
                report.categories, report.quotes
            );
        }

        Command::Login { email, password } => {
            let session = state.auth()?.sign_in(&email, &password).await?;
            println!("Signed in as {}", session.user.email.unwrap_or(email));
        }

        Command::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = SignUpForm {
                name,
                email,
                password,
                confirm_password,
            };
            match state.auth()?.sign_up(&form).await? {
                SignUpOutcome::SignedIn(session) => {
                    println!("Account created, signed in as {}", session.user.id)
                }
                SignUpOutcome::ConfirmationRequired { .. } => {
                    println!("Check your inbox to confirm {}.", form.email.trim())
                }
            }
        }

        Command::ResetPassword { action } => match action {
            ResetCommand::Request { email } => {
                state.auth()?.send_password_reset(&email).await?;
                println!("If an account exists for {email}, a reset link is on its way.");
            }
            ResetCommand::Complete {
                link,
                password,
                confirm_password,
            } => {
                let DeepLink::ResetPassword { code } = DeepLink::parse(&link)? else {
                    anyhow::bail!("not a password reset link");
                };
                let auth = state.auth()?;
                auth.exchange_code(&code).await?;
                auth.update_password(&password, &confirm_password).await?;
                println!("Password updated.");
            }
        },

        Command::Logout => {
            state.auth()?.sign_out().await?;
            println!("Signed out.");
        }
    }
    Ok(())
}

async fn favorites(state: &AppState, action: FavoritesCommand) -> anyhow::Result<()> {
    let user_id = state.user_id()?;
    let service = &state.favorites;
    match action {
        FavoritesCommand::List => print_quotes(&service.list(user_id).await?),
        FavoritesCommand::Add { quote_id } => {
            service.add(user_id, quote_id).await?;
            println!("Added to favorites.");
        }
        FavoritesCommand::Remove { quote_id } => {
            service.remove(user_id, quote_id).await?;
            println!("Removed from favorites.");
        }
        FavoritesCommand::Toggle { quote_id } => {
            let now = service.toggle(user_id, quote_id).await?;
            println!("{}", if now { "Favorited." } else { "Unfavorited." });
        }
    }
    Ok(())
}

async fn collections(state: &AppState, action: CollectionsCommand) -> anyhow::Result<()> {
    let service = &state.collections;
    match action {
        CollectionsCommand::List => {
            for c in service.list(state.user_id()?).await? {
                println!("{}  {}", c.id, c.name);
            }
        }
        CollectionsCommand::Create { name } => {
            let c = service.create(state.user_id()?, &name).await?;
            println!("Created {} ({})", c.name, c.id);
        }
        CollectionsCommand::Rename {
            collection_id,
            name,
        } => {
            service.rename(collection_id, &name).await?;
            println!("Renamed.");
        }
        CollectionsCommand::Delete { collection_id } => {
            service.delete(collection_id).await?;
            println!("Deleted.");
        }
        CollectionsCommand::Show { collection_id } => {
            print_quotes(&service.quotes_in(collection_id).await?)
        }
        CollectionsCommand::Add {
            collection_id,
            quote_id,
        } => {
            service.add_quote(collection_id, quote_id).await?;
            println!("Added to collection.");
        }
        CollectionsCommand::Remove {
            collection_id,
            quote_id,
        } => {
            service.remove_quote(collection_id, quote_id).await?;
            println!("Removed from collection.");
        }
        CollectionsCommand::Candidates {
            term,
            offset,
            limit,
        } => print_quotes(&service.search_candidates(&term, offset, limit).await?),
    }
    Ok(())
}

async fn settings(state: &AppState, action: SettingsCommand) -> anyhow::Result<()> {
    let user_id = state.user_id()?;
    let mut current = state.settings.load(user_id).await?;
    match action {
        SettingsCommand::Show => {}
        SettingsCommand::Set {
            theme,
            font_size,
            accent_color,
            notifications,
            notification_time,
        } => {
            if let Some(theme) = theme {
                current.theme = theme;
            }
            if let Some(font_size) = font_size {
                current.font_size = font_size;
            }
            if let Some(accent_color) = accent_color {
                current.accent_color = accent_color;
            }
            if let Some(enabled) = notifications {
                current.notification_enabled = enabled;
            }
            if let Some(time) = notification_time {
                current.notification_time = time;
            }
            current = state.settings.update(current).await?;
            state
                .reminder
                .reschedule(&current, Local::now().date_naive())
                .await;
        }
    }
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

async fn profile(state: &AppState, action: ProfileCommand) -> anyhow::Result<()> {
    let user_id = state.user_id()?;
    let profile = match action {
        ProfileCommand::Show => state.profile.load(user_id).await?,
        ProfileCommand::SetName { name } => Some(state.profile.update_name(user_id, &name).await?),
        ProfileCommand::SetAvatar { url } => {
            Some(state.profile.update_avatar_url(user_id, &url).await?)
        }
    };
    match profile {
        Some(p) => println!("{}", serde_json::to_string_pretty(&p)?),
        None => println!("No profile yet."),
    }
    Ok(())
}

fn print_quotes(quotes: &[Quote]) {
    if quotes.is_empty() {
        println!("No quotes.");
        return;
    }
    for q in quotes {
        println!("{}\n  \u{201C}{}\u{201D}\n  \u{2014} {}\n", q.id, q.text, q.author);
    }
}
