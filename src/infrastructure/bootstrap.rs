//! Composition root: wires the store, notifiers, and services to the bot.

use std::sync::Arc;

use chrono::{Duration, Utc};
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::adapter::inbound::telegram::{run_bot, BotServices};
use crate::adapter::outbound::notifier::telegram::TelegramNotifier;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteStore;
use crate::application::dispatcher::CommandDispatcher;
use crate::application::membership::MembershipTracker;
use crate::application::monitor::MessageMonitor;
use crate::domain::settings::NO_REPEAT_CHOICES;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, Notifier, NotifierRegistry};
use crate::port::outbound::store::{SettingsStore, Store};

/// Open the database and run the bot until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the database directory cannot be created, the pool
/// cannot be opened, or migrations fail.
pub async fn run(config: Config) -> Result<()> {
    let store = Arc::new(open_store(&config)?);
    prune_push_history(store.as_ref()).await;
    let config = Arc::new(config);

    let bot = Bot::new(config.telegram.bot_token.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(build_notifier_registry(&config, &bot));
    let username = fetch_username(&bot).await;

    let services = Arc::new(build_services(store, notifier, Arc::clone(&config), username));
    run_bot(bot, services, config.telegram.register_commands).await;
    Ok(())
}

/// Create the database directory, open the pool, and apply migrations.
pub(crate) fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let pool = create_pool(&config.database)?;
    run_migrations(&pool)?;
    info!(path = %path.display(), "Database ready");
    Ok(SqliteStore::new(pool))
}

/// Drop push records no no-repeat window can reach any more.
pub(crate) async fn prune_push_history<S: SettingsStore>(store: &S) {
    let longest = NO_REPEAT_CHOICES.iter().copied().max().unwrap_or(0);
    let cutoff = Utc::now() - Duration::minutes(i64::from(longest));
    match store.prune_push_records(cutoff).await {
        Ok(0) => {}
        Ok(pruned) => info!(pruned, "Pruned stale push records"),
        Err(e) => warn!(error = %e, "Failed to prune push records"),
    }
}

/// Build notifier registry from configuration.
///
/// Alerts are always logged; Telegram delivery is added when enabled.
pub(crate) fn build_notifier_registry(config: &Config, bot: &Bot) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.notify.enabled {
        registry.register(Box::new(TelegramNotifier::new(bot.clone())));
        info!("Telegram alerts enabled");
    } else {
        info!("Telegram alerts disabled, matches are only logged");
    }

    registry
}

/// Wire the application services around a shared store and notifier.
pub fn build_services<S: Store>(
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: Arc<Config>,
    username: Option<String>,
) -> BotServices<S> {
    BotServices {
        dispatcher: CommandDispatcher::new(Arc::clone(&store), Arc::clone(&config)),
        monitor: MessageMonitor::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&config),
        ),
        membership: MembershipTracker::new(store, notifier, config),
        username,
    }
}

async fn fetch_username(bot: &Bot) -> Option<String> {
    match bot.get_me().await {
        Ok(me) => {
            info!(id = %me.id, username = ?me.username(), "Authenticated with Telegram");
            Some(me.username().to_string())
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch bot identity, /cmd@other_bot will not be skipped");
            None
        }
    }
}
