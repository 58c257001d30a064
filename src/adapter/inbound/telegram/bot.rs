//! Bot update loop.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatMemberUpdated};
use tracing::{debug, error, info, warn};

use crate::application::dispatcher::{bot_commands, CommandDispatcher};
use crate::application::membership::MembershipTracker;
use crate::application::monitor::MessageMonitor;
use crate::port::inbound::action::AlertAction;
use crate::port::outbound::store::Store;

use super::convert;

/// Application services shared by every update handler.
pub struct BotServices<S> {
    pub dispatcher: CommandDispatcher<S>,
    pub monitor: MessageMonitor<S>,
    pub membership: MembershipTracker<S>,
    /// The bot's own username, used to skip commands meant for other bots.
    pub username: Option<String>,
}

/// Run the long-polling loop until Ctrl-C.
pub async fn run_bot<S: Store>(bot: Bot, services: Arc<BotServices<S>>, register_commands: bool) {
    if register_commands {
        if let Err(e) = register_bot_commands(&bot).await {
            warn!(error = %e, "Failed to register bot commands with Telegram");
        }
    }

    info!(username = ?services.username, "Telegram listener started");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message::<S>))
        .branch(Update::filter_my_chat_member().endpoint(handle_membership::<S>))
        .branch(Update::filter_callback_query().endpoint(handle_alert_action::<S>));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![services])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram listener stopped");
}

async fn handle_message<S: Store>(
    bot: Bot,
    msg: Message,
    services: Arc<BotServices<S>>,
) -> ResponseResult<()> {
    let Some(incoming) = convert::incoming_message(&msg) else {
        return Ok(());
    };

    if !incoming.is_command() {
        services.monitor.handle(&incoming).await;
        return Ok(());
    }

    if convert::addressed_to_other_bot(&incoming.text, services.username.as_deref()) {
        return Ok(());
    }
    let Some(sender) = incoming.sender.as_ref() else {
        return Ok(());
    };
    let reply = services
        .dispatcher
        .respond_in(incoming.chat_kind, sender, &incoming.text)
        .await;
    if let Some(response) = reply {
        if let Err(e) = bot.send_message(msg.chat.id, response).await {
            error!(chat = %incoming.chat_id, error = %e, "Failed to send command response");
        }
    }
    Ok(())
}

async fn handle_membership<S: Store>(
    update: ChatMemberUpdated,
    services: Arc<BotServices<S>>,
) -> ResponseResult<()> {
    if let Some(change) = convert::bot_membership(&update) {
        services.membership.handle(&change).await;
    }
    Ok(())
}

async fn handle_alert_action<S: Store>(
    bot: Bot,
    query: CallbackQuery,
    services: Arc<BotServices<S>>,
) -> ResponseResult<()> {
    let action = query.data.as_deref().map(str::parse::<AlertAction>);
    let (Some(Ok(action)), Some(sender)) = (action, convert::sender(&query.from)) else {
        debug!(data = ?query.data, "Ignoring unrecognised callback query");
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    let reply = services.dispatcher.act(&sender, action).await;

    let mut answer = bot.answer_callback_query(query.id.clone());
    if let Some(notice) = reply.notice {
        answer = answer.text(notice);
    }
    if let Err(e) = answer.await {
        warn!(user = %sender.id, error = %e, "Failed to answer callback query");
    }

    let Some(alert) = query.regular_message() else {
        return Ok(());
    };
    if let Some(text) = reply.message {
        if let Err(e) = bot.send_message(alert.chat.id, text).await {
            error!(user = %sender.id, error = %e, "Failed to send action response");
        }
    }
    if reply.remove_alert {
        if let Err(e) = bot.delete_message(alert.chat.id, alert.id).await {
            warn!(user = %sender.id, error = %e, "Failed to remove alert message");
        }
    }
    Ok(())
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
