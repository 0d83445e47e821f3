//! Message Handler module for processing incoming Telegram messages
//!
//! Commands are dispatched first; everything else is interpreted against
//! the chat's registration state:
//!
//! - `AwaitingName`: a text message is stored as the display name
//! - `AwaitingPhoto`: the largest photo variant is stored and relayed
//! - `Idle`: the user is pointed to `/start`

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use crate::dialogue::{
    current_state, set_state, validate_display_name, RegistrationDialogue, RegistrationState,
};
use crate::localization::{t_args_lang, t_lang};
use crate::registrant::{Registrant, RegistrantUpdate, DEFAULT_PHOTO_MIME_TYPE};
use crate::transport::ChatTransport;

use super::command_handler::{handle_command, RegistrationCommand};
use super::context::{BotContext, ChatSession};
use super::event::{largest_variant, InboundEvent};

/// Dispatcher endpoint for every incoming message
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext>,
    dialogue: RegistrationDialogue,
) -> Result<()> {
    let session = ChatSession::from_message(&msg);
    let event = InboundEvent::from_message(&msg);

    handle_event(&bot, &ctx, &session, event, &dialogue).await;
    Ok(())
}

/// Handle one resolved event; errors end here as a log line and a retry prompt
pub async fn handle_event(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
    event: InboundEvent,
    dialogue: &RegistrationDialogue,
) {
    let result = match event {
        InboundEvent::Command { name, args } => {
            debug!(chat_id = %session.chat_id, command = %name, args = %args, "Received command");
            let command = RegistrationCommand::from_name(&name);
            handle_command(transport, ctx, session, command, dialogue).await
        }
        event => handle_conversation(transport, ctx, session, event, dialogue).await,
    };

    if let Err(e) = result {
        error!(chat_id = %session.chat_id, error = %e, "Failed to handle message");
        if let Err(send_err) = transport
            .send_text(session.chat_id, &t_lang("error-generic", session.lang()))
            .await
        {
            error!(chat_id = %session.chat_id, error = %send_err, "Failed to send error reply");
        }
    }
}

async fn handle_conversation(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
    event: InboundEvent,
    dialogue: &RegistrationDialogue,
) -> Result<()> {
    let state = current_state(dialogue).await?;
    debug!(chat_id = %session.chat_id, state = ?state, "Handling message for dialogue state");

    match state {
        RegistrationState::AwaitingName => {
            handle_name_input(transport, ctx, session, event, dialogue).await
        }
        RegistrationState::AwaitingPhoto => handle_photo_input(transport, ctx, session, event).await,
        RegistrationState::Idle => {
            transport
                .send_text(session.chat_id, &t_lang("start-required", session.lang()))
                .await
        }
    }
}

async fn handle_name_input(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
    event: InboundEvent,
    dialogue: &RegistrationDialogue,
) -> Result<()> {
    let language_code = session.lang();

    let name = match &event {
        InboundEvent::TextMessage { text } => validate_display_name(text).ok(),
        _ => None,
    };
    let Some(name) = name else {
        return transport
            .send_text(session.chat_id, &t_lang("name-expected", language_code))
            .await;
    };

    match ctx
        .store
        .upsert_by_session_id(session.session_id, &RegistrantUpdate::name(name.as_str()))
        .await
    {
        Ok(registrant) => {
            info!(
                session_id = registrant.session_id,
                registrant_id = registrant.id,
                "Stored registrant name"
            );
            set_state(dialogue, RegistrationState::AwaitingPhoto).await?;
            transport
                .send_text(
                    session.chat_id,
                    &t_args_lang("name-saved", &[("name", &name)], language_code),
                )
                .await
        }
        Err(e) => {
            // State stays on AwaitingName so the user can simply resend
            error!(session_id = session.session_id, error = %e, "Error saving name");
            transport
                .send_text(session.chat_id, &t_lang("name-save-error", language_code))
                .await
        }
    }
}

async fn handle_photo_input(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
    event: InboundEvent,
) -> Result<()> {
    let language_code = session.lang();

    let reference = match &event {
        InboundEvent::PhotoMessage { variants } => {
            largest_variant(variants).map(|variant| variant.reference.clone())
        }
        _ => None,
    };
    let Some(reference) = reference else {
        return transport
            .send_text(session.chat_id, &t_lang("photo-expected", language_code))
            .await;
    };

    notify(transport, session, &t_lang("photo-processing", language_code)).await;

    let registrant = match store_photo(ctx, session.session_id, &reference).await {
        Ok(Some(registrant)) => registrant,
        Ok(None) => {
            warn!(session_id = session.session_id, "Photo received for unknown registrant");
            return transport
                .send_text(session.chat_id, &t_lang("registration-missing", language_code))
                .await;
        }
        Err(e) => {
            error!(session_id = session.session_id, error = %e, "Error processing photo");
            return transport
                .send_text(session.chat_id, &t_lang("photo-error", language_code))
                .await;
        }
    };

    info!(session_id = registrant.session_id, "Stored registrant photo");
    notify(transport, session, &t_lang("photo-complete", language_code)).await;

    // The outcome is logged by the relay; the user is not told about it
    ctx.relay
        .relay(transport, ctx.store.as_ref(), &registrant)
        .await;

    Ok(())
}

async fn store_photo(
    ctx: &BotContext,
    session_id: i64,
    reference: &str,
) -> Result<Option<Registrant>> {
    let Some(existing) = ctx.store.find_by_session_id(session_id).await? else {
        return Ok(None);
    };

    ctx.store
        .update_by_id(
            existing.id,
            &RegistrantUpdate::photo(reference, DEFAULT_PHOTO_MIME_TYPE),
        )
        .await
}

/// Send an acknowledgement whose loss must not interrupt the flow
async fn notify(transport: &dyn ChatTransport, session: &ChatSession, text: &str) {
    if let Err(e) = transport.send_text(session.chat_id, text).await {
        warn!(chat_id = %session.chat_id, error = %e, "Failed to send acknowledgement");
    }
}
