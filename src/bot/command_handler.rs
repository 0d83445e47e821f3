//! Command Handler module for `/start`, `/help`, `/status`, `/getphoto` and `/shareall`
//!
//! Commands are answered regardless of the chat's dialogue state and never
//! fall through to the registration flow.

use anyhow::Result;
use teloxide::types::Recipient;
use tracing::{debug, error, info, warn};

use crate::dialogue::{set_state, RegistrationDialogue, RegistrationState};
use crate::localization::{t_args_lang, t_lang};
use crate::transport::ChatTransport;

use super::context::{BotContext, ChatSession};
use super::ui_builder::{format_help_message, format_status_message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationCommand {
    Start,
    Help,
    Status,
    GetPhoto,
    /// Relay every photo that has not reached the group yet
    ShareAll,
    Unknown(String),
}

impl RegistrationCommand {
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" => Self::Status,
            "getphoto" => Self::GetPhoto,
            "shareall" => Self::ShareAll,
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub async fn handle_command(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
    command: RegistrationCommand,
    dialogue: &RegistrationDialogue,
) -> Result<()> {
    let language_code = session.lang();

    match command {
        RegistrationCommand::Start => {
            // Restarting mid-flow drops the progress silently
            set_state(dialogue, RegistrationState::AwaitingName).await?;
            transport
                .send_text(session.chat_id, &t_lang("welcome-message", language_code))
                .await?;
        }
        RegistrationCommand::Help => {
            transport
                .send_text(session.chat_id, &format_help_message(language_code))
                .await?;
        }
        RegistrationCommand::Status => handle_status(transport, ctx, session).await?,
        RegistrationCommand::GetPhoto => handle_get_photo(transport, ctx, session).await?,
        RegistrationCommand::ShareAll => handle_share_all(transport, ctx, session).await?,
        RegistrationCommand::Unknown(name) => {
            debug!(chat_id = %session.chat_id, command = %name, "Ignoring unknown command");
        }
    }

    Ok(())
}

async fn handle_status(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
) -> Result<()> {
    let language_code = session.lang();

    let reply = match ctx.store.find_by_session_id(session.session_id).await {
        Ok(registrant) => format_status_message(registrant.as_ref(), language_code),
        Err(e) => {
            error!(session_id = session.session_id, error = %e, "Error checking user status");
            t_lang("status-error", language_code)
        }
    };

    transport.send_text(session.chat_id, &reply).await
}

async fn handle_get_photo(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
) -> Result<()> {
    let language_code = session.lang();

    let registrant = match ctx.store.find_by_session_id(session.session_id).await {
        Ok(registrant) => registrant,
        Err(e) => {
            error!(session_id = session.session_id, error = %e, "Error loading stored photo");
            return transport
                .send_text(session.chat_id, &t_lang("getphoto-error", language_code))
                .await;
        }
    };

    let Some((reference, name)) = registrant.and_then(|r| {
        let name = r.display_name.unwrap_or_default();
        r.photo_reference.map(|reference| (reference, name))
    }) else {
        return transport
            .send_text(session.chat_id, &t_lang("getphoto-missing", language_code))
            .await;
    };

    let caption = t_args_lang("getphoto-caption", &[("name", &name)], language_code);
    if let Err(e) = transport
        .send_photo_reference(Recipient::Id(session.chat_id), &reference, &caption)
        .await
    {
        error!(session_id = session.session_id, error = %e, "Error sending stored photo");
        transport
            .send_text(session.chat_id, &t_lang("getphoto-error", language_code))
            .await?;
    }

    Ok(())
}

async fn handle_share_all(
    transport: &dyn ChatTransport,
    ctx: &BotContext,
    session: &ChatSession,
) -> Result<()> {
    let language_code = session.lang();

    if !ctx.is_admin(session.session_id) {
        warn!(session_id = session.session_id, "Unauthorized /shareall attempt");
        return transport
            .send_text(session.chat_id, &t_lang("shareall-unauthorized", language_code))
            .await;
    }

    let candidates = match ctx.relay.pending(ctx.store.as_ref()).await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!(error = %e, "Error in shareall command");
            return transport
                .send_text(session.chat_id, &t_lang("shareall-error", language_code))
                .await;
        }
    };

    if candidates.is_empty() {
        return transport
            .send_text(session.chat_id, &t_lang("shareall-empty", language_code))
            .await;
    }

    info!(count = candidates.len(), "Relaying unshared photos to group");
    transport
        .send_text(
            session.chat_id,
            &t_args_lang(
                "shareall-started",
                &[("count", &candidates.len().to_string())],
                language_code,
            ),
        )
        .await?;

    let summary = ctx
        .relay
        .relay_batch(transport, ctx.store.as_ref(), &candidates)
        .await;

    transport
        .send_text(
            session.chat_id,
            &t_args_lang(
                "shareall-complete",
                &[
                    ("succeeded", &summary.succeeded.to_string()),
                    ("failed", &summary.failed.to_string()),
                ],
                language_code,
            ),
        )
        .await
}
