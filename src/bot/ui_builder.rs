//! UI Builder module for formatting replies and the command menu

use teloxide::types::BotCommand;

use crate::localization::{t_args_lang, t_lang};
use crate::registrant::Registrant;

/// Help text listing the public commands
pub fn format_help_message(language_code: Option<&str>) -> String {
    let commands = [
        t_lang("help-commands", language_code),
        t_lang("help-start", language_code),
        t_lang("help-help", language_code),
        t_lang("help-status", language_code),
        t_lang("help-getphoto", language_code),
    ]
    .join("\n");

    format!("{}\n\n{}", t_lang("help-description", language_code), commands)
}

/// Registration status of a user, or the "not registered" notice
pub fn format_status_message(registrant: Option<&Registrant>, language_code: Option<&str>) -> String {
    let Some(registrant) = registrant else {
        return t_lang("status-not-registered", language_code);
    };

    let name = registrant
        .display_name
        .clone()
        .unwrap_or_else(|| t_lang("status-name-missing", language_code));

    let mut lines = vec![
        t_lang("status-title", language_code),
        t_args_lang("status-name", &[("name", &name)], language_code),
    ];
    lines.push(if registrant.has_photo() {
        t_lang("status-photo-uploaded", language_code)
    } else {
        t_lang("status-photo-missing", language_code)
    });
    if registrant.relayed {
        lines.push(t_lang("status-relayed", language_code));
    }

    lines.join("\n")
}

/// Commands advertised in the Telegram client menu
pub fn command_menu() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Begin registration"),
        BotCommand::new("help", "Show help"),
        BotCommand::new("status", "Check your registration status"),
        BotCommand::new("getphoto", "View your stored photo"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn registrant() -> Registrant {
        Registrant {
            id: 1,
            session_id: 12345,
            display_name: Some("Ada Lovelace".to_string()),
            photo_reference: None,
            photo_mime_type: "image/jpeg".to_string(),
            relayed: false,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_not_registered() {
        let message = format_status_message(None, None);
        assert!(message.contains("not registered"));
    }

    #[test]
    fn test_status_without_photo() {
        let message = format_status_message(Some(&registrant()), None);
        assert!(message.contains("Name: Ada Lovelace"));
        assert!(message.contains("Photo: Not uploaded"));
        assert!(!message.contains("shared to the group"));
    }

    #[test]
    fn test_status_relayed_photo() {
        let mut registrant = registrant();
        registrant.photo_reference = Some("file-1".to_string());
        registrant.relayed = true;

        let message = format_status_message(Some(&registrant), None);
        assert!(message.contains("Photo: Uploaded"));
        assert!(message.contains("shared to the group"));
    }

    #[test]
    fn test_status_missing_name() {
        let mut registrant = registrant();
        registrant.display_name = None;

        let message = format_status_message(Some(&registrant), None);
        assert!(message.contains("Name: Not provided"));
    }

    #[test]
    fn test_help_lists_commands() {
        let help = format_help_message(None);
        for command in ["/start", "/help", "/status", "/getphoto"] {
            assert!(help.contains(command), "help should mention {command}");
        }
    }

    #[test]
    fn test_command_menu_matches_help() {
        let names: Vec<String> = command_menu().into_iter().map(|c| c.command).collect();
        assert_eq!(names, vec!["start", "help", "status", "getphoto"]);
    }
}
