use anyhow::Result;
use teloxide::types::ChatId;

use matchbooking::dialogue::{
    current_state, in_memory_sessions, set_state, validate_display_name, RegistrationDialogue,
    RegistrationState,
};

/// Integration test for display name validation
#[tokio::test]
async fn test_display_name_validation() -> Result<()> {
    // Test valid names
    assert_eq!(validate_display_name("Ada Lovelace").unwrap(), "Ada Lovelace");
    assert_eq!(validate_display_name("  Jean-Luc Picard\n").unwrap(), "Jean-Luc Picard");
    assert_eq!(validate_display_name("李小龙").unwrap(), "李小龙");

    // Test invalid names
    assert!(validate_display_name("").is_err());
    assert!(validate_display_name(" \t ").is_err());

    Ok(())
}

/// Test dialogue state serialization
#[tokio::test]
async fn test_dialogue_state_serialization() -> Result<()> {
    // States must survive a round trip through a serializing storage backend
    for state in [
        RegistrationState::Idle,
        RegistrationState::AwaitingName,
        RegistrationState::AwaitingPhoto,
    ] {
        let json = serde_json::to_string(&state)?;
        let restored: RegistrationState = serde_json::from_str(&json)?;
        assert_eq!(restored, state);
    }

    assert_eq!(serde_json::to_string(&RegistrationState::AwaitingName)?, "\"AwaitingName\"");
    Ok(())
}

/// Test the state transitions the registration flow relies on
#[tokio::test]
async fn test_dialogue_transitions() -> Result<()> {
    let sessions = in_memory_sessions();
    let dialogue = RegistrationDialogue::new(sessions.clone(), ChatId(12345));

    // Test default state
    assert_eq!(current_state(&dialogue).await?, RegistrationState::Idle);

    set_state(&dialogue, RegistrationState::AwaitingName).await?;
    set_state(&dialogue, RegistrationState::AwaitingPhoto).await?;

    // A second handle on the same chat sees the stored state
    let same_chat = RegistrationDialogue::new(sessions, ChatId(12345));
    assert_eq!(current_state(&same_chat).await?, RegistrationState::AwaitingPhoto);

    // Restarting goes back to the name step from anywhere
    set_state(&same_chat, RegistrationState::AwaitingName).await?;
    assert_eq!(current_state(&dialogue).await?, RegistrationState::AwaitingName);

    Ok(())
}

/// Test that clearing a session returns the chat to idle
#[tokio::test]
async fn test_dialogue_exit_resets_to_idle() -> Result<()> {
    let dialogue = RegistrationDialogue::new(in_memory_sessions(), ChatId(1));

    set_state(&dialogue, RegistrationState::AwaitingPhoto).await?;
    dialogue.exit().await.map_err(|e| anyhow::anyhow!(e))?;

    assert_eq!(current_state(&dialogue).await?, RegistrationState::Idle);
    Ok(())
}
