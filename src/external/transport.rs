//! Chat network transport abstraction.
//!
//! The delivery client only needs two primitives from the chat network:
//! send a message and open a conversation with a user. Everything else
//! (credentials, signing, sessions) stays behind this trait.

use async_trait::async_trait;
use md5::{Digest, Md5};
use uuid::Builder;

use crate::error::AppResult;
use crate::models::MessageRequest;

/// Outbound chat network primitives
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// dispatch.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one message into an existing conversation
    async fn send_message(&self, request: &MessageRequest) -> AppResult<()>;

    /// Opens (or re-opens) the conversation with `recipient_id`
    ///
    /// Returns the conversation id.
    async fn create_conversation(&self, recipient_id: &str) -> AppResult<String>;

    /// Deterministic conversation id between two users
    fn conversation_id(&self, sender_id: &str, recipient_id: &str) -> String {
        unique_conversation_id(sender_id, recipient_id)
    }

    /// Checks credentials at startup, default no-op
    async fn verify(&self) -> AppResult<()> {
        Ok(())
    }

    /// Transport name for logging
    fn name(&self) -> &'static str;
}

/// Conversation id shared by two users regardless of argument order
///
/// MD5 of the lexicographically smaller id followed by the larger one,
/// formatted as a version 3 UUID.
pub fn unique_conversation_id(user_id: &str, recipient_id: &str) -> String {
    let (min_id, max_id) = if user_id > recipient_id {
        (recipient_id, user_id)
    } else {
        (user_id, recipient_id)
    };

    let mut hasher = Md5::new();
    hasher.update(min_id.as_bytes());
    hasher.update(max_id.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hasher.finalize());

    Builder::from_md5_bytes(bytes).into_uuid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "6f0a6a4c-8b1e-4e8c-9f3c-1d2e3f4a5b6c";
    const USER: &str = "a1b2c3d4-0000-4000-8000-000000000001";

    #[test]
    fn test_conversation_id_known_value() {
        assert_eq!(
            unique_conversation_id(BOT, USER),
            "0bafcf79-9721-37eb-8ea6-ccd8f69eefad"
        );
    }

    #[test]
    fn test_conversation_id_is_symmetric() {
        assert_eq!(
            unique_conversation_id(BOT, USER),
            unique_conversation_id(USER, BOT)
        );
    }

    #[test]
    fn test_conversation_id_is_version_3() {
        let id = uuid::Uuid::parse_str(&unique_conversation_id("a", "b")).unwrap();
        assert_eq!(id.get_version_num(), 3);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn test_conversation_id_differs_per_pair() {
        assert_ne!(
            unique_conversation_id(BOT, "u1"),
            unique_conversation_id(BOT, "u2")
        );
    }
}
