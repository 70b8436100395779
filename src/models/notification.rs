//! Notification event models.
//!
//! A `NotificationEvent` is produced by the upstream notification policy
//! layer once it has decided that a user should be told about something.
//! This crate only reads it.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Kind of event that triggered a notification
///
/// Serialized with the upstream wire names (`notification.action.*`).
/// Unrecognized names are preserved in `Unknown` instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    UpdateQuestion,
    AnswerTheQuestion,
    UpVotedTheQuestion,
    DownVotedTheQuestion,
    UpdateAnswer,
    AcceptAnswer,
    UpVotedTheAnswer,
    DownVotedTheAnswer,
    CommentQuestion,
    CommentAnswer,
    UpVotedTheComment,
    ReplyToYou,
    MentionYou,
    YourQuestionIsClosed,
    YourQuestionWasDeleted,
    YourAnswerWasDeleted,
    YourCommentWasDeleted,
    InvitedYouToAnswer,
    NewQuestion,
    NewQuestionFollowedTag,
    Unknown(String),
}

impl NotificationKind {
    /// All recognized kinds, in declaration order
    pub const KNOWN: [NotificationKind; 20] = [
        NotificationKind::UpdateQuestion,
        NotificationKind::AnswerTheQuestion,
        NotificationKind::UpVotedTheQuestion,
        NotificationKind::DownVotedTheQuestion,
        NotificationKind::UpdateAnswer,
        NotificationKind::AcceptAnswer,
        NotificationKind::UpVotedTheAnswer,
        NotificationKind::DownVotedTheAnswer,
        NotificationKind::CommentQuestion,
        NotificationKind::CommentAnswer,
        NotificationKind::UpVotedTheComment,
        NotificationKind::ReplyToYou,
        NotificationKind::MentionYou,
        NotificationKind::YourQuestionIsClosed,
        NotificationKind::YourQuestionWasDeleted,
        NotificationKind::YourAnswerWasDeleted,
        NotificationKind::YourCommentWasDeleted,
        NotificationKind::InvitedYouToAnswer,
        NotificationKind::NewQuestion,
        NotificationKind::NewQuestionFollowedTag,
    ];

    /// Wire name of the kind
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::UpdateQuestion => "notification.action.update_question",
            NotificationKind::AnswerTheQuestion => "notification.action.answer_the_question",
            NotificationKind::UpVotedTheQuestion => "notification.action.up_voted_question",
            NotificationKind::DownVotedTheQuestion => "notification.action.down_voted_question",
            NotificationKind::UpdateAnswer => "notification.action.update_answer",
            NotificationKind::AcceptAnswer => "notification.action.accept_answer",
            NotificationKind::UpVotedTheAnswer => "notification.action.up_voted_answer",
            NotificationKind::DownVotedTheAnswer => "notification.action.down_voted_answer",
            NotificationKind::CommentQuestion => "notification.action.comment_question",
            NotificationKind::CommentAnswer => "notification.action.comment_answer",
            NotificationKind::UpVotedTheComment => "notification.action.up_voted_comment",
            NotificationKind::ReplyToYou => "notification.action.reply_to_you",
            NotificationKind::MentionYou => "notification.action.mention_you",
            NotificationKind::YourQuestionIsClosed => "notification.action.your_question_is_closed",
            NotificationKind::YourQuestionWasDeleted => {
                "notification.action.your_question_was_deleted"
            }
            NotificationKind::YourAnswerWasDeleted => "notification.action.your_answer_was_deleted",
            NotificationKind::YourCommentWasDeleted => {
                "notification.action.your_comment_was_deleted"
            }
            NotificationKind::InvitedYouToAnswer => "notification.action.invited_you_to_answer",
            NotificationKind::NewQuestion => "notification.action.new_question",
            NotificationKind::NewQuestionFollowedTag => {
                "notification.action.new_question_followed_tag"
            }
            NotificationKind::Unknown(name) => name,
        }
    }

    /// Which link the card's action button should open for this kind
    pub fn action_target(&self) -> Option<ActionTarget> {
        match self {
            NotificationKind::UpdateQuestion
            | NotificationKind::InvitedYouToAnswer
            | NotificationKind::NewQuestion
            | NotificationKind::NewQuestionFollowedTag => Some(ActionTarget::Question),
            NotificationKind::AnswerTheQuestion
            | NotificationKind::UpdateAnswer
            | NotificationKind::AcceptAnswer => Some(ActionTarget::Answer),
            NotificationKind::CommentQuestion
            | NotificationKind::CommentAnswer
            | NotificationKind::ReplyToYou
            | NotificationKind::MentionYou => Some(ActionTarget::Comment),
            _ => None,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        NotificationKind::KNOWN
            .iter()
            .find(|kind| kind.as_str() == value)
            .cloned()
            .unwrap_or(NotificationKind::Unknown(value))
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link category a card action points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Question,
    Answer,
    Comment,
}

// ============================================================================
// Event
// ============================================================================

/// Receiver of a notification on the external chat network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Receiver {
    /// User id on the chat network
    pub external_id: String,
    /// Preferred language tag, e.g. `en_US`
    #[serde(default)]
    pub lang: String,
}

/// Immutable description of what happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    /// Display name of the user who triggered the event
    #[serde(default)]
    pub actor_display_name: String,

    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub answer_id: Option<String>,
    #[serde(default)]
    pub comment_id: Option<String>,

    /// Links may be empty, site-relative or absolute until resolved
    #[serde(default)]
    pub question_url: String,
    #[serde(default)]
    pub answer_url: String,
    #[serde(default)]
    pub comment_url: String,

    #[serde(default)]
    pub question_title: String,
    /// Plain text or HTML excerpt of the content
    #[serde(default)]
    pub excerpt: String,

    pub receiver: Receiver,
}

impl NotificationEvent {
    /// Creates an event with the required fields, all links empty
    pub fn new(
        kind: NotificationKind,
        actor_display_name: impl Into<String>,
        question_title: impl Into<String>,
        receiver: Receiver,
    ) -> Self {
        Self {
            kind,
            actor_display_name: actor_display_name.into(),
            question_id: String::new(),
            answer_id: None,
            comment_id: None,
            question_url: String::new(),
            answer_url: String::new(),
            comment_url: String::new(),
            question_title: question_title.into(),
            excerpt: String::new(),
            receiver,
        }
    }

    /// URL the action button of this event should open, if any
    pub fn action_url(&self) -> Option<&str> {
        self.kind.action_target().map(|target| match target {
            ActionTarget::Question => self.question_url.as_str(),
            ActionTarget::Answer => self.answer_url.as_str(),
            ActionTarget::Comment => self.comment_url.as_str(),
        })
    }
}
