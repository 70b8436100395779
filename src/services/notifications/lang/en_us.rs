use super::{Language, LocalizedText};
use crate::models::NotificationKind;

/// English wording
#[derive(Debug, Clone, Copy, Default)]
pub struct EnUs;

impl LocalizedText for EnUs {
    fn language(&self) -> Language {
        Language::EnUs
    }

    fn action_label(&self) -> &'static str {
        "Details"
    }

    fn template(&self, kind: &NotificationKind) -> Option<&'static str> {
        let text = match kind {
            NotificationKind::UpdateQuestion => "%s updated the topic",
            NotificationKind::AnswerTheQuestion => "%s replied the topic",
            NotificationKind::UpVotedTheQuestion => "%s upvoted the topic",
            NotificationKind::DownVotedTheQuestion => "%s downvoted the topic",
            NotificationKind::UpdateAnswer => "%s updated the reply",
            NotificationKind::AcceptAnswer => "%s accepted the reply",
            NotificationKind::UpVotedTheAnswer => "%s upvoted the reply",
            NotificationKind::DownVotedTheAnswer => "%s downvoted the reply",
            NotificationKind::CommentQuestion => "%s commented the topic",
            NotificationKind::CommentAnswer => "%s commented the reply",
            NotificationKind::UpVotedTheComment => "%s upvoted the comment",
            NotificationKind::ReplyToYou => "%s replied to you",
            NotificationKind::MentionYou => "%s mentioned you",
            NotificationKind::InvitedYouToAnswer => "%s invited you to reply the topic",
            NotificationKind::YourQuestionIsClosed => "Your topic is closed",
            NotificationKind::YourQuestionWasDeleted => "Your topic was deleted",
            NotificationKind::YourAnswerWasDeleted => "Your reply was deleted",
            NotificationKind::YourCommentWasDeleted => "Your comment was deleted",
            NotificationKind::NewQuestion => "%s created a topic",
            NotificationKind::NewQuestionFollowedTag => "%s followed the topic",
            NotificationKind::Unknown(_) => return None,
        };
        Some(text)
    }
}
