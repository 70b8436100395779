use super::{Language, LocalizedText};
use crate::models::NotificationKind;

/// Simplified Chinese wording
#[derive(Debug, Clone, Copy, Default)]
pub struct ZhCn;

impl LocalizedText for ZhCn {
    fn language(&self) -> Language {
        Language::ZhCn
    }

    fn action_label(&self) -> &'static str {
        "查看详情"
    }

    fn template(&self, kind: &NotificationKind) -> Option<&'static str> {
        let text = match kind {
            NotificationKind::UpdateQuestion => "%s 更新了话题",
            NotificationKind::AnswerTheQuestion => "%s 回答了话题",
            NotificationKind::UpVotedTheQuestion => "%s 赞了话题",
            NotificationKind::DownVotedTheQuestion => "%s 踩了话题",
            NotificationKind::UpdateAnswer => "%s 更新了回复",
            NotificationKind::AcceptAnswer => "%s 采纳了回复",
            NotificationKind::UpVotedTheAnswer => "%s 赞了回复",
            NotificationKind::DownVotedTheAnswer => "%s 踩了回复",
            NotificationKind::CommentQuestion => "%s 评论了话题",
            NotificationKind::CommentAnswer => "%s 评论了回复",
            NotificationKind::UpVotedTheComment => "%s 赞了评论",
            NotificationKind::ReplyToYou => "%s 回复了你",
            NotificationKind::MentionYou => "%s 提到了你",
            NotificationKind::InvitedYouToAnswer => "%s 邀请了你回复话题",
            NotificationKind::YourQuestionIsClosed => "你的话题已关闭",
            NotificationKind::YourQuestionWasDeleted => "你的话题已删除",
            NotificationKind::YourAnswerWasDeleted => "你的回复已删除",
            NotificationKind::YourCommentWasDeleted => "你的评论已删除",
            NotificationKind::NewQuestion => "%s 发起了话题",
            NotificationKind::NewQuestionFollowedTag => "%s 关注了话题",
            NotificationKind::Unknown(_) => return None,
        };
        Some(text)
    }
}
