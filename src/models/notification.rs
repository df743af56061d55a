use serde::Serialize;
use utoipa::ToSchema;

use crate::models::talk::Talk;

/// How long the admin UI keeps a review toast on screen.
pub const NOTIFICATION_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Danger,
}

/// Toast payload accompanying a review decision. Purely advisory: whether
/// the client renders it has no bearing on the stored status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    #[schema(value_type = String)]
    pub title: &'static str,
    #[schema(value_type = String)]
    pub body: &'static str,
    pub duration_ms: u32,
}

impl Notification {
    pub fn talk_approved() -> Self {
        Notification {
            kind: NotificationKind::Success,
            title: "Talk approved",
            body: "The talk has been approved.",
            duration_ms: NOTIFICATION_DURATION_MS,
        }
    }

    pub fn talk_rejected() -> Self {
        Notification {
            kind: NotificationKind::Danger,
            title: "Talk rejected",
            body: "The talk has been rejected.",
            duration_ms: NOTIFICATION_DURATION_MS,
        }
    }
}

/// Response body of the approve and reject endpoints: the updated talk plus
/// the toast the UI should flash.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewOutcome {
    pub talk: Talk,
    pub notification: Notification,
}
