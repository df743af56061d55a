use serde::Serialize;
use utoipa::ToSchema;

use crate::models::talk::{TalkLength, TalkStatus};

/// Badge rendering hint for an enum value, so every admin client draws the
/// same chrome without hardcoding it.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PresentationHint {
    #[schema(value_type = String)]
    pub color: &'static str,
    #[schema(value_type = String)]
    pub icon: &'static str,
}

pub fn status_hint(status: TalkStatus) -> PresentationHint {
    match status {
        TalkStatus::Submitted => PresentationHint {
            color: "primary",
            icon: "heroicon-o-clock",
        },
        TalkStatus::Approved => PresentationHint {
            color: "success",
            icon: "heroicon-o-check-circle",
        },
        TalkStatus::Rejected => PresentationHint {
            color: "danger",
            icon: "heroicon-o-no-symbol",
        },
    }
}

pub fn length_icon(length: TalkLength) -> &'static str {
    match length {
        TalkLength::Normal => "heroicon-o-megaphone",
        TalkLength::Lightning => "heroicon-o-flash",
        TalkLength::Keynote => "heroicon-o-star",
    }
}
