use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::presentation::{length_icon, status_hint};
use crate::models::{Qualification, Region, TalkLength, TalkStatus, AVATAR_MAX_BYTES};

/// One selectable talk status together with its badge chrome.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusEntry {
    pub value: TalkStatus,
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub color: &'static str,
    #[schema(value_type = String)]
    pub icon: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LengthEntry {
    pub value: TalkLength,
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub icon: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegionEntry {
    pub value: Region,
    #[schema(value_type = String)]
    pub label: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QualificationEntry {
    pub value: Qualification,
    #[schema(value_type = String)]
    pub label: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Limits {
    pub avatar_max_bytes: u64,
}

/// Everything a form or table client needs to render dropdowns and badges
/// without hardcoding the vocabulary.
#[derive(Debug, Serialize, ToSchema)]
pub struct Vocabularies {
    pub statuses: Vec<StatusEntry>,
    pub lengths: Vec<LengthEntry>,
    pub regions: Vec<RegionEntry>,
    pub qualifications: Vec<QualificationEntry>,
    pub limits: Limits,
}

#[utoipa::path(
    get,
    path = "/meta/vocabularies",
    tag = "meta",
    responses(
        (status = 200, description = "Enum vocabularies with labels and badge hints", body = Vocabularies)
    )
)]
pub async fn vocabularies() -> Json<Vocabularies> {
    let statuses = TalkStatus::ALL
        .into_iter()
        .map(|status| {
            let hint = status_hint(status);
            StatusEntry {
                value: status,
                label: status.label(),
                color: hint.color,
                icon: hint.icon,
            }
        })
        .collect();

    let lengths = TalkLength::ALL
        .into_iter()
        .map(|length| LengthEntry {
            value: length,
            label: length.label(),
            icon: length_icon(length),
        })
        .collect();

    let regions = Region::ALL
        .into_iter()
        .map(|region| RegionEntry {
            value: region,
            label: region.label(),
        })
        .collect();

    let qualifications = Qualification::ALL
        .into_iter()
        .map(|qualification| QualificationEntry {
            value: qualification,
            label: qualification.label(),
        })
        .collect();

    Json(Vocabularies {
        statuses,
        lengths,
        regions,
        qualifications,
        limits: Limits {
            avatar_max_bytes: AVATAR_MAX_BYTES,
        },
    })
}
