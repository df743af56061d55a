pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod utils;

// Re-export commonly used items (avoiding ambiguous re-exports)
pub use error::ApiError;
pub use models::{
    Conference, ConferenceError, CreateConference, UpdateConference,
    CreateSpeaker, Qualification, Speaker, SpeakerError, UpdateSpeaker,
    CreateTalk, Talk, TalkError, TalkFilter, TalkLength, TalkRow, TalkSort, TalkStatus, UpdateTalk,
    CreateVenue, Region, UpdateVenue, Venue, VenueError,
    Notification, ReviewOutcome,
};
pub use handlers::*;
pub use utils::normalize_name;
