pub mod conference;
pub mod notification;
pub mod presentation;
pub mod speaker;
pub mod talk;
pub mod venue;

pub use conference::*;
pub use notification::*;
pub use presentation::*;
pub use speaker::*;
pub use talk::*;
pub use venue::*;
