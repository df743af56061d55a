pub mod conferences;
pub mod meta;
pub mod speakers;
pub mod talks;
pub mod venues;

pub use conferences::*;
pub use meta::*;
pub use speakers::*;
pub use talks::*;
pub use venues::*;
