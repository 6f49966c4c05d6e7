//! Page context: which platform a page belongs to and how it is operated.
//!
//! The context is derived once per navigation from the location alone and is
//! immutable afterwards.

mod classifier;
mod location;
mod platform;

pub use classifier::{classify, PageContext};
pub use location::PageLocation;
pub use platform::{Mode, Platform};
