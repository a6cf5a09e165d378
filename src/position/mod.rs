//! Position values and attempt outcomes.
//!
//! - [`PositionFix`] validated coordinate + accuracy value
//! - [`Outcome`] tagged result of one attempt
//! - [`Attempt`] outcome paired with its 1-based index

mod fix;
mod outcome;

pub use fix::PositionFix;
pub use outcome::{Attempt, Outcome};
