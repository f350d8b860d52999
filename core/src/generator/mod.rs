use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of the next step appended to the target sequence.
pub trait SequenceGenerator {
    /// Picks one color out of the colors exposed by `scheme`.
    fn next_color(&mut self, scheme: ColorScheme) -> ColorId;
}
