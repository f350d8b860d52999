use alloc::vec::Vec;

use super::*;

/// Replays a scripted list of colors, wrapping around at the end.
///
/// Colors missing from the active scheme are replaced by the scheme's first color.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSequenceGenerator {
    colors: Vec<ColorId>,
    next: usize,
}

impl FixedSequenceGenerator {
    pub fn new(colors: impl Into<Vec<ColorId>>) -> Self {
        Self {
            colors: colors.into(),
            next: 0,
        }
    }
}

impl SequenceGenerator for FixedSequenceGenerator {
    fn next_color(&mut self, scheme: ColorScheme) -> ColorId {
        let first = scheme.palette()[0].0;
        let Some(&color) = self.colors.get(self.next % self.colors.len().max(1)) else {
            log::warn!("empty fixed sequence, fallback to {}", first);
            return first;
        };
        self.next += 1;
        if scheme.contains(color) { color } else { first }
    }
}
