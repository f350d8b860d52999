use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered mapping from every [`ColorId`] to a CSS color value.
pub type Palette = [(ColorId, &'static str); 4];

const DEFAULT_PALETTE: Palette = [
    (ColorId::Red, "#ff4c4c"),
    (ColorId::Blue, "#4c6fff"),
    (ColorId::Green, "#4cff4c"),
    (ColorId::Yellow, "#fff64c"),
];

const SCHEME1_PALETTE: Palette = [
    (ColorId::Red, "#e57373"),
    (ColorId::Blue, "#64b5f6"),
    (ColorId::Green, "#81c784"),
    (ColorId::Yellow, "#fff176"),
];

const SCHEME2_PALETTE: Palette = [
    (ColorId::Red, "#d32f2f"),
    (ColorId::Blue, "#1976d2"),
    (ColorId::Green, "#388e3c"),
    (ColorId::Yellow, "#fbc02d"),
];

/// Named palette. Only presentation differs between schemes, the set of colors is shared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Scheme1,
    Scheme2,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [Self::Default, Self::Scheme1, Self::Scheme2];

    pub const fn name(self) -> &'static str {
        use ColorScheme::*;
        match self {
            Default => "default",
            Scheme1 => "scheme1",
            Scheme2 => "scheme2",
        }
    }

    pub const fn palette(self) -> &'static Palette {
        use ColorScheme::*;
        match self {
            Default => &DEFAULT_PALETTE,
            Scheme1 => &SCHEME1_PALETTE,
            Scheme2 => &SCHEME2_PALETTE,
        }
    }

    pub fn color_ids(self) -> impl ExactSizeIterator<Item = ColorId> {
        self.palette().iter().map(|&(id, _)| id)
    }

    pub fn display_value(self, color: ColorId) -> &'static str {
        self.palette()
            .iter()
            .find_map(|&(id, value)| (id == color).then_some(value))
            .unwrap_or_default()
    }

    pub fn contains(self, color: ColorId) -> bool {
        self.color_ids().any(|id| id == color)
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name() == s)
            .ok_or(GameError::UnknownScheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn every_scheme_exposes_the_same_colors_in_order() {
        let reference: Vec<_> = ColorScheme::Default.color_ids().collect();
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.color_ids().collect::<Vec<_>>(), reference);
        }
        assert_eq!(reference, ColorId::ALL);
    }

    #[test]
    fn display_value_looks_up_palette() {
        assert_eq!(ColorScheme::Default.display_value(ColorId::Red), "#ff4c4c");
        assert_eq!(ColorScheme::Scheme1.display_value(ColorId::Blue), "#64b5f6");
        assert_eq!(ColorScheme::Scheme2.display_value(ColorId::Yellow), "#fbc02d");
    }

    #[test]
    fn default_scheme_is_the_default_palette() {
        assert_eq!(ColorScheme::default(), ColorScheme::Default);
        assert_eq!(ColorScheme::default().palette(), &DEFAULT_PALETTE);
    }

    #[test]
    fn scheme_names_parse() {
        assert_eq!("scheme2".parse::<ColorScheme>(), Ok(ColorScheme::Scheme2));
        assert_eq!("neon".parse::<ColorScheme>(), Err(GameError::UnknownScheme));
    }
}
