use core::fmt;
use serde::{Deserialize, Serialize};

/// Abstract time unit used for every delay, one unit is one millisecond in the browser.
pub type Millis = u32;

/// Count of fully reproduced rounds.
pub type Score = u32;

/// Generation counter tagging every scheduled timer, bumped whenever pending timers must be discarded.
pub type Epoch = u32;

/// One of the selectable signals. Every color scheme maps all of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorId {
    Red,
    Blue,
    Green,
    Yellow,
}

impl ColorId {
    pub const ALL: [ColorId; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    pub const fn name(self) -> &'static str {
        use ColorId::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Yellow => "yellow",
        }
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
