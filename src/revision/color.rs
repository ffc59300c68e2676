/// Font color used to mark resolved revisions.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Specifies a palette color.
///
/// Corresponds to the VBA `WdColorIndex` enumeration.
///
/// # Examples
///
/// ```rust
/// use markrev::revision::WdColorIndex;
///
/// let color: WdColorIndex = "dark-blue".parse().unwrap();
/// assert_eq!(color, WdColorIndex::DarkBlue);
/// assert_eq!(color.to_xml(), "000080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WdColorIndex {
    /// Automatic color (usually black).
    Auto = 0,
    Black = 1,
    /// Default marking color.
    #[default]
    Blue = 2,
    Turquoise = 3,
    BrightGreen = 4,
    Pink = 5,
    Red = 6,
    Yellow = 7,
    White = 8,
    DarkBlue = 9,
    Teal = 10,
    Green = 11,
    Violet = 12,
    DarkRed = 13,
    DarkYellow = 14,
    Gray50 = 15,
    Gray25 = 16,
}

impl WdColorIndex {
    /// Convert the color to its `w:color` attribute value.
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Black => "000000",
            Self::Blue => "0000FF",
            Self::Turquoise => "00FFFF",
            Self::BrightGreen => "00FF00",
            Self::Pink => "FF00FF",
            Self::Red => "FF0000",
            Self::Yellow => "FFFF00",
            Self::White => "FFFFFF",
            Self::DarkBlue => "000080",
            Self::Teal => "008080",
            Self::Green => "008000",
            Self::Violet => "800080",
            Self::DarkRed => "800000",
            Self::DarkYellow => "808000",
            Self::Gray50 => "808080",
            Self::Gray25 => "C0C0C0",
        }
    }

    /// Snake-case name, as used in policy files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Black => "black",
            Self::Blue => "blue",
            Self::Turquoise => "turquoise",
            Self::BrightGreen => "bright_green",
            Self::Pink => "pink",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::DarkBlue => "dark_blue",
            Self::Teal => "teal",
            Self::Green => "green",
            Self::Violet => "violet",
            Self::DarkRed => "dark_red",
            Self::DarkYellow => "dark_yellow",
            Self::Gray50 => "gray50",
            Self::Gray25 => "gray25",
        }
    }
}

impl fmt::Display for WdColorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WdColorIndex {
    type Err = crate::Error;

    /// Parse a color name; `-` and `_` are interchangeable and case is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let color = match normalized.as_str() {
            "auto" => Self::Auto,
            "black" => Self::Black,
            "blue" => Self::Blue,
            "turquoise" => Self::Turquoise,
            "bright_green" => Self::BrightGreen,
            "pink" => Self::Pink,
            "red" => Self::Red,
            "yellow" => Self::Yellow,
            "white" => Self::White,
            "dark_blue" => Self::DarkBlue,
            "teal" => Self::Teal,
            "green" => Self::Green,
            "violet" => Self::Violet,
            "dark_red" => Self::DarkRed,
            "dark_yellow" => Self::DarkYellow,
            "gray50" => Self::Gray50,
            "gray25" => Self::Gray25,
            _ => return Err(crate::Error::Policy(format!("unknown color '{}'", s))),
        };
        Ok(color)
    }
}
