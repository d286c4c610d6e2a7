//! The fixed highlight color palette.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownColor;

/// One of the eight named highlight colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HighlightColor {
    Yellow,
    Green,
    Blue,
    Pink,
    Red,
    Grey,
    Orange,
    Purple,
}

impl HighlightColor {
    /// Every palette entry, in the order the names are listed to users.
    pub const ALL: [HighlightColor; 8] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Blue,
        HighlightColor::Pink,
        HighlightColor::Red,
        HighlightColor::Grey,
        HighlightColor::Orange,
        HighlightColor::Purple,
    ];

    /// Look up a color by its exact (lowercase) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Blue => "blue",
            HighlightColor::Pink => "pink",
            HighlightColor::Red => "red",
            HighlightColor::Grey => "grey",
            HighlightColor::Orange => "orange",
            HighlightColor::Purple => "purple",
        }
    }

    /// DeviceRGB components, each in `[0.0, 1.0]`.
    pub fn rgb(&self) -> [f32; 3] {
        match self {
            HighlightColor::Yellow => [1.0, 1.0, 0.0],
            HighlightColor::Green => [0.5, 1.0, 0.0],
            HighlightColor::Blue => [0.0, 0.75, 1.0],
            HighlightColor::Pink => [1.0, 0.5, 1.0],
            HighlightColor::Red => [1.0, 0.5, 0.5],
            HighlightColor::Grey => [0.7, 0.7, 0.7],
            HighlightColor::Orange => [1.0, 0.5, 0.0],
            HighlightColor::Purple => [0.5, 0.5, 1.0],
        }
    }

    /// Comma-separated list of valid names, for error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HighlightColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_eight_distinct_entries() {
        let mut names: Vec<&str> = HighlightColor::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn rgb_components_are_in_unit_range() {
        for color in HighlightColor::ALL {
            for component in color.rgb() {
                assert!((0.0..=1.0).contains(&component), "{color}: {component}");
            }
        }
    }

    #[test]
    fn known_rgb_values() {
        assert_eq!(HighlightColor::Yellow.rgb(), [1.0, 1.0, 0.0]);
        assert_eq!(HighlightColor::Blue.rgb(), [0.0, 0.75, 1.0]);
        assert_eq!(HighlightColor::Grey.rgb(), [0.7, 0.7, 0.7]);
    }

    #[test]
    fn from_name_round_trips_every_entry() {
        for color in HighlightColor::ALL {
            assert_eq!(HighlightColor::from_name(color.name()), Some(color));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(HighlightColor::from_name("Yellow"), None);
        assert_eq!(HighlightColor::from_name("gray"), None);
    }

    #[test]
    fn from_str_reports_unknown_name() {
        let err = "magenta".parse::<HighlightColor>().unwrap_err();
        assert_eq!(err, UnknownColor("magenta".to_string()));
        assert!(err.to_string().contains("yellow, green, blue"));
    }
}
