//! Style slots and filename-based style detection.

use std::{fmt, path::Path, str::FromStr};

/// Font sub-family role a loaded file fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleSlot {
    Regular,
    Italic,
    Bold,
    BoldItalic,
    #[default]
    Unassigned,
}

impl StyleSlot {
    /// Assignable slots in engine argument order.
    pub const ASSIGNABLE: [StyleSlot; 4] =
        [StyleSlot::Regular, StyleSlot::Italic, StyleSlot::Bold, StyleSlot::BoldItalic];

    pub const fn is_assigned(self) -> bool {
        !matches!(self, StyleSlot::Unassigned)
    }

    /// Engine flag naming the file for this slot, if the slot is assignable.
    pub const fn file_flag(self) -> Option<&'static str> {
        match self {
            StyleSlot::Regular => Some("--regular-file"),
            StyleSlot::Italic => Some("--italic-file"),
            StyleSlot::Bold => Some("--bold-file"),
            StyleSlot::BoldItalic => Some("--bold-italic-file"),
            StyleSlot::Unassigned => None,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            StyleSlot::Regular => "Regular",
            StyleSlot::Italic => "Italic",
            StyleSlot::Bold => "Bold",
            StyleSlot::BoldItalic => "Bold Italic",
            StyleSlot::Unassigned => "Unassigned",
        }
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when parsing an unknown style name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style {0:?} (expected regular, italic, bold, bold-italic or none)")]
pub struct ParseStyleError(String);

impl FromStr for StyleSlot {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "regular" => Ok(StyleSlot::Regular),
            "italic" => Ok(StyleSlot::Italic),
            "bold" => Ok(StyleSlot::Bold),
            "bolditalic" => Ok(StyleSlot::BoldItalic),
            "none" | "unassigned" => Ok(StyleSlot::Unassigned),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

/// Detect the style slot of a single font file from its file name.
///
/// Only the final path component is inspected, case-insensitively.
/// "bold" together with "italic" wins over either alone, and both win over
/// "regular", so `Family-RegularBoldItalic.ttf` is [`StyleSlot::BoldItalic`].
pub fn detect_style(path: impl AsRef<Path>) -> StyleSlot {
    let Some(name) = path.as_ref().file_name() else {
        return StyleSlot::Unassigned;
    };
    let name = name.to_string_lossy().to_lowercase();

    let bold = name.contains("bold");
    let italic = name.contains("italic");
    match (bold, italic) {
        (true, true) => StyleSlot::BoldItalic,
        (true, false) => StyleSlot::Bold,
        (false, true) => StyleSlot::Italic,
        (false, false) if name.contains("regular") => StyleSlot::Regular,
        (false, false) => StyleSlot::Unassigned,
    }
}

/// Detect style slots for a list of paths, one result per path in input order.
pub fn classify<P: AsRef<Path>>(paths: &[P]) -> Vec<StyleSlot> {
    paths.iter().map(detect_style).collect()
}
