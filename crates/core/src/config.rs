//! Configuration constants for Readify Font jobs.

/// Executable name of the font editing engine searched for on `PATH`.
pub const ENGINE_PROGRAM: &str = "fontforge";

/// Flag the engine uses to run a script with trailing arguments.
pub const ENGINE_SCRIPT_FLAG: &str = "-script";

/// Maximum number of font files in one job (one per style slot).
pub const MAX_FONT_FILES: usize = 4;

/// Darken amount used when darkening is first enabled.
pub const DEFAULT_DARKEN_AMOUNT: u8 = 12;

/// Smallest accepted darken amount.
pub const MIN_DARKEN_AMOUNT: u8 = 1;

/// Largest accepted darken amount (roughly regular to bold).
pub const MAX_DARKEN_AMOUNT: u8 = 50;

/// Characters that may not appear in a family name, since the engine
/// derives output file names from it.
pub const RESERVED_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Font file extensions accepted when loading a directory.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];
