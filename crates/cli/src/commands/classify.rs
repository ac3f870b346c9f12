//! Style detection report.

use std::path::PathBuf;

use anyhow::Result;
use readify_core::classify as classify_styles;

use crate::io::collect_font_inputs;

/// Print the detected style of every input font.
pub fn classify(inputs: &[PathBuf]) -> Result<()> {
    let fonts = collect_font_inputs(inputs)?;
    for (font, style) in fonts.iter().zip(classify_styles(fonts.as_slice())) {
        println!("{:<12} {}", style.to_string(), font.display());
    }
    Ok(())
}
