//! The job configuration aggregate edited by the caller before generation.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::{
    config::{DEFAULT_DARKEN_AMOUNT, MAX_DARKEN_AMOUNT, MAX_FONT_FILES, MIN_DARKEN_AMOUNT},
    error::ConfigurationError,
    naming::check_family_name,
    styles::{StyleSlot, detect_style},
};

/// A loaded font file and the style it fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFileEntry {
    pub path: PathBuf,
    pub slot: StyleSlot,
}

/// What the engine does with existing hinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintMode {
    #[default]
    Keep,
    Remove,
    Auto,
}

impl HintMode {
    pub const fn flag(self) -> &'static str {
        match self {
            HintMode::Keep => "--hint-keep",
            HintMode::Remove => "--hint-remove",
            HintMode::Auto => "--hint-auto",
        }
    }
}

/// Darken amount, always within `MIN_DARKEN_AMOUNT..=MAX_DARKEN_AMOUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarkenAmount(u8);

impl DarkenAmount {
    /// Clamp `value` into the accepted range.
    pub fn clamped(value: i64) -> Self {
        let v = value.clamp(MIN_DARKEN_AMOUNT as i64, MAX_DARKEN_AMOUNT as i64);
        Self(v as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for DarkenAmount {
    fn default() -> Self {
        Self(DEFAULT_DARKEN_AMOUNT)
    }
}

/// Everything the engine needs to know about one generation job.
///
/// Mutated through named setters; invariants that depend on several fields
/// (`modify_bearings` implies `darken_enabled`, one file per style) are
/// kept at mutation time, the rest is checked by [`JobConfiguration::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobConfiguration {
    family_name: String,
    files: Vec<FontFileEntry>,
    legacy_kerning: bool,
    strip_panose: bool,
    name_hack: bool,
    hint_mode: HintMode,
    darken_enabled: bool,
    darken_amount: DarkenAmount,
    modify_bearings: bool,
    output_dir: Option<PathBuf>,
    executable_path: Option<PathBuf>,
}

impl JobConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Store the candidate family name and report whether it is usable.
    ///
    /// The name is stored either way so the caller's text stays in sync;
    /// generation is refused until it validates.
    pub fn set_family_name(&mut self, name: impl Into<String>) -> Result<(), ConfigurationError> {
        self.family_name = name.into();
        check_family_name(&self.family_name)
    }

    pub fn files(&self) -> &[FontFileEntry] {
        &self.files
    }

    /// Replace all loaded files, detecting each file's style.
    ///
    /// At most [`MAX_FONT_FILES`] files are kept. A file whose detected style
    /// is already taken by an earlier file is left unassigned.
    pub fn load_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.len() > MAX_FONT_FILES {
            for dropped in &paths[MAX_FONT_FILES..] {
                warn!("Ignoring {}: at most {MAX_FONT_FILES} font files per job", dropped.display());
            }
            paths.truncate(MAX_FONT_FILES);
        }

        self.files.clear();
        for path in paths {
            let mut slot = detect_style(&path);
            if slot.is_assigned() && self.slot_index(slot).is_some() {
                warn!("{} also looks like {slot}; leaving it unassigned", path.display());
                slot = StyleSlot::Unassigned;
            }
            debug!("Loaded {} as {slot}", path.display());
            self.files.push(FontFileEntry { path, slot });
        }
    }

    /// Manually assign a style to the file at `index`.
    ///
    /// If another file holds `slot`, that file becomes unassigned. Returns
    /// `false` if `index` is out of range.
    pub fn assign_slot(&mut self, index: usize, slot: StyleSlot) -> bool {
        if index >= self.files.len() {
            return false;
        }
        if slot.is_assigned()
            && let Some(other) = self.slot_index(slot)
            && other != index
        {
            debug!(
                "Moving {slot} from {} to {}",
                self.files[other].path.display(),
                self.files[index].path.display()
            );
            self.files[other].slot = StyleSlot::Unassigned;
        }
        self.files[index].slot = slot;
        true
    }

    /// File assigned to `slot`, if any.
    pub fn file_for(&self, slot: StyleSlot) -> Option<&Path> {
        if !slot.is_assigned() {
            return None;
        }
        self.slot_index(slot).map(|i| self.files[i].path.as_path())
    }

    fn slot_index(&self, slot: StyleSlot) -> Option<usize> {
        self.files.iter().position(|entry| entry.slot == slot)
    }

    pub fn legacy_kerning(&self) -> bool {
        self.legacy_kerning
    }

    pub fn set_legacy_kerning(&mut self, enabled: bool) {
        self.legacy_kerning = enabled;
    }

    pub fn strip_panose(&self) -> bool {
        self.strip_panose
    }

    pub fn set_strip_panose(&mut self, enabled: bool) {
        self.strip_panose = enabled;
    }

    pub fn name_hack(&self) -> bool {
        self.name_hack
    }

    pub fn set_name_hack(&mut self, enabled: bool) {
        self.name_hack = enabled;
    }

    pub fn hint_mode(&self) -> HintMode {
        self.hint_mode
    }

    pub fn set_hint_mode(&mut self, mode: HintMode) {
        self.hint_mode = mode;
    }

    pub fn darken_enabled(&self) -> bool {
        self.darken_enabled
    }

    /// Enable or disable darkening. Disabling also clears `modify_bearings`.
    pub fn set_darken_enabled(&mut self, enabled: bool) {
        self.darken_enabled = enabled;
        if !enabled {
            self.modify_bearings = false;
        }
    }

    /// The stored darken amount; only meaningful while darkening is enabled.
    pub fn darken_amount(&self) -> DarkenAmount {
        self.darken_amount
    }

    /// Set the darken amount, clamped into the accepted range. Returns the stored value.
    pub fn set_darken_amount(&mut self, amount: i64) -> DarkenAmount {
        self.darken_amount = DarkenAmount::clamped(amount);
        if i64::from(self.darken_amount.get()) != amount {
            debug!("Darken amount {amount} clamped to {}", self.darken_amount.get());
        }
        self.darken_amount
    }

    pub fn modify_bearings(&self) -> bool {
        self.modify_bearings
    }

    /// Request bearing compensation. Ignored (stays `false`) while darkening
    /// is disabled; returns the stored value.
    pub fn set_modify_bearings(&mut self, enabled: bool) -> bool {
        self.modify_bearings = enabled && self.darken_enabled;
        self.modify_bearings
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = Some(dir.into());
    }

    pub fn executable_path(&self) -> Option<&Path> {
        self.executable_path.as_deref()
    }

    pub fn set_executable_path(&mut self, path: impl Into<PathBuf>) {
        self.executable_path = Some(path.into());
    }

    /// Check that a generation request would be accepted.
    ///
    /// Reports the first problem found: name, then files, then output directory.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_family_name(&self.family_name)?;
        if !self.files.iter().any(|entry| entry.slot.is_assigned()) {
            return Err(ConfigurationError::NoFilesAssigned);
        }
        if let Some(entry) = self.files.iter().find(|entry| !entry.slot.is_assigned()) {
            return Err(ConfigurationError::UnassignedFile(entry.path.clone()));
        }
        if self.output_dir.is_none() {
            return Err(ConfigurationError::NoOutputDir);
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.validate().is_ok()
    }
}
