//! Engine argument vector generation.
//!
//! The argument vector is the only interface to the engine, so its layout is
//! fixed:
//!
//! 1. family name
//! 2. `--regular-file <path>`, `--italic-file <path>`, `--bold-file <path>`,
//!    `--bold-italic-file <path>`, in that order, for assigned slots only
//! 3. `--legacy-kerning`, `--strip-panose`, `--alt-name` when enabled
//! 4. exactly one of `--hint-keep`, `--hint-remove`, `--hint-auto`
//! 5. `--darken <amount>` then `--fix-bearings`, only when darkening is enabled
//! 6. `--out-dir <path>`

use std::ffi::OsString;

use log::debug;

use crate::{
    error::{ConfigurationError, Result},
    job::JobConfiguration,
    naming::check_family_name,
    styles::StyleSlot,
};

/// Build the engine argument vector for `config`.
///
/// Pure: no filesystem access, and identical configurations always yield
/// identical vectors. Fails with [`crate::Error::ConfigIncomplete`] when the
/// name is unusable, no file is assigned, or no output directory is set.
pub fn build_command(config: &JobConfiguration) -> Result<Vec<OsString>> {
    check_family_name(config.family_name())?;
    if !StyleSlot::ASSIGNABLE.iter().any(|&slot| config.file_for(slot).is_some()) {
        return Err(ConfigurationError::NoFilesAssigned.into());
    }
    let out_dir = config.output_dir().ok_or(ConfigurationError::NoOutputDir)?;

    let mut args: Vec<OsString> = vec![config.family_name().into()];

    for slot in StyleSlot::ASSIGNABLE {
        if let (Some(flag), Some(path)) = (slot.file_flag(), config.file_for(slot)) {
            args.push(flag.into());
            args.push(path.into());
        }
    }

    let switches = [
        (config.legacy_kerning(), "--legacy-kerning"),
        (config.strip_panose(), "--strip-panose"),
        (config.name_hack(), "--alt-name"),
    ];
    for (enabled, flag) in switches {
        if enabled {
            args.push(flag.into());
        }
    }

    args.push(config.hint_mode().flag().into());

    if config.darken_enabled() {
        args.push("--darken".into());
        args.push(config.darken_amount().get().to_string().into());
        if config.modify_bearings() {
            args.push("--fix-bearings".into());
        }
    }

    args.push("--out-dir".into());
    args.push(out_dir.into());

    debug!("Engine arguments: {args:?}");
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, job::HintMode};

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn minimal() -> JobConfiguration {
        let mut config = JobConfiguration::new();
        config.set_family_name("MyFont").unwrap();
        config.load_files(["a.ttf"]);
        config.assign_slot(0, StyleSlot::Regular);
        config.set_output_dir("/out");
        config
    }

    #[test]
    fn test_minimal_command() {
        assert_eq!(
            build_command(&minimal()).unwrap(),
            os(&["MyFont", "--regular-file", "a.ttf", "--hint-keep", "--out-dir", "/out"])
        );
    }

    #[test]
    fn test_full_command_order() {
        let mut config = JobConfiguration::new();
        config.set_family_name("Readable Serif").unwrap();
        config.load_files(["s-BoldItalic.ttf", "s-Bold.ttf", "s-Italic.ttf", "s-Regular.ttf"]);
        config.set_legacy_kerning(true);
        config.set_strip_panose(true);
        config.set_name_hack(true);
        config.set_hint_mode(HintMode::Auto);
        config.set_darken_enabled(true);
        config.set_darken_amount(20);
        config.set_modify_bearings(true);
        config.set_output_dir("/tmp/fonts");

        assert_eq!(
            build_command(&config).unwrap(),
            os(&[
                "Readable Serif",
                "--regular-file",
                "s-Regular.ttf",
                "--italic-file",
                "s-Italic.ttf",
                "--bold-file",
                "s-Bold.ttf",
                "--bold-italic-file",
                "s-BoldItalic.ttf",
                "--legacy-kerning",
                "--strip-panose",
                "--alt-name",
                "--hint-auto",
                "--darken",
                "20",
                "--fix-bearings",
                "--out-dir",
                "/tmp/fonts",
            ])
        );
    }

    #[test]
    fn test_missing_slots_are_omitted() {
        let mut config = minimal();
        config.load_files(["x-Bold.ttf"]);
        config.set_hint_mode(HintMode::Remove);
        assert_eq!(
            build_command(&config).unwrap(),
            os(&["MyFont", "--bold-file", "x-Bold.ttf", "--hint-remove", "--out-dir", "/out"])
        );
    }

    #[test]
    fn test_darken_disabled_emits_nothing() {
        let mut config = minimal();
        config.set_darken_enabled(true);
        config.set_darken_amount(40);
        config.set_modify_bearings(true);
        config.set_darken_enabled(false);

        let args = build_command(&config).unwrap();
        assert!(!args.iter().any(|a| a == "--darken" || a == "--fix-bearings" || a == "40"));
    }

    #[test]
    fn test_darken_without_bearings() {
        let mut config = minimal();
        config.set_darken_enabled(true);
        let args = build_command(&config).unwrap();
        assert_eq!(
            args,
            os(&[
                "MyFont",
                "--regular-file",
                "a.ttf",
                "--hint-keep",
                "--darken",
                "12",
                "--out-dir",
                "/out"
            ])
        );
    }

    #[test]
    fn test_deterministic() {
        let config = minimal();
        assert_eq!(build_command(&config).unwrap(), build_command(&config).unwrap());
        assert_eq!(build_command(&config.clone()).unwrap(), build_command(&config).unwrap());
    }

    #[test]
    fn test_missing_output_dir() {
        let mut config = JobConfiguration::new();
        config.set_family_name("MyFont").unwrap();
        config.load_files(["a-Regular.ttf"]);
        assert_eq!(
            build_command(&config),
            Err(Error::ConfigIncomplete(ConfigurationError::NoOutputDir))
        );
    }

    #[test]
    fn test_no_assigned_files() {
        let mut config = minimal();
        config.load_files(["unknown.ttf"]);
        assert_eq!(
            build_command(&config),
            Err(Error::ConfigIncomplete(ConfigurationError::NoFilesAssigned))
        );
    }

    #[test]
    fn test_invalid_name() {
        let mut config = minimal();
        let _ = config.set_family_name("My/Font");
        assert!(matches!(
            build_command(&config),
            Err(Error::ConfigIncomplete(ConfigurationError::InvalidName(_)))
        ));
        let _ = config.set_family_name("  ");
        assert_eq!(
            build_command(&config),
            Err(Error::ConfigIncomplete(ConfigurationError::EmptyName))
        );
    }
}
