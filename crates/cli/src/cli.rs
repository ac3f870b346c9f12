//! CLI definitions and command dispatch.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use readify_core::{
    HintMode, JobConfiguration, StyleSlot,
    config::{MAX_DARKEN_AMOUNT, MIN_DARKEN_AMOUNT},
};

use crate::{
    commands::{classify, generate, print_command},
    io::collect_font_inputs,
};

#[derive(Parser)]
#[command(name = "readify-font", version)]
#[command(about = "Make fonts easier to read on e-ink devices using FontForge")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Hinting treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HintArg {
    /// Keep hinting as it exists in the original fonts
    Keep,
    /// Remove existing hinting
    Remove,
    /// Replace hinting with FontForge's autohinter
    Auto,
}

impl From<HintArg> for HintMode {
    fn from(arg: HintArg) -> Self {
        match arg {
            HintArg::Keep => HintMode::Keep,
            HintArg::Remove => HintMode::Remove,
            HintArg::Auto => HintMode::Auto,
        }
    }
}

/// Manual style for the font at a 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub index: usize,
    pub slot: StyleSlot,
}

fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (index, style) = s.split_once('=').ok_or_else(|| format!("expected INDEX=STYLE: {s}"))?;
    let index: usize = index.trim().parse().map_err(|_| format!("invalid font index: {index}"))?;
    if index == 0 {
        return Err("font indices start at 1".to_string());
    }
    let slot = style.parse::<StyleSlot>().map_err(|e| e.to_string())?;
    Ok(Assignment { index, slot })
}

#[derive(Debug, Clone, clap::Args)]
pub struct JobArgs {
    /// Font files, or directories of .ttf/.otf files (at most four fonts)
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,

    /// Family name for the generated fonts
    #[arg(short, long)]
    pub name: String,

    /// Directory the generated fonts are written to
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Set the style of the INDEX-th font (1-based), e.g. 2=bold-italic
    #[arg(long = "assign", value_name = "INDEX=STYLE", value_parser = parse_assignment)]
    pub assignments: Vec<Assignment>,

    /// Add an old-style kern table for readers that need it
    #[arg(long)]
    pub legacy_kerning: bool,

    /// Zero out PANOSE information
    #[arg(long)]
    pub strip_panose: bool,

    /// Use the alternative renaming method
    #[arg(long)]
    pub alt_name: bool,

    /// Hinting treatment
    #[arg(long, value_enum, default_value_t = HintArg::Keep)]
    pub hint: HintArg,

    /// Darken (add weight to) glyphs by AMOUNT; 50 is roughly regular to bold
    #[arg(
        long,
        value_name = "AMOUNT",
        value_parser = clap::value_parser!(u8)
            .range(i64::from(MIN_DARKEN_AMOUNT)..=i64::from(MAX_DARKEN_AMOUNT))
    )]
    pub darken: Option<u8>,

    /// Keep glyph widths close to the original when darkening
    #[arg(long, requires = "darken")]
    pub fix_bearings: bool,
}

impl JobArgs {
    /// Apply these arguments to a job configuration.
    pub fn apply(&self, config: &mut JobConfiguration) -> Result<()> {
        let fonts = collect_font_inputs(&self.fonts)?;
        config.load_files(fonts);

        for Assignment { index, slot } in &self.assignments {
            if !config.assign_slot(index - 1, *slot) {
                bail!("--assign {index}: only {} fonts loaded", config.files().len());
            }
        }

        config
            .set_family_name(self.name.as_str())
            .with_context(|| format!("Invalid family name {:?}", self.name))?;
        config.set_legacy_kerning(self.legacy_kerning);
        config.set_strip_panose(self.strip_panose);
        config.set_name_hack(self.alt_name);
        config.set_hint_mode(self.hint.into());
        if let Some(amount) = self.darken {
            config.set_darken_enabled(true);
            config.set_darken_amount(amount.into());
            config.set_modify_bearings(self.fix_bearings);
        }
        config.set_output_dir(&self.out_dir);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct EngineArgs {
    /// FontForge executable (default: search PATH)
    #[arg(long, value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Script FontForge runs the job with, passed as `-script SCRIPT`
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the style detected for each font file
    Classify {
        /// Font files or directories
        #[arg(required = true)]
        fonts: Vec<PathBuf>,
    },
    /// Print the engine command line without running it
    Command {
        #[command(flatten)]
        job: JobArgs,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Generate the modified fonts
    Generate {
        #[command(flatten)]
        job: JobArgs,
        #[command(flatten)]
        engine: EngineArgs,
        /// Only show engine output if generation fails
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Commands {
    pub async fn run(self) -> Result<ExitCode> {
        match self {
            Commands::Classify { fonts } => classify(&fonts)?,
            Commands::Command { job, engine } => print_command(&job, &engine)?,
            Commands::Generate { job, engine, quiet } => return generate(&job, &engine, quiet).await,
        }
        Ok(ExitCode::SUCCESS)
    }
}
