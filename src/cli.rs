// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help.
use crate::model::Profile;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use strum::IntoEnumIterator;

/// Parsed command line. `--flags` are collected wherever they appear.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
    pub command: Option<String>,
    pub flags: Vec<String>,
    pub rest: Vec<String>,
}

impl Args {
    pub fn parse<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Self::default();
        let mut iter = raw.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-r" | "--root" => {
                    let path = iter.next().context("--root requires a path")?;
                    args.root = Some(PathBuf::from(path));
                }
                "-v" | "--verbose" => args.verbose = true,
                "-h" | "--help" => args.help = true,
                a if a.starts_with("--") => args.flags.push(arg),
                a if a.starts_with('-') && a.len() > 1 && args.command.is_none() => {
                    bail!("Unknown option '{}'", a)
                }
                _ if args.command.is_none() => args.command = Some(arg),
                _ => args.rest.push(arg),
            }
        }
        Ok(args)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Fail on any flag the current command does not understand.
    pub fn expect_flags(&self, allowed: &[&str]) -> Result<()> {
        if let Some(bad) = self.flags.iter().find(|f| !allowed.contains(&f.as_str())) {
            let command = self.command.as_deref().unwrap_or_default();
            bail!("Unknown flag '{}' for '{}'", bad, command);
        }
        Ok(())
    }

    /// `capture --save` commits entries, which brain-dump items are not.
    pub fn check_capture(&self, profile: Profile) -> Result<()> {
        if profile == Profile::Lightweight && self.has_flag("--save") {
            bail!(
                "Brain-dump items cannot be saved. Set profile = \"full\" in config.toml to use --save."
            );
        }
        Ok(())
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Jotter v{} - Turn free-form thoughts into tasks, events, ideas and notes",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} capture [--save] [text...]", binary_name);
    println!("    {} dump [text...]", binary_name);
    println!("    {} list [--today | --active]", binary_name);
    println!("    {} start <uid>", binary_name);
    println!("    {} done <uid>", binary_name);
    println!("    {} delete <uid>", binary_name);
    println!("    {} config", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Log pipeline decisions to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CAPTURE:");
    println!("    Text is read from the arguments, or from stdin when none is given.");
    println!("    Separate thoughts with new lines, ';', ', and', ', then' or sentences.");
    println!("    --save            Commit the resulting entries to the local store.");
    println!();
    println!("    #tag              Add a tag");
    println!("    tomorrow 3pm      Dates: today, tonight, tomorrow, friday, next week,");
    println!("                      in 2 days, 2025-01-16, March 5th, at 10am");
    println!("    at WeWork         Locations: at/in/to/from + Capitalized Name, @Place");
    println!("    urgent, asap      Priority cues (also: important, deadline, due, focus)");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} capture \"Call the dentist tomorrow at 3pm #health\"",
        binary_name
    );
    println!(
        "    {} capture --save \"Meeting with Sarah at WeWork tomorrow 10am\"",
        binary_name
    );
    println!("    {} dump \"Buy milk. Call mom. Pay rent.\"", binary_name);
    println!();
    let profiles: Vec<String> = Profile::iter().map(|p| p.to_string()).collect();
    println!("CONFIG (config.toml):");
    println!("    profile = \"full\"            One of: {}", profiles.join(", "));
    println!("    suggestions = true          Print follow-up suggestions");
    println!("    keep_placeholders = false   Show the record produced by empty input");
    println!("    log_level = \"warn\"          error, warn, info, debug or trace");
}
