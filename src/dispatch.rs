#![allow(clippy::module_name_repetitions)]
//! Subcommand dispatch: the override registry, help synthesis, and the
//! local-handling vs passthrough decision.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::color::error_print;
use crate::commands;
use crate::engine::EngineClient;
use crate::errors::WorkflowError;

/// Tokens that request help wherever they appear in an argument list.
const HELP_FLAGS: [&str; 2] = ["--help", "-h"];

pub fn is_help_flag(arg: &str) -> bool {
    HELP_FLAGS.contains(&arg)
}

pub fn contains_help_flag(args: &[String]) -> bool {
    args.iter().any(|a| is_help_flag(a))
}

/// Decide whether a forwarded command line runs under elevated privileges.
/// Help and introspection never elevate, and an already-elevated process
/// never re-elevates.
pub fn needs_elevation(argv: &[String], euid_is_root: bool) -> bool {
    if euid_is_root {
        return false;
    }
    match argv.first().map(String::as_str) {
        None | Some("help") => false,
        Some(_) => !contains_help_flag(argv),
    }
}

type Handler = fn(&EngineClient, &[String]) -> Result<i32, WorkflowError>;

/// A registered override: its help text plus the handler invoked in place of
/// the engine. The set is fixed at build time and enumerable as a whole for
/// the aggregate help listing.
pub struct OverrideCommand {
    pub name: &'static str,
    pub short_help: &'static str,
    pub long_help: &'static str,
    handler: Handler,
}

static OVERRIDES: Lazy<BTreeMap<&'static str, OverrideCommand>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    for cmd in [
        OverrideCommand {
            name: "autobuild",
            short_help: "Build a directory into an image tagged latest plus a fresh timestamp",
            long_help: commands::AUTOBUILD_LONG_HELP,
            handler: commands::autobuild,
        },
        OverrideCommand {
            name: "autoprune",
            short_help: "Delete auto-managed image tags by selection method",
            long_help: commands::AUTOPRUNE_LONG_HELP,
            handler: commands::autoprune,
        },
        OverrideCommand {
            name: "autopush",
            short_help: "Push the newest timestamp tag and latest",
            long_help: commands::AUTOPUSH_LONG_HELP,
            handler: commands::autopush,
        },
        OverrideCommand {
            name: "autorun",
            short_help: "Run the image built from a directory",
            long_help: commands::AUTORUN_LONG_HELP,
            handler: commands::autorun,
        },
        OverrideCommand {
            name: "help",
            short_help: "Show merged help for the engine and overridden commands",
            long_help: commands::HELP_LONG_HELP,
            handler: commands::help,
        },
    ] {
        map.insert(cmd.name, cmd);
    }
    map
});

/// The override registry, keyed and therefore iterated by command name.
pub fn overrides() -> &'static BTreeMap<&'static str, OverrideCommand> {
    &OVERRIDES
}

/// Route one command line: an override handles it locally, everything else
/// is forwarded verbatim to the engine. Returns the process exit code.
pub fn dispatch(engine: &EngineClient, argv: &[String]) -> u8 {
    let (subcommand, rest): (&str, &[String]) = match argv.split_first() {
        Some((s, r)) if !s.is_empty() => (s.as_str(), r),
        _ => ("help", &[]),
    };

    if let Some(cmd) = overrides().get(subcommand) {
        if contains_help_flag(rest) {
            println!("{}", cmd.long_help);
            return 0;
        }
        return match (cmd.handler)(engine, rest) {
            Ok(code) => code.clamp(0, 255) as u8,
            Err(e) => {
                error_print(&format!("{subcommand}: {e}"));
                if e.is_usage() {
                    eprintln!();
                    eprintln!("{}", cmd.long_help);
                }
                e.exit_code()
            }
        };
    }

    match engine.forward(argv) {
        Ok(status) => status.code().map_or(1, |c| c.clamp(0, 255) as u8),
        Err(e) => {
            error_print(&e.to_string());
            e.exit_code()
        }
    }
}

/// Merge the engine's own help text with the override listing: everything up
/// to the engine's final trailer line, then the override section, then the
/// trailer.
pub fn merged_help_screen(engine_help: &str) -> String {
    let lines: Vec<&str> = engine_help.lines().collect();
    let trailer_idx = lines.iter().rposition(|l| !l.trim().is_empty());
    let (head, trailer) = match trailer_idx {
        Some(i) => (&lines[..i], Some(lines[i])),
        None => (&lines[..], None),
    };
    let mut out = String::new();
    for line in head {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("Overwritten commands:\n");
    for cmd in overrides().values() {
        out.push_str(&format!("  {:<12} {}\n", cmd.name, cmd.short_help));
    }
    if let Some(trailer) = trailer {
        out.push('\n');
        out.push_str(trailer);
        out.push('\n');
    }
    out
}

/// Render the aggregate `help` screen from a live engine help query.
pub fn render_aggregate_help(engine: &EngineClient) -> Result<i32, WorkflowError> {
    let engine_help = engine.capture(&["help".to_string()])?;
    print!("{}", merged_help_screen(&engine_help));
    Ok(0)
}
