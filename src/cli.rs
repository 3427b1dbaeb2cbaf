//! Command-line front end: list catalogs or switch a mode from a script

use std::fmt::Write as _;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use crate::catalog::{self, OutputCatalog};
use crate::display_server::{DisplayServer, ModeId, OutputInfo};
use crate::snapshot::Snapshot;
use crate::switch;

#[derive(Debug, Parser)]
#[command(name = "modeswitch", version, about = "Inspect and switch RandR video modes")]
pub struct Cli {
    /// X display to connect to (overrides the config file)
    #[arg(long, global = true)]
    pub display: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the mode catalog of every active output
    List {
        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Switch an output to one of its advertised modes
    Set {
        /// Output name, e.g. DP-1
        output: String,
        /// Mode id (0x-prefixed hex) or mode name, e.g. 1920x1080
        mode: String,
    },
}

pub fn list<S: DisplayServer>(snapshot: &Snapshot<S>, json: bool) -> Result<()> {
    let catalogs = catalog::build_all(snapshot);

    if json {
        let text =
            serde_json::to_string_pretty(&catalogs).context("Failed to serialize catalogs")?;
        println!("{text}");
        return Ok(());
    }

    for catalog in &catalogs {
        print!("{}", render_table(catalog));
    }
    Ok(())
}

/// One output as a plain-text table; `*` marks the current mode
pub fn render_table(catalog: &OutputCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.label);
    for entry in &catalog.entries {
        let _ = writeln!(
            out,
            "  {} {}{} {:<16} {} {}",
            entry.id_label,
            if entry.current { '*' } else { ' ' },
            if entry.preferred { '+' } else { ' ' },
            entry.name,
            entry.refresh,
            entry.pixel_clock,
        );
    }
    out
}

/// Accept a `0x` hex id or a mode name, looked up among the output's
/// advertised modes in order.
pub fn resolve_mode<S: DisplayServer>(
    snapshot: &Snapshot<S>,
    output: &OutputInfo,
    arg: &str,
) -> Option<ModeId> {
    if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        return ModeId::from_str_radix(hex, 16).ok();
    }

    output
        .modes
        .iter()
        .copied()
        .find(|&id| snapshot.mode(id).is_some_and(|mode| mode.name == arg))
}

pub fn set<S: DisplayServer>(snapshot: &Snapshot<S>, output_name: &str, mode_arg: &str) -> Result<()> {
    let output = snapshot
        .output_by_name(output_name)
        .ok_or_else(|| anyhow!("No output named {output_name:?}"))?;

    let mode = resolve_mode(snapshot, output, mode_arg)
        .ok_or_else(|| anyhow!("Output {output_name} has no mode {mode_arg:?}"))?;

    switch::apply(snapshot, output.id, mode)
        .with_context(|| format!("Failed to switch {output_name} to {mode_arg}"))?;

    println!("{output_name}: {}", catalog::format_mode_id(mode));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_server::fake::{crtc, mode, output, FakeServer};

    fn snapshot() -> Snapshot<FakeServer> {
        let mut server = FakeServer::with_modes(vec![
            mode(0x40, "1920x1080", 148_500_000, 2200, 1125),
            mode(0x41, "1920x1080", 148_350_000, 2200, 1125),
            mode(0x42, "1280x720", 74_250_000, 1650, 750),
        ]);
        server.add_output(output(0x50, "DP-1", Some(0x60), vec![0x41, 0x40, 0x42], 1));
        server.add_crtc(crtc(0x60, Some(0x40), vec![0x50]));
        Snapshot::capture(server).unwrap()
    }

    #[test]
    fn test_resolve_mode_by_hex_id() {
        let snapshot = snapshot();
        let output = &snapshot.outputs()[0];
        assert_eq!(resolve_mode(&snapshot, output, "0x42"), Some(0x42));
        assert_eq!(resolve_mode(&snapshot, output, "0X0000004a"), Some(0x4a));
        assert_eq!(resolve_mode(&snapshot, output, "0xzz"), None);
    }

    #[test]
    fn test_resolve_mode_by_name_first_advertised() {
        let snapshot = snapshot();
        let output = &snapshot.outputs()[0];
        assert_eq!(resolve_mode(&snapshot, output, "1920x1080"), Some(0x41));
        assert_eq!(resolve_mode(&snapshot, output, "640x480"), None);
    }

    #[test]
    fn test_set_commits_through_switch() {
        let snapshot = snapshot();
        set(&snapshot, "DP-1", "1280x720").unwrap();

        let commits = snapshot.server().commits.borrow();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].1.mode, 0x42);
    }

    #[test]
    fn test_set_unknown_output_or_mode() {
        let snapshot = snapshot();
        assert!(set(&snapshot, "HDMI-9", "1280x720").is_err());
        assert!(set(&snapshot, "DP-1", "0x99").is_err());
        assert!(snapshot.server().commits.borrow().is_empty());
    }

    #[test]
    fn test_render_table_marks_current_and_preferred() {
        let snapshot = snapshot();
        let catalog = catalog::build(&snapshot, &snapshot.outputs()[0]).unwrap();
        let table = render_table(&catalog);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "DP-1()");
        assert!(lines[1].starts_with("  0x00000041  +"));
        assert!(lines[2].starts_with("  0x00000040 * "));
        assert!(lines[3].contains("1280x720"));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["modeswitch", "--display", ":1", "set", "DP-1", "0x42"]);
        assert_eq!(cli.display.as_deref(), Some(":1"));
        assert!(matches!(
            cli.command,
            Some(Command::Set { ref output, ref mode }) if output == "DP-1" && mode == "0x42"
        ));

        let cli = Cli::parse_from(["modeswitch"]);
        assert!(cli.command.is_none());
    }
}
