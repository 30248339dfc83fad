//! `rollbook` - CLI for the student record manager
//!
//! With no subcommand this binary runs the interactive menu shell: load the
//! store from the data file, serve menu choices, and write the store back on
//! exit. The subcommands are one-shot helpers for listing records and
//! inspecting configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use clap::Parser;
use tracing::warn;

use rollbook::cli::{Cli, Command, ConfigCommand, ListCommand};
use rollbook::{codec, init_logging, Config, RecordStore, Shell};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        None => run_shell(&config),
        Some(Command::List(list_cmd)) => handle_list(&config, &list_cmd),
        Some(Command::Config(config_cmd)) => handle_config(&config, config_cmd),
    }
}

/// Load the store, run the interactive shell over stdin/stdout, and save
/// the store back when the shell exits.
fn run_shell(config: &Config) -> anyhow::Result<()> {
    let path = config.data_path();
    let mut store = load_or_empty(config);

    println!("\n========================================");
    println!("  Student Record Manager");
    println!("  Welcome!");
    println!("========================================");
    if !store.is_empty() {
        println!("\nLoaded {} student(s) from previous session.", store.len());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock());
    shell.run(&mut store)?;

    // A failed save is reported, not fatal: the store contents were already
    // surfaced through the shell.
    match codec::save(&store, &path) {
        Ok(()) => {
            println!("\nAll data saved successfully!");
            println!("Thanks for using the system. Goodbye!\n");
        }
        Err(err) => eprintln!("\nError: couldn't save data: {err}"),
    }
    Ok(())
}

/// Load the store from the configured data file, falling back to an empty
/// store if the file is corrupt. An absent file already loads as empty.
fn load_or_empty(config: &Config) -> RecordStore {
    let path = config.data_path();
    match codec::load(&path, config.storage.capacity) {
        Ok(store) => store,
        Err(err) => {
            warn!("{err}; starting with an empty store");
            RecordStore::new(config.storage.capacity)
        }
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = load_or_empty(config);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(store.records())?);
        return Ok(());
    }

    if store.is_empty() {
        println!("No students in the store yet.");
        return Ok(());
    }

    let stdout = io::stdout();
    write_listing(&mut stdout.lock(), &store)?;
    Ok(())
}

/// Write the table listing of all records.
fn write_listing(out: &mut impl Write, store: &RecordStore) -> io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<20} {:<5} {:<15} {:<10} {}",
        "Roll", "Name", "Age", "Department", "Percentage", "Grade"
    )?;
    writeln!(out, "----------------------------------------")?;
    for record in store.records() {
        writeln!(
            out,
            "{:<8} {:<20} {:<5} {:<15} {:<10.2} {}",
            record.roll,
            record.name(),
            record.age,
            record.department(),
            record.percentage(),
            record.grade()
        )?;
    }
    writeln!(out, "----------------------------------------")?;
    writeln!(out, "Total: {} students", store.len())?;
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data path:  {}", config.data_path().display());
                println!("  Capacity:   {}", config.storage.capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_listing_contains_records() {
        let mut store = RecordStore::new(10);
        store
            .add(
                rollbook::StudentRecord::new(101, "Asha", 20, "CS", [90.0, 85.0, 92.0, 78.0, 88.0])
                    .unwrap(),
            )
            .unwrap();

        let mut out = Vec::new();
        write_listing(&mut out, &store).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Asha"));
        assert!(text.contains("Total: 1 students"));
    }
}
