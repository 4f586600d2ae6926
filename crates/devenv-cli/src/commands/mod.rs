pub mod attach;
pub mod config;
pub mod create;
pub mod help;
pub mod list;
pub mod rm;
pub mod start;
pub mod stop;

use crate::args::ArgParser;
use devenv_core::Engine;
use devenv_store::{ConfigStore, StoreLayout};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{stderr, IsTerminal};
use std::time::Duration;
use tracing::debug;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 3;

/// Top-level commands. Unknown or missing command names fall back to `Help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Config,
    Create,
    Start,
    Attach,
    Stop,
    Rm,
    List,
}

impl Command {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("config") => Command::Config,
            Some("create") => Command::Create,
            Some("start" | "run") => Command::Start,
            Some("attach") => Command::Attach,
            Some("stop") => Command::Stop,
            Some("rm") => Command::Rm,
            Some("list" | "ls") => Command::List,
            _ => Command::Help,
        }
    }

    /// Whether the command needs `sshPath` configured before it may run.
    pub fn requires_config(self) -> bool {
        !matches!(self, Command::Help | Command::Config)
    }
}

/// Run one invocation: load the config, perform one command, save the config.
///
/// The config is written back only when the command succeeds.
pub fn dispatch(args: Vec<String>, layout: StoreLayout, json: bool) -> Result<u8, String> {
    let mut args = ArgParser::new(args);
    let cmd_name = args.pos("cmd");
    let command = Command::from_name(cmd_name.as_deref());
    debug!("command {command:?} (from {cmd_name:?})");

    let store = ConfigStore::new(layout);
    let config = store.load().map_err(|e| format!("store error: {e}"))?;
    let mut engine = Engine::new(config);

    if command.requires_config() {
        engine.require_configured().map_err(|e| e.to_string())?;
    }

    let code = match command {
        Command::Help => help::run(cmd_name.as_deref()),
        Command::Config => config::run(&mut engine, &mut args, json),
        Command::Create => create::run(&mut engine, &mut args, json),
        Command::Start => start::run(&engine, &mut args, json),
        Command::Attach => attach::run(&engine, &mut args, json),
        Command::Stop => stop::run(&engine, &mut args, json),
        Command::Rm => rm::run(&mut engine, &mut args, json),
        Command::List => list::run(&engine, json),
    }?;

    if !args.remaining().is_empty() {
        debug!("ignoring extra arguments: {:?}", args.remaining());
    }

    store
        .save(engine.config())
        .map_err(|e| format!("store error: {e}"))?;
    Ok(code)
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

/// Run a captured engine step behind a spinner on interactive terminals,
/// otherwise print `done` on success (nothing in JSON mode).
pub fn engine_step(
    pending: &str,
    done: &str,
    json: bool,
    step: impl FnOnce() -> Result<(), String>,
) -> Result<(), String> {
    if json || !stderr().is_terminal() {
        step()?;
        if !json {
            println!("{done}");
        }
        return Ok(());
    }
    let pb = spinner(pending);
    match step() {
        Ok(()) => {
            spin_ok(&pb, done);
            Ok(())
        }
        Err(e) => {
            spin_fail(&pb, pending);
            Err(e)
        }
    }
}

/// JSON body printed by lifecycle commands in `--json` mode.
pub fn print_status(status: &str, name: &str, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::json!({ "status": status, "name": name });
        println!("{}", json_pretty(&payload)?);
    }
    Ok(())
}
