use super::{json_pretty, EXIT_SUCCESS};
use crate::args::ArgParser;
use devenv_core::Engine;

pub fn run(engine: &mut Engine, args: &mut ArgParser, json: bool) -> Result<u8, String> {
    let ssh_path = args
        .named("--sshPath")
        .map_err(|e| e.to_string())?
        .unwrap_or_default();
    let engine_path = args.named("--enginePath").map_err(|e| e.to_string())?;

    let config = engine.config_mut();
    config.ssh_path = ssh_path;
    if let Some(path) = engine_path {
        config.engine_path = path;
    }

    if json {
        let payload = serde_json::json!({
            "engine": config.engine,
            "enginePath": config.engine_path,
            "sshPath": config.ssh_path,
        });
        println!("{}", json_pretty(&payload)?);
    } else if config.ssh_path.is_empty() {
        println!("cleared sshPath");
    } else {
        println!("sshPath set to {}", config.ssh_path);
    }
    Ok(EXIT_SUCCESS)
}
