use super::{engine_step, print_status, EXIT_SUCCESS};
use crate::args::ArgParser;
use devenv_core::Engine;

pub fn run(engine: &mut Engine, args: &mut ArgParser, json: bool) -> Result<u8, String> {
    let name = args.pos_req("name").map_err(|e| e.to_string())?;
    engine_step(
        &format!("removing environment {name}"),
        &format!("removed environment {name}"),
        json,
        || engine.remove(&name).map(drop).map_err(|e| e.to_string()),
    )?;
    print_status("removed", &name, json)?;
    Ok(EXIT_SUCCESS)
}
