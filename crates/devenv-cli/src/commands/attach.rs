use super::{print_status, EXIT_SUCCESS};
use crate::args::ArgParser;
use devenv_core::Engine;

pub fn run(engine: &Engine, args: &mut ArgParser, json: bool) -> Result<u8, String> {
    let name = args.pos_req("name").map_err(|e| e.to_string())?;
    engine.attach(&name).map_err(|e| e.to_string())?;
    if json {
        print_status("attached", &name, json)?;
    } else {
        println!("opened environment {name} in editor");
    }
    Ok(EXIT_SUCCESS)
}
