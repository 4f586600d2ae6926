use super::{json_pretty, EXIT_SUCCESS};
use crate::args::ArgParser;
use devenv_core::{Engine, NewEnv, DEFAULT_IMAGE};

pub fn run(engine: &mut Engine, args: &mut ArgParser, json: bool) -> Result<u8, String> {
    let image = args.named("--image").map_err(|e| e.to_string())?;
    let repo = args.named("--repo").map_err(|e| e.to_string())?;
    let key = args.named("--key").map_err(|e| e.to_string())?;
    let name = args.pos_req("name").map_err(|e| e.to_string())?;

    let req = NewEnv {
        name,
        base_image: image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
        ssh_key: key,
        repo,
    };
    // Re-creating a name replaces the earlier record.
    let env = engine.create(&req, true).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&env)?);
    } else {
        println!("created environment '{}' ({})", env.name, env.base_image);
    }
    Ok(EXIT_SUCCESS)
}
