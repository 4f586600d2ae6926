use super::EXIT_SUCCESS;
use devenv_runtime::editor::EDITOR_ENV;
use devenv_store::CONFIG_DIR_ENV;

pub fn usage() -> String {
    format!(
        "\
dev-env: named container-backed development environments

usage: dev-env [-v|--trace] [--json] <command> [args]

commands:
  help                                   show this text
  config [--sshPath <dir>] [--enginePath <bin>]
                                         set the SSH key directory (required first)
  create <name> [--image <ref>] [--repo <url>] [--key <file>]
                                         create a volume, optionally clone a repo into it
  start|run <name>                       start the environment container
  attach <name>                          open the environment in the editor
  stop <name>                            stop the environment container
  rm <name>                              delete the volume and forget the environment
  list|ls                                list known environments

environment:
  {CONFIG_DIR_ENV}    config directory (default ~/.dev-env)
  {EDITOR_ENV}  editor binary used by attach (default code)
  DEV_ENV_LOG    log filter (e.g. debug)
"
    )
}

pub fn run(requested: Option<&str>) -> Result<u8, String> {
    if let Some(name) = requested.filter(|n| *n != "help") {
        eprintln!("unknown command '{name}'");
    }
    print!("{}", usage());
    Ok(EXIT_SUCCESS)
}
