use super::{json_pretty, EXIT_SUCCESS};
use console::Style;
use devenv_core::Engine;

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => Style::new().dim().apply_to("-").to_string(),
    }
}

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let envs: Vec<_> = engine.config().list().collect();
    if json {
        println!("{}", json_pretty(&envs)?);
    } else if envs.is_empty() {
        println!("no environments found");
    } else {
        println!("{:<20} {:<24} {:<26} REPO", "NAME", "IMAGE", "CREATED");
        for env in &envs {
            let name = Style::new()
                .bold()
                .apply_to(format!("{:<20}", env.name))
                .to_string();
            println!(
                "{} {:<24} {:<26} {}",
                name,
                env.base_image,
                or_dash(env.created_at.as_deref()),
                or_dash(env.repo.as_deref()),
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
