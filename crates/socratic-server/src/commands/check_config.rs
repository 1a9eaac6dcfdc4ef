//! The `socratic check-config` command.

use std::path::PathBuf;

use anyhow::Result;

use socratic_providers::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    println!("Bind: {}", config.server.bind);
    println!("CORS origins: {}", config.server.cors_origins.join(", "));
    println!("Provider: {:?}", config.provider);
    let temperature = config
        .relay
        .temperature
        .map_or_else(|| "provider default".to_string(), |t| t.to_string());
    println!(
        "Model: {} (temperature {}, max tokens {}/{}/{})",
        config.relay.model,
        temperature,
        config.relay.turn_max_tokens,
        config.relay.plan_max_tokens,
        config.relay.guidance_max_tokens,
    );

    let problems = config.problems();
    if problems.is_empty() {
        println!("Config OK.");
        return Ok(());
    }

    for problem in &problems {
        println!("  PROBLEM: {problem}");
    }
    anyhow::bail!("{} problem(s) found in config", problems.len())
}
