//! The `socratic init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("socratic.toml").exists() {
        println!("socratic.toml already exists, skipping.");
    } else {
        std::fs::write("socratic.toml", SAMPLE_CONFIG)?;
        println!("Created socratic.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export ANTHROPIC_API_KEY (or put it in .env)");
    println!("  2. Run: socratic check-config");
    println!("  3. Run: socratic serve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# socratic configuration

[server]
bind = "127.0.0.1:8080"
cors_origins = ["http://localhost:3000", "http://localhost:5000"]

[provider]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"
# Use canned replies instead, e.g. for front-end work without an API key:
# type = "mock"

[relay]
model = "claude-3-7-sonnet-20250219"
# Omit to use the provider's default sampling temperature.
# temperature = 0.0
turn_max_tokens = 300
plan_max_tokens = 500
guidance_max_tokens = 500
"#;
