//! CLI command implementations.

use anyhow::{Context, Result};
use condapipe_config::ResourceNames;
use condapipe_synth::PipelineStack;

pub fn synth(config: &str, out: &str) -> Result<()> {
    let names = ResourceNames::from_file(config)
        .with_context(|| format!("failed to load configuration from {config}"))?;
    let assembly = PipelineStack::from_names(&names)?.synth()?;

    let paths = assembly.write(out)?;
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn print(config: &str) -> Result<()> {
    let names = ResourceNames::from_file(config)
        .with_context(|| format!("failed to load configuration from {config}"))?;
    let assembly = PipelineStack::from_names(&names)?.synth()?;

    println!("{}", assembly.template_json()?);
    Ok(())
}

pub fn validate(path: &str) -> Result<()> {
    match ResourceNames::from_file(path) {
        Ok(names) => {
            let missing = names.missing_keys();
            if missing.is_empty() {
                println!("Configuration is valid");
                Ok(())
            } else {
                println!("Missing required keys: {}", missing.join(", "));
                std::process::exit(1);
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
