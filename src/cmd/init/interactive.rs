//! Interactive wizard for step-by-step config generation.

use std::path::{Path, PathBuf};

use console::style;
use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::model::{Config, DateRangeConfig};
use crate::config::validation::{validate, validate_date, validate_target_url};
use crate::error::TimegateError;

use super::serialize::serialize_config;

/// Map a `dialoguer::Error` to a `TimegateError`.
fn map_prompt_err(e: dialoguer::Error) -> TimegateError {
    TimegateError::Io(std::io::Error::other(e.to_string()))
}

pub fn run(args: &InitArgs) -> Result<(), TimegateError> {
    // Ensure we're running in an interactive terminal
    if !console::Term::stdout().is_term() {
        return Err(TimegateError::Io(std::io::Error::other(
            "interactive mode requires a terminal (TTY). Use timegate init without -i for non-interactive mode.",
        )));
    }

    println!(
        "\n  {} Config Wizard\n  {}\n",
        style("Timegate").cyan().bold(),
        style("─────────────────────────").dim()
    );

    // Step 1: Output settings
    println!("  {}\n", style("Step 1: Output").bold());
    let format = prompt_format(args)?;
    let output = prompt_output(args, &format)?;

    // Step 2: Server
    println!("\n  {}\n", style("Step 2: Server").bold());
    let port: u16 = Input::new()
        .with_prompt("Listen port")
        .default(8080)
        .validate_with(|value: &u16| {
            if *value == 0 {
                Err("port cannot be 0")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(map_prompt_err)?;

    let forward_timeout_ms: u64 = Input::new()
        .with_prompt("Forwarding timeout (ms)")
        .default(30_000)
        .validate_with(|value: &u64| {
            if *value == 0 {
                Err("timeout must be positive")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(map_prompt_err)?;

    // Step 3: Date ranges
    println!("\n  {}\n", style("Step 3: Date ranges").bold());
    let date_ranges = prompt_date_ranges()?;

    let config = Config {
        port,
        read_timeout_ms: 15_000,
        write_timeout_ms: 60_000,
        idle_timeout_ms: 60_000,
        forward_timeout_ms,
        date_ranges,
    };

    // Validate the assembled config
    if let Err(errors) = validate(&config) {
        eprintln!(
            "\n  {} Config has validation errors:",
            style("!").red().bold()
        );
        for e in &errors {
            eprintln!("    {e}");
        }
        return Err(TimegateError::ConfigValidation { errors });
    }

    // Step 4: Review
    println!("\n  {}\n", style("Step 4: Review").bold());
    print_summary(&config, &format, &output);

    let confirm = Confirm::new()
        .with_prompt(format!("Write config to {}?", output.display()))
        .default(true)
        .interact()
        .map_err(map_prompt_err)?;

    if !confirm {
        println!("  Aborted.");
        return Ok(());
    }

    let content = serialize_config(&config, &format)?;
    std::fs::write(&output, content)?;
    println!("\n  Created {}", output.display());
    println!("  Start the proxy with: timegate run -c {}", output.display());
    Ok(())
}

fn prompt_format(args: &InitArgs) -> Result<ConfigFormat, TimegateError> {
    let formats = ["yaml", "json", "toml"];
    let default_idx = formats
        .iter()
        .position(|f| *f == args.format.extension())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Config format")
        .items(&formats)
        .default(default_idx)
        .interact()
        .map_err(map_prompt_err)?;

    Ok(match formats[idx] {
        "json" => ConfigFormat::Json,
        "toml" => ConfigFormat::Toml,
        _ => ConfigFormat::Yaml,
    })
}

fn prompt_output(args: &InitArgs, format: &ConfigFormat) -> Result<PathBuf, TimegateError> {
    let default_name = args.output.as_ref().map_or_else(
        || format!("timegate.{}", format.extension()),
        |p| p.display().to_string(),
    );

    let path: String = Input::new()
        .with_prompt("Output file")
        .default(default_name)
        .interact_text()
        .map_err(map_prompt_err)?;

    let path = PathBuf::from(path);
    if path.exists() {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists, overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(map_prompt_err)?;
        if !overwrite {
            return Err(TimegateError::FileExists { path });
        }
    }

    Ok(path)
}

fn prompt_date_ranges() -> Result<Vec<DateRangeConfig>, TimegateError> {
    let mut ranges = Vec::new();

    loop {
        println!(
            "  {} range {}",
            style("\u{2192}").dim(),
            style(ranges.len() + 1).bold()
        );

        let start: String = Input::new()
            .with_prompt("  Start date (YYYYMMDD, inclusive)")
            .validate_with(|value: &String| validate_date(value).map(|_| ()))
            .interact_text()
            .map_err(map_prompt_err)?;

        // validate_with above guarantees this parses
        let start_date = validate_date(&start)
            .map_err(|e| TimegateError::Io(std::io::Error::other(e)))?;

        let end: String = Input::new()
            .with_prompt("  End date (YYYYMMDD, inclusive)")
            .validate_with(move |value: &String| {
                let end_date = validate_date(value)?;
                if end_date < start_date {
                    Err("end date is before start date".to_string())
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(map_prompt_err)?;

        let target: String = Input::new()
            .with_prompt("  Target base URL")
            .validate_with(|value: &String| validate_target_url(value))
            .interact_text()
            .map_err(map_prompt_err)?;

        ranges.push(DateRangeConfig { start, end, target });

        let another = Confirm::new()
            .with_prompt("Add another range?")
            .default(false)
            .interact()
            .map_err(map_prompt_err)?;
        if !another {
            break;
        }
    }

    Ok(ranges)
}

fn print_summary(config: &Config, format: &ConfigFormat, output: &Path) {
    println!(
        "  {} {} ({})",
        style("file:").dim(),
        output.display(),
        format.extension()
    );
    println!("  {} {}", style("port:").dim(), config.port);
    println!(
        "  {} {}ms",
        style("forward timeout:").dim(),
        config.forward_timeout_ms
    );
    println!("  {} {} ranges", style("routing:").dim(), config.date_ranges.len());
    for range in &config.date_ranges {
        println!(
            "    [{} .. {}] \u{2192} {}",
            range.start, range.end, range.target
        );
    }
    println!();
}
