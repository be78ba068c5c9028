//! `timegate init` — generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal or
//! fully documented templates, or walks through the interactive wizard.

pub mod interactive;
pub mod serialize;

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::TimegateError;

pub fn execute(args: &InitArgs) -> Result<(), TimegateError> {
    if args.interactive {
        return interactive::run(args);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("timegate.{}", args.format.extension())));

    if output.exists() {
        return Err(TimegateError::FileExists { path: output });
    }

    let content = match (&args.format, args.full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    };

    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}

const YAML_MINIMAL: &str = r#"# Timegate config — https://github.com/julienandreu/timegate

date_ranges:
  - start: "20230101"
    end: "20231231"
    target: "http://localhost:9001"
"#;

const YAML_FULL: &str = r#"# Timegate config — https://github.com/julienandreu/timegate
#
# Requests carry a ?date=YYYYMMDD parameter; the first range below that
# contains the date (inclusive bounds) receives the request. Overlaps
# are resolved by listing order.
#
# All scalar values shown are defaults. Uncomment and modify as needed.

# port: 8080                 # Listen port
# read_timeout_ms: 15000     # Inbound request body read timeout
# write_timeout_ms: 60000    # Inbound response deadline
# idle_timeout_ms: 60000     # Pooled backend connection idle timeout
# forward_timeout_ms: 30000  # Outbound forwarding timeout

date_ranges:
  # Inclusive YYYYMMDD bounds; target path/query are ignored
  - start: "20230101"
    end: "20230630"
    target: "http://service-h1:9001"

  - start: "20230701"
    end: "20231231"
    target: "http://service-h2:9002"
"#;

const JSON_MINIMAL: &str = r#"{
  "date_ranges": [
    { "start": "20230101", "end": "20231231", "target": "http://localhost:9001" }
  ]
}
"#;

const JSON_FULL: &str = r#"{
  "port": 8080,
  "read_timeout_ms": 15000,
  "write_timeout_ms": 60000,
  "idle_timeout_ms": 60000,
  "forward_timeout_ms": 30000,
  "date_ranges": [
    { "start": "20230101", "end": "20230630", "target": "http://service-h1:9001" },
    { "start": "20230701", "end": "20231231", "target": "http://service-h2:9002" }
  ]
}
"#;

const TOML_MINIMAL: &str = r#"# Timegate config — https://github.com/julienandreu/timegate

[[date_ranges]]
start = "20230101"
end = "20231231"
target = "http://localhost:9001"
"#;

const TOML_FULL: &str = r#"# Timegate config — https://github.com/julienandreu/timegate
#
# Requests carry a ?date=YYYYMMDD parameter; the first range below that
# contains the date (inclusive bounds) receives the request. Overlaps
# are resolved by listing order.

# port = 8080
# read_timeout_ms = 15000
# write_timeout_ms = 60000
# idle_timeout_ms = 60000
# forward_timeout_ms = 30000

[[date_ranges]]
start = "20230101"
end = "20230630"
target = "http://service-h1:9001"

[[date_ranges]]
start = "20230701"
end = "20231231"
target = "http://service-h2:9002"
"#;
