use crate::cli_args::ConfigAction;
use crate::options::{FOLLOW_SYMLINKS_KEY, LINE_NUMBERS_KEY};
use anyhow::{bail, Result};
use colored::Colorize;
use sandworm_core::ConfigStore;
use std::path::Path;

struct ConfigOption {
    key: &'static str,
    description: &'static str,
    default: &'static str,
    validate: Option<fn(&str) -> Result<()>>,
}

/// Registry of recognized keys. Get/set refuse anything not listed here so
/// typos fail loudly instead of silently persisting dead entries.
const OPTIONS: &[ConfigOption] = &[
    ConfigOption {
        key: "claude.session_key",
        description: "Claude browser session key (stored globally)",
        default: "",
        validate: None,
    },
    ConfigOption {
        key: "claude.organization_id",
        description: "Claude organization id",
        default: "",
        validate: None,
    },
    ConfigOption {
        key: "claude.project_id",
        description: "Claude project id",
        default: "",
        validate: None,
    },
    ConfigOption {
        key: "claude.document_id",
        description: "Id of the last pushed project document",
        default: "",
        validate: None,
    },
    ConfigOption {
        key: LINE_NUMBERS_KEY,
        description: "Prefix file contents with line numbers",
        default: "false",
        validate: Some(validate_bool),
    },
    ConfigOption {
        key: FOLLOW_SYMLINKS_KEY,
        description: "Follow symbolic links during traversal",
        default: "false",
        validate: Some(validate_bool),
    },
];

pub fn handle_config_command(action: &ConfigAction) -> Result<()> {
    let mut store = ConfigStore::new(Path::new("."))?;

    match action {
        ConfigAction::List => {
            for option in OPTIONS {
                println!("{}", option.key.bold());
                println!("  {}", option.description);
                match store.get(option.key) {
                    Some(value) => println!("  current: {}", value),
                    None if !option.default.is_empty() => {
                        println!("  default: {}", option.default)
                    }
                    None => println!("  {}", "unset".dimmed()),
                }
            }
        }
        ConfigAction::Get { key } => {
            lookup(key)?;
            match store.get(key) {
                Some(value) => println!("{}", value),
                None => println!("{}", "unset".dimmed()),
            }
        }
        ConfigAction::Set { key, value } => {
            let option = lookup(key)?;
            if let Some(validate) = option.validate {
                validate(value)?;
            }
            store.set(key, value)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Unset { key } => {
            lookup(key)?;
            store.delete(key)?;
            println!("Unset {}", key);
        }
    }
    Ok(())
}

fn lookup(key: &str) -> Result<&'static ConfigOption> {
    match OPTIONS.iter().find(|o| o.key == key) {
        Some(option) => Ok(option),
        None => bail!("Unknown config key '{}'. See 'sandworm config list'.", key),
    }
}

fn validate_bool(value: &str) -> Result<()> {
    match value {
        "true" | "false" => Ok(()),
        other => bail!("Expected 'true' or 'false', got '{}'", other),
    }
}
