//! Resolution of effective processor options from CLI flags, the config
//! store and compiled-in defaults.

use crate::cli_args::SharedOpts;
use sandworm_core::ConfigStore;
use std::path::PathBuf;

pub const LINE_NUMBERS_KEY: &str = "processor.print_line_numbers";
pub const FOLLOW_SYMLINKS_KEY: &str = "processor.follow_symlinks";

/// Which command the options are being resolved for; the default output
/// name differs (generate produces a stable name, push a throwaway
/// timestamped one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Generate,
    Push,
}

#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub directory: PathBuf,
    pub output_file: PathBuf,
    pub ignore_file: Option<PathBuf>,
    pub keep_file: bool,
    pub show_line_numbers: bool,
    pub follow_symlinks: bool,
}

pub fn resolve(
    directory: Option<PathBuf>,
    shared: &SharedOpts,
    store: &ConfigStore,
    command: CommandKind,
) -> ResolvedOptions {
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));

    let output_file = shared.output.clone().unwrap_or_else(|| match command {
        CommandKind::Generate => PathBuf::from("sandworm.txt"),
        CommandKind::Push => {
            PathBuf::from(format!(".sandworm-{}.txt", chrono::Utc::now().timestamp()))
        }
    });

    // Generate always keeps its artifact; push only with --keep.
    let keep_file = match command {
        CommandKind::Generate => true,
        CommandKind::Push => shared.keep,
    };

    let options = ResolvedOptions {
        directory,
        output_file,
        ignore_file: shared.ignore.clone(),
        keep_file,
        show_line_numbers: resolve_flag(shared.line_numbers(), store, LINE_NUMBERS_KEY, false),
        follow_symlinks: resolve_flag(shared.follow_symlinks(), store, FOLLOW_SYMLINKS_KEY, false),
    };
    log::debug!("Resolved options: {:?}", options);
    options
}

/// Three-tier resolution: explicit flag, then stored config value, then the
/// compiled-in default.
fn resolve_flag(explicit: Option<bool>, store: &ConfigStore, key: &str, default: bool) -> bool {
    match explicit {
        Some(value) => value,
        None => store.get(key).map(|v| v == "true").unwrap_or(default),
    }
}
