pub mod config;
pub mod error;
pub mod filetree;
pub mod patterns;
pub mod processor;
pub mod util;
pub mod walker;

pub use config::{ConfigStore, PROJECT_CONFIG_FILE};
pub use error::{AppError, Result};
pub use patterns::{IgnoreRule, PatternMatcher, RuleSource, GIT_IGNORE_FILE, SANDWORM_IGNORE_FILE};
pub use processor::{Processor, ProcessorOptions, SEPARATOR};
pub use util::format_size;
pub use walker::{FileEntry, walk};
