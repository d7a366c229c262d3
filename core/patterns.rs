//! Layered ignore-pattern matching.
//!
//! Rules are collected in three stages (built-in denylist, effective ignore
//! file, output-file self-exclusion) and compiled into a single gitignore
//! matcher. Later rules override earlier ones, so an ignore file can negate
//! a built-in with `!pattern`.

use crate::error::{AppError, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Project-local ignore file looked up before falling back to `.gitignore`.
pub const SANDWORM_IGNORE_FILE: &str = ".sandwormignore";
pub const GIT_IGNORE_FILE: &str = ".gitignore";

/// Patterns for files that are typically committed but irrelevant to the
/// concatenated document: sandworm's own artifacts, VCS metadata, changelog
/// and license files, lockfiles, and common binary formats.
const BUILTIN_PATTERNS: &str = "\
# Non-binary files that are typically committed but irrelevant
# (logs, package lock files, etc.)
.sandworm
.sandwormignore
.sandworm*.txt
.git*
CHANGELOG*
*LICENSE*
*.lock
*-lock.json
*-lock.yaml
go.sum
*.log

# Image files
*.png
*.jpg
*.jpeg
*.gif
*.bmp
*.ico
*.webp

# Document files
*.pdf
*.doc
*.docx
*.xls
*.xlsx
*.ppt
*.pptx

# Archive files
*.zip
*.tar
*.gz
*.7z
*.rar

# Executable and library files
*.exe
*.dll
*.so
*.dylib

# Media files
*.mp3
*.mp4
*.avi
*.mov
*.wav

# Font files
*.ttf
*.otf
*.woff
*.woff2

# Generic binary files
*.bin
";

/// Which construction stage a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    Builtin,
    IgnoreFile,
    OutputFile,
}

/// A single parsed ignore rule. Immutable once constructed; kept alongside
/// the compiled matcher for logging and introspection.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub raw: String,
    pub negated: bool,
    pub anchored: bool,
    pub dir_only: bool,
    pub source: RuleSource,
}

impl IgnoreRule {
    fn parse(line: &str, source: RuleSource) -> Self {
        let mut pattern = line;
        let negated = pattern.starts_with('!');
        if negated {
            pattern = &pattern[1..];
        }
        let dir_only = pattern.ends_with('/');
        let pattern = pattern.trim_end_matches('/');
        // A slash anywhere except the end anchors the pattern to the root.
        let anchored = pattern.contains('/');

        IgnoreRule {
            raw: line.to_string(),
            negated,
            anchored,
            dir_only,
            source,
        }
    }
}

/// Ordered ignore rules compiled into one match predicate over
/// slash-normalized relative paths. Built once per run; read-only after.
#[derive(Debug)]
pub struct PatternMatcher {
    rules: Vec<IgnoreRule>,
    compiled: Gitignore,
}

impl PatternMatcher {
    /// Builds the matcher for `root`. When `ignore_file` is given, only that
    /// file's rules are used unless its basename is one of the conventional
    /// ignore-file names, in which case the built-in denylist still applies.
    /// Without an explicit file, `.sandwormignore` then `.gitignore` are
    /// tried under `root`, and built-ins always apply. The output file is
    /// appended as a final literal exclusion so a previous run's document is
    /// never swallowed into the next one.
    pub fn new(root: &Path, ignore_file: Option<&Path>, output_file: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let mut rules = Vec::new();

        let use_builtins = ignore_file.is_none_or(|path| {
            matches!(
                path.file_name().and_then(|n| n.to_str()),
                Some(name) if name == GIT_IGNORE_FILE || name == SANDWORM_IGNORE_FILE
            )
        });

        if use_builtins {
            add_lines(&mut builder, &mut rules, BUILTIN_PATTERNS, RuleSource::Builtin)?;
            log::debug!("Added {} built-in ignore rules", rules.len());
        } else {
            log::debug!("Custom ignore file supplied, skipping built-in rules");
        }

        // An explicitly requested ignore file must be readable; the
        // conventional lookups are optional.
        let contents = match ignore_file {
            Some(path) => Some(fs::read_to_string(path).map_err(|source| {
                AppError::IgnoreFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?),
            None => [SANDWORM_IGNORE_FILE, GIT_IGNORE_FILE]
                .iter()
                .find_map(|name| {
                    let candidate = root.join(name);
                    match fs::read_to_string(&candidate) {
                        Ok(data) => {
                            log::debug!("Using ignore file: {}", candidate.display());
                            Some(data)
                        }
                        Err(_) => None,
                    }
                }),
        };

        if let Some(contents) = contents {
            add_lines(&mut builder, &mut rules, &contents, RuleSource::IgnoreFile)?;
        }

        let output_rule = output_file_rule(root, output_file);
        log::trace!("Adding output self-exclusion rule: {}", output_rule);
        rules.push(IgnoreRule::parse(&output_rule, RuleSource::OutputFile));
        builder.add_line(None, &output_rule)?;

        let compiled = builder.build()?;
        log::debug!("Pattern matcher built with {} rules", rules.len());
        Ok(PatternMatcher { rules, compiled })
    }

    /// Returns true when `relative_path` (slash-normalized, relative to the
    /// matcher's root) or any of its ancestor directories is excluded by the
    /// last matching rule.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        self.compiled
            .matched_path_or_any_parents(relative_path, is_dir)
            .is_ignore()
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }
}

fn add_lines(
    builder: &mut GitignoreBuilder,
    rules: &mut Vec<IgnoreRule>,
    contents: &str,
    source: RuleSource,
) -> Result<()> {
    for line in contents.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        log::trace!("Adding ignore rule ({:?}): {}", source, line);
        rules.push(IgnoreRule::parse(line, source));
        builder.add_line(None, line)?;
    }
    Ok(())
}

/// Expresses the output path as a root-anchored literal pattern when it lies
/// under `root`, falling back to the raw path text otherwise.
fn output_file_rule(root: &Path, output_file: &Path) -> String {
    let relative = if output_file.is_absolute() {
        pathdiff::diff_paths(output_file, root)
    } else {
        Some(output_file.to_path_buf())
    };

    match relative {
        Some(rel) if !rel.starts_with("..") => {
            let segments: Vec<String> = rel
                .components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            format!("/{}", segments.join("/"))
        }
        _ => output_file.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn matcher_with(dir: &TempDir, ignore_file: Option<&Path>) -> PatternMatcher {
        PatternMatcher::new(dir.path(), ignore_file, Path::new("sandworm.txt")).unwrap()
    }

    #[test]
    fn builtin_denylist_excludes_common_noise() {
        let dir = TempDir::new().unwrap();
        let matcher = matcher_with(&dir, None);

        for path in [
            ".sandworm",
            ".sandwormignore",
            ".sandworm-123456.txt",
            ".gitignore",
            "CHANGELOG.md",
            "LICENSE",
            "MIT-LICENSE.txt",
            "go.sum",
            "package-lock.json",
            "Cargo.lock",
            "error.log",
            "assets/logo.png",
            "report.pdf",
            "release.zip",
            "lib/native.so",
            "intro.mp4",
            "fonts/mono.woff2",
            "blob.bin",
        ] {
            assert!(matcher.is_ignored(path, false), "expected {} ignored", path);
        }

        for path in ["main.go", "README.md", "config.json", "src/app.js"] {
            assert!(!matcher.is_ignored(path, false), "expected {} kept", path);
        }
    }

    #[test]
    fn last_matching_rule_wins_with_negation() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SANDWORM_IGNORE_FILE),
            "*.log\n!important.log\n",
        )
        .unwrap();
        let matcher = matcher_with(&dir, None);

        assert!(matcher.is_ignored("other.log", false));
        assert!(!matcher.is_ignored("important.log", false));
    }

    #[test]
    fn custom_ignore_file_disables_builtins() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("custom.ignore");
        fs::write(&custom, "*.skip\n").unwrap();
        let matcher = matcher_with(&dir, Some(&custom));

        assert!(matcher.is_ignored("test.skip", false));
        // Built-ins do not apply when a non-conventional file is supplied.
        assert!(!matcher.is_ignored("CHANGELOG.md", false));
    }

    #[test]
    fn conventional_ignore_file_keeps_builtins() {
        let dir = TempDir::new().unwrap();
        let gitignore = dir.path().join(GIT_IGNORE_FILE);
        fs::write(&gitignore, "*.skip\n").unwrap();
        let matcher = matcher_with(&dir, Some(&gitignore));

        assert!(matcher.is_ignored("test.skip", false));
        assert!(matcher.is_ignored("CHANGELOG.md", false));
    }

    #[test]
    fn sandwormignore_preferred_over_gitignore() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SANDWORM_IGNORE_FILE), "from_sandworm\n").unwrap();
        fs::write(dir.path().join(GIT_IGNORE_FILE), "from_git\n").unwrap();
        let matcher = matcher_with(&dir, None);

        assert!(matcher.is_ignored("from_sandworm", false));
        assert!(!matcher.is_ignored("from_git", false));
    }

    #[test]
    fn missing_explicit_ignore_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist.ignore");
        let result = PatternMatcher::new(dir.path(), Some(&missing), Path::new("out.txt"));
        assert!(matches!(result, Err(AppError::IgnoreFile { .. })));
    }

    #[test]
    fn output_file_is_self_excluded() {
        let dir = TempDir::new().unwrap();
        let matcher =
            PatternMatcher::new(dir.path(), None, Path::new("out/result.txt")).unwrap();

        assert!(matcher.is_ignored("out/result.txt", false));
        assert!(!matcher.is_ignored("out/other.txt", false));
    }

    #[test]
    fn directory_rule_excludes_contents() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SANDWORM_IGNORE_FILE), "build/\n").unwrap();
        let matcher = matcher_with(&dir, None);

        assert!(matcher.is_ignored("build", true));
        assert!(matcher.is_ignored("build/main.o", false));
        assert!(!matcher.is_ignored("src/build.rs", false));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SANDWORM_IGNORE_FILE),
            "# comment\n\n*.tmp\n",
        )
        .unwrap();
        let matcher = matcher_with(&dir, None);

        assert!(matcher.is_ignored("scratch.tmp", false));
        assert!(!matcher.is_ignored("# comment", false));
        let file_rules: Vec<_> = matcher
            .rules()
            .iter()
            .filter(|r| r.source == RuleSource::IgnoreFile)
            .collect();
        assert_eq!(file_rules.len(), 1);
        assert_eq!(file_rules[0].raw, "*.tmp");
    }

    #[test]
    fn rule_flags_are_parsed() {
        let rule = IgnoreRule::parse("!/src/generated/", RuleSource::IgnoreFile);
        assert!(rule.negated);
        assert!(rule.anchored);
        assert!(rule.dir_only);
        assert_eq!(rule.raw, "!/src/generated/");

        let rule = IgnoreRule::parse("*.log", RuleSource::Builtin);
        assert!(!rule.negated);
        assert!(!rule.anchored);
        assert!(!rule.dir_only);
    }
}
