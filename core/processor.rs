//! Document assembly: walks the project, renders the structure section and
//! streams file contents into a single output document.

use crate::error::{AppError, Result};
use crate::filetree;
use crate::patterns::PatternMatcher;
use crate::walker::{self, FileEntry};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Delimiter line between file blocks: 80 `=` characters.
pub const SEPARATOR: &str =
    "================================================================================";

/// Options resolved by the caller (CLI flags layered over stored config).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorOptions {
    pub show_line_numbers: bool,
    pub follow_symlinks: bool,
}

/// Concatenates a project's text files into a single document with a
/// directory-tree header and per-file separators. Owns no state beyond one
/// invocation: the matcher is built once in `new` and read-only afterwards.
pub struct Processor {
    root_dir: PathBuf,
    output_file: PathBuf,
    matcher: PatternMatcher,
    options: ProcessorOptions,
}

impl Processor {
    pub fn new(
        root_dir: &Path,
        output_file: &Path,
        ignore_file: Option<&Path>,
        options: ProcessorOptions,
    ) -> Result<Self> {
        if !root_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Invalid root directory: {}",
                root_dir.display()
            )));
        }

        let matcher = PatternMatcher::new(root_dir, ignore_file, output_file)?;
        Ok(Processor {
            root_dir: root_dir.to_path_buf(),
            output_file: output_file.to_path_buf(),
            matcher,
            options,
        })
    }

    /// Produces the concatenated document and returns its final byte size.
    /// On any mid-assembly failure the partially written output file is
    /// removed, since a partial document would misrepresent the project.
    pub fn process(&self) -> Result<u64> {
        let files = walker::walk(&self.root_dir, &self.matcher, self.options.follow_symlinks)?;
        log::info!(
            "Assembling {} files into {}",
            files.len(),
            self.output_file.display()
        );

        let out = File::create(&self.output_file).map_err(|source| AppError::FileWrite {
            path: self.output_file.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(out);

        let result = self.write_document(&mut writer, &files).and_then(|_| {
            writer.flush().map_err(|source| AppError::FileWrite {
                path: self.output_file.clone(),
                source,
            })
        });

        match result {
            Ok(()) => {
                let size = writer.get_ref().metadata()?.len();
                log::info!("Assembly complete ({} bytes)", size);
                Ok(size)
            }
            Err(err) => {
                drop(writer);
                let _ = fs::remove_file(&self.output_file);
                Err(err)
            }
        }
    }

    fn write_document(&self, w: &mut impl Write, files: &[FileEntry]) -> Result<()> {
        self.write_structure(w, files)
            .map_err(|source| AppError::FileWrite {
                path: self.output_file.clone(),
                source,
            })?;
        self.write_contents(w, files)
    }

    fn write_structure(&self, w: &mut impl Write, files: &[FileEntry]) -> io::Result<()> {
        w.write_all(b"PROJECT STRUCTURE:\n==================\n\n")?;

        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        w.write_all(filetree::render(&paths, "").as_bytes())?;

        w.write_all(b"\n\nFILE CONTENTS:\n==============\n\n")
    }

    fn write_contents(&self, w: &mut impl Write, files: &[FileEntry]) -> Result<()> {
        for file in files {
            // The file passed the existence check during the walk, so losing
            // it here aborts the whole assembly rather than silently
            // producing an incomplete document.
            let content =
                fs::read(&file.read_path).map_err(|source| AppError::FileRead {
                    path: file.read_path.clone(),
                    source,
                })?;

            self.write_file_block(w, &file.relative_path, &content)
                .map_err(|source| AppError::FileWrite {
                    path: self.output_file.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn write_file_block(&self, w: &mut impl Write, relative_path: &str, content: &[u8]) -> io::Result<()> {
        write!(w, "{SEPARATOR}\nFILE: {relative_path}\n{SEPARATOR}\n")?;

        if self.options.show_line_numbers {
            write_with_line_numbers(w, content)?;
        } else {
            w.write_all(content)?;
        }

        w.write_all(b"\n")
    }
}

/// Renders content as `"<n>: <line>\n"` with line numbers right-justified to
/// the digit width of the total line count. Splitting on `\n` means a file
/// with a trailing newline gets a numbered empty final line.
fn write_with_line_numbers(w: &mut impl Write, content: &[u8]) -> io::Result<()> {
    let text = String::from_utf8_lossy(content);
    let lines: Vec<&str> = text.split('\n').collect();
    let width = lines.len().to_string().len();

    for (i, line) in lines.iter().enumerate() {
        writeln!(w, "{:>width$}: {}", i + 1, line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_file(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn run(root: &Path, ignore_file: Option<&Path>, options: ProcessorOptions) -> (u64, String) {
        let output = root.join("output.txt");
        let processor = Processor::new(root, &output, ignore_file, options).unwrap();
        let size = processor.process().unwrap();
        let content = fs::read_to_string(&output).unwrap();
        (size, content)
    }

    #[test]
    fn basic_file_processing() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "file1.txt", "Content 1");
        create_file(dir.path(), "dir1/file2.txt", "Content 2");

        let (size, output) = run(dir.path(), None, ProcessorOptions::default());

        assert!(size > 0);
        assert_eq!(
            size,
            fs::metadata(dir.path().join("output.txt")).unwrap().len()
        );
        assert!(output.contains("PROJECT STRUCTURE:\n==================\n"));
        assert!(output.contains("FILE CONTENTS:\n==============\n"));
        assert!(output.contains(&format!("{SEPARATOR}\nFILE: file1.txt\n{SEPARATOR}\n")));
        assert!(output.contains("Content 1"));
        assert!(output.contains("Content 2"));
    }

    #[test]
    fn gitignore_rules_are_honored() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), ".gitignore", "*.log\n/tmp/\n");
        create_file(dir.path(), "test.log", "Should be ignored");
        create_file(dir.path(), "tmp/ignore.txt", "Should be ignored");
        create_file(dir.path(), "keep.txt", "Should be kept");

        let gitignore = dir.path().join(".gitignore");
        let (_, output) = run(dir.path(), Some(&gitignore), ProcessorOptions::default());

        assert!(!output.contains("Should be ignored"));
        assert!(output.contains("Should be kept"));
    }

    #[test]
    fn binary_extensions_are_excluded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("binary.bin"), [0xFFu8, 0x00, 0xFF, 0x00]).unwrap();
        create_file(dir.path(), "text.txt", "Regular text file");

        let (_, output) = run(dir.path(), None, ProcessorOptions::default());

        assert!(!output.contains("binary.bin"));
        assert!(output.contains("Regular text file"));
    }

    #[test]
    fn custom_ignore_file() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "custom.ignore", "*.skip\n");
        create_file(dir.path(), "test.skip", "Should be ignored");
        create_file(dir.path(), "keep.txt", "Should be kept");

        let custom = dir.path().join("custom.ignore");
        let (_, output) = run(dir.path(), Some(&custom), ProcessorOptions::default());

        assert!(!output.contains("Should be ignored"));
        assert!(output.contains("Should be kept"));
    }

    #[test]
    fn builtin_ignore_patterns_apply_by_default() {
        let dir = TempDir::new().unwrap();
        let ignored = [
            ".sandworm",
            ".sandwormignore",
            ".sandworm-123456.txt",
            ".gitignore",
            "CHANGELOG.md",
            "LICENSE",
            "package-lock.json",
            "error.log",
        ];
        for file in ignored {
            create_file(dir.path(), file, "This should be ignored");
        }
        let included = ["main.go", "README.md", "config.json", "src/app.js"];
        for file in included {
            create_file(dir.path(), file, "This should be included");
        }

        let (_, output) = run(dir.path(), None, ProcessorOptions::default());

        for file in ignored {
            assert!(!output.contains(file), "found ignored file: {}", file);
        }
        for file in included {
            assert!(output.contains(file), "missing expected file: {}", file);
        }
    }

    #[test]
    fn line_numbers_use_consistent_padding() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "three.txt", "alpha\nbeta\ngamma");

        let options = ProcessorOptions {
            show_line_numbers: true,
            ..Default::default()
        };
        let (_, output) = run(dir.path(), None, options);

        assert!(output.contains("1: alpha\n2: beta\n3: gamma\n"));
    }

    #[test]
    fn line_number_width_grows_with_line_count() {
        let dir = TempDir::new().unwrap();
        let content: Vec<String> = (1..=12).map(|i| format!("line {}", i)).collect();
        create_file(dir.path(), "many.txt", &content.join("\n"));

        let options = ProcessorOptions {
            show_line_numbers: true,
            ..Default::default()
        };
        let (_, output) = run(dir.path(), None, options);

        assert!(output.contains(" 1: line 1\n"));
        assert!(output.contains("12: line 12\n"));
    }

    #[test]
    fn reruns_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "a.txt", "alpha");
        create_file(dir.path(), "b/c.txt", "gamma");

        let (size1, first) = run(dir.path(), None, ProcessorOptions::default());
        let (size2, second) = run(dir.path(), None, ProcessorOptions::default());

        assert_eq!(size1, size2);
        assert_eq!(first, second);
    }

    #[test]
    fn output_file_never_includes_itself() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "a.txt", "alpha");

        // The second run sees the first run's output sitting under root.
        let (_, _) = run(dir.path(), None, ProcessorOptions::default());
        let (_, output) = run(dir.path(), None, ProcessorOptions::default());

        assert!(!output.contains("FILE: output.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn read_failure_removes_partial_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "a.txt", "readable");
        create_file(dir.path(), "unreadable.txt", "hidden");
        fs::set_permissions(
            dir.path().join("unreadable.txt"),
            fs::Permissions::from_mode(0o000),
        )
        .unwrap();
        if fs::read(dir.path().join("unreadable.txt")).is_ok() {
            // Permission bits are not enforced for this user (e.g. root).
            return;
        }

        let output = dir.path().join("output.txt");
        let processor =
            Processor::new(dir.path(), &output, None, ProcessorOptions::default()).unwrap();
        let result = processor.process();

        assert!(matches!(result, Err(AppError::FileRead { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn invalid_root_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let result = Processor::new(
            &missing,
            &dir.path().join("out.txt"),
            None,
            ProcessorOptions::default(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
