use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Terminator that ended a line in the original file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\r\n`
    CrLf,
    /// `\n`
    Lf,
    /// Last line of a file without a trailing newline
    None,
}

impl LineEnding {
    /// The terminator bytes as written in the file
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
            LineEnding::None => "",
        }
    }
}

/// One line of content with its original terminator kept apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: String,
    pub ending: LineEnding,
}

/// Content of a file read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path the file was read from
    pub path: String,
    /// Lines in file order
    pub lines: Vec<Line>,
    /// Byte length of the content
    pub len: usize,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

impl FileContent {
    /// Describe the terminators used: `crlf`, `lf`, `mixed`, or `none`
    pub fn line_ending_style(&self) -> &'static str {
        let crlf = self.lines.iter().any(|l| l.ending == LineEnding::CrLf);
        let lf = self.lines.iter().any(|l| l.ending == LineEnding::Lf);
        match (crlf, lf) {
            (true, true) => "mixed",
            (true, false) => "crlf",
            (false, true) => "lf",
            (false, false) => "none",
        }
    }
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// BLAKE3 hex digest of some content
pub fn checksum(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Split text into lines, keeping each line's terminator
///
/// Only `\n` ends a line; a `\r` directly before it makes the ending CRLF.
/// Text after the last newline becomes a final line with no terminator.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        let (content, ending) = match rest[..pos].strip_suffix('\r') {
            Some(content) => (content, LineEnding::CrLf),
            None => (&rest[..pos], LineEnding::Lf),
        };
        lines.push(Line {
            content: content.to_string(),
            ending,
        });
        rest = &rest[pos + 1..];
    }
    if !rest.is_empty() {
        lines.push(Line {
            content: rest.to_string(),
            ending: LineEnding::None,
        });
    }
    lines
}

/// Join lines back with their own terminators
pub fn join_lines(lines: &[Line]) -> String {
    let len = lines
        .iter()
        .map(|l| l.content.len() + l.ending.as_str().len())
        .sum();
    let mut out = String::with_capacity(len);
    for line in lines {
        out.push_str(&line.content);
        out.push_str(line.ending.as_str());
    }
    out
}

/// Read a file from disk with UTF-8 validation and split it into lines
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(FileContent)` - Lines with metadata
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path_ref = path.as_ref();
    let display = path_ref.display().to_string();

    // Check if file exists
    if !path_ref.exists() {
        return Err(FileError::NotFound(display));
    }

    // Read raw bytes
    let bytes = fs::read(path_ref).map_err(|source| FileError::Io {
        path: display.clone(),
        source,
    })?;
    let len = bytes.len();

    // Compute BLAKE3 checksum over the bytes as stored
    let checksum = checksum(&bytes);

    // Validate UTF-8
    let text = String::from_utf8(bytes).map_err(|_| FileError::InvalidUtf8(display.clone()))?;

    Ok(FileContent {
        path: display,
        lines: split_lines(&text),
        len,
        checksum,
    })
}

/// Write content so the target either holds all of it or is left untouched
///
/// The content goes to a temporary file next to the target, which is then
/// renamed over it. The result keeps the permissions of the file it
/// replaces; a new file gets the permissions `fs::write` would give it.
pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<(), FileError> {
    let path_ref = path.as_ref();
    let display = path_ref.display().to_string();
    let io_err = |source: io::Error| FileError::Io {
        path: display.clone(),
        source,
    };

    let dir = match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Write the full content to a sibling temp file
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(content.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    // Temp files are owner-only; take the target's permissions instead
    let created = !path_ref.exists();
    if created {
        // An empty placeholder picks up the default mode under the umask
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path_ref)
            .map_err(io_err)?;
    }
    let result = fs::metadata(path_ref)
        .and_then(|meta| tmp.as_file().set_permissions(meta.permissions()))
        .and_then(|()| tmp.persist(path_ref).map(|_| ()).map_err(|e| e.error));

    // On failure drop the placeholder so no empty output is left behind
    if let Err(e) = result {
        if created {
            let _ = fs::remove_file(path_ref);
        }
        return Err(io_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_lines_lf() {
        let lines = split_lines("a\nb\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "a");
        assert_eq!(lines[0].ending, LineEnding::Lf);
        assert_eq!(lines[1].content, "b");
    }

    #[test]
    fn test_split_lines_crlf_and_missing_final_newline() {
        let lines = split_lines("a\r\nb\r\nc");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].ending, LineEnding::CrLf);
        assert_eq!(lines[1].ending, LineEnding::CrLf);
        assert_eq!(lines[2].content, "c");
        assert_eq!(lines[2].ending, LineEnding::None);
    }

    #[test]
    fn test_split_lines_keeps_empty_lines_and_mixed_endings() {
        let text = "x\n\r\n\ny\r\n";
        let lines = split_lines(text);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].content, "");
        assert_eq!(lines[1].ending, LineEnding::CrLf);
        assert_eq!(lines[2].ending, LineEnding::Lf);
        assert_eq!(join_lines(&lines), text);
    }

    #[test]
    fn test_split_lines_lone_cr_stays_in_content() {
        let lines = split_lines("a\rb\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, "a\rb");
    }

    #[test]
    fn test_join_lines_is_exact() {
        for text in ["", "\n", "\r\n", "a", "a\r\nb\r\n", "a\nb"] {
            assert_eq!(join_lines(&split_lines(text)), text);
        }
    }

    #[test]
    fn test_read_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("sample.catg");
        let content = "C #NODES\r\nC     1\r\n";
        fs::write(&file_path, content).unwrap();

        let file_content = read_lines(&file_path).unwrap();
        assert_eq!(file_content.lines.len(), 2);
        assert_eq!(file_content.len, content.len());
        assert_eq!(file_content.checksum, checksum(content.as_bytes()));
        assert_eq!(file_content.line_ending_style(), "crlf");
        assert!(file_content.checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_read_lines_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("bad.catg");
        fs::write(&file_path, [0xFF, 0xFE, 0xFD]).unwrap();

        match read_lines(&file_path) {
            Err(FileError::InvalidUtf8(p)) => assert_eq!(p, file_path.display().to_string()),
            other => panic!("Expected FileError::InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_read_lines_not_found() {
        let file_path = PathBuf::from("/nonexistent/path/that/does/not/exist.catg");
        match read_lines(&file_path) {
            Err(FileError::NotFound(p)) => assert!(p.contains("nonexistent")),
            other => panic!("Expected FileError::NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_line_ending_style() {
        let style = |text: &str| FileContent {
            path: String::new(),
            lines: split_lines(text),
            len: text.len(),
            checksum: String::new(),
        }
        .line_ending_style();
        assert_eq!(style("a\nb\n"), "lf");
        assert_eq!(style("a\r\nb\n"), "mixed");
        assert_eq!(style("a"), "none");
    }

    #[test]
    fn test_write_atomic_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.catg");
        fs::write(&target, "old").unwrap();

        write_atomic(&target, "new\r\n").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new\r\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.catg");
        fs::write(&target, "old").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&target, "new\n").unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read(&target).unwrap(), b"new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_gets_default_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference.catg");
        let target = dir.path().join("out.catg");
        fs::write(&reference, "x").unwrap();

        write_atomic(&target, "new\n").unwrap();
        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&target), mode(&reference));
        assert_eq!(fs::read(&target).unwrap(), b"new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
