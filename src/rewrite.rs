use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::classify::{Classifier, LineKind};
use crate::edit::{EditError, FieldEdit, replace_span};
use crate::file::{FileContent, FileError, Line, checksum, join_lines, read_lines, write_atomic};
use crate::section::{FieldError, Section};
use crate::token::{field_span, field_token, field_tokens};

/// Longest slice of an offending line quoted in error messages
const PREVIEW_CHARS: usize = 80;

/// Errors that end a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("line {line}: {source}\n  Line: {preview}")]
    Line {
        line: usize,
        preview: String,
        source: EditError,
    },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl From<FieldError> for RunError {
    fn from(err: FieldError) -> Self {
        RunError::Edit(EditError::Field(err))
    }
}

impl RunError {
    /// Process exit code for this failure
    ///
    /// 1 for input/output problems, 2 for rejected arguments, 3 for a
    /// record line the edit cannot be applied to.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::File(_) | RunError::ChecksumMismatch { .. } => 1,
            RunError::Edit(_) => 2,
            RunError::Line { .. } => 3,
        }
    }
}

/// Lines after an edit, with counters
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub lines: Vec<Line>,
    /// Record lines whose content changed
    pub modified: usize,
    /// Record lines of the target section seen
    pub records: usize,
    /// Whether the target section header was seen at all
    pub section_found: bool,
}

fn preview(content: &str) -> String {
    let cut: String = content.chars().take(PREVIEW_CHARS).collect();
    if cut.len() < content.len() {
        format!("{}...", cut)
    } else {
        cut
    }
}

/// Apply an edit to every record line of its section
///
/// Lines are classified in order so REACHES coordinate lines are known by
/// their position in the group. Everything that is not a record of the
/// target section is copied as is. The first line that cannot take the
/// edit aborts the whole rewrite.
pub fn rewrite_lines(lines: &[Line], edit: &FieldEdit) -> Result<Rewrite, RunError> {
    let mut classifier = Classifier::new();
    let mut out = Vec::with_capacity(lines.len());
    let mut modified = 0;
    let mut records = 0;
    let mut section_found = false;
    let label = edit.field.to_string();

    for (idx, line) in lines.iter().enumerate() {
        let kind = classifier.classify(&line.content);
        if kind == LineKind::SectionHeader && classifier.section() == Some(edit.section) {
            section_found = true;
        }

        let in_target = classifier.section() == Some(edit.section);
        if kind != LineKind::Record || !in_target {
            out.push(line.clone());
            continue;
        }
        records += 1;

        let line_error = |source: EditError| RunError::Line {
            line: idx + 1,
            preview: preview(&line.content),
            source,
        };

        let token = field_token(&line.content, edit.field.index).ok_or_else(|| {
            line_error(EditError::TooFewTokens {
                field: label.clone(),
                needed: edit.field.index,
                found: field_tokens(&line.content).count(),
            })
        })?;
        let span = field_span(&line.content, &token, edit.options.span_mode);
        let content =
            replace_span(&line.content, span, &edit.value, &label).map_err(line_error)?;

        if content != line.content {
            modified += 1;
            debug!(
                "line {}: {} '{}' -> '{}'",
                idx + 1,
                label,
                token.text,
                edit.value
            );
        }
        out.push(Line {
            content,
            ending: line.ending,
        });
    }

    Ok(Rewrite {
        lines: out,
        modified,
        records,
        section_found,
    })
}

/// What a completed run did
#[derive(Debug, Clone, Serialize)]
pub struct EditSummary {
    pub section: Section,
    pub field: String,
    pub token_index: usize,
    pub value: String,
    /// Record lines whose content changed
    pub modified_count: usize,
    /// Record lines of the section that were visited
    pub record_count: usize,
    pub line_count: usize,
    /// `crlf`, `lf`, `mixed`, or `none`
    pub line_ending: String,
    pub input_checksum: String,
    pub output_checksum: String,
    /// Where the result was written, `None` on a dry run
    pub output_path: Option<String>,
}

/// Options of a whole-file run that do not affect line rewriting
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Required BLAKE3 checksum of the input
    pub expected_checksum: Option<String>,
    /// Compute everything but write nothing
    pub dry_run: bool,
}

/// Verify that file content matches the expected checksum
pub fn verify_checksum(file: &FileContent, expected: &str) -> Result<(), RunError> {
    if file.checksum.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(RunError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: file.checksum.clone(),
        })
    }
}

/// Read `input`, apply the edit, and write the result to `output`
///
/// Nothing is written unless every line was rewritten successfully, and the
/// output is replaced atomically.
pub fn edit_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    edit: &FieldEdit,
    run: &RunOptions,
) -> Result<EditSummary, RunError> {
    // Read the input with its line endings
    let file = read_lines(input.as_ref())?;
    info!(
        "Read {} lines ({} bytes, {} endings) from {}",
        file.lines.len(),
        file.len,
        file.line_ending_style(),
        file.path
    );

    // Verify checksum matches
    if let Some(expected) = &run.expected_checksum {
        verify_checksum(&file, expected)?;
    }

    // Rewrite every line in memory before touching the output
    let rewrite = rewrite_lines(&file.lines, edit)?;
    if !rewrite.section_found {
        warn!("No #{} section found in {}", edit.section, file.path);
    } else if rewrite.modified == 0 {
        warn!(
            "No {} record changed; {} already holds '{}' everywhere",
            edit.section, edit.field, edit.value
        );
    }

    // Write the result, unless this is a dry run
    let text = join_lines(&rewrite.lines);
    let output_path = if run.dry_run {
        info!("Dry run, nothing written");
        None
    } else {
        write_atomic(output.as_ref(), &text)?;
        let path = output.as_ref().display().to_string();
        info!("Wrote {} bytes to {}", text.len(), path);
        Some(path)
    };

    // Build summary
    Ok(EditSummary {
        section: edit.section,
        field: edit.field.label.clone(),
        token_index: edit.field.index,
        value: edit.value.clone(),
        modified_count: rewrite.modified,
        record_count: rewrite.records,
        line_count: rewrite.lines.len(),
        line_ending: file.line_ending_style().to_string(),
        input_checksum: file.checksum.clone(),
        output_checksum: checksum(text.as_bytes()),
        output_path,
    })
}
