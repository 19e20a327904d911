// Section and field tables
pub mod section;

// Edit options
pub mod config;

// Tokenizer with byte offsets
pub mod token;

// Line classification
pub mod classify;

// Span replacement
pub mod edit;

// File operations module
pub mod file;

// Whole-file rewrite
pub mod rewrite;

// JSON output module
pub mod json;

// Re-exports
pub use section::{Field, FieldError, Section, resolve_field};
pub use config::{EditOptions, SpanMode};
pub use token::{FieldSpan, MARKER, Token, Tokens, field_span, field_token, tokenize};
pub use classify::{Classifier, GroupPosition, LineKind, classify_line};
pub use edit::{EditError, FieldEdit, replace_span, validate_value};
pub use file::{FileContent, FileError, Line, LineEnding, join_lines, read_lines, split_lines, write_atomic};
pub use rewrite::{EditSummary, Rewrite, RunError, RunOptions, edit_file, rewrite_lines, verify_checksum};
pub use json::{EditResponse, generate_execution_id};
