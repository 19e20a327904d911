use thiserror::Error;

use crate::config::EditOptions;
use crate::section::{Field, FieldError, Section, resolve_field};
use crate::token::FieldSpan;

/// A single-field edit, validated before any line is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    /// Section whose records are edited
    pub section: Section,
    /// Resolved target field
    pub field: Field,
    /// Replacement value, free of whitespace
    pub value: String,
    pub options: EditOptions,
}

impl FieldEdit {
    /// Resolve the field and validate the value
    ///
    /// # Arguments
    /// * `section` - Section to edit
    /// * `field` - Field name or 1-based token index
    /// * `value` - New value, which must not contain whitespace
    /// * `options` - Span and case handling
    pub fn new(
        section: Section,
        field: &str,
        value: &str,
        options: EditOptions,
    ) -> Result<FieldEdit, EditError> {
        validate_value(value)?;
        let field = resolve_field(section, field, &options)?;
        Ok(FieldEdit {
            section,
            field,
            value: value.to_string(),
            options,
        })
    }
}

/// Error types for edit operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Value cannot contain whitespace: {value:?}")]
    InvalidValue { value: String },

    #[error(
        "New value '{value}' (length {}) doesn't fit field {field}: available width {width}",
        .value.len()
    )]
    ValueTooLong {
        field: String,
        value: String,
        width: usize,
    },

    #[error("Too few tokens for field {field}: need {needed} after the marker, found {found}")]
    TooFewTokens {
        field: String,
        needed: usize,
        found: usize,
    },

    #[error("Span {start}..{end} out of bounds (line length: {line_len})")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        line_len: usize,
    },
}

/// Reject empty values and values containing any whitespace
pub fn validate_value(value: &str) -> Result<(), EditError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace()) {
        return Err(EditError::InvalidValue {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Replace a field's span, padding the value with blanks to the span width
///
/// The returned line has the same length as `line`, and every byte outside
/// the span is unchanged.
///
/// # Example
/// ```
/// use catg_edit::{FieldSpan, replace_span};
/// let line = "C  1 0.50 7";
/// let span = FieldSpan { start: 5, end: 9 };
/// assert_eq!(replace_span(line, span, "2", "Size").unwrap(), "C  1 2    7");
/// ```
pub fn replace_span(
    line: &str,
    span: FieldSpan,
    value: &str,
    field: &str,
) -> Result<String, EditError> {
    if span.end < span.start
        || span.end > line.len()
        || !line.is_char_boundary(span.start)
        || !line.is_char_boundary(span.end)
    {
        return Err(EditError::SpanOutOfBounds {
            start: span.start,
            end: span.end,
            line_len: line.len(),
        });
    }

    let width = span.width();
    if value.len() > width {
        return Err(EditError::ValueTooLong {
            field: field.to_string(),
            value: value.to_string(),
            width,
        });
    }

    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..span.start]);
    out.push_str(value);
    // Pad by bytes, not chars, so the line length never moves
    out.extend(std::iter::repeat_n(' ', width - value.len()));
    out.push_str(&line[span.end..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpanMode;
    use crate::token::{field_span, field_token};

    const NODE_LINE: &str =
        "C      1         56.617         40.580          1.000 1 0     2 A";

    fn token_span(line: &str, index: usize) -> FieldSpan {
        let token = field_token(line, index).unwrap();
        field_span(line, &token, SpanMode::Token)
    }

    #[test]
    fn test_replace_print_flag() {
        let span = token_span(NODE_LINE, 6);
        let out = replace_span(NODE_LINE, span, "1", "PrintFlag").unwrap();
        assert_eq!(
            out,
            "C      1         56.617         40.580          1.000 1 1     2 A"
        );
        assert_eq!(out.len(), NODE_LINE.len());
    }

    #[test]
    fn test_replace_pads_shorter_value() {
        let span = token_span(NODE_LINE, 2);
        let out = replace_span(NODE_LINE, span, "5.5", "X").unwrap();
        assert_eq!(
            out,
            "C      1         5.5            40.580          1.000 1 0     2 A"
        );
        assert_eq!(out.len(), NODE_LINE.len());
    }

    #[test]
    fn test_replace_value_too_long() {
        let span = token_span(NODE_LINE, 6);
        let result = replace_span(NODE_LINE, span, "12345", "PrintFlag");
        assert_eq!(
            result,
            Err(EditError::ValueTooLong {
                field: "PrintFlag".to_string(),
                value: "12345".to_string(),
                width: 1,
            })
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("available width 1"), "{}", message);
    }

    #[test]
    fn test_replace_same_value_is_noop() {
        let span = token_span(NODE_LINE, 3);
        let out = replace_span(NODE_LINE, span, "40.580", "Y").unwrap();
        assert_eq!(out, NODE_LINE);
    }

    #[test]
    fn test_replace_column_span_allows_wider_value() {
        let token = field_token(NODE_LINE, 6).unwrap();
        let span = field_span(NODE_LINE, &token, SpanMode::Column);
        let out = replace_span(NODE_LINE, span, "12345", "PrintFlag").unwrap();
        assert_eq!(
            out,
            "C      1         56.617         40.580          1.000 1 12345 2 A"
        );
        assert!(replace_span(NODE_LINE, span, "123456", "PrintFlag").is_err());
    }

    #[test]
    fn test_replace_out_of_bounds() {
        let span = FieldSpan { start: 3, end: 99 };
        assert!(matches!(
            replace_span("C 1", span, "x", "NodeNo"),
            Err(EditError::SpanOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value("1").is_ok());
        assert!(validate_value("A-12.5").is_ok());
        assert_eq!(
            validate_value("1 2"),
            Err(EditError::InvalidValue {
                value: "1 2".to_string()
            })
        );
        assert!(validate_value("1\t2").is_err());
        assert!(validate_value("").is_err());
    }

    #[test]
    fn test_field_edit_new() {
        let edit = FieldEdit::new(Section::Nodes, "PrintFlag", "1", EditOptions::default()).unwrap();
        assert_eq!(edit.field.index, 6);
        assert_eq!(edit.value, "1");

        let err = FieldEdit::new(Section::Nodes, "NotAField", "1", EditOptions::default())
            .unwrap_err();
        assert!(matches!(err, EditError::Field(FieldError::UnknownField { .. })));
    }

    #[test]
    fn test_field_edit_checks_value_first() {
        let err = FieldEdit::new(Section::Nodes, "NotAField", "1 2", EditOptions::default())
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidValue { .. }));
    }
}
