use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::config::EditOptions;

/// Field names of a node record, with their 1-based position after the marker
const NODES_FIELDS: &[(&str, usize)] = &[
    ("NodeNo", 1),
    ("X", 2),
    ("Y", 3),
    ("Size", 4),
    ("NodeType", 5),
    ("PrintFlag", 6),
    ("DownstreamNode", 7),
    ("Name", 8),
    ("Area", 9),
    ("Imp1", 10),
];

/// Field names of a reach header line, with their 1-based position after the marker
const REACHES_FIELDS: &[(&str, usize)] = &[
    ("ReachNo", 1),
    ("ReachName", 2),
    ("FromNode", 3),
    ("ToNode", 4),
    ("TransFlag", 5),
    ("ReachType", 6),
    ("PrintFlag", 7),
    ("Length", 8),
    ("SlopeOrTrans", 9),
    ("Ncoords", 10),
    ("Reserved", 11),
];

/// Editable sections of a catchment file
///
/// Each section has its own field table and its own rule for telling
/// record lines apart from the rest of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    /// `C #NODES` block, one record line per node
    Nodes,
    /// `C #REACHES` block, a header line followed by x and y coordinate lines
    Reaches,
}

impl Section {
    /// Name as written in the section header (without the leading `#`)
    pub fn name(&self) -> &'static str {
        match self {
            Section::Nodes => "NODES",
            Section::Reaches => "REACHES",
        }
    }

    /// Field table of this section, in column order
    pub fn fields(&self) -> &'static [(&'static str, usize)] {
        match self {
            Section::Nodes => NODES_FIELDS,
            Section::Reaches => REACHES_FIELDS,
        }
    }

    /// Comma-separated field names, used in error messages and `--help`
    pub fn field_names(&self) -> String {
        self.fields()
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Section announced by a header token such as `#REACHES`
    ///
    /// Header tokens are matched exactly; unknown headers yield `None`.
    pub fn from_header(token: &str) -> Option<Section> {
        match token.strip_prefix('#')? {
            "NODES" => Some(Section::Nodes),
            "REACHES" => Some(Section::Reaches),
            _ => None,
        }
    }

    /// Parse a section name given on the command line
    ///
    /// `NODES`/`REACHES` and their all-lowercase forms are always accepted.
    /// Any other casing is accepted only with `ignore_case`.
    pub fn parse(name: &str, ignore_case: bool) -> Result<Section, FieldError> {
        for section in [Section::Nodes, Section::Reaches] {
            let canonical = section.name();
            let matches = name == canonical
                || name == canonical.to_ascii_lowercase()
                || (ignore_case && name.eq_ignore_ascii_case(canonical));
            if matches {
                return Ok(section);
            }
        }
        Err(FieldError::InvalidSection {
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Section {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::parse(s, false)
    }
}

/// A field resolved to its token position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name, or `#N` when the field was given as a raw index
    pub label: String,
    /// 1-based token index counted after the marker
    pub index: usize,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.label.starts_with('#') {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{} (#{})", self.label, self.index)
        }
    }
}

/// Errors raised while resolving a section or a field identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Invalid section: {name}. Must be NODES or REACHES")]
    InvalidSection { name: String },

    #[error("Unknown {section} field: {field}. Valid fields: {valid}")]
    UnknownField {
        section: Section,
        field: String,
        valid: String,
    },

    #[error("Token index must be >= 1, got {field}")]
    ZeroFieldIndex { field: String },
}

/// Resolve a field name or 1-based index to a token position
///
/// Identifiers made only of ASCII digits are taken as indices; everything
/// else is looked up in the section's field table.
///
/// # Examples
/// ```
/// use catg_edit::{EditOptions, Section, resolve_field};
/// let opts = EditOptions::default();
/// assert_eq!(resolve_field(Section::Nodes, "PrintFlag", &opts).unwrap().index, 6);
/// assert_eq!(resolve_field(Section::Reaches, "PrintFlag", &opts).unwrap().index, 7);
/// assert_eq!(resolve_field(Section::Nodes, "9", &opts).unwrap().index, 9);
/// ```
pub fn resolve_field(
    section: Section,
    identifier: &str,
    options: &EditOptions,
) -> Result<Field, FieldError> {
    if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
        // Overlong digit strings can never be reached on a real line either way
        let index = identifier.parse::<usize>().unwrap_or(usize::MAX);
        if index == 0 {
            return Err(FieldError::ZeroFieldIndex {
                field: identifier.to_string(),
            });
        }
        return Ok(Field {
            label: format!("#{}", index),
            index,
        });
    }

    let found = section.fields().iter().find(|(name, _)| {
        if options.ignore_case {
            name.eq_ignore_ascii_case(identifier)
        } else {
            *name == identifier
        }
    });

    match found {
        Some((name, index)) => Ok(Field {
            label: (*name).to_string(),
            index: *index,
        }),
        None => Err(FieldError::UnknownField {
            section,
            field: identifier.to_string(),
            valid: section.field_names(),
        }),
    }
}
