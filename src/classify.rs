use crate::section::Section;
use crate::token::{field_tokens, has_marker};

/// What a line of a catchment file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Node record or reach header, carries named fields
    Record,
    /// x or y values following a reach header
    Coordinate,
    /// Declares how many records follow
    Count,
    /// `C #...` header opening a block
    SectionHeader,
    /// Anything else, passed through verbatim
    Other,
}

/// Position of a line within a REACHES record group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupPosition {
    /// Expecting a reach header (or a count line)
    #[default]
    Header,
    /// Expecting the x-values line
    XValues,
    /// Expecting the y-values line
    YValues,
}

impl GroupPosition {
    fn advance(self) -> GroupPosition {
        match self {
            GroupPosition::Header => GroupPosition::XValues,
            GroupPosition::XValues => GroupPosition::YValues,
            GroupPosition::YValues => GroupPosition::Header,
        }
    }
}

/// Section announced by a header line, if the line is one
///
/// Returns `Some(None)` for a header of a block that is not editable.
fn header_of(line: &str) -> Option<Option<Section>> {
    let first = field_tokens(line).next()?;
    if first.text.starts_with('#') {
        Some(Section::from_header(first.text))
    } else {
        None
    }
}

fn is_count_line(line: &str) -> bool {
    let mut tokens = field_tokens(line);
    match (tokens.next(), tokens.next()) {
        (Some(only), None) => only.text.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Classify one line given the section it sits in and its group position
///
/// Section headers are recognised anywhere. Inside REACHES, the second and
/// third line of a group are coordinates by position alone.
pub fn classify_line(line: &str, section: Option<Section>, position: GroupPosition) -> LineKind {
    if !has_marker(line) {
        return LineKind::Other;
    }
    if header_of(line).is_some() {
        return LineKind::SectionHeader;
    }
    let Some(section) = section else {
        return LineKind::Other;
    };
    if field_tokens(line).next().is_none() {
        return LineKind::Other;
    }

    match (section, position) {
        (Section::Reaches, GroupPosition::XValues | GroupPosition::YValues) => {
            LineKind::Coordinate
        }
        _ if is_count_line(line) => LineKind::Count,
        _ => LineKind::Record,
    }
}

/// Sequential classifier that carries section and group state across lines
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    section: Option<Section>,
    position: GroupPosition,
}

impl Classifier {
    /// Classifier positioned before any section
    pub fn new() -> Self {
        Self::default()
    }

    /// Section the next line belongs to
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// Where the next line falls within a REACHES group
    pub fn position(&self) -> GroupPosition {
        self.position
    }

    /// Classify the next line of the file and update state
    pub fn classify(&mut self, line: &str) -> LineKind {
        let kind = classify_line(line, self.section, self.position);
        match kind {
            LineKind::SectionHeader => {
                self.section = header_of(line).flatten();
                self.position = GroupPosition::Header;
            }
            LineKind::Record | LineKind::Coordinate
                if self.section == Some(Section::Reaches) =>
            {
                self.position = self.position.advance();
            }
            _ => {}
        }
        kind
    }
}
