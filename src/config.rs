use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How far a field's editable span reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanMode {
    /// Exactly the characters of the current value
    #[default]
    Token,
    /// The value plus the blanks after it, keeping one blank before the next token
    Column,
}

impl SpanMode {
    /// Name used on the command line and in JSON
    pub fn name(&self) -> &'static str {
        match self {
            SpanMode::Token => "token",
            SpanMode::Column => "column",
        }
    }
}

impl std::fmt::Display for SpanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SpanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(SpanMode::Token),
            "column" => Ok(SpanMode::Column),
            other => Err(format!(
                "Invalid span mode: {}. Must be token or column",
                other
            )),
        }
    }
}

/// Options shared by field resolution and span replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditOptions {
    /// Span used when replacing a value
    pub span_mode: SpanMode,
    /// Match section and field names without regard to ASCII case
    pub ignore_case: bool,
}
