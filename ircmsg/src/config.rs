#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knobs for [`Parser`](crate::wire::Parser).
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ParserConfig {
    /// Upper bound on the line length, terminator excluded.
    pub max_line_len: Option<usize>,
    /// Check tag keys and the command against the IRCv3 grammar.
    pub strict: bool,
}

impl ParserConfig {
    /// 512 bytes for the message body plus 8191 for tags, minus the CR LF.
    pub const IRCV3_MAX_LINE_LEN: usize = 512 + 8191 - 2;

    pub fn strict() -> Self {
        ParserConfig {
            max_line_len: Some(Self::IRCV3_MAX_LINE_LEN),
            strict: true,
        }
    }

    pub fn with_max_line_len(mut self, max: usize) -> Self {
        self.max_line_len = Some(max);
        self
    }
}
