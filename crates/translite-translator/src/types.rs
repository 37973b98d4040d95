use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{FAILURE_TEXT, ResolverError};

/// A translation server as listed in the tray menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub index: usize,
    pub display_name: String,
    pub url: String,
}

impl Endpoint {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        let display_name = if index == 0 {
            "Primary server".to_string()
        } else {
            format!("Backup server {index}")
        };

        Self {
            index,
            display_name,
            url: url.into(),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.index == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Primary, then backups in order, then the alternate provider
    #[default]
    Auto,
    /// Try this endpoint first, then the automatic chain
    Pinned(usize),
}

/// Atomic word for `Mode::Auto`
pub(crate) const AUTO_WORD: usize = 0;

impl Mode {
    /// Packs the mode into one word: 0 is `Auto`, `i + 1` is `Pinned(i)`.
    /// `None` for `Pinned(usize::MAX)`, which has no encoding.
    pub(crate) fn encode(self) -> Option<usize> {
        match self {
            Mode::Auto => Some(AUTO_WORD),
            Mode::Pinned(index) => index.checked_add(1),
        }
    }

    pub(crate) fn decode(word: usize) -> Self {
        match word {
            AUTO_WORD => Mode::Auto,
            n => Mode::Pinned(n - 1),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Auto => f.write_str("auto"),
            Mode::Pinned(index) => write!(f, "manual:{index}"),
        }
    }
}

/// Accepts `auto`, `manual:<i>`, `manual_<i>` or a bare index.
/// Range checking happens in `Resolver::set_mode`.
impl FromStr for Mode {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Mode::Auto);
        }

        let digits = s
            .strip_prefix("manual:")
            .or_else(|| s.strip_prefix("manual_"))
            .unwrap_or(s);

        digits
            .parse::<usize>()
            .map(Mode::Pinned)
            .map_err(|_| ResolverError::InvalidMode(s.to_string()))
    }
}

/// Which candidate produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manual(usize),
    Primary,
    Backup(usize),
    Alternate,
    None,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Manual(index) => write!(f, "manual:{index}"),
            Source::Primary => f.write_str("primary"),
            Source::Backup(index) => write!(f, "backup-{index}"),
            Source::Alternate => f.write_str("secondary-service"),
            Source::None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub source: Source,
}

impl Outcome {
    pub fn new(text: impl Into<String>, source: Source) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Sentinel returned when the whole chain is exhausted
    pub fn failed() -> Self {
        Self::new(FAILURE_TEXT, Source::None)
    }

    pub fn is_failure(&self) -> bool {
        self.source == Source::None
    }

    pub fn source_label(&self) -> String {
        self.source.to_string()
    }
}
