//! Progress cursor and the status lines handed to the presentation layer.

use std::fmt;

/// A single human-readable status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The named resource is the next one expected.
    Fetching {
        name: String,
        /// 1-based ordinal of this resource.
        index: usize,
        total: usize,
    },
    /// The named resource could not be downloaded; progress stops here.
    Failed { name: String },
    /// Every bundle part has arrived and the bundle is ready to be assembled.
    CreatingBundle,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Fetching { name, index, total } => {
                write!(f, "Fetching {name}.. ({index}/{total})")
            }
            Status::Failed { name } => write!(f, "Failed to download {name}"),
            Status::CreatingBundle => write!(f, "Creating default.zip.."),
        }
    }
}

/// The single progress pointer behind the "next resource" status line.
///
/// `current` only ever moves forward, one step per resource transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCursor {
    current: usize,
    total: usize,
}

impl ProgressCursor {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Advance to the named resource and produce its status line.
    pub fn advance(&mut self, name: &str) -> Status {
        self.current += 1;
        Status::Fetching {
            name: name.to_string(),
            index: self.current,
            total: self.total,
        }
    }

    /// Number of transitions made so far.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of resources expected in this run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        let mut cursor = ProgressCursor::new(9);
        assert_eq!(cursor.advance("calm1").to_string(), "Fetching calm1.. (1/9)");
        assert_eq!(cursor.advance("calm2").to_string(), "Fetching calm2.. (2/9)");
        assert_eq!(cursor.current(), 2);
        assert_eq!(
            Status::Failed {
                name: "gui.png patch".to_string()
            }
            .to_string(),
            "Failed to download gui.png patch"
        );
        assert_eq!(Status::CreatingBundle.to_string(), "Creating default.zip..");
    }
}
