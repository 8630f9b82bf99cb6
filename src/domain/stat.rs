use std::fmt;

/// One row of a statistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub label: String,
    pub count: u64,
}

impl StatEntry {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

impl fmt::Display for StatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.label)
    }
}
