use serde::Serialize;

/// Infection determination derived from one scanner run.
///
/// A clean verdict never carries a label and an infected verdict always does;
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanVerdict {
    infected: bool,
    label: String,
}

impl ScanVerdict {
    pub fn clean() -> Self {
        Self {
            infected: false,
            label: String::new(),
        }
    }

    /// Infected verdict for `label`. Returns `None` when the label is blank.
    pub fn infected(label: impl Into<String>) -> Option<Self> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            infected: true,
            label,
        })
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
