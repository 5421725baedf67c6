use serde::Serialize;

/// The assembled result of one invocation.
///
/// Fields are private: a report is built once by
/// [`ResultAssembler`](crate::ResultAssembler) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    infected: bool,
    #[serde(rename = "result")]
    label: String,
    #[serde(rename = "engine")]
    engine_version: String,
    #[serde(rename = "updated")]
    updated_at: String,
}

impl ScanReport {
    pub(crate) fn new(
        infected: bool,
        label: String,
        engine_version: String,
        updated_at: String,
    ) -> Self {
        Self {
            infected,
            label,
            engine_version,
            updated_at,
        }
    }

    pub fn infected(&self) -> bool {
        self.infected
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    /// Signature freshness, empty for infected reports.
    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }

    /// Wraps the report under the `comodo` key for the wire format.
    pub fn envelope(&self) -> ComodoEnvelope<'_> {
        ComodoEnvelope { results: self }
    }
}

/// Wire shape: `{ "comodo": { "infected", "result", "engine", "updated" } }`.
#[derive(Debug, Serialize)]
pub struct ComodoEnvelope<'a> {
    #[serde(rename = "comodo")]
    results: &'a ScanReport,
}

impl ComodoEnvelope<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
