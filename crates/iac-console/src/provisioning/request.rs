use std::collections::BTreeMap;

use super::catalog::ServiceKind;
use crate::config::DEFAULT_REGION;

/// Raw form fields submitted for one service kind.
///
/// Values are trimmed when read; a missing field and a blank one are
/// indistinguishable to the validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    kind: ServiceKind,
    fields: BTreeMap<String, String>,
}

impl ServiceRequest {
    pub fn new<I, K, V>(kind: ServiceKind, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { kind, fields }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Trimmed value, or `""` when the field was not submitted.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|value| value.trim()).unwrap_or("")
    }

    /// Trimmed value, falling back to `default` when missing or blank.
    pub fn text_or(&self, name: &str, default: &str) -> String {
        match self.text(name) {
            "" => default.to_string(),
            value => value.to_string(),
        }
    }

    /// Checkbox semantics: any non-blank value other than an explicit "off" literal.
    pub fn flag(&self, name: &str) -> bool {
        let value = self.text(name);
        !value.is_empty()
            && !matches!(
                value.to_ascii_lowercase().as_str(),
                "false" | "off" | "0" | "no"
            )
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.text(name).is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Process-wide defaults applied while validating submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub region: String,
}

impl RequestDefaults {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}
