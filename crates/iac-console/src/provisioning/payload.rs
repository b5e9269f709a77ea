use std::collections::BTreeMap;

use serde::Serialize;

use super::params::ServiceParams;

/// Branch every workflow is dispatched against.
pub const DISPATCH_REF: &str = "main";

/// String-typed `inputs` map of a `workflow_dispatch` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkflowInputs(BTreeMap<String, String>);

impl WorkflowInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Toggles travel as the literals `"true"` / `"false"`.
    pub fn flag(self, key: &str, enabled: bool) -> Self {
        self.text(key, if enabled { "true" } else { "false" })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Body of `POST .../actions/workflows/{file}/dispatches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    inputs: WorkflowInputs,
}

impl DispatchPayload {
    pub fn new(inputs: WorkflowInputs) -> Self {
        Self {
            git_ref: DISPATCH_REF.to_string(),
            inputs,
        }
    }

    pub fn for_params(params: &ServiceParams) -> Self {
        Self::new(params.inputs())
    }

    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    pub fn inputs(&self) -> &WorkflowInputs {
        &self.inputs
    }
}
