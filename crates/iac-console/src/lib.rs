//! Validation and dispatch layer for the infrastructure provisioning console.
//!
//! Each supported AWS service kind is a thin configuration of the same
//! pipeline: validate the submitted form, build a GitHub Actions
//! `workflow_dispatch` payload, trigger the Terraform workflow and present the
//! outcome.

pub mod config;
pub mod error;
pub mod provisioning;
pub mod telemetry;
