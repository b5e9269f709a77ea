use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{json_list, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetsParams {
    pub budget_name: String,
    pub budget_amount: String,
    pub time_unit: String,
    pub alerts: String,
    pub alert_count: usize,
}

impl ServiceForm for BudgetsParams {
    const KIND: ServiceKind = ServiceKind::Budgets;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let alerts = request.text_or("alerts", "[]");
        let alert_count = json_list("alerts", &alerts)?;

        Ok(Self {
            budget_name: request.text("budget_name").to_string(),
            budget_amount: request.text("budget_amount").to_string(),
            time_unit: request.text_or("time_unit", "MONTHLY"),
            alerts,
            alert_count,
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("budget_name", &self.budget_name)
            .text("budget_amount", &self.budget_amount)
            .text("time_unit", &self.time_unit)
            .text("alerts", &self.alerts)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Budget", &self.budget_name)
            .with("Amount", format!("${} USD", self.budget_amount))
            .with("Period", &self.time_unit)
            .with("Alerts", format!("{} thresholds", self.alert_count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostExplorerParams {
    pub report_name: String,
    pub enable_reports: bool,
    pub report_email: String,
}

impl ServiceForm for CostExplorerParams {
    const KIND: ServiceKind = ServiceKind::CostExplorer;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Ok(Self {
            report_name: request.text_or("report_name", "cost-report"),
            enable_reports: request.flag("enable_reports"),
            report_email: request.text("report_email").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("report_name", &self.report_name)
            .flag("enable_reports", self.enable_reports)
            .text("report_email", &self.report_email)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Report", &self.report_name)
            .with("API", "Enabled")
            .with_if(self.enable_reports, "Email reports", "Enabled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedAdvisorParams {
    pub notify_cost: bool,
    pub notify_security: bool,
    pub notify_performance: bool,
    pub notify_limits: bool,
}

impl TrustedAdvisorParams {
    fn notification_summary(&self) -> String {
        let enabled: Vec<&str> = [
            (self.notify_cost, "Cost"),
            (self.notify_security, "Security"),
            (self.notify_performance, "Performance"),
            (self.notify_limits, "Limits"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect();

        if enabled.is_empty() {
            "None".to_string()
        } else {
            enabled.join(", ")
        }
    }
}

impl ServiceForm for TrustedAdvisorParams {
    const KIND: ServiceKind = ServiceKind::TrustedAdvisor;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Ok(Self {
            notify_cost: request.flag("notify_cost"),
            notify_security: request.flag("notify_security"),
            notify_performance: request.flag("notify_performance"),
            notify_limits: request.flag("notify_limits"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .flag("notify_cost", self.notify_cost)
            .flag("notify_security", self.notify_security)
            .flag("notify_performance", self.notify_performance)
            .flag("notify_limits", self.notify_limits)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Free checks", "7 active")
            .with("Notifications", self.notification_summary())
            .with("Full access", "Business support plan required")
    }
}
