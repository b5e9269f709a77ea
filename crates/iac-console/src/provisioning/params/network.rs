use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcParams {
    pub vpc_name: String,
    pub cidr_block: String,
    pub availability_zones: String,
}

impl ServiceForm for VpcParams {
    const KIND: ServiceKind = ServiceKind::Vpc;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            vpc_name: request.text("vpc_name").to_string(),
            cidr_block: request.text_or("cidr_block", "10.0.0.0/16"),
            availability_zones: request.text_or("availability_zones", "2"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("vpc_name", &self.vpc_name)
            .text("cidr_block", &self.cidr_block)
            .text("availability_zones", &self.availability_zones)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.vpc_name)
            .with("CIDR", &self.cidr_block)
            .with("Availability zones", format!("{} zones", self.availability_zones))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElbParams {
    pub lb_name: String,
    pub lb_type: String,
    pub target_group_port: String,
}

impl ServiceForm for ElbParams {
    const KIND: ServiceKind = ServiceKind::Elb;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            lb_name: request.text("lb_name").to_string(),
            lb_type: request.text_or("lb_type", "application"),
            target_group_port: request.text_or("target_group_port", "80"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("lb_name", &self.lb_name)
            .text("lb_type", &self.lb_type)
            .text("target_group_port", &self.target_group_port)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.lb_name)
            .with("Type", self.lb_type.to_uppercase())
            .with("Port", &self.target_group_port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudFrontParams {
    pub origin_domain: String,
    pub comment: String,
    pub price_class: String,
}

impl ServiceForm for CloudFrontParams {
    const KIND: ServiceKind = ServiceKind::CloudFront;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            origin_domain: request.text("origin_domain").to_string(),
            comment: request.text("distribution_comment").to_string(),
            price_class: request.text_or("price_class", "PriceClass_100"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("origin_domain", &self.origin_domain)
            .text("distribution_comment", &self.comment)
            .text("price_class", &self.price_class)
    }

    fn details(&self) -> SummaryDetails {
        let comment = if self.comment.is_empty() {
            "N/A"
        } else {
            self.comment.as_str()
        };
        SummaryDetails::new()
            .with("Origin", &self.origin_domain)
            .with("Comment", comment)
            .with("Price class", &self.price_class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route53Params {
    pub zone_name: String,
    pub record_type: String,
    pub record_value: String,
}

impl ServiceForm for Route53Params {
    const KIND: ServiceKind = ServiceKind::Route53;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            zone_name: request.text("zone_name").to_string(),
            record_type: request.text_or("record_type", "A"),
            record_value: request.text("record_value").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("zone_name", &self.zone_name)
            .text("record_type", &self.record_type)
            .text("record_value", &self.record_value)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Zone", &self.zone_name)
            .with("Record type", &self.record_type)
            .with("Value", &self.record_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vpc_defaults_fill_blank_fields() {
        let request = ServiceRequest::new(
            ServiceKind::Vpc,
            [("vpc_name", "core"), ("cidr_block", "  ")],
        );
        let params = VpcParams::parse(&request, &RequestDefaults::default()).expect("valid vpc");

        assert_eq!(params.inputs().get("cidr_block"), Some("10.0.0.0/16"));
        assert_eq!(params.details().get("Availability zones"), Some("2 zones"));
    }

    #[test]
    fn cloudfront_summary_marks_missing_comment() {
        let request = ServiceRequest::new(
            ServiceKind::CloudFront,
            [("origin_domain", "assets.example.com")],
        );
        let params =
            CloudFrontParams::parse(&request, &RequestDefaults::default()).expect("valid cdn");

        assert_eq!(params.details().get("Comment"), Some("N/A"));
        assert_eq!(params.inputs().get("distribution_comment"), Some(""));
    }
}
