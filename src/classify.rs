use crate::models::{Finding, VehicleStatus};

/// Derive the vehicle condition from a finding set.
///
/// Any finding fails the vehicle, regardless of class or confidence;
/// there is no confidence-weighted scoring or per-class severity.
pub fn classify(findings: &[Finding]) -> VehicleStatus {
    if findings.is_empty() {
        VehicleStatus::Pass
    } else {
        VehicleStatus::Fail
    }
}
