//! Normalized trial records
//!
//! Field names follow the study data structure published at
//! <https://clinicaltrials.gov/data-api/about-api/study-data-structure>.
//! Enumerated API values (study type, status, phases, agency class, ...) are
//! kept as the raw upper-case strings so unknown values never fail a record.

use serde::{Deserialize, Serialize};

/// Sponsor or collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub name: Option<String>,
    /// Agency class, e.g. `NIH`, `INDUSTRY`, `OTHER`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Partial or full date with its `ACTUAL`/`ESTIMATED` qualifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStruct {
    /// `None` when the struct is present without a date
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub mesh_uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmGroup {
    pub label: Option<String>,
    /// Arm type, e.g. `EXPERIMENTAL`, `PLACEBO_COMPARATOR`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub intervention_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    pub name: Option<String>,
    pub mesh_uid: Option<String>,
    /// Intervention type, e.g. `DRUG`, `DEVICE`, `BEHAVIORAL`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub other_names: Vec<String>,
    #[serde(default)]
    pub arm_group_labels: Vec<String>,
}

/// Core facts about one registered study
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialCore {
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
    pub official_title: Option<String>,
    pub study_type: Option<String>,
    pub overall_status: Option<String>,
    #[serde(default)]
    pub phases: Vec<String>,

    pub lead_sponsor: Agency,
    #[serde(default)]
    pub collaborators: Vec<Agency>,

    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub arm_groups: Vec<ArmGroup>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,

    pub start_date: Option<DateStruct>,
    pub primary_completion_date: Option<DateStruct>,
    pub completion_date: Option<DateStruct>,

    #[serde(default)]
    pub has_results: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kind_as_type() {
        let agency = Agency { name: Some("NCI".into()), kind: Some("NIH".into()) };
        let json = serde_json::to_value(&agency).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "NCI", "type": "NIH" }));
    }

    #[test]
    fn deserializes_with_missing_collections() {
        let trial: TrialCore = serde_json::from_value(serde_json::json!({
            "nct_id": "NCT00000001",
            "brief_title": null,
            "official_title": null,
            "study_type": null,
            "overall_status": "RECRUITING",
            "lead_sponsor": { "name": null, "type": null },
            "start_date": null,
            "primary_completion_date": null,
            "completion_date": null
        }))
        .unwrap();

        assert_eq!(trial.nct_id.as_deref(), Some("NCT00000001"));
        assert!(trial.conditions.is_empty());
        assert!(trial.phases.is_empty());
        assert!(!trial.has_results);
    }
}
