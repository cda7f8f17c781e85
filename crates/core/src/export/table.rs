//! Tabular export

use ctgforge_domain::{DateStruct, TrialCore};
use serde::Serialize;

const LIST_SEPARATOR: &str = "; ";

/// One flat row per trial
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialRow {
    pub nct_id: Option<String>,
    pub brief_title: Option<String>,
    pub official_title: Option<String>,
    pub study_type: Option<String>,
    pub overall_status: Option<String>,
    pub phases: String,
    pub lead_sponsor: Option<String>,
    /// `None` when the trial has no collaborators
    pub collaborators: Option<String>,
    pub conditions: String,
    pub arm_groups: String,
    pub interventions: String,
    pub start_date: Option<String>,
    pub primary_completion_date: Option<String>,
    pub completion_date: Option<String>,
    pub has_results: bool,
}

fn join<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR)
}

fn date_of(date: Option<&DateStruct>) -> Option<String> {
    date.and_then(|d| d.date.clone())
}

impl From<&TrialCore> for TrialRow {
    fn from(trial: &TrialCore) -> Self {
        let collaborators = join(trial.collaborators.iter().filter_map(|c| c.name.as_deref()));

        Self {
            nct_id: trial.nct_id.clone(),
            brief_title: trial.brief_title.clone(),
            official_title: trial.official_title.clone(),
            study_type: trial.study_type.clone(),
            overall_status: trial.overall_status.clone(),
            phases: join(trial.phases.iter().map(String::as_str)),
            lead_sponsor: trial.lead_sponsor.name.clone(),
            collaborators: (!collaborators.is_empty()).then_some(collaborators),
            conditions: join(trial.conditions.iter().map(|c| c.name.as_str())),
            arm_groups: join(trial.arm_groups.iter().filter_map(|g| g.label.as_deref())),
            interventions: join(trial.interventions.iter().filter_map(|i| i.name.as_deref())),
            start_date: date_of(trial.start_date.as_ref()),
            primary_completion_date: date_of(trial.primary_completion_date.as_ref()),
            completion_date: date_of(trial.completion_date.as_ref()),
            has_results: trial.has_results,
        }
    }
}

/// Reduce trials to flat rows, one per trial, in input order
pub fn to_rows(trials: &[TrialCore]) -> Vec<TrialRow> {
    trials.iter().map(TrialRow::from).collect()
}
