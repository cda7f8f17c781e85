//! Flattening of raw study JSON into [`TrialCore`]
//!
//! Missing modules or fields become `None` or empty collections. Values of
//! an unexpected JSON type are treated as missing.

use std::sync::OnceLock;

use ctgforge_domain::{Agency, ArmGroup, Condition, DateStruct, Intervention, TrialCore};
use serde_json::{Map, Value};

use crate::search::RawRecord;

static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();

fn empty() -> &'static Map<String, Value> {
    EMPTY.get_or_init(Map::new)
}

fn module<'a>(parent: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    parent.get(key).and_then(Value::as_object).unwrap_or(empty())
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn texts(object: &Map<String, Value>, key: &str) -> Vec<String> {
    array(object, key).filter_map(Value::as_str).map(str::to_string).collect()
}

fn array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Value> + 'a {
    object.get(key).and_then(Value::as_array).into_iter().flatten()
}

fn objects<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    array(object, key).filter_map(Value::as_object)
}

fn date(object: &Map<String, Value>, key: &str) -> Option<DateStruct> {
    let date = object.get(key)?.as_object()?;
    Some(DateStruct { date: text(date, "date"), kind: text(date, "type") })
}

fn agency(object: &Map<String, Value>) -> Agency {
    Agency { name: text(object, "name"), kind: text(object, "class") }
}

/// MeSH id of the browse-module entry whose term matches `name`
fn mesh_id(browse: &Map<String, Value>, name: &str) -> Option<String> {
    let name = name.to_lowercase();
    objects(browse, "meshes")
        .find(|mesh| {
            mesh.get("term").and_then(Value::as_str).is_some_and(|term| term.to_lowercase() == name)
        })
        .and_then(|mesh| text(mesh, "id"))
}

/// Normalize one raw study record
pub fn flatten_core(raw: &RawRecord) -> TrialCore {
    let protocol = module(raw, "protocolSection");
    let derived = module(raw, "derivedSection");

    let ident = module(protocol, "identificationModule");
    let status = module(protocol, "statusModule");
    let design = module(protocol, "designModule");
    let conditions = module(protocol, "conditionsModule");
    let arms = module(protocol, "armsInterventionsModule");
    let sponsors = module(protocol, "sponsorCollaboratorsModule");

    let condition_browse = module(derived, "conditionBrowseModule");
    let intervention_browse = module(derived, "interventionBrowseModule");

    TrialCore {
        nct_id: text(ident, "nctId"),
        brief_title: text(ident, "briefTitle"),
        official_title: text(ident, "officialTitle"),
        study_type: text(design, "studyType"),
        overall_status: text(status, "overallStatus"),
        phases: texts(design, "phases"),
        lead_sponsor: agency(module(sponsors, "leadSponsor")),
        collaborators: objects(sponsors, "collaborators").map(agency).collect(),
        conditions: texts(conditions, "conditions")
            .into_iter()
            .map(|name| Condition { mesh_uid: mesh_id(condition_browse, &name), name })
            .collect(),
        arm_groups: objects(arms, "armGroups")
            .map(|group| ArmGroup {
                label: text(group, "label"),
                kind: text(group, "type"),
                description: text(group, "description"),
                intervention_names: texts(group, "interventionNames"),
            })
            .collect(),
        interventions: objects(arms, "interventions")
            .map(|intervention| {
                let name = text(intervention, "name");
                Intervention {
                    mesh_uid: name.as_deref().and_then(|n| mesh_id(intervention_browse, n)),
                    name,
                    kind: text(intervention, "type"),
                    description: text(intervention, "description"),
                    other_names: texts(intervention, "otherNames"),
                    arm_group_labels: texts(intervention, "armGroupLabels"),
                }
            })
            .collect(),
        start_date: date(status, "startDateStruct"),
        primary_completion_date: date(status, "primaryCompletionDateStruct"),
        completion_date: date(status, "completionDateStruct"),
        has_results: raw.get("hasResults").and_then(Value::as_bool).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn sample() -> RawRecord {
        raw(json!({
            "protocolSection": {
                "identificationModule": {
                    "nctId": "NCT01234567",
                    "briefTitle": "Metformin in Prediabetes",
                    "officialTitle": "A Randomized Trial of Metformin"
                },
                "statusModule": {
                    "overallStatus": "RECRUITING",
                    "startDateStruct": { "date": "2023-01", "type": "ACTUAL" },
                    "completionDateStruct": { "date": "2026-12-31", "type": "ESTIMATED" }
                },
                "designModule": { "studyType": "INTERVENTIONAL", "phases": ["PHASE2", "PHASE3"] },
                "conditionsModule": { "conditions": ["Prediabetes", "Obesity"] },
                "armsInterventionsModule": {
                    "armGroups": [{
                        "label": "Metformin",
                        "type": "EXPERIMENTAL",
                        "interventionNames": ["Drug: Metformin"]
                    }],
                    "interventions": [{
                        "type": "DRUG",
                        "name": "Metformin",
                        "otherNames": ["Glucophage"],
                        "armGroupLabels": ["Metformin"]
                    }]
                },
                "sponsorCollaboratorsModule": {
                    "leadSponsor": { "name": "Example University", "class": "OTHER" },
                    "collaborators": [{ "name": "NIDDK", "class": "NIH" }]
                }
            },
            "derivedSection": {
                "conditionBrowseModule": {
                    "meshes": [{ "id": "D011236", "term": "prediabetic state" },
                               { "id": "D009765", "term": "OBESITY" }]
                },
                "interventionBrowseModule": {
                    "meshes": [{ "id": "D008687", "term": "Metformin" }]
                }
            },
            "hasResults": true
        }))
    }

    #[test]
    fn flattens_a_full_record() {
        let trial = flatten_core(&sample());

        assert_eq!(trial.nct_id.as_deref(), Some("NCT01234567"));
        assert_eq!(trial.brief_title.as_deref(), Some("Metformin in Prediabetes"));
        assert_eq!(trial.study_type.as_deref(), Some("INTERVENTIONAL"));
        assert_eq!(trial.phases, vec!["PHASE2", "PHASE3"]);
        assert_eq!(trial.lead_sponsor.name.as_deref(), Some("Example University"));
        assert_eq!(trial.lead_sponsor.kind.as_deref(), Some("OTHER"));
        assert_eq!(trial.collaborators.len(), 1);
        assert_eq!(trial.start_date.as_ref().and_then(|d| d.date.as_deref()), Some("2023-01"));
        assert!(trial.primary_completion_date.is_none());
        assert!(trial.has_results);

        assert_eq!(trial.arm_groups[0].intervention_names, vec!["Drug: Metformin"]);
        assert_eq!(trial.interventions[0].other_names, vec!["Glucophage"]);
        assert_eq!(trial.interventions[0].mesh_uid.as_deref(), Some("D008687"));
    }

    #[test]
    fn condition_mesh_ids_match_case_insensitively() {
        let trial = flatten_core(&sample());

        assert_eq!(trial.conditions[0].name, "Prediabetes");
        assert_eq!(trial.conditions[0].mesh_uid, None);
        assert_eq!(trial.conditions[1].name, "Obesity");
        assert_eq!(trial.conditions[1].mesh_uid.as_deref(), Some("D009765"));
    }

    #[test]
    fn empty_record_flattens_to_defaults() {
        let trial = flatten_core(&RawRecord::new());
        assert_eq!(trial, TrialCore::default());
    }

    #[test]
    fn wrong_types_are_treated_as_missing() {
        let trial = flatten_core(&raw(json!({
            "protocolSection": {
                "identificationModule": { "nctId": 42 },
                "designModule": { "phases": "PHASE1" },
                "statusModule": { "startDateStruct": { "date": 2023 } }
            },
            "hasResults": "yes"
        })));

        assert!(trial.nct_id.is_none());
        assert!(trial.phases.is_empty());
        assert_eq!(trial.start_date, Some(DateStruct { date: None, kind: None }));
        assert!(!trial.has_results);
    }

    #[test]
    fn date_struct_without_date_keeps_its_qualifier() {
        let trial = flatten_core(&raw(json!({
            "protocolSection": {
                "statusModule": {
                    "startDateStruct": { "type": "ESTIMATED" },
                    "completionDateStruct": "2030-01"
                }
            }
        })));

        assert_eq!(
            trial.start_date,
            Some(DateStruct { date: None, kind: Some("ESTIMATED".into()) })
        );
        assert!(trial.completion_date.is_none());
    }
}
