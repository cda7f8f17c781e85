//! Property-graph export
//!
//! Node ids are `Label:key`, where the key is the NCT id for trials and the
//! lowercased name for everything else. Nodes are de-duplicated by id (first
//! occurrence wins); edges keep emission order.

use std::collections::HashSet;
use std::fmt;

use ctgforge_domain::TrialCore;
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeLabel {
    Trial,
    Condition,
    Intervention,
    Sponsor,
}

impl NodeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "Trial",
            Self::Condition => "Condition",
            Self::Intervention => "Intervention",
            Self::Sponsor => "Sponsor",
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    HasCondition,
    HasIntervention,
    SponsoredBy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: NodeLabel,
    pub props: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub src: String,
    pub rel: Relation,
    pub dst: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Default)]
struct GraphBuilder {
    graph: PropertyGraph,
    seen: HashSet<String>,
}

impl GraphBuilder {
    fn node(&mut self, label: NodeLabel, key: &str, props: Value) -> String {
        let id = format!("{label}:{key}");
        if self.seen.insert(id.clone()) {
            let props = match props {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            self.graph.nodes.push(GraphNode { id: id.clone(), label, props });
        }
        id
    }

    fn edge(&mut self, src: &str, rel: Relation, dst: String) {
        self.graph.edges.push(GraphEdge { src: src.to_string(), rel, dst });
    }
}

/// Build a property graph of trials and the entities they reference
///
/// Trials without an NCT id cannot be addressed and are skipped.
pub fn to_property_graph(trials: &[TrialCore]) -> PropertyGraph {
    let mut builder = GraphBuilder::default();

    for trial in trials {
        let Some(nct_id) = trial.nct_id.as_deref() else {
            continue;
        };
        let trial_id = builder.node(
            NodeLabel::Trial,
            nct_id,
            json!({
                "nct_id": nct_id,
                "brief_title": trial.brief_title,
                "official_title": trial.official_title,
                "study_type": trial.study_type,
                "overall_status": trial.overall_status,
                "phases": trial.phases,
                "has_results": trial.has_results,
            }),
        );

        for condition in &trial.conditions {
            let id = builder.node(
                NodeLabel::Condition,
                &condition.name.to_lowercase(),
                json!({ "name": condition.name, "mesh_uid": condition.mesh_uid }),
            );
            builder.edge(&trial_id, Relation::HasCondition, id);
        }

        for intervention in &trial.interventions {
            let Some(name) = intervention.name.as_deref().filter(|name| !name.is_empty()) else {
                continue;
            };
            let id = builder.node(
                NodeLabel::Intervention,
                &name.to_lowercase(),
                json!({
                    "name": name,
                    "type": intervention.kind,
                    "mesh_uid": intervention.mesh_uid,
                    "other_names": intervention.other_names,
                }),
            );
            builder.edge(&trial_id, Relation::HasIntervention, id);
        }

        if let Some(sponsor) = trial.lead_sponsor.name.as_deref().filter(|name| !name.is_empty()) {
            let id = builder.node(
                NodeLabel::Sponsor,
                &sponsor.to_lowercase(),
                json!({ "name": sponsor, "class": trial.lead_sponsor.kind }),
            );
            builder.edge(&trial_id, Relation::SponsoredBy, id);
        }
    }

    builder.graph
}
