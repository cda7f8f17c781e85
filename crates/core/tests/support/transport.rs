//! In-memory `StudyTransport` backed by a fixed list of studies

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ctgforge_core::search::{paginate, Page, RawRecord, RecordStream, SearchRequest, StudyTransport};
use ctgforge_core::QueryParams;
use ctgforge_domain::TransportError;
use serde_json::{json, Value};

/// Serves `studies` in pages of `page_size`, recording every request.
#[derive(Clone)]
pub struct MemoryTransport {
    studies: Arc<Vec<RawRecord>>,
    page_size: usize,
    requests: Arc<Mutex<Vec<QueryParams>>>,
}

impl MemoryTransport {
    pub fn new(studies: Vec<RawRecord>, page_size: usize) -> Self {
        Self { studies: Arc::new(studies), page_size, requests: Arc::default() }
    }

    /// Parameters of every search or count call seen so far.
    pub fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    fn page(&self, token: Option<String>) -> Result<Page, TransportError> {
        let start = match token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| TransportError::http("/studies", 400, "bad token"))?,
            None => 0,
        };
        let end = (start + self.page_size).min(self.studies.len());

        Ok(Page {
            records: self.studies[start..end].to_vec(),
            next_page_token: (end < self.studies.len()).then(|| end.to_string()),
        })
    }
}

#[async_trait]
impl StudyTransport for MemoryTransport {
    async fn fetch_one(&self, nct_id: &str) -> Result<RawRecord, TransportError> {
        self.studies
            .iter()
            .find(|study| nct_id_of(study) == Some(nct_id))
            .cloned()
            .ok_or_else(|| TransportError::http(format!("/studies/{nct_id}"), 404, "not found"))
    }

    async fn count(&self, params: &QueryParams) -> Result<u64, TransportError> {
        self.requests.lock().unwrap().push(params.clone());
        Ok(self.studies.len() as u64)
    }

    fn search(&self, request: SearchRequest) -> RecordStream<'_> {
        self.requests.lock().unwrap().push(request.params.clone());
        paginate(move |token| std::future::ready(self.page(token)), request.offset, request.limit)
    }
}

pub fn nct_id_of(study: &RawRecord) -> Option<&str> {
    study.get("protocolSection")?.get("identificationModule")?.get("nctId")?.as_str()
}

/// A realistic study record with conditions, interventions and sponsors.
pub fn study(nct_id: &str, condition: &str, drug: &str, sponsor: &str) -> RawRecord {
    let value = json!({
        "protocolSection": {
            "identificationModule": { "nctId": nct_id, "briefTitle": format!("{drug} in {condition}") },
            "statusModule": {
                "overallStatus": "RECRUITING",
                "startDateStruct": { "date": "2023-01", "type": "ACTUAL" }
            },
            "designModule": { "studyType": "INTERVENTIONAL", "phases": ["PHASE2"] },
            "conditionsModule": { "conditions": [condition] },
            "armsInterventionsModule": {
                "interventions": [{ "type": "DRUG", "name": drug }]
            },
            "sponsorCollaboratorsModule": {
                "leadSponsor": { "name": sponsor, "class": "INDUSTRY" }
            }
        },
        "derivedSection": {
            "conditionBrowseModule": { "meshes": [{ "id": "D001249", "term": "Asthma" }] }
        },
        "hasResults": false
    });

    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}
