//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::time::Duration;

use ctgforge_common::resilience::RetryConfig;
use ctgforge_infra::config::ClientConfig;
use ctgforge_infra::{init_tracing, LogFormat};
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// Token prefix chosen so it needs percent-encoding on the wire.
pub const TOKEN_PREFIX: &str = "page/";

/// Install a test subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = init_tracing("ctgforge=debug", LogFormat::Pretty);
}

/// Retry policy with millisecond backoff so tests stay fast.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(max_retries)
        .with_backoff(Duration::from_millis(5), Duration::from_millis(20))
        .with_jitter_fraction(0.0)
}

/// Client configuration pointed at a mock server.
pub fn config_for(server: &MockServer, page_size: u32) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        page_size,
        retry: fast_retry(2),
        ..ClientConfig::default()
    }
}

/// Serves `total` studies (`NCT00000000`, `NCT00000001`, ...) in pages sized
/// by the request's `pageSize`, continuing via `pageToken`.
pub struct PagedStudies {
    pub total: usize,
}

impl PagedStudies {
    pub fn nct_id(index: usize) -> String {
        format!("NCT{index:08}")
    }
}

impl Respond for PagedStudies {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut start = 0usize;
        let mut size = 10usize;
        for (key, value) in request.url.query_pairs() {
            match key.as_ref() {
                "pageToken" => match value.strip_prefix(TOKEN_PREFIX).and_then(|n| n.parse().ok()) {
                    Some(offset) => start = offset,
                    None => return ResponseTemplate::new(400).set_body_string("bad token"),
                },
                "pageSize" => size = value.parse().unwrap_or(size),
                _ => {}
            }
        }

        let end = (start + size).min(self.total);
        let studies: Vec<Value> = (start..end)
            .map(|i| {
                json!({
                    "protocolSection": {
                        "identificationModule": { "nctId": Self::nct_id(i), "briefTitle": format!("Study {i}") }
                    }
                })
            })
            .collect();

        let mut body = json!({ "studies": studies });
        if end < self.total {
            body["nextPageToken"] = json!(format!("{TOKEN_PREFIX}{end}"));
        }
        ResponseTemplate::new(200).set_body_json(body)
    }
}

/// NCT id of a raw study record.
pub fn nct_id_of(record: &serde_json::Map<String, Value>) -> Option<&str> {
    record
        .get("protocolSection")?
        .get("identificationModule")?
        .get("nctId")?
        .as_str()
}
