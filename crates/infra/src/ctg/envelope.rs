//! Search response envelope
//!
//! Current responses carry records under `studies`; the legacy study-fields
//! shape nests them under `StudyFieldsResponse.StudyFields`.

use ctgforge_core::search::{Page, RawRecord};
use ctgforge_domain::constants::{
    LEGACY_ENVELOPE_KEY, LEGACY_RECORDS_KEY, NEXT_PAGE_TOKEN_KEY, RECORDS_KEY, TOTAL_COUNT_KEY,
};
use ctgforge_domain::TransportError;
use serde_json::Value;

use crate::http::client::json_type;

fn shape_error(path: &str, message: String) -> TransportError {
    TransportError::Decoding { path: path.to_string(), message }
}

fn take_records(path: &str, payload: &mut RawRecord) -> Result<Vec<Value>, TransportError> {
    let current = match payload.remove(RECORDS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(records)) => records,
        Some(other) => {
            return Err(shape_error(
                path,
                format!("`{RECORDS_KEY}` is {}, expected an array", json_type(&other)),
            ))
        }
    };
    if !current.is_empty() {
        return Ok(current);
    }

    let legacy = match payload.get_mut(LEGACY_ENVELOPE_KEY) {
        None | Some(Value::Null) => return Ok(current),
        Some(Value::Object(envelope)) => envelope.remove(LEGACY_RECORDS_KEY),
        Some(other) => {
            return Err(shape_error(
                path,
                format!("`{LEGACY_ENVELOPE_KEY}` is {}, expected an object", json_type(other)),
            ))
        }
    };
    match legacy {
        None | Some(Value::Null) => Ok(current),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(shape_error(
            path,
            format!(
                "`{LEGACY_ENVELOPE_KEY}.{LEGACY_RECORDS_KEY}` is {}, expected an array",
                json_type(&other)
            ),
        )),
    }
}

/// Split a search response into records and the continuation token
///
/// Absent keys mean an empty last page; present keys of the wrong type
/// are rejected.
///
/// # Errors
/// Returns `TransportError::Decoding` if the record list or token has the
/// wrong shape, or a record is not a JSON object.
pub fn parse_page(path: &str, mut payload: RawRecord) -> Result<Page, TransportError> {
    let records = take_records(path, &mut payload)?
        .into_iter()
        .enumerate()
        .map(|(idx, record)| match record {
            Value::Object(map) => Ok(map),
            _ => Err(shape_error(path, format!("record {idx} is not a JSON object"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let next_page_token = match payload.get(NEXT_PAGE_TOKEN_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(token)) => Some(token.clone()).filter(|token| !token.is_empty()),
        Some(other) => {
            return Err(shape_error(
                path,
                format!("`{NEXT_PAGE_TOKEN_KEY}` is {}, expected a string", json_type(other)),
            ))
        }
    };

    Ok(Page { records, next_page_token })
}

/// Server-reported total, or 0 when absent
///
/// # Errors
/// Returns `TransportError::Decoding` if the total is not a non-negative integer.
pub fn total_count(path: &str, payload: &RawRecord) -> Result<u64, TransportError> {
    match payload.get(TOTAL_COUNT_KEY) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| {
            shape_error(path, format!("`{TOTAL_COUNT_KEY}` is {value}, expected a non-negative integer"))
        }),
    }
}
