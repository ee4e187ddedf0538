//! Procedure records as served by the procedure database.
//!
//! Each record keeps the upstream JSON in `raw` so the display service
//! receives exactly what the database sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;

/// One entry of the procedure list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureSummary {
    /// 1-based position in the list.
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub raw: Value,
}

impl ProcedureSummary {
    #[must_use]
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            raw: serde_json::json!({ "title": title }),
            title,
        }
    }
}

/// A resource (ingredient, tool) needed by a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
}

/// Title, step count and resources of one procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDetail {
    pub title: String,
    pub steps_count: usize,
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub raw: Value,
}

impl ProcedureDetail {
    #[must_use]
    pub fn new(title: impl Into<String>, steps_count: usize, resources: &[&str]) -> Self {
        let title = title.into();
        let resources: Vec<Resource> = resources
            .iter()
            .map(|r| Resource {
                title: (*r).to_string(),
            })
            .collect();
        let raw = serde_json::json!({
            "procedure": { "title": title },
            "stepsCount": steps_count,
            "resources": resources,
        });
        Self {
            title,
            steps_count,
            resources,
            raw,
        }
    }

    /// Resource titles joined with ", ".
    #[must_use]
    pub fn resources_summary(&self) -> String {
        self.resources
            .iter()
            .map(|r| r.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single instruction of a procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureStep {
    pub description: String,
    #[serde(default)]
    pub raw: Value,
}

impl ProcedureStep {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            raw: serde_json::json!({ "description": description }),
            description,
        }
    }
}

#[derive(Deserialize)]
struct TitleRecord {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailBody {
    procedure: TitleRecord,
    steps_count: usize,
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Deserialize)]
struct StepRecord {
    description: String,
}

#[derive(Deserialize)]
struct StepsBody {
    steps: Vec<Value>,
}

/// Parse the body of `GET /procedures`.
///
/// # Errors
///
/// Returns `StoreError::InvalidResponse` if the body is not an array of
/// objects carrying a `title`.
pub fn parse_procedure_list(body: Value) -> Result<Vec<ProcedureSummary>, StoreError> {
    let Value::Array(items) = body else {
        return Err(StoreError::InvalidResponse(
            "procedure list is not an array".to_string(),
        ));
    };

    items
        .into_iter()
        .zip(1u32..)
        .map(|(raw, id)| {
            let record: TitleRecord = serde_json::from_value(raw.clone())
                .map_err(|e| StoreError::InvalidResponse(format!("procedure {id}: {e}")))?;
            Ok(ProcedureSummary {
                id,
                title: record.title,
                raw,
            })
        })
        .collect()
}

/// Parse the body of `GET /procedures/{id}`.
///
/// # Errors
///
/// Returns `StoreError::InvalidResponse` if required fields are missing.
pub fn parse_procedure_detail(body: Value) -> Result<ProcedureDetail, StoreError> {
    let detail: DetailBody = serde_json::from_value(body.clone())
        .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
    Ok(ProcedureDetail {
        title: detail.procedure.title,
        steps_count: detail.steps_count,
        resources: detail.resources,
        raw: body,
    })
}

/// Parse the body of `GET /proceduresteps/{id}`.
///
/// # Errors
///
/// Returns `StoreError::InvalidResponse` if `steps` is missing or a step has
/// no `description`.
pub fn parse_procedure_steps(body: Value) -> Result<Vec<ProcedureStep>, StoreError> {
    let steps: StepsBody =
        serde_json::from_value(body).map_err(|e| StoreError::InvalidResponse(e.to_string()))?;

    steps
        .steps
        .into_iter()
        .map(|raw| {
            let record: StepRecord = serde_json::from_value(raw.clone())
                .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
            Ok(ProcedureStep {
                description: record.description,
                raw,
            })
        })
        .collect()
}
