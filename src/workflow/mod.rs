//! Survey-creation workflow
//!
//! Wires the engine to its collaborators: a roster provider (read side) and
//! an assignment store (write side). The engine itself stays a synchronous
//! batch computation; this module offloads it to a blocking worker thread so
//! request-serving tasks are never starved, and persists the produced rows
//! only after the whole computation succeeded.

pub mod memory;

use crate::engine::{EngineConfig, EngineError, SuggestionEngine};
use crate::roster::{EmployeeId, Roster, SurveyId, TenantId};
use crate::suggest::{Relation, SuggestionMap};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Workflow errors
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The engine failed; survey creation must fail without persisting
    #[error("assignment computation failed: {0}")]
    Engine(#[from] EngineError),

    #[error("cannot determine survey type for product '{0}'")]
    UnknownSurveyType(String),

    /// A collaborator (roster provider, assignment store) failed
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// What a survey evaluates: named employees or the company as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyType {
    /// 360-degree review; assignments come from the suggestion engine
    ThreeSixty,
    /// Company-wide survey; every employee evaluates the company
    CompanyWide,
}

impl SurveyType {
    /// Infer the survey type from a product name. Mirrors the keyword
    /// mapping used by the survey catalog ("360" products are peer reviews,
    /// "enex" products are company-wide engagement surveys).
    pub fn infer_from_product(product_name: &str) -> WorkflowResult<Self> {
        let name = product_name.to_lowercase();
        if name.contains("enex") {
            return Ok(SurveyType::CompanyWide);
        }
        if name.contains("360") {
            return Ok(SurveyType::ThreeSixty);
        }
        Err(WorkflowError::UnknownSurveyType(product_name.to_string()))
    }
}

/// Target side of an assignment row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Employee,
    Company,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Employee => write!(f, "employee"),
            TargetType::Company => write!(f, "company"),
        }
    }
}

/// One persisted assignment: an evaluator, a survey, and a target.
///
/// Uniqueness of (employee, survey, target, target type) is enforced by the
/// store, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub survey_id: SurveyId,
    pub survey_type: SurveyType,
    pub target_employee_id: Option<EmployeeId>,
    pub target_type: TargetType,
    /// Relation that produced this row; `None` for company-wide rows
    pub relation: Option<Relation>,
    pub created_at: DateTime<Utc>,
}

/// Read-side collaborator: one tenant's employee records, in store order
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn roster(&self, tenant: &TenantId) -> anyhow::Result<Roster>;
}

/// Write-side collaborator: durably stores a batch of assignment rows
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn persist(&self, records: Vec<AssignmentRecord>) -> anyhow::Result<()>;
}

/// Output of one survey-creation run
#[derive(Debug)]
pub struct GeneratedAssignments {
    /// Per-employee suggestion lists; empty for company-wide surveys
    pub suggestions: SuggestionMap,
    /// The rows handed to the assignment store
    pub records: Vec<AssignmentRecord>,
}

/// Compute and persist the assignments for a newly created survey.
///
/// For 360-degree surveys the engine runs on a blocking worker thread and
/// every suggestion becomes one employee-target row. Company-wide surveys
/// take the non-ML path: one company-target row per employee. Nothing is
/// persisted unless the whole computation succeeded, so an aborted run has
/// no side effects.
pub async fn generate_assignments(
    provider: &dyn RosterProvider,
    store: &dyn AssignmentStore,
    tenant: &TenantId,
    survey: &SurveyId,
    survey_type: SurveyType,
    config: EngineConfig,
) -> WorkflowResult<GeneratedAssignments> {
    let roster = provider.roster(tenant).await?;
    info!(%tenant, %survey, ?survey_type, employees = roster.len(), "generating assignments");

    let (suggestions, records) = match survey_type {
        SurveyType::ThreeSixty => {
            let engine_roster = roster.clone();
            let suggestions =
                tokio::task::spawn_blocking(move || {
                    SuggestionEngine::new(engine_roster, config).assign_suggestions()
                })
                .await
                .map_err(anyhow::Error::from)??;

            let records = records_from_suggestions(&roster, survey, &suggestions);
            (suggestions, records)
        }
        SurveyType::CompanyWide => {
            let records = roster
                .iter()
                .map(|record| AssignmentRecord {
                    id: Uuid::new_v4(),
                    employee_id: record.id.clone(),
                    survey_id: survey.clone(),
                    survey_type: SurveyType::CompanyWide,
                    target_employee_id: None,
                    target_type: TargetType::Company,
                    relation: None,
                    created_at: Utc::now(),
                })
                .collect();
            (SuggestionMap::default(), records)
        }
    };

    store.persist(records.clone()).await?;
    info!(rows = records.len(), "persisted assignments");

    Ok(GeneratedAssignments {
        suggestions,
        records,
    })
}

fn records_from_suggestions(
    roster: &Roster,
    survey: &SurveyId,
    suggestions: &SuggestionMap,
) -> Vec<AssignmentRecord> {
    let id_by_number: HashMap<_, _> = roster
        .iter()
        .map(|record| (record.employee_number, record.id.clone()))
        .collect();

    let mut records = Vec::new();
    for (evaluator_number, entries) in suggestions {
        let Some(evaluator_id) = id_by_number.get(evaluator_number) else {
            warn!(%evaluator_number, "suggestion for unknown employee number, skipping");
            continue;
        };
        for entry in entries {
            let Some(target_id) = id_by_number.get(&entry.employee_number) else {
                warn!(target_number = %entry.employee_number, "suggested target not in roster, skipping");
                continue;
            };
            records.push(AssignmentRecord {
                id: Uuid::new_v4(),
                employee_id: evaluator_id.clone(),
                survey_id: survey.clone(),
                survey_type: SurveyType::ThreeSixty,
                target_employee_id: Some(target_id.clone()),
                target_type: TargetType::Employee,
                relation: Some(entry.relation),
                created_at: Utc::now(),
            });
        }
    }
    records
}
