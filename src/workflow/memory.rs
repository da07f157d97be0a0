//! In-memory collaborator implementations
//!
//! Back the workflow in tests and in embedded setups that manage their own
//! persistence. The store enforces the same composite-key uniqueness the
//! durable layer would.

use super::{AssignmentRecord, AssignmentStore, RosterProvider};
use crate::roster::{Roster, TenantId};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Roster provider over a fixed set of tenants
#[derive(Debug, Default)]
pub struct InMemoryRosterProvider {
    rosters: HashMap<TenantId, Roster>,
}

impl InMemoryRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(mut self, tenant: impl Into<TenantId>, roster: Roster) -> Self {
        self.rosters.insert(tenant.into(), roster);
        self
    }
}

#[async_trait]
impl RosterProvider for InMemoryRosterProvider {
    async fn roster(&self, tenant: &TenantId) -> anyhow::Result<Roster> {
        self.rosters
            .get(tenant)
            .cloned()
            .ok_or_else(|| anyhow!("no roster for tenant {tenant}"))
    }
}

/// Assignment store that keeps rows in memory, one per unique
/// (employee, survey, target, target type) key
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    rows: Mutex<Vec<AssignmentRecord>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored rows
    pub fn records(&self) -> Vec<AssignmentRecord> {
        self.rows.lock().expect("store lock poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().expect("store lock poisoned").is_empty()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn persist(&self, records: Vec<AssignmentRecord>) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().expect("store lock poisoned");
        for record in records {
            let duplicate = rows.iter().any(|existing| {
                existing.employee_id == record.employee_id
                    && existing.survey_id == record.survey_id
                    && existing.target_employee_id == record.target_employee_id
                    && existing.target_type == record.target_type
            });
            if !duplicate {
                rows.push(record);
            }
        }
        Ok(())
    }
}
