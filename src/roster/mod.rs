//! Employee roster model
//!
//! The engine never touches persistence; callers materialize one tenant's
//! employee records into a [`Roster`] and hand it over. Iteration order is
//! the input order and is the tie-break order everywhere downstream.

pub mod types;

pub use types::{EmployeeId, EmployeeNumber, SurveyId, TenantId};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One employee as read from the tenant's store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub employee_number: EmployeeNumber,
    /// Weak reference into the same roster; `None` for top-level employees
    #[serde(default)]
    pub direct_supervisor_id: Option<EmployeeId>,
    /// Weak reference into the same roster, independent of the direct line
    #[serde(default)]
    pub functional_supervisor_id: Option<EmployeeId>,
}

impl EmployeeRecord {
    pub fn new(id: impl Into<EmployeeId>, employee_number: impl Into<EmployeeNumber>) -> Self {
        Self {
            id: id.into(),
            employee_number: employee_number.into(),
            direct_supervisor_id: None,
            functional_supervisor_id: None,
        }
    }

    pub fn with_direct_supervisor(mut self, supervisor: impl Into<EmployeeId>) -> Self {
        self.direct_supervisor_id = Some(supervisor.into());
        self
    }

    pub fn with_functional_supervisor(mut self, supervisor: impl Into<EmployeeId>) -> Self {
        self.functional_supervisor_id = Some(supervisor.into());
        self
    }
}

/// Insertion-ordered snapshot of one tenant's employees
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: IndexMap<EmployeeId, EmployeeRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from records in store order. Duplicate ids keep the
    /// first record; later ones are dropped with a warning.
    pub fn from_records(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        let mut roster = Roster::new();
        for record in records {
            roster.push(record);
        }
        roster
    }

    /// Append one record, skipping duplicates of an already-present id.
    pub fn push(&mut self, record: EmployeeRecord) {
        if self.records.contains_key(&record.id) {
            warn!(employee_id = %record.id, "duplicate employee id in roster, keeping first record");
            return;
        }
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&EmployeeRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.records.contains_key(id)
    }

    /// Dense index of an employee in roster order
    pub fn position(&self, id: &EmployeeId) -> Option<usize> {
        self.records.get_index_of(id)
    }

    /// Record at a dense roster index
    pub fn at(&self, index: usize) -> Option<&EmployeeRecord> {
        self.records.get_index(index).map(|(_, record)| record)
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.records.values()
    }

    /// The employee's direct supervisor, if it resolves within this roster
    pub fn direct_supervisor_of(&self, record: &EmployeeRecord) -> Option<&EmployeeRecord> {
        let supervisor_id = record.direct_supervisor_id.as_ref()?;
        if supervisor_id == &record.id {
            return None;
        }
        self.records.get(supervisor_id)
    }

    /// Employees whose direct supervisor is `id`, in roster order. An
    /// employee naming itself is never its own report.
    pub fn direct_reports_of<'a>(
        &'a self,
        id: &'a EmployeeId,
    ) -> impl Iterator<Item = &'a EmployeeRecord> + 'a {
        self.records
            .values()
            .filter(move |record| record.direct_supervisor_id.as_ref() == Some(id) && &record.id != id)
    }
}
