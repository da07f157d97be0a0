//! Core identifier types for the assignment engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable internal identifier of an employee (the store's primary key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        EmployeeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        EmployeeId(s)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        EmployeeId(s.to_string())
    }
}

/// Human-facing employee number, the business key used in suggestion output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EmployeeNumber(pub u32);

impl EmployeeNumber {
    pub fn new(number: u32) -> Self {
        EmployeeNumber(number)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EmployeeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EmployeeNumber {
    fn from(number: u32) -> Self {
        EmployeeNumber(number)
    }
}

/// Identifier of one client organization; rosters never cross tenants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        TenantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId(s.to_string())
    }
}

/// Identifier of a survey document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyId(String);

impl SurveyId {
    pub fn new(id: impl Into<String>) -> Self {
        SurveyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SurveyId {
    fn from(s: &str) -> Self {
        SurveyId(s.to_string())
    }
}
