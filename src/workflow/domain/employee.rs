//! Employees and the departments they work in.

use super::{DepartmentId, EmployeeId, ParseEmployeeRoleError, Stage, WorkflowDomainError};
use serde::{Deserialize, Serialize};

/// System role of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Full administrative access.
    Administrator,
    /// Plans and assigns work within a department.
    Supervisor,
    /// Performs production tasks.
    Operator,
}

impl EmployeeRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Supervisor => "supervisor",
            Self::Operator => "operator",
        }
    }
}

impl TryFrom<&str> for EmployeeRole {
    type Error = ParseEmployeeRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "supervisor" | "manager" => Ok(Self::Supervisor),
            "operator" | "employee" => Ok(Self::Operator),
            _ => Err(ParseEmployeeRoleError(value.to_owned())),
        }
    }
}

/// Validates and trims a display name.
fn normalized_name(value: impl Into<String>) -> Result<String, WorkflowDomainError> {
    let raw = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WorkflowDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Department performing one or more production stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: String,
}

impl Department {
    /// Creates a department with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        Self::with_id(DepartmentId::new(), name)
    }

    /// Creates a department with a known identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn with_id(id: DepartmentId, name: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        Ok(Self {
            id,
            name: normalized_name(name)?,
        })
    }

    /// Returns the department identifier.
    #[must_use]
    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stage this department performs, judged by its name.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        Stage::try_from(self.name.as_str()).ok()
    }
}

/// Employee who may be assigned production tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    name: String,
    department: Option<DepartmentId>,
    role: EmployeeRole,
}

impl Employee {
    /// Creates an employee with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        department: Option<DepartmentId>,
        role: EmployeeRole,
    ) -> Result<Self, WorkflowDomainError> {
        Self::with_id(EmployeeId::new(), name, department, role)
    }

    /// Creates an employee with a known identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn with_id(
        id: EmployeeId,
        name: impl Into<String>,
        department: Option<DepartmentId>,
        role: EmployeeRole,
    ) -> Result<Self, WorkflowDomainError> {
        Ok(Self {
            id,
            name: normalized_name(name)?,
            department,
            role,
        })
    }

    /// Returns the employee identifier.
    #[must_use]
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// Returns the employee name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the employee's department, if any.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Returns the employee's system role.
    #[must_use]
    pub const fn role(&self) -> EmployeeRole {
        self.role
    }
}
