//! Employee → manager directory.

use crate::types::{EmployeeId, ManagerId, ManagerInfo};
use std::collections::BTreeMap;

/// Static mapping from employees to the manager whose tokens they spend
///
/// Never mutated once a session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDirectory {
    entries: BTreeMap<EmployeeId, ManagerInfo>,
}

impl EmployeeDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee (builder style)
    #[must_use]
    pub fn with_employee(
        mut self,
        employee: impl Into<EmployeeId>,
        manager_id: impl Into<ManagerId>,
        manager_name: impl Into<String>,
    ) -> Self {
        self.entries
            .insert(employee.into(), ManagerInfo::new(manager_id, manager_name));
        self
    }

    /// The office roster used by the demo data set
    #[must_use]
    pub fn office_roster() -> Self {
        Self::new()
            .with_employee("EMP101", "MGR001", "Manager A")
            .with_employee("EMP102", "MGR001", "Manager A")
            .with_employee("EMP103", "MGR002", "Manager B")
            .with_employee("EMP104", "MGR002", "Manager B")
            .with_employee("EMP105", "MGR003", "Manager C")
    }

    /// Manager of `employee`
    #[must_use]
    pub fn manager_of(&self, employee: &EmployeeId) -> Option<&ManagerInfo> {
        self.entries.get(employee)
    }

    /// Display name of a manager, if any employee reports to them
    #[must_use]
    pub fn manager_name(&self, manager: &ManagerId) -> Option<&str> {
        self.entries
            .values()
            .find(|info| &info.id == manager)
            .map(|info| info.name.as_str())
    }

    /// Employees in id order, with their managers
    pub fn employees(&self) -> impl Iterator<Item = (&EmployeeId, &ManagerInfo)> {
        self.entries.iter()
    }

    /// Number of employees
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
