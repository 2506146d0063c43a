//! Console tables for query results

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::entity::department::{self, DepartmentBudget};
use crate::entity::employee::EmployeeRecord;
use crate::entity::role::RoleRecord;
use crate::store::CascadeReport;

#[derive(Tabled)]
struct DepartmentRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Salary")]
    salary: String,
}

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "First Name")]
    first_name: String,
    #[tabled(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Manager")]
    manager: String,
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Employees")]
    headcount: i64,
    #[tabled(rename = "Total Budget")]
    total_budget: String,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn departments(departments: &[department::Model]) -> String {
    if departments.is_empty() {
        return "No departments found.".to_string();
    }
    table(
        departments
            .iter()
            .map(|d| DepartmentRow {
                id: d.id,
                name: d.name.clone(),
            })
            .collect(),
    )
}

pub fn roles(roles: &[RoleRecord]) -> String {
    if roles.is_empty() {
        return "No roles found.".to_string();
    }
    table(
        roles
            .iter()
            .map(|r| RoleRow {
                id: r.id,
                title: r.title.clone(),
                department: r.department.clone(),
                salary: money(r.salary),
            })
            .collect(),
    )
}

pub fn employees(employees: &[EmployeeRecord]) -> String {
    if employees.is_empty() {
        return "No employees found.".to_string();
    }
    table(
        employees
            .iter()
            .map(|e| EmployeeRow {
                id: e.id,
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                title: e.title.clone(),
                department: e.department.clone(),
                salary: money(e.salary),
                manager: e.manager_name().unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn budget(department: &str, budget: Option<&DepartmentBudget>) -> String {
    match budget {
        Some(b) => table(vec![BudgetRow {
            department: b.department.clone(),
            headcount: b.headcount,
            total_budget: money(b.total_budget),
        }]),
        None => format!("No employees in {}, budget is 0.00.", department),
    }
}

fn plural(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// One-line summary of what a delete removed
pub fn cascade_summary(report: &CascadeReport) -> String {
    let mut parts = Vec::new();
    if report.departments > 0 {
        parts.push(plural(report.departments, "department", "departments"));
    }
    if report.roles > 0 || report.departments > 0 {
        parts.push(plural(report.roles, "role", "roles"));
    }
    parts.push(plural(report.employees, "employee", "employees"));

    let mut summary = format!("Deleted {}.", parts.join(", "));
    if report.manager_links_cleared > 0 {
        let verb = if report.manager_links_cleared == 1 { "has" } else { "have" };
        summary.push_str(&format!(
            " {} no longer {} a manager.",
            plural(report.manager_links_cleared, "employee", "employees"),
            verb
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> EmployeeRecord {
        EmployeeRecord {
            id: 3,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role_id: 1,
            title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            salary: 75000.0,
            manager_id: Some(1),
            manager_first_name: Some("Grace".to_string()),
            manager_last_name: Some("Hopper".to_string()),
        }
    }

    #[test]
    fn test_empty_results_render_a_message() {
        assert_eq!(departments(&[]), "No departments found.");
        assert_eq!(roles(&[]), "No roles found.");
        assert_eq!(employees(&[]), "No employees found.");
    }

    #[test]
    fn test_employee_table() {
        let out = employees(&[ada()]);
        assert!(out.contains("First Name"));
        assert!(out.contains("Lovelace"));
        assert!(out.contains("75000.00"));
        assert!(out.contains("Grace Hopper"));
    }

    #[test]
    fn test_department_table() {
        let out = departments(&[department::Model {
            id: 1,
            name: "Sales".to_string(),
        }]);
        assert!(out.contains("Name"));
        assert!(out.contains("Sales"));
    }

    #[test]
    fn test_budget() {
        let b = DepartmentBudget {
            department_id: 1,
            department: "Engineering".to_string(),
            headcount: 2,
            total_budget: 110000.0,
        };
        assert!(budget("Engineering", Some(&b)).contains("110000.00"));
        assert_eq!(
            budget("Legal", None),
            "No employees in Legal, budget is 0.00."
        );
    }

    #[test]
    fn test_cascade_summary() {
        let report = CascadeReport {
            departments: 1,
            roles: 2,
            employees: 3,
            manager_links_cleared: 0,
        };
        assert_eq!(
            cascade_summary(&report),
            "Deleted 1 department, 2 roles, 3 employees."
        );

        let report = CascadeReport {
            employees: 1,
            manager_links_cleared: 2,
            ..Default::default()
        };
        assert_eq!(
            cascade_summary(&report),
            "Deleted 1 employee. 2 employees no longer have a manager."
        );
    }
}
