//! Employee operations

use sea_orm::sea_query::{Alias, Expr, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait, Value,
};
use tracing::{info, instrument};

use super::{from_transaction, storage, validate, CascadeReport, Store};
use crate::entity::department;
use crate::entity::employee::{self, EmployeeRecord};
use crate::entity::role;
use crate::error::{AppError, AppResult, OptionExt};

/// Table alias for the manager side of the self-join
const MANAGER: &str = "manager";

/// Input for adding an employee
#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub manager_id: Option<i32>,
}

/// `SELECT id FROM employee WHERE <condition>`, for use as a subquery
pub(super) fn employee_ids(condition: SimpleExpr) -> SelectStatement {
    Query::select()
        .column(employee::Column::Id)
        .from(employee::Entity)
        .and_where(condition)
        .to_owned()
}

/// Clear `manager_id` on every employee managed by someone in `doomed`.
///
/// Returns how many employees outside `doomed` lost their manager. Links
/// inside the set are cleared too so the rows can be deleted in any order.
pub(super) async fn release_reports<C: ConnectionTrait>(
    conn: &C,
    doomed: SelectStatement,
    operation: &'static str,
) -> AppResult<u64> {
    let survivors = employee::Entity::update_many()
        .col_expr(employee::Column::ManagerId, Expr::value(Value::Int(None)))
        .filter(employee::Column::ManagerId.in_subquery(doomed.clone()))
        .filter(employee::Column::Id.not_in_subquery(doomed.clone()))
        .exec(conn)
        .await
        .map_err(storage(operation))?;

    employee::Entity::update_many()
        .col_expr(employee::Column::ManagerId, Expr::value(Value::Int(None)))
        .filter(employee::Column::ManagerId.in_subquery(doomed))
        .exec(conn)
        .await
        .map_err(storage(operation))?;

    Ok(survivors.rows_affected)
}

/// Employees joined with role, department and manager name
fn records() -> Select<employee::Entity> {
    let manager = Alias::new(MANAGER);

    employee::Entity::find()
        .select_only()
        .column_as(employee::Column::Id, "id")
        .column_as(employee::Column::FirstName, "first_name")
        .column_as(employee::Column::LastName, "last_name")
        .column_as(employee::Column::RoleId, "role_id")
        .column_as(role::Column::Title, "title")
        .column_as(department::Column::Name, "department")
        .column_as(role::Column::Salary, "salary")
        .column_as(employee::Column::ManagerId, "manager_id")
        .column_as(
            Expr::col((manager.clone(), employee::Column::FirstName)),
            "manager_first_name",
        )
        .column_as(
            Expr::col((manager.clone(), employee::Column::LastName)),
            "manager_last_name",
        )
        .join(JoinType::InnerJoin, employee::Relation::Role.def())
        .join(JoinType::InnerJoin, role::Relation::Department.def())
        .join_as(JoinType::LeftJoin, employee::Relation::Manager.def(), manager)
        .order_by_asc(employee::Column::Id)
}

impl Store {
    /// All employees ordered by id
    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        records()
            .into_model::<EmployeeRecord>()
            .all(&self.db)
            .await
            .map_err(storage("list_employees"))
    }

    /// Employees whose role belongs to the department
    #[instrument(skip(self))]
    pub async fn employees_by_department(
        &self,
        department_id: i32,
    ) -> AppResult<Vec<EmployeeRecord>> {
        records()
            .filter(role::Column::DepartmentId.eq(department_id))
            .into_model::<EmployeeRecord>()
            .all(&self.db)
            .await
            .map_err(storage("employees_by_department"))
    }

    /// Direct reports of a manager
    #[instrument(skip(self))]
    pub async fn employees_by_manager(&self, manager_id: i32) -> AppResult<Vec<EmployeeRecord>> {
        records()
            .filter(employee::Column::ManagerId.eq(manager_id))
            .into_model::<EmployeeRecord>()
            .all(&self.db)
            .await
            .map_err(storage("employees_by_manager"))
    }

    #[instrument(skip(self))]
    pub async fn find_employee(&self, id: i32) -> AppResult<Option<employee::Model>> {
        employee::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage("find_employee"))
    }

    /// Create an employee and return its id
    #[instrument(skip(self))]
    pub async fn add_employee(&self, new: NewEmployee) -> AppResult<i32> {
        let first_name = validate::text("First name", &new.first_name, validate::NAME_MAX_LEN)?;
        let last_name = validate::text("Last name", &new.last_name, validate::NAME_MAX_LEN)?;

        self.find_role(new.role_id)
            .await?
            .ok_or_reference("role", new.role_id)?;
        if let Some(manager_id) = new.manager_id {
            self.find_employee(manager_id)
                .await?
                .ok_or_reference("manager", manager_id)?;
        }

        let employee = employee::ActiveModel {
            first_name: Set(first_name),
            last_name: Set(last_name),
            role_id: Set(new.role_id),
            manager_id: Set(new.manager_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(storage("add_employee"))?;

        info!(employee_id = employee.id, "Employee '{}' added", employee.full_name());
        Ok(employee.id)
    }

    /// Move an employee to another role
    #[instrument(skip(self))]
    pub async fn update_employee_role(&self, employee_id: i32, role_id: i32) -> AppResult<()> {
        let employee = self
            .find_employee(employee_id)
            .await?
            .ok_or_reference("employee", employee_id)?;
        self.find_role(role_id)
            .await?
            .ok_or_reference("role", role_id)?;

        let mut active: employee::ActiveModel = employee.into();
        active.role_id = Set(role_id);
        active
            .update(&self.db)
            .await
            .map_err(storage("update_employee_role"))?;

        info!(employee_id, role_id, "Employee role updated");
        Ok(())
    }

    /// Assign or clear an employee's manager
    #[instrument(skip(self))]
    pub async fn update_employee_manager(
        &self,
        employee_id: i32,
        manager_id: Option<i32>,
    ) -> AppResult<()> {
        if manager_id == Some(employee_id) {
            return Err(AppError::validation(
                "An employee cannot be their own manager.",
            ));
        }

        let employee = self
            .find_employee(employee_id)
            .await?
            .ok_or_reference("employee", employee_id)?;
        if let Some(manager_id) = manager_id {
            self.find_employee(manager_id)
                .await?
                .ok_or_reference("manager", manager_id)?;
        }

        let mut active: employee::ActiveModel = employee.into();
        active.manager_id = Set(manager_id);
        active
            .update(&self.db)
            .await
            .map_err(storage("update_employee_manager"))?;

        info!(employee_id, ?manager_id, "Employee manager updated");
        Ok(())
    }

    /// Delete one employee. Their direct reports are left without a manager.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: i32) -> AppResult<CascadeReport> {
        const OP: &str = "delete_employee";

        let report = self
            .db
            .transaction::<_, CascadeReport, AppError>(move |txn| {
                Box::pin(async move {
                    employee::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(storage(OP))?
                        .ok_or_reference("employee", id)?;

                    let doomed = employee_ids(employee::Column::Id.eq(id));
                    let manager_links_cleared = release_reports(txn, doomed, OP).await?;

                    let employees = employee::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    Ok(CascadeReport {
                        employees: employees.rows_affected,
                        manager_links_cleared,
                        ..Default::default()
                    })
                })
            })
            .await
            .map_err(|e| from_transaction(OP, e))?;

        info!(employee_id = id, reports = report.manager_links_cleared, "Employee deleted");
        Ok(report)
    }
}
