//! Role operations

use sea_orm::sea_query::{Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use tracing::{info, instrument};

use super::employee::{employee_ids, release_reports};
use super::{from_transaction, storage, validate, CascadeReport, Store};
use crate::entity::department;
use crate::entity::employee;
use crate::entity::role::{self, RoleRecord};
use crate::error::{AppError, AppResult, OptionExt};

/// `SELECT id FROM role WHERE <condition>`, for use as a subquery
pub(super) fn role_ids(condition: SimpleExpr) -> SelectStatement {
    Query::select()
        .column(role::Column::Id)
        .from(role::Entity)
        .and_where(condition)
        .to_owned()
}

impl Store {
    /// All roles with their department name, ordered by id
    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        role::Entity::find()
            .select_only()
            .column_as(role::Column::Id, "id")
            .column_as(role::Column::Title, "title")
            .column_as(role::Column::DepartmentId, "department_id")
            .column_as(department::Column::Name, "department")
            .column_as(role::Column::Salary, "salary")
            .join(JoinType::InnerJoin, role::Relation::Department.def())
            .order_by_asc(role::Column::Id)
            .into_model::<RoleRecord>()
            .all(&self.db)
            .await
            .map_err(storage("list_roles"))
    }

    #[instrument(skip(self))]
    pub async fn find_role(&self, id: i32) -> AppResult<Option<role::Model>> {
        role::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage("find_role"))
    }

    /// Create a role in an existing department and return its id
    #[instrument(skip(self))]
    pub async fn add_role(&self, title: &str, salary: f64, department_id: i32) -> AppResult<i32> {
        let title = validate::text("Role title", title, validate::TITLE_MAX_LEN)?;
        let salary = validate::salary(salary)?;

        self.find_department(department_id)
            .await?
            .ok_or_reference("department", department_id)?;

        let role = role::ActiveModel {
            title: Set(title),
            salary: Set(salary),
            department_id: Set(department_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(storage("add_role"))?;

        info!(role_id = role.id, department_id, "Role '{}' added", role.title);
        Ok(role.id)
    }

    /// Delete a role and every employee holding it, in one transaction.
    /// Employees who reported to a removed employee lose their manager.
    #[instrument(skip(self))]
    pub async fn delete_role(&self, id: i32) -> AppResult<CascadeReport> {
        const OP: &str = "delete_role";

        let report = self
            .db
            .transaction::<_, CascadeReport, AppError>(move |txn| {
                Box::pin(async move {
                    role::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(storage(OP))?
                        .ok_or_reference("role", id)?;

                    let doomed = employee_ids(employee::Column::RoleId.eq(id));
                    let manager_links_cleared = release_reports(txn, doomed, OP).await?;

                    let employees = employee::Entity::delete_many()
                        .filter(employee::Column::RoleId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    let roles = role::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    Ok(CascadeReport {
                        roles: roles.rows_affected,
                        employees: employees.rows_affected,
                        manager_links_cleared,
                        ..Default::default()
                    })
                })
            })
            .await
            .map_err(|e| from_transaction(OP, e))?;

        info!(role_id = id, employees = report.employees, "Role deleted");
        Ok(report)
    }
}
