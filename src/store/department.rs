//! Department operations, including the department cascade delete

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use tracing::{info, instrument};

use super::employee::{employee_ids, release_reports};
use super::role::role_ids;
use super::{from_transaction, storage, validate, CascadeReport, Store};
use crate::entity::department::{self, DepartmentBudget};
use crate::entity::{employee, role};
use crate::error::{AppError, AppResult, OptionExt};

impl Store {
    /// All departments ordered by id
    #[instrument(skip(self))]
    pub async fn list_departments(&self) -> AppResult<Vec<department::Model>> {
        department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage("list_departments"))
    }

    #[instrument(skip(self))]
    pub async fn find_department(&self, id: i32) -> AppResult<Option<department::Model>> {
        department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage("find_department"))
    }

    /// Create a department and return its id
    #[instrument(skip(self))]
    pub async fn add_department(&self, name: &str) -> AppResult<i32> {
        let name = validate::text("Department name", name, validate::TITLE_MAX_LEN)?;

        let existing = department::Entity::find()
            .filter(department::Column::Name.eq(&name))
            .one(&self.db)
            .await
            .map_err(storage("add_department"))?;
        if existing.is_some() {
            return Err(AppError::validation(format!(
                "Department '{}' already exists.",
                name
            )));
        }

        let dept = department::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(storage("add_department"))?;

        info!(department_id = dept.id, "Department '{}' added", dept.name);
        Ok(dept.id)
    }

    /// Delete a department together with its roles and the employees
    /// holding them.
    ///
    /// Runs in one transaction, deepest dependents first: employees, then
    /// roles, then the department row. Employees elsewhere who reported to
    /// a removed employee lose their manager instead of keeping a dangling
    /// id.
    #[instrument(skip(self))]
    pub async fn delete_department(&self, id: i32) -> AppResult<CascadeReport> {
        const OP: &str = "delete_department";

        let report = self
            .db
            .transaction::<_, CascadeReport, AppError>(move |txn| {
                Box::pin(async move {
                    department::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(storage(OP))?
                        .ok_or_reference("department", id)?;

                    let roles = role_ids(role::Column::DepartmentId.eq(id));
                    let doomed = employee_ids(employee::Column::RoleId.in_subquery(roles.clone()));
                    let manager_links_cleared = release_reports(txn, doomed, OP).await?;

                    let employees = employee::Entity::delete_many()
                        .filter(employee::Column::RoleId.in_subquery(roles))
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    let roles = role::Entity::delete_many()
                        .filter(role::Column::DepartmentId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    let departments = department::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(storage(OP))?;

                    Ok(CascadeReport {
                        departments: departments.rows_affected,
                        roles: roles.rows_affected,
                        employees: employees.rows_affected,
                        manager_links_cleared,
                    })
                })
            })
            .await
            .map_err(|e| from_transaction(OP, e))?;

        info!(
            department_id = id,
            roles = report.roles,
            employees = report.employees,
            "Department deleted"
        );
        Ok(report)
    }

    /// Salary total of the employees holding roles in a department.
    /// `None` when nobody works there.
    #[instrument(skip(self))]
    pub async fn department_budget(&self, id: i32) -> AppResult<Option<DepartmentBudget>> {
        employee::Entity::find()
            .select_only()
            .column_as(department::Column::Id, "department_id")
            .column_as(department::Column::Name, "department")
            .column_as(
                Expr::col((employee::Entity, employee::Column::Id)).count(),
                "headcount",
            )
            .column_as(
                Expr::col((role::Entity, role::Column::Salary)).sum(),
                "total_budget",
            )
            .join(JoinType::InnerJoin, employee::Relation::Role.def())
            .join(JoinType::InnerJoin, role::Relation::Department.def())
            .filter(role::Column::DepartmentId.eq(id))
            .group_by(department::Column::Id)
            .group_by(department::Column::Name)
            .into_model::<DepartmentBudget>()
            .one(&self.db)
            .await
            .map_err(storage("department_budget"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use sea_orm::PaginatorTrait;

    async fn counts(store: &Store) -> (u64, u64, u64) {
        let db = store.connection();
        (
            department::Entity::find().count(db).await.unwrap(),
            role::Entity::find().count(db).await.unwrap(),
            employee::Entity::find().count(db).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_add_department_round_trip() {
        let store = store().await;

        let id = store.add_department("X").await.unwrap();
        let departments = store.list_departments().await.unwrap();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].id, id);
        assert_eq!(departments[0].name, "X");

        store.delete_department(id).await.unwrap();
        let departments = store.list_departments().await.unwrap();
        assert!(departments.iter().all(|d| d.name != "X"));
    }

    #[tokio::test]
    async fn test_add_department_rejects_empty_name() {
        let store = store().await;

        assert!(matches!(
            store.add_department("").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.add_department("   ").await,
            Err(AppError::Validation(_))
        ));
        assert!(store.list_departments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_department_rejects_duplicate() {
        let store = store().await;

        store.add_department("Sales").await.unwrap();
        assert!(matches!(
            store.add_department(" Sales ").await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.list_departments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_departments_empty_is_ok() {
        let store = store().await;
        assert!(store.list_departments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_department_without_roles() {
        let store = store().await;
        let (_, role_id) = department_with_role(&store, "Engineering", "Engineer", 1.0).await;
        hire(&store, "Ann", role_id, None).await;
        let empty = store.add_department("Legal").await.unwrap();

        let report = store.delete_department(empty).await.unwrap();

        assert_eq!(
            report,
            CascadeReport {
                departments: 1,
                ..Default::default()
            }
        );
        assert_eq!(counts(&store).await, (1, 1, 1));
    }

    #[tokio::test]
    async fn test_delete_department_cascades() {
        let store = store().await;
        let (dept, engineer) = department_with_role(&store, "Engineering", "Engineer", 75000.0).await;
        let lead = store.add_role("Lead", 95000.0, dept).await.unwrap();
        let (_, seller) = department_with_role(&store, "Sales", "Seller", 50000.0).await;

        let boss = hire(&store, "Boss", lead, None).await;
        hire(&store, "Dev1", engineer, Some(boss)).await;
        hire(&store, "Dev2", engineer, Some(boss)).await;
        let kept = hire(&store, "Sam", seller, None).await;

        let report = store.delete_department(dept).await.unwrap();

        assert_eq!(report.departments, 1);
        assert_eq!(report.roles, 2);
        assert_eq!(report.employees, 3);
        assert_eq!(report.manager_links_cleared, 0);
        assert_eq!(counts(&store).await, (1, 1, 1));

        let db = store.connection();
        let orphan_roles = role::Entity::find()
            .filter(role::Column::DepartmentId.eq(dept))
            .count(db)
            .await
            .unwrap();
        assert_eq!(orphan_roles, 0);
        let orphan_employees = employee::Entity::find()
            .filter(employee::Column::RoleId.is_in([engineer, lead]))
            .count(db)
            .await
            .unwrap();
        assert_eq!(orphan_employees, 0);
        assert!(store.find_employee(kept).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_department_releases_reports_elsewhere() {
        let store = store().await;
        let (dept, lead) = department_with_role(&store, "Engineering", "Lead", 90000.0).await;
        let (_, seller) = department_with_role(&store, "Sales", "Seller", 50000.0).await;

        let boss = hire(&store, "Boss", lead, None).await;
        let report_id = hire(&store, "Sam", seller, Some(boss)).await;

        let report = store.delete_department(dept).await.unwrap();

        assert_eq!(report.employees, 1);
        assert_eq!(report.manager_links_cleared, 1);
        let sam = store.find_employee(report_id).await.unwrap().unwrap();
        assert_eq!(sam.manager_id, None);
    }

    #[tokio::test]
    async fn test_delete_department_rolls_back_on_failure() {
        let store = store().await;
        let (dept, engineer) = department_with_role(&store, "Engineering", "Engineer", 75000.0).await;
        let (_, analyst) = department_with_role(&store, "Finance", "Analyst", 60000.0).await;
        let boss = hire(&store, "Boss", engineer, None).await;
        let report = hire(&store, "Ann", analyst, Some(boss)).await;
        abort_deletes_on(&store, "department").await;

        assert!(matches!(
            store.delete_department(dept).await,
            Err(AppError::Storage {
                operation: "delete_department",
                ..
            })
        ));

        assert_eq!(counts(&store).await, (2, 2, 2));
        assert!(store.find_role(engineer).await.unwrap().is_some());
        assert!(store.find_employee(boss).await.unwrap().is_some());
        let ann = store.find_employee(report).await.unwrap().unwrap();
        assert_eq!(ann.manager_id, Some(boss));
    }

    #[tokio::test]
    async fn test_add_department_name_length() {
        let store = store().await;

        let longest = "D".repeat(64);
        let id = store.add_department(&longest).await.unwrap();
        assert_eq!(store.find_department(id).await.unwrap().unwrap().name, longest);

        assert!(matches!(
            store.add_department(&"D".repeat(65)).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.list_departments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_department() {
        let store = store().await;
        store.add_department("Ops").await.unwrap();

        assert!(matches!(
            store.delete_department(999).await,
            Err(AppError::Reference {
                entity: "department",
                id: 999
            })
        ));
        assert_eq!(counts(&store).await, (1, 0, 0));
    }

    #[tokio::test]
    async fn test_department_budget() {
        let store = store().await;
        let (dept, low) = department_with_role(&store, "Engineering", "Junior", 50000.0).await;
        let high = store.add_role("Senior", 60000.0, dept).await.unwrap();
        // Unfilled roles do not count.
        store.add_role("Architect", 150000.0, dept).await.unwrap();
        hire(&store, "A", low, None).await;
        hire(&store, "B", high, None).await;

        let budget = store.department_budget(dept).await.unwrap().unwrap();

        assert_eq!(budget.department_id, dept);
        assert_eq!(budget.department, "Engineering");
        assert_eq!(budget.headcount, 2);
        assert_eq!(budget.total_budget, 110000.0);
    }

    #[tokio::test]
    async fn test_department_budget_without_employees() {
        let store = store().await;
        let (dept, _) = department_with_role(&store, "Research", "Scientist", 80000.0).await;

        assert_eq!(store.department_budget(dept).await.unwrap(), None);
        assert_eq!(store.department_budget(12345).await.unwrap(), None);
    }
}
