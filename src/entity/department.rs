//! Department entity
//!
//! Table: department

use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "department")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Department name (unique)
    #[sea_orm(column_type = "String(Some(64))", unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Salary total for one department
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct DepartmentBudget {
    pub department_id: i32,
    pub department: String,
    /// Number of employees counted
    pub headcount: i64,
    pub total_budget: f64,
}
