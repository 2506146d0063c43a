//! Role entity
//!
//! Table: role

use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Role title
    #[sea_orm(column_type = "String(Some(64))")]
    pub title: String,

    /// Yearly salary, never negative
    #[sea_orm(column_type = "Double")]
    pub salary: f64,

    pub department_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Role joined with its department name
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct RoleRecord {
    pub id: i32,
    pub title: String,
    pub department_id: i32,
    pub department: String,
    pub salary: f64,
}
