//! Employee entity
//!
//! Table: employee. `manager_id` points back into the same table.

use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(Some(32))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(32))")]
    pub last_name: String,

    pub role_id: i32,

    /// Manager (another employee), if any
    #[sea_orm(nullable)]
    pub manager_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
    #[sea_orm(belongs_to = "Entity", from = "Column::ManagerId", to = "Column::Id")]
    Manager,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Employee joined with role, department and manager
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct EmployeeRecord {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub title: String,
    pub department: String,
    pub salary: f64,
    pub manager_id: Option<i32>,
    pub manager_first_name: Option<String>,
    pub manager_last_name: Option<String>,
}

impl EmployeeRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Manager's full name, if the employee has one
    pub fn manager_name(&self) -> Option<String> {
        match (&self.manager_first_name, &self.manager_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(manager: Option<(&str, &str)>) -> EmployeeRecord {
        EmployeeRecord {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role_id: 1,
            title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            salary: 90000.0,
            manager_id: manager.map(|_| 2),
            manager_first_name: manager.map(|(f, _)| f.to_string()),
            manager_last_name: manager.map(|(_, l)| l.to_string()),
        }
    }

    #[test]
    fn test_manager_name() {
        assert_eq!(record(None).manager_name(), None);
        assert_eq!(
            record(Some(("Grace", "Hopper"))).manager_name().as_deref(),
            Some("Grace Hopper")
        );
        assert_eq!(record(None).full_name(), "Ada Lovelace");
    }
}
