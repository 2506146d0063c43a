//! Entity module - SeaORM entity definitions
//!
//! One entity per table. Foreign keys are declared as `belongs_to`
//! relations so the auto-migration creates them.

pub mod department;
pub mod employee;
pub mod role;
