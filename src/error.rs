use sea_orm::DbErr;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A caller-supplied value failed a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// A foreign key does not resolve to an existing row
    #[error("Reference error: {entity} {id} does not exist")]
    Reference { entity: &'static str, id: i32 },

    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn reference(entity: &'static str, id: i32) -> Self {
        AppError::Reference { entity, id }
    }

    pub fn storage(operation: &'static str, source: DbErr) -> Self {
        AppError::Storage { operation, source }
    }

    /// Message suitable for showing to the person at the menu.
    /// Storage failures stay generic; the details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Reference { entity, id } => {
                format!("{} ID {} does not exist.", capitalize(entity), id)
            }
            AppError::Storage { .. } => {
                "The operation failed. Nothing was changed.".to_string()
            }
            AppError::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

/// Helper trait for converting a missing lookup into AppError::Reference
pub trait OptionExt<T> {
    fn ok_or_reference(self, entity: &'static str, id: i32) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_reference(self, entity: &'static str, id: i32) -> AppResult<T> {
        self.ok_or_else(|| AppError::reference(entity, id))
    }
}
