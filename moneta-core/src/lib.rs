//! moneta-core: data model, aggregation, and form validation for the
//! Money Manager API client. Pure types and functions only; all I/O lives
//! in moneta-client.

pub mod aggregate;
pub mod model;
pub mod validate;

pub use aggregate::{CategoryTotal, TrendPoint, aggregate_by_category, recent_trend};
pub use model::{
    Category, CategoryType, DashboardSummary, Profile, Transaction, TransactionKind,
    TransactionPayload,
};
pub use validate::{
    ValidationError, validate_category_name, validate_login, validate_register,
    validate_transaction,
};
