//! Permit authorization policy engine.
//!
//! The original system expressed these rules as database-side row-level
//! security policies. Here they are an explicit, pure decision function
//! invoked on every data-access path: given a principal, a table and an
//! operation, the engine either returns a [`Grant`] describing which rows
//! and columns the caller may touch, or a typed denial.
//!
//! Policy evaluation is stateless per request and performs no I/O, so the
//! whole rule set is unit-testable without a database.

pub mod engine;
pub mod error;
pub mod fields;
pub mod grant;
pub mod request;

mod tables;

pub use engine::PolicyEngine;
pub use error::{AccessDenied, AccessDeniedKind};
pub use fields::{FieldViolation, IntakeRules};
pub use grant::{ColumnScope, Grant, PUBLIC_LICENSE_COLUMNS, RowScope};
pub use request::{AccessRequest, Operation, Table};
