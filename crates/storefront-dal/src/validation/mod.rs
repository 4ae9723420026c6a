// File: storefront-dal/src/validation/mod.rs
// Purpose: Constraint validation runtime

pub mod constraint;
pub mod engine;
pub mod violation;

pub use constraint::{codes, Constraint, ValueType};
pub use engine::{ConstraintEngine, ConstraintValidator};
pub use violation::{ConstraintViolation, ConstraintViolationList};
