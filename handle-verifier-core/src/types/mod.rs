//! 类型定义模块

mod field;
mod validation_state;

pub use field::{FieldValue, QuickCheck, ValidatedHandle};
pub use validation_state::{DisplaySnapshot, FailureReason, Severity, ValidationState};

// Re-export provider 库的公共类型
pub use handle_verifier_provider::{AccountLookup, Handle};
