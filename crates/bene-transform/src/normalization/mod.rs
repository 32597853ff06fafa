//! Value normalization.
//!
//! - **values**: categorical value substitution (e.g. `M` -> `Male`)
//! - **datetime**: permissive date of birth parsing

pub mod datetime;
pub mod values;

pub use datetime::parse_date;
pub use values::normalize_values;
