//! Declarative DTO → domain mapping engine.
//!
//! A [`MappingSpec`] assigns exactly one [`FieldRule`] to every field of a
//! target record. Specs are validated once when they are built and are
//! immutable afterwards; [`transform`] then applies them to any number of
//! source records without side effects.
//!
//! # Module Structure
//!
//! - `rule`: the rule language (`keep`, `rename`, `omit`, `map`, `array`, `nested`)
//! - `spec`: spec construction and validation against the target's fields
//! - `engine`: the interpreter (`transform`, `transform_value`, `transform_collection`)
//! - `convert`: reusable value converters (dates, composition)
//! - `auto`: convention-based fallback mapping (snake_case → camelCase keys)
//!
//! # Usage
//!
//! ```ignore
//! let spec = MappingSpec::<Ticket>::builder()
//!     .rule("id", FieldRule::keep())
//!     .rule("createdDate", FieldRule::map(convert::parse_date))
//!     .build()?;
//! let ticket: Ticket = transform(&dto, &spec)?;
//! ```

pub mod auto;
pub mod convert;
mod engine;
mod error;
mod rule;
mod spec;

pub use engine::{transform, transform_collection, transform_value};
pub use error::MappingError;
pub use rule::{ElementFn, ElementMap, FieldRule, ScalarFn};
pub use spec::{MappedRecord, MappingSpec, RuleSet, SpecBuilder};
