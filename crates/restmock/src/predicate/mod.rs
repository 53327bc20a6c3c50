//! Request matching primitives.
//!
//! # Module Structure
//!
//! - `string_matcher` - String operators (equals, contains, startsWith, endsWith, matches, exists)
//! - `field_matcher` - Header and query parameter matchers
//! - `body_matcher` - Body text and JSON matchers
//! - `path_matcher` - Identifier matchers and segment-wise path patterns
//! - `request` - `RequestPredicate`, the AND-composable condition routes are built from

mod body_matcher;
mod field_matcher;
mod path_matcher;
mod request;
mod string_matcher;

pub use body_matcher::CompiledBodyMatcher;
pub use field_matcher::{
    compile_header_matcher, compile_query_matcher, CompiledFieldMatcher, FieldSource,
};
pub use path_matcher::{IdentifierMatcher, PathParams, PathPattern, PathSegmentMatcher};
pub use request::{RequestMatcher, RequestPredicate};
pub use string_matcher::{CompiledStringMatcher, StringMatcher, ValueMatcher};
