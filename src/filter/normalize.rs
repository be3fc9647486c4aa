//! Normalization and equivalence of expression strings
//!
//! These functions back the schema hooks: normalization produces the value
//! stored in state, equivalence decides whether a planned change is only a
//! difference in spelling.

use super::error::FilterError;
use super::mapper::ApiModel;
use super::parser::parse;
use crate::restapi::TagFilter;
use tracing::{debug, trace};

/// Parse an expression and map it onto the wire model `M`
pub fn to_model<M: ApiModel>(input: &str) -> Result<M, FilterError> {
    let expr = parse(input)?;
    Ok(M::from_expression(&expr)?)
}

/// Parse, map and render an expression using the wire model `M`
pub fn normalize_as<M: ApiModel>(input: &str) -> Result<String, FilterError> {
    let normalized = to_model::<M>(input)?.render();
    trace!(input, normalized = normalized.as_str(), "normalized filter expression");
    Ok(normalized)
}

/// Structural equality of two expressions under the wire model `M`
///
/// When either side cannot be parsed the raw strings are compared instead.
pub fn equivalent_as<M: ApiModel>(a: &str, b: &str) -> bool {
    match (to_model::<M>(a), to_model::<M>(b)) {
        (Ok(left), Ok(right)) => left == right,
        (left, right) => {
            if let Err(err) = &left {
                debug!(input = a, error = %err, "comparing unparsable filter expression literally");
            }
            if let Err(err) = &right {
                debug!(input = b, error = %err, "comparing unparsable filter expression literally");
            }
            a == b
        }
    }
}

/// Canonical form of a tag filter expression
pub fn normalize(input: &str) -> Result<String, FilterError> {
    normalize_as::<TagFilter>(input)
}

/// Whether two tag filter expressions map to the same wire model
pub fn equivalent(a: &str, b: &str) -> bool {
    equivalent_as::<TagFilter>(a, b)
}
