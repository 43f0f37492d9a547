//! Generation errors.
//!
//! Every variant is fatal for the invocation: no partial output is produced.

use crate::record::Location;
use crate::traits::LookupError;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("can't find {name}: {source}")]
    RecordLookup {
        name: String,
        #[source]
        source: LookupError,
    },

    #[error("can't find field replacement type {name}: {source}")]
    OverrideLookup {
        name: String,
        #[source]
        source: LookupError,
    },

    #[error("{location}field override type cannot have embedded or non-exported fields")]
    OverrideFieldShape { location: Location, field: String },

    #[error("{location}no matching field for {field} in original type {record}")]
    NoMatchingField {
        location: Location,
        field: String,
        record: String,
    },

    #[error("{location}field override type {from} is not convertible to {to}")]
    NotConvertible {
        location: Location,
        from: String,
        to: String,
    },

    #[error("can't walk {0}")]
    UnsupportedType(String),
}
