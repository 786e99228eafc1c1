//! Document identifiers
//!
//! Every document is named by a 12 byte object id, written as 24 hexadecimal characters on the
//! outside. Parsing happens before anything reaches the store.

use core::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;

use crate::error::Error;

/// Opaque identifier of a note, notebook, tag, reminder or user
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// The underlying object id, as stored in MongoDB
    pub fn object_id(self) -> ObjectId {
        self.0
    }

    /// Parse an optional reference coming from a request
    ///
    /// Absent and empty values both mean "no reference"
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, Error> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl From<ObjectId> for DocumentId {
    fn from(object_id: ObjectId) -> Self {
        Self(object_id)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| Error::InvalidId(value.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
