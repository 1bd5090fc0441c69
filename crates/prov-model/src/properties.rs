//! Property names used by the model layer itself.

pub const NAME: &str = "name";
pub const COMMENT: &str = "comment";
pub const RELATIONSHIP: &str = "relationship";
pub const RELATED_ELEMENT: &str = "relatedSpdxElement";
pub const RELATIONSHIP_TYPE: &str = "relationshipType";
pub const HAS_FILE: &str = "hasFile";
pub const CHECKSUM: &str = "checksum";
pub const ALGORITHM: &str = "algorithm";
pub const CHECKSUM_VALUE: &str = "checksumValue";
