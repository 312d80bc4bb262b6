//! MSBuild project descriptor handling
//!
//! [`document`] parses a `.csproj` into a tree that serializes back to the
//! original bytes; [`merger`] adds or updates properties on that tree and
//! writes the file only when something changed.

pub mod document;
pub mod merger;

pub use document::{ProjectDocument, XmlElement, XmlNode};
pub use merger::{set_property, ProjectDescriptor, PropertyChange, PROPERTY_GROUP};

/// File extension a project descriptor must have, compared case-insensitively.
pub const DESCRIPTOR_EXTENSION: &str = "csproj";
