/// Open Packaging Conventions (OPC) building blocks.
///
/// This module provides the pieces of the OPC specification a physical
/// package needs regardless of how it stores its bytes:
///
/// - Part names (`PackURI`) and their case-insensitive keys
/// - The content-types table and its `[Content_Types].xml` document
/// - Reserved names and well-known content types
/// - The error type shared by every storage operation

pub mod constants;
pub mod content_types;
pub mod error;
pub mod packuri;

// Re-export commonly used types
pub use content_types::ContentTypesTable;
pub use error::{ErrorKind, OpcError, Result};
pub use packuri::PackURI;
