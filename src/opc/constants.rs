/// Constant values related to the Open Packaging Convention.
///
/// This module contains the reserved file names of a directory package, the
/// content-types namespace, and content type URIs the storage layer itself
/// needs to recognise.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // OPC core content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    // Generic
    pub const XML: &str = "application/xml";
    pub const TEXT: &str = "text/plain";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
}

/// XML namespace URIs used in OPC packages
pub mod namespace {
    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
}

/// File names reserved at the root of a directory package.
///
/// Neither is ever exposed as a part, and part names equal to or prefixed by
/// either one are rejected (case-insensitively).
pub mod reserved {
    /// The content-types document
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";

    /// The lock resource held for the lifetime of an open package
    pub const LOCK: &str = "[Package].lock";

    /// All reserved names, for validation and enumeration filters
    pub const ALL: [&str; 2] = [CONTENT_TYPES, LOCK];
}
