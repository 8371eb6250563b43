//! Mapping between part names and files under a package root.

use crate::opc::constants::reserved;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{PackURI, normalize_key};
use std::path::{Component, Path, PathBuf};

/// Check that a PackURI can name a part stored in a directory package.
///
/// Rejects the package pseudo-partname, names equal to or prefixed by a
/// reserved root file name (case-insensitively), and names whose segments
/// could resolve outside the package root.
pub fn validate(partname: &PackURI) -> Result<()> {
    let member = partname.membername();
    if member.is_empty() {
        return Err(OpcError::InvalidArgument(
            "the package root is not a part".to_string(),
        ));
    }

    let member_key = normalize_key(member);
    if reserved::ALL
        .iter()
        .any(|name| member_key.starts_with(&normalize_key(name)))
    {
        return Err(OpcError::InvalidArgument(format!(
            "'{}' collides with a reserved package file",
            partname
        )));
    }

    if member.contains('\\') {
        return Err(OpcError::InvalidArgument(format!(
            "'{}' contains a backslash",
            partname
        )));
    }

    if partname
        .segments()
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(OpcError::InvalidArgument(format!(
            "'{}' has an empty or relative segment",
            partname
        )));
    }

    Ok(())
}

/// Parse and validate a part name in one step.
pub fn parse_partname(uri: &str) -> Result<PackURI> {
    let partname = PackURI::new(uri).map_err(OpcError::InvalidArgument)?;
    validate(&partname)?;
    Ok(partname)
}

/// Get the filesystem path backing a part.
///
/// Each segment of the partname becomes one path component under `root`.
/// The partname must already have passed [`validate`].
pub fn to_path(root: &Path, partname: &PackURI) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in partname.segments() {
        path.push(segment);
    }
    path
}

/// Get the partname of a file under `root`.
///
/// Returns `None` when the path is not under `root`, is the root itself, or
/// has a component that is not valid UTF-8.
pub fn to_partname(root: &Path, path: &Path) -> Option<PackURI> {
    let relative = path.strip_prefix(root).ok()?;

    let mut uri = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                uri.push('/');
                uri.push_str(segment.to_str()?);
            },
            _ => return None,
        }
    }

    if uri.is_empty() {
        return None;
    }
    PackURI::new(uri).ok()
}

/// Whether a file name at the package root is reserved.
pub fn is_reserved_name(name: &str) -> bool {
    let key = normalize_key(name);
    reserved::ALL.iter().any(|r| normalize_key(r) == key)
}
