/// Provides the PackURI value type used to identify parts in a package.
///
/// A PackURI is a part name within an OPC package: a path-like string that
/// always begins with a forward slash and uses forward slashes as separators.
/// Represents a package URI, which is a partname within an OPC package.
///
/// PackURIs are computed keys: they are never stored on their own, and two
/// PackURIs naming the same part may differ in letter case. Use
/// [`PackURI::key`] wherever a PackURI is used to index a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/word/document.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// # Arguments
    /// * `uri` - The URI string, which must begin with a single forward slash
    ///
    /// # Returns
    /// * `Ok(PackURI)` if the URI is valid
    /// * `Err` if the URI is empty, relative, or in network-path (`//host`) form
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        if uri.starts_with("//") {
            return Err(format!("PackURI must not be an absolute URI, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Get the filename portion of this PackURI.
    ///
    /// For example, "slide1.xml" for "/ppt/slides/slide1.xml".
    /// For the package pseudo-partname "/", returns an empty string.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Get the extension portion of this PackURI.
    ///
    /// For example, "xml" for "/word/document.xml" (note: no leading period).
    /// Returns an empty string when the filename has no period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the package-relative path of the item. Returns an empty string
    /// for the package pseudo-partname "/".
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Iterate over the path segments of this PackURI.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.membername().split('/')
    }

    /// Get the case-normalized lookup key for this PackURI.
    #[inline]
    pub fn key(&self) -> String {
        normalize_key(&self.uri)
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// Case-normalize a part name or extension for use as a map key.
///
/// Part names and extensions compare case-insensitively in OPC; every map
/// keyed by either goes through this function.
#[inline]
pub fn normalize_key(s: &str) -> String {
    s.to_lowercase()
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl std::str::FromStr for PackURI {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
