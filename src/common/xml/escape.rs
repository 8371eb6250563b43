use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static ATTR_ESCAPER: Lazy<Option<AhoCorasick>> =
    Lazy::new(|| AhoCorasick::new(["&", "<", ">", "\"", "'"]).ok());

const ATTR_REPLACEMENTS: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

/// Escape a string for use inside a double-quoted XML attribute value.
///
/// # Examples
///
/// ```
/// use opc_dirpkg::common::xml::escape_attr;
/// assert_eq!(escape_attr("a & b"), "a &amp; b");
/// assert_eq!(escape_attr("/a\"b'.xml"), "/a&quot;b&apos;.xml");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    match ATTR_ESCAPER.as_ref() {
        Some(escaper) => escaper.replace_all(s, &ATTR_REPLACEMENTS),
        None => quick_xml::escape::escape(s).into_owned(),
    }
}
