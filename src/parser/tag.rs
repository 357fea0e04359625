//! Element name handling
//!
//! Tags reach the population code in Clark notation (`{namespace-uri}local`),
//! the same shape the reader builds from resolved quick-xml names.

/// Split a possibly namespace-qualified tag into `(namespace, local_name)`.
///
/// # Panics
///
/// Panics if the tag opens a namespace with `{` but never closes it. The
/// reader only ever produces balanced tags, so this indicates a bug.
pub fn split_tag(tag: &str) -> (Option<&str>, &str) {
    match tag.strip_prefix('{') {
        Some(rest) => {
            let close = rest
                .rfind('}')
                .unwrap_or_else(|| panic!("unterminated namespace in tag {:?}", tag));
            (Some(&rest[..close]), &rest[close + 1..])
        }
        None => (None, tag),
    }
}

/// Local name of a tag with any namespace stripped.
pub fn local_name(tag: &str) -> &str {
    split_tag(tag).1
}

/// Build the Clark-notation form of a resolved element name.
pub fn qualify(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local),
        None => local.to_string(),
    }
}

/// Rewrite hyphens to underscores so `snr-info` and `snr_info` address the same field.
pub fn normalize_field_name(name: &str) -> String {
    name.replace('-', "_")
}
