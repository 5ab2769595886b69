/*!
 * Permission Nodes
 * Parsing of raw node strings into a name and a grant/deny verdict
 */

use crate::core::limits::NEGATION_PREFIX;

/// A parsed permission node
///
/// `fly` grants `fly`; `-fly` explicitly denies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node<'a> {
    pub name: &'a str,
    pub granted: bool,
}

impl<'a> Node<'a> {
    /// Parse a normalized node string
    ///
    /// Returns `None` for strings that name nothing (`""` or a lone `-`).
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (name, granted) = match raw.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => (rest, false),
            None => (raw, true),
        };
        if name.is_empty() {
            None
        } else {
            Some(Self { name, granted })
        }
    }

    /// Render back to the stored string form
    pub fn to_raw(&self) -> String {
        render(self.name, self.granted)
    }

    /// The same node with the opposite verdict, in stored form
    pub fn opposite(&self) -> String {
        render(self.name, !self.granted)
    }
}

/// Canonical stored form of a node: trimmed and lower-cased
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn render(name: &str, granted: bool) -> String {
    if granted {
        name.to_string()
    } else {
        let mut raw = String::with_capacity(name.len() + 1);
        raw.push(NEGATION_PREFIX);
        raw.push_str(name);
        raw
    }
}
