//! Extended-attribute storage and name canonicalization.

use std::collections::BTreeMap;

/// Canonicalize an xattr name the way the namespace stores it: a name with
/// no dot is assumed to be a short-form `user.` key; a name that already
/// starts with `user.` is used verbatim; any other dotted name (e.g.
/// `com.apple.quarantine`) is also used verbatim.
pub(crate) fn canonicalize(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("user.{name}")
    }
}

/// A flat map of canonical xattr name to value, attached to a directory or
/// a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct XattrMap {
    values: BTreeMap<String, String>,
}

impl XattrMap {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&canonicalize(name)).map(String::as_str)
    }

    /// Set `name` to `value`, canonicalizing the name. Returns `true` if
    /// this changed the stored value (used to decide whether a mutation
    /// should bump `mtime`).
    pub(crate) fn set(&mut self, name: &str, value: &str) -> bool {
        let name = canonicalize(name);
        match self.values.get(&name) {
            Some(existing) if existing == value => false,
            _ => {
                self.values.insert(name, value.to_string());
                true
            }
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(&canonicalize(name))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Copy every entry of `other` into `self`, overwriting on conflict.
    /// Used to seed a file's xattrs from its parent directory at `create`.
    pub(crate) fn inherit_from(&mut self, other: &XattrMap) {
        for (k, v) in other.values.iter() {
            self.values.insert(k.clone(), v.clone());
        }
    }
}
