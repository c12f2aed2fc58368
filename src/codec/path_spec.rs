//! Field projection trees.
//!
//! A [`PathSpec`] names the fields a [`Writer`](super::Writer) must omit. It is
//! built from slash-separated paths such as `"id"` or `"address/zip"`: the
//! last segment of each path is excluded together with all of its descendants,
//! while the segments before it only restrict their nested fields.
//!
//! # Example
//!
//! ```rust
//! use restli_client::codec::{PathSpec, Projection};
//!
//! let spec = PathSpec::new(["id", "owner/token"]).unwrap();
//!
//! assert!(matches!(spec.lookup("id"), Projection::Excluded));
//! assert!(matches!(spec.lookup("owner"), Projection::Restricted(_)));
//! assert!(matches!(spec.lookup("name"), Projection::Unrestricted));
//! ```

use std::collections::BTreeMap;

use crate::codec::errors::PathSpecError;

/// Segment that matches every key at its level (used for map values).
pub const WILDCARD: &str = "$*";

static EMPTY: PathSpec = PathSpec::empty();

/// An immutable tree of excluded field paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathSpec {
    children: BTreeMap<String, Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Excluded,
    Restricted(PathSpec),
}

impl Node {
    fn merge(&mut self, other: &Self) {
        match (self, other) {
            (Self::Excluded, _) => {}
            (this, Self::Excluded) => *this = Self::Excluded,
            (Self::Restricted(mine), Self::Restricted(theirs)) => mine.merge(theirs),
        }
    }
}

/// What a [`PathSpec`] says about a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection<'a> {
    /// Omit the field and everything below it.
    Excluded,
    /// Write the field, applying the nested tree to its children.
    Restricted(&'a PathSpec),
    /// Write the field and all of its children.
    Unrestricted,
}

impl<'a> Projection<'a> {
    /// Returns the tree to use for the field's children, or `None` if excluded.
    #[must_use]
    pub fn into_child(self) -> Option<&'a PathSpec> {
        match self {
            Self::Excluded => None,
            Self::Restricted(spec) => Some(spec),
            Self::Unrestricted => Some(PathSpec::empty_ref()),
        }
    }
}

impl PathSpec {
    /// A tree that excludes nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn empty_ref() -> &'static Self {
        &EMPTY
    }

    /// Builds a tree from slash-separated field paths.
    ///
    /// A leading `/` is accepted and ignored. When one path is a prefix of
    /// another (`a` and `a/b`), the shorter one wins since it already excludes
    /// the whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`PathSpecError`] if a path is empty or has an empty segment.
    pub fn new<I, S>(paths: I) -> Result<Self, PathSpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Self::empty();
        for path in paths {
            let path = path.as_ref();
            let trimmed = path.strip_prefix('/').unwrap_or(path);
            if trimmed.is_empty() {
                return Err(PathSpecError::EmptyPath);
            }
            let segments: Vec<&str> = trimmed.split('/').collect();
            if segments.iter().any(|s| s.is_empty()) {
                return Err(PathSpecError::EmptySegment {
                    path: path.to_string(),
                });
            }
            spec.insert(&segments);
        }
        spec.apply_wildcards();
        Ok(spec)
    }

    fn insert(&mut self, segments: &[&str]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };

        if rest.is_empty() {
            self.children.insert((*first).to_string(), Node::Excluded);
            return;
        }

        let node = self
            .children
            .entry((*first).to_string())
            .or_insert_with(|| Node::Restricted(Self::empty()));
        if let Node::Restricted(child) = node {
            child.insert(rest);
        }
    }

    // Folds each `$*` subtree into its named siblings so that an exact match
    // still honors the wildcard's exclusions.
    fn apply_wildcards(&mut self) {
        if let Some(wildcard) = self.children.get(WILDCARD).cloned() {
            for (key, node) in &mut self.children {
                if key != WILDCARD {
                    node.merge(&wildcard);
                }
            }
        }
        for node in self.children.values_mut() {
            if let Node::Restricted(child) = node {
                child.apply_wildcards();
            }
        }
    }

    fn merge(&mut self, other: &Self) {
        for (key, node) in &other.children {
            match self.children.get_mut(key) {
                Some(existing) => existing.merge(node),
                None => {
                    self.children.insert(key.clone(), node.clone());
                }
            }
        }
    }

    /// Returns `true` if this tree excludes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Looks up a field at this level of the tree.
    ///
    /// An exact match takes precedence over the [`WILDCARD`] segment, but
    /// the wildcard's exclusions are folded into every exact match when the
    /// tree is built, so they still apply below it.
    #[must_use]
    pub fn lookup(&self, field: &str) -> Projection<'_> {
        match self
            .children
            .get(field)
            .or_else(|| self.children.get(WILDCARD))
        {
            Some(Node::Excluded) => Projection::Excluded,
            Some(Node::Restricted(child)) => Projection::Restricted(child),
            None => Projection::Unrestricted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_excludes_nothing() {
        let spec = PathSpec::empty();
        assert!(spec.is_empty());
        assert_eq!(spec.lookup("anything"), Projection::Unrestricted);
    }

    #[test]
    fn test_single_segment_is_excluded() {
        let spec = PathSpec::new(["secret"]).unwrap();
        assert_eq!(spec.lookup("secret"), Projection::Excluded);
        assert_eq!(spec.lookup("name"), Projection::Unrestricted);
    }

    #[test]
    fn test_nested_path_restricts_parent() {
        let spec = PathSpec::new(["/owner/token"]).unwrap();

        let Projection::Restricted(owner) = spec.lookup("owner") else {
            panic!("owner should be restricted");
        };
        assert_eq!(owner.lookup("token"), Projection::Excluded);
        assert_eq!(owner.lookup("name"), Projection::Unrestricted);
    }

    #[test]
    fn test_shorter_path_wins_in_either_order() {
        let a = PathSpec::new(["owner", "owner/token"]).unwrap();
        let b = PathSpec::new(["owner/token", "owner"]).unwrap();

        assert_eq!(a.lookup("owner"), Projection::Excluded);
        assert_eq!(b.lookup("owner"), Projection::Excluded);
    }

    #[test]
    fn test_wildcard_matches_any_key_but_exact_wins() {
        let spec = PathSpec::new(["$*/secret", "pinned"]).unwrap();

        let Projection::Restricted(value) = spec.lookup("any-key") else {
            panic!("wildcard should restrict");
        };
        assert_eq!(value.lookup("secret"), Projection::Excluded);
        assert_eq!(spec.lookup("pinned"), Projection::Excluded);
    }

    #[test]
    fn test_wildcard_exclusions_apply_below_exact_match() {
        let spec = PathSpec::new(["$*/secret", "pinned/other"]).unwrap();

        let Projection::Restricted(pinned) = spec.lookup("pinned") else {
            panic!("pinned should be restricted");
        };
        assert_eq!(pinned.lookup("secret"), Projection::Excluded);
        assert_eq!(pinned.lookup("other"), Projection::Excluded);
        assert_eq!(pinned.lookup("name"), Projection::Unrestricted);

        let Projection::Restricted(any) = spec.lookup("any-key") else {
            panic!("wildcard should restrict");
        };
        assert_eq!(any.lookup("other"), Projection::Unrestricted);
    }

    #[test]
    fn test_excluding_wildcard_excludes_exact_matches() {
        let spec = PathSpec::new(["tags/$*", "tags/keep/deep"]).unwrap();

        let Projection::Restricted(tags) = spec.lookup("tags") else {
            panic!("tags should be restricted");
        };
        assert_eq!(tags.lookup("keep"), Projection::Excluded);
        assert_eq!(tags.lookup("other"), Projection::Excluded);
    }

    #[test]
    fn test_nested_wildcards_are_folded() {
        let spec = PathSpec::new(["$*/$*/token", "a/b/name"]).unwrap();

        let Projection::Restricted(a) = spec.lookup("a") else {
            panic!("a should be restricted");
        };
        let Projection::Restricted(b) = a.lookup("b") else {
            panic!("b should be restricted");
        };
        assert_eq!(b.lookup("token"), Projection::Excluded);
        assert_eq!(b.lookup("name"), Projection::Excluded);
    }

    #[test]
    fn test_malformed_paths_are_rejected() {
        assert_eq!(PathSpec::new([""]), Err(PathSpecError::EmptyPath));
        assert_eq!(PathSpec::new(["/"]), Err(PathSpecError::EmptyPath));
        assert_eq!(
            PathSpec::new(["a//b"]),
            Err(PathSpecError::EmptySegment {
                path: "a//b".to_string()
            })
        );
        assert!(PathSpec::new(["a/"]).is_err());
    }

    #[test]
    fn test_into_child() {
        let spec = PathSpec::new(["a/b"]).unwrap();
        assert!(Projection::Excluded.into_child().is_none());
        assert!(spec.lookup("c").into_child().unwrap().is_empty());
        assert!(!spec.lookup("a").into_child().unwrap().is_empty());
    }
}
