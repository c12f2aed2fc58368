//! Resource identity: the root resource name and the canonical path.
//!
//! Paths follow the rest.li grammar `/root[/key][/sub[/key]]*`. Keys are
//! rendered in their ROR2 form, so simple keys appear as escaped text and
//! complex or compound keys as `(field:value,...)`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use restli_client::{EntityPath, ResourcePath};
//!
//! let path = EntityPath::new("widgets")
//!     .unwrap()
//!     .key(&42_i64)
//!     .unwrap()
//!     .sub_resource("parts")
//!     .unwrap();
//! assert_eq!(path.resource_path().unwrap(), "/widgets/42/parts");
//!
//! let mut compound = BTreeMap::new();
//! compound.insert("region".to_string(), "eu west".to_string());
//! compound.insert("serial".to_string(), "7".to_string());
//! let path = EntityPath::new("devices").unwrap().key(&compound).unwrap();
//! assert_eq!(
//!     path.resource_path().unwrap(),
//!     "/devices/(region:eu%20west,serial:7)"
//! );
//! ```

use crate::codec::{marshal_ror2, EncodeError, Marshaler};

/// Identifies the resource a request targets.
///
/// Generated clients implement this for their own path types; [`EntityPath`]
/// is a ready-made implementation.
pub trait ResourcePath {
    /// The first path segment, used for host resolution and deduplication.
    fn root_resource(&self) -> &str;

    /// Renders the canonical path, starting with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a key cannot be encoded.
    fn resource_path(&self) -> Result<String, EncodeError>;
}

impl<T: ResourcePath + ?Sized> ResourcePath for &T {
    fn root_resource(&self) -> &str {
        (**self).root_resource()
    }

    fn resource_path(&self) -> Result<String, EncodeError> {
        (**self).resource_path()
    }
}

/// A resource path assembled segment by segment.
///
/// Keys are encoded when they are attached, so a built `EntityPath` always
/// renders successfully.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityPath {
    root: String,
    rendered: String,
}

impl EntityPath {
    /// Starts a path at the given root resource.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::EmptyRootResource`] if `root` is empty and
    /// [`EncodeError::DotSegment`] if it is `.` or `..`.
    pub fn new(root: impl Into<String>) -> Result<Self, EncodeError> {
        let root = root.into();
        if root.is_empty() {
            return Err(EncodeError::EmptyRootResource);
        }
        let segment = urlencoding::encode(&root);
        check_segment(&segment, "")?;
        let rendered = format!("/{segment}");
        Ok(Self { root, rendered })
    }

    /// Appends an entity key to the current resource.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if the key cannot be encoded, and
    /// [`EncodeError::DotSegment`] if it renders as `.` or `..`.
    pub fn key<K: Marshaler + ?Sized>(mut self, key: &K) -> Result<Self, EncodeError> {
        let encoded = marshal_ror2(key)?;
        check_segment(&encoded, &self.rendered)?;
        self.rendered.push('/');
        self.rendered.push_str(&encoded);
        Ok(self)
    }

    /// Appends a sub-resource name.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::EmptySubResource`] if `name` is empty and
    /// [`EncodeError::DotSegment`] if it is `.` or `..`.
    pub fn sub_resource(mut self, name: &str) -> Result<Self, EncodeError> {
        if name.is_empty() {
            return Err(EncodeError::EmptySubResource {
                parent: self.rendered,
            });
        }
        let segment = urlencoding::encode(name);
        check_segment(&segment, &self.rendered)?;
        self.rendered.push('/');
        self.rendered.push_str(&segment);
        Ok(self)
    }
}

/// Returns `true` for segments URL resolution treats as `.` or `..`,
/// including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let segment = segment.to_ascii_lowercase().replace("%2e", ".");
    segment == "." || segment == ".."
}

/// Fails with [`EncodeError::DotSegment`] on the first dot segment of a
/// rendered path.
pub(crate) fn check_path(path: &str) -> Result<(), EncodeError> {
    let mut parent: usize = 0;
    for segment in path.split('/') {
        check_segment(segment, &path[..parent.saturating_sub(1)])?;
        parent += segment.len() + 1;
    }
    Ok(())
}

// URL resolution removes dot segments, which would silently retarget the
// request.
fn check_segment(segment: &str, parent: &str) -> Result<(), EncodeError> {
    if is_dot_segment(segment) {
        return Err(EncodeError::DotSegment {
            segment: segment.to_string(),
            parent: parent.to_string(),
        });
    }
    Ok(())
}

impl ResourcePath for EntityPath {
    fn root_resource(&self) -> &str {
        &self.root
    }

    fn resource_path(&self) -> Result<String, EncodeError> {
        Ok(self.rendered.clone())
    }
}
