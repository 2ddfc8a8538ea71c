//! Resource nodes of a jobspec's resource tree.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::JobSpecError;
use crate::Result;

/// The resource type for a compute node.
pub const NODE: &str = "node";

/// The resource type for a labeled task slot.
pub const SLOT: &str = "slot";

/// The resource type for a CPU core.
pub const CORE: &str = "core";

/// The resource type for a GPU.
pub const GPU: &str = "gpu";

/// Represents a single node in a jobspec resource tree.
///
/// Nodes built with [`Resource::new`] or [`Resource::slot`] always carry a
/// type and a positive count. Nodes parsed from text are accepted as-is and
/// checked when queried, since jobspec text is not trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// The type of the resource (e.g. `node`, `slot`, or `core`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    ty: Option<String>,
    /// The multiplicity of the resource at this level of the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    /// The resources nested within this one.
    #[serde(rename = "with", default, skip_serializing_if = "Option::is_none")]
    with: Option<Vec<Resource>>,
    /// The slot label; only present on `slot` resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Any other keys present on the resource.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Resource {
    /// Creates a new resource of the given type and count.
    ///
    /// An empty `with` list means the resource has no children.
    pub fn new(ty: impl Into<String>, count: u64, with: Vec<Resource>) -> Result<Self> {
        let ty = ty.into();
        if ty.is_empty() {
            return Err(JobSpecError::InvalidResourceSpec(
                "resource type must not be empty".into(),
            ));
        }

        if count == 0 {
            return Err(JobSpecError::InvalidResourceSpec(format!(
                "`{ty}` resource count must be > 0"
            )));
        }

        Ok(Self {
            ty: Some(ty),
            count: Some(count),
            with: if with.is_empty() { None } else { Some(with) },
            label: None,
            extra: Map::new(),
        })
    }

    /// Creates a new labeled slot wrapping the given resources.
    ///
    /// A slot must contain at least one resource.
    pub fn slot(label: impl Into<String>, count: u64, with: Vec<Resource>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(JobSpecError::InvalidResourceSpec(
                "slot label must not be empty".into(),
            ));
        }

        if with.is_empty() {
            return Err(JobSpecError::InvalidResourceSpec(format!(
                "slot `{label}` must contain at least one resource"
            )));
        }

        let mut slot = Self::new(SLOT, count, with)?;
        slot.label = Some(label);
        Ok(slot)
    }

    /// Gets the type of the resource, if present.
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Gets the count of the resource, if present.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Gets the resources nested within this one.
    pub fn with(&self) -> &[Resource] {
        self.with.as_deref().unwrap_or_default()
    }

    /// Gets the slot label, if present.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Determines if the resource is a slot.
    pub fn is_slot(&self) -> bool {
        self.ty() == Some(SLOT)
    }

    /// Gets the type and count of the resource, failing if either is missing
    /// or the count is zero.
    fn checked(&self) -> Result<(&str, u64)> {
        let ty = self.ty().ok_or_else(|| {
            JobSpecError::MalformedJobSpec("resource is missing a `type`".into())
        })?;
        match self.count {
            Some(count) if count > 0 => Ok((ty, count)),
            Some(_) => Err(JobSpecError::MalformedJobSpec(format!(
                "`{ty}` resource count must be > 0"
            ))),
            None => Err(JobSpecError::MalformedJobSpec(format!(
                "`{ty}` resource is missing a `count`"
            ))),
        }
    }

    /// Counts the instances of the given resource type in this subtree.
    ///
    /// A matching resource contributes its own count; otherwise the counts
    /// found in the children are summed and multiplied by this resource's
    /// count. Matching resources are not searched further.
    pub fn count_of_type(&self, ty: &str) -> Result<u64> {
        let (kind, count) = self.checked()?;
        if kind == ty {
            return Ok(count);
        }

        let mut in_children: u64 = 0;
        for child in self.with() {
            in_children = in_children
                .checked_add(child.count_of_type(ty)?)
                .ok_or_else(|| overflow(ty))?;
        }

        count.checked_mul(in_children).ok_or_else(|| overflow(ty))
    }

    /// Checks that every node in this subtree has a type and positive count,
    /// and that every slot is labeled.
    pub(crate) fn validate(&self) -> Result<()> {
        let (ty, _) = self.checked()?;
        if ty == SLOT && self.label().is_none_or(str::is_empty) {
            return Err(JobSpecError::MalformedJobSpec(
                "`slot` resource is missing a `label`".into(),
            ));
        }

        if self.with.as_ref().is_some_and(Vec::is_empty) {
            return Err(JobSpecError::MalformedJobSpec(format!(
                "`{ty}` resource has an empty `with` list"
            )));
        }

        self.with().iter().try_for_each(Resource::validate)
    }

    /// Determines if this subtree contains a slot with the given label.
    pub fn contains_slot(&self, label: &str) -> bool {
        (self.is_slot() && self.label() == Some(label))
            || self.with().iter().any(|r| r.contains_slot(label))
    }
}

/// Creates the error for a count that does not fit in 64 bits.
fn overflow(ty: &str) -> JobSpecError {
    JobSpecError::MalformedJobSpec(format!("count of `{ty}` resources overflows"))
}
