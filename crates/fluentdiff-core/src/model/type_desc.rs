//! Runtime type descriptors

use std::fmt;
use std::sync::Arc;

/// Name of a type as reported to the engine, with the capabilities it
/// implements and an optional parent type.
///
/// Capabilities stand in for implemented interfaces: a comparer registered
/// for a capability applies to every type that lists it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: String,
    capabilities: Vec<String>,
    base: Option<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Vec::new(),
            base: None,
        }
    }

    /// Descriptor named after the Rust type `T`
    pub fn of<T: ?Sized>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn with_base(mut self, base: TypeDescriptor) -> Self {
        self.base = Some(Arc::new(base));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn base(&self) -> Option<&TypeDescriptor> {
        self.base.as_deref()
    }

    /// This descriptor followed by its base chain
    pub fn lineage(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.base())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Registry key: a type name or a capability name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn of<T: ?Sized>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&TypeDescriptor> for TypeKey {
    fn from(ty: &TypeDescriptor) -> Self {
        Self::named(ty.name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_walks_bases() {
        let ty = TypeDescriptor::named("Dog")
            .with_base(TypeDescriptor::named("Animal").with_base(TypeDescriptor::named("Object")));
        let names: Vec<_> = ty.lineage().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["Dog", "Animal", "Object"]);
    }

    #[test]
    fn test_key_of_matches_descriptor_of() {
        assert_eq!(TypeKey::of::<u32>(), TypeKey::from(&TypeDescriptor::of::<u32>()));
    }
}
