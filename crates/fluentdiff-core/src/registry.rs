//! Custom comparers and operator comparators, keyed by type or capability

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::model::{TypeDescriptor, TypeKey, Value};

/// Equality predicate called as `comparer(actual, expected)`
pub type Comparer = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Wrap a closure as a [`Comparer`]
pub fn comparer<F>(f: F) -> Comparer
where
    F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Comparison operator a type may define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
}

#[derive(Default)]
struct RegistryState {
    comparers: HashMap<TypeKey, Comparer>,
    operators: HashMap<(TypeKey, Operator), Comparer>,
}

/// Registry of custom comparers.
///
/// A comparer registered under a type name applies to values of that type
/// and of every type deriving from it; one registered under a capability
/// applies to every type listing that capability. All access goes through
/// one lock, held for the whole register or lookup.
#[derive(Default)]
pub struct ComparerRegistry {
    state: Mutex<RegistryState>,
}

static SHARED: OnceLock<ComparerRegistry> = OnceLock::new();

impl ComparerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn shared() -> &'static ComparerRegistry {
        SHARED.get_or_init(ComparerRegistry::new)
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // A panicking comparer must not disable the registry for everyone else.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `comparer` for `key`, or unregister with `None`.
    ///
    /// Returns the comparer previously registered for `key`.
    pub fn register_comparer(&self, key: TypeKey, comparer: Option<Comparer>) -> Option<Comparer> {
        let mut state = self.lock();
        tracing::debug!(
            component = module_path!(),
            op = if comparer.is_some() { "register_comparer" } else { "unregister_comparer" },
            type_key = key.as_str(),
        );
        match comparer {
            Some(c) => state.comparers.insert(key, c),
            None => state.comparers.remove(&key),
        }
    }

    /// Comparer for `ty`: its name first, then its capabilities, then its bases.
    pub fn find_comparer(&self, ty: &TypeDescriptor) -> Option<Comparer> {
        let state = self.lock();
        ty.lineage().find_map(|t| {
            state
                .comparers
                .get(&TypeKey::from(t))
                .or_else(|| {
                    t.capabilities()
                        .iter()
                        .find_map(|cap| state.comparers.get(&TypeKey::named(cap.as_str())))
                })
                .cloned()
        })
    }

    /// Register an operator comparator for `key`, or unregister with `None`.
    pub fn register_operator(
        &self,
        key: TypeKey,
        operator: Operator,
        comparator: Option<Comparer>,
    ) -> Option<Comparer> {
        let mut state = self.lock();
        tracing::debug!(
            component = module_path!(),
            op = "register_operator",
            type_key = key.as_str(),
            operator = ?operator,
        );
        match comparator {
            Some(c) => state.operators.insert((key, operator), c),
            None => state.operators.remove(&(key, operator)),
        }
    }

    /// Operator defined by `ty` or inherited from one of its bases
    pub fn find_operator(&self, ty: &TypeDescriptor, operator: Operator) -> Option<Comparer> {
        let state = self.lock();
        ty.lineage()
            .find_map(|t| state.operators.get(&(TypeKey::from(t), operator)).cloned())
    }

    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.comparers.is_empty() && state.operators.is_empty()
    }
}

impl fmt::Debug for ComparerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        let mut keys: Vec<_> = state.comparers.keys().map(TypeKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ComparerRegistry")
            .field("comparers", &keys)
            .field("operators", &state.operators.len())
            .finish()
    }
}
