//! Typed context handles over the host's context mechanism.
//!
//! Propagation down the tree belongs to the host. A [`ContextScope`] is the
//! narrow capability this crate needs from it: install a value for the
//! current subtree and read the nearest one. [`LeptosScope`] implements it
//! on the Leptos owner tree.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use leptos::prelude::{provide_context, use_context};

/// Type-erased context value.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Process-unique identity of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Host capability to provide and read context values.
pub trait ContextScope {
    /// Install `value` for the current subtree, shadowing ancestors.
    fn provide(&self, id: ContextId, value: ContextValue);

    /// Read the nearest value installed for `id`.
    fn lookup(&self, id: ContextId) -> Option<ContextValue>;
}

/// A typed context. Two contexts of the same `T` never see each other's
/// values.
pub struct Context<T> {
    id: ContextId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Context<T> {
    /// Create a new, distinct context.
    pub fn new() -> Self {
        Self {
            id: ContextId::next(),
            _marker: PhantomData,
        }
    }

    /// The context's identity.
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl<T: Clone + Send + Sync + 'static> Context<T> {
    /// Install a value for the current subtree.
    pub fn provide(&self, scope: &dyn ContextScope, value: T) {
        scope.provide(self.id, Arc::new(value));
    }

    /// Read the nearest value for this context.
    pub fn read(&self, scope: &dyn ContextScope) -> Option<T> {
        let value = scope.lookup(self.id)?;
        value.downcast_ref::<T>().cloned()
    }
}

impl<T> Default for Context<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Context<T> {}

impl<T> PartialEq for Context<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Context<T> {}

impl<T> std::fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Context").field(&self.id).finish()
    }
}

/// All context values visible at a Leptos owner, keyed by context id.
#[derive(Clone, Default)]
struct ScopeValues(Arc<HashMap<ContextId, ContextValue>>);

/// [`ContextScope`] backed by the current Leptos reactive owner.
///
/// Values provided under an owner are visible to it and its descendants.
/// Must be used while an owner is set (inside a component, or
/// `Owner::with` in tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct LeptosScope;

impl ContextScope for LeptosScope {
    fn provide(&self, id: ContextId, value: ContextValue) {
        let mut values = use_context::<ScopeValues>()
            .map(|inherited| (*inherited.0).clone())
            .unwrap_or_default();
        values.insert(id, value);
        provide_context(ScopeValues(Arc::new(values)));
    }

    fn lookup(&self, id: ContextId) -> Option<ContextValue> {
        use_context::<ScopeValues>()?.0.get(&id).cloned()
    }
}


#[cfg(test)]
mod tests {
    use leptos::prelude::Owner;

    use super::testing::MapScope;
    use super::*;

    #[test]
    fn test_contexts_are_distinct() {
        let a = Context::<String>::new();
        let b = Context::<String>::new();

        let copy = a;

        assert_ne!(a, b);
        assert_eq!(a, copy);
    }

    #[test]
    fn test_context_provide_and_read() {
        let scope = MapScope::default();
        let ctx = Context::<u32>::new();

        assert_eq!(ctx.read(&scope), None);
        ctx.provide(&scope, 7);
        assert_eq!(ctx.read(&scope), Some(7));
    }

    #[test]
    fn test_same_type_contexts_do_not_collide() {
        let scope = MapScope::default();
        let theme = Context::<String>::new();
        let locale = Context::<String>::new();

        theme.provide(&scope, "dark".to_string());

        assert_eq!(theme.read(&scope).as_deref(), Some("dark"));
        assert_eq!(locale.read(&scope), None);
    }

    #[test]
    fn test_leptos_scope_inherits_and_shadows() {
        let theme = Context::<String>::new();
        let locale = Context::<String>::new();
        let owner = Owner::new();

        owner.with(|| {
            theme.provide(&LeptosScope, "dark".to_string());
            locale.provide(&LeptosScope, "en".to_string());

            owner.child().with(|| {
                theme.provide(&LeptosScope, "light".to_string());

                assert_eq!(theme.read(&LeptosScope).as_deref(), Some("light"));
                assert_eq!(locale.read(&LeptosScope).as_deref(), Some("en"));
            });

            assert_eq!(theme.read(&LeptosScope).as_deref(), Some("dark"));
        });
    }

    #[test]
    fn test_leptos_scope_without_values() {
        let ctx = Context::<u8>::new();
        let owner = Owner::new();

        owner.with(|| {
            assert_eq!(ctx.read(&LeptosScope), None);
        });
    }
}
