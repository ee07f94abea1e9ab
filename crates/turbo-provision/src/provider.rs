//! Providers: a context plus the value that fills it.

use std::sync::Arc;

use crate::context::{Context, ContextScope};
use crate::error::ProvisionError;
use crate::promise::{resolve_promise, Promise, PromiseCache, Rendered};

const DEFAULT_NAME: &str = "Provider";

/// What a provider factory returns.
pub enum Resolve<T> {
    /// A ready value.
    Value(T),
    /// A value that is still on its way.
    Pending(Promise<T>),
}

impl<T> From<Promise<T>> for Resolve<T> {
    fn from(promise: Promise<T>) -> Self {
        Self::Pending(promise)
    }
}

/// Where a provider gets its value from.
pub enum ProviderSource<T> {
    /// A fixed value.
    Value(T),
    /// A promise shared by every render.
    Promise(Promise<T>),
    /// Called on every render.
    Factory(Arc<dyn Fn() -> Resolve<T> + Send + Sync>),
}

impl<T> ProviderSource<T> {
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// A factory run on each render. Return the same [`Promise`] across
    /// renders, or suspension never ends; [`PromiseMemo`](crate::PromiseMemo) keeps one per set
    /// of dependencies.
    pub fn factory(factory: impl Fn() -> Resolve<T> + Send + Sync + 'static) -> Self {
        Self::Factory(Arc::new(factory))
    }
}

impl<T> From<Promise<T>> for ProviderSource<T> {
    fn from(promise: Promise<T>) -> Self {
        Self::Promise(promise)
    }
}

impl<T: Clone> Clone for ProviderSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Promise(promise) => Self::Promise(promise.clone()),
            Self::Factory(factory) => Self::Factory(Arc::clone(factory)),
        }
    }
}

/// Options for [`create_provider`].
pub struct ProviderOptions<T> {
    /// Display name used in errors.
    pub name: Option<String>,
    /// Reuse an existing context instead of creating one.
    pub context: Option<Context<T>>,
}

impl<T> ProviderOptions<T> {
    pub fn new() -> Self {
        Self {
            name: None,
            context: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_context(mut self, context: Context<T>) -> Self {
        self.context = Some(context);
        self
    }
}

impl<T> Default for ProviderOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that exposes a context for [`use_provider`] and
/// [`mock_provider`].
///
/// Implemented by [`Provider`] and [`MockProvider`]. Other components may
/// implement it and return `None`, in which case reading fails with
/// [`ProvisionError::NotAttached`].
pub trait ContextProvider<T> {
    /// Name shown in errors.
    fn display_name(&self) -> &str;

    /// The attached context, if any.
    fn context(&self) -> Option<&Context<T>>;
}

/// A component that installs a value into its context for a subtree.
pub struct Provider<T> {
    name: String,
    context: Context<T>,
    source: ProviderSource<T>,
}

/// Create a provider.
///
/// ```rust,ignore
/// let session = create_provider(
///     ProviderSource::factory(move || Resolve::Pending(load_session.clone())),
///     ProviderOptions::new().with_name("SessionProvider"),
/// );
///
/// // In a component:
/// let session = use_provider(&session, &LeptosScope)?;
/// ```
pub fn create_provider<T>(source: ProviderSource<T>, options: ProviderOptions<T>) -> Provider<T> {
    let ProviderOptions { name, context } = options;
    Provider {
        name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        context: context.unwrap_or_default(),
        source,
    }
}

impl<T: Clone + Send + Sync + 'static> Provider<T> {
    /// Resolve the value, install it in `scope`, then render `children`.
    ///
    /// Suspends while a promise is pending. A rejected promise fails every
    /// render after it settles.
    pub fn render<V>(
        &self,
        scope: &dyn ContextScope,
        cache: &PromiseCache,
        children: impl FnOnce() -> V,
    ) -> Result<Rendered<V>, ProvisionError> {
        let promise = match &self.source {
            ProviderSource::Value(value) => return Ok(self.install(scope, value.clone(), children)),
            ProviderSource::Promise(promise) => promise.clone(),
            ProviderSource::Factory(factory) => match factory() {
                Resolve::Value(value) => return Ok(self.install(scope, value, children)),
                Resolve::Pending(promise) => promise,
            },
        };

        let rendered = resolve_promise(cache, &promise, |value| {
            self.context.provide(scope, value);
            children()
        });

        match &rendered {
            Ok(Rendered::Suspended(_)) => {
                tracing::debug!(provider = %self.name, "provider suspended")
            }
            Err(error) => tracing::warn!(provider = %self.name, %error, "provider failed"),
            Ok(Rendered::View(_)) => {}
        }
        rendered
    }

    fn install<V>(&self, scope: &dyn ContextScope, value: T, children: impl FnOnce() -> V) -> Rendered<V> {
        self.context.provide(scope, value);
        Rendered::View(children())
    }
}

impl<T> Provider<T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> ContextProvider<T> for Provider<T> {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn context(&self) -> Option<&Context<T>> {
        Some(&self.context)
    }
}

impl<T: Clone> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            context: self.context,
            source: self.source.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}

/// Installs a fixed value into a provider's context, skipping resolution.
pub struct MockProvider<T> {
    name: String,
    context: Context<T>,
    value: T,
}

impl<T: Clone + Send + Sync + 'static> MockProvider<T> {
    /// Install the value in `scope`, then render `children`.
    pub fn render<V>(&self, scope: &dyn ContextScope, children: impl FnOnce() -> V) -> V {
        self.context.provide(scope, self.value.clone());
        children()
    }
}

impl<T> ContextProvider<T> for MockProvider<T> {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn context(&self) -> Option<&Context<T>> {
        Some(&self.context)
    }
}

impl<T> std::fmt::Debug for MockProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}

/// Read the value of the nearest provider for `provider`'s context.
pub fn use_provider<T, P>(provider: &P, scope: &dyn ContextScope) -> Result<T, ProvisionError>
where
    T: Clone + Send + Sync + 'static,
    P: ContextProvider<T> + ?Sized,
{
    let context = provider
        .context()
        .ok_or_else(|| ProvisionError::NotAttached(provider.display_name().to_string()))?;

    context
        .read(scope)
        .ok_or_else(|| ProvisionError::NotMounted(provider.display_name().to_string()))
}

/// Build a stand-in that installs `value` into `provider`'s context.
pub fn mock_provider<T, P>(provider: &P, value: T) -> Result<MockProvider<T>, ProvisionError>
where
    P: ContextProvider<T> + ?Sized,
{
    let context = provider
        .context()
        .ok_or_else(|| ProvisionError::NotAttached(provider.display_name().to_string()))?;

    Ok(MockProvider {
        name: provider.display_name().to_string(),
        context: *context,
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::context::testing::MapScope;

    struct PlainComponent;

    impl ContextProvider<String> for PlainComponent {
        fn display_name(&self) -> &str {
            "PlainComponent"
        }

        fn context(&self) -> Option<&Context<String>> {
            None
        }
    }

    // === create_provider Tests ===

    #[test]
    fn test_create_provider_defaults() {
        let provider = create_provider(ProviderSource::value(1u8), ProviderOptions::new());

        assert_eq!(provider.name(), "Provider");
        assert!(provider.context().is_some());
    }

    #[test]
    fn test_create_provider_reuses_context() {
        let context = Context::<u8>::new();
        let provider = create_provider(
            ProviderSource::value(1u8),
            ProviderOptions::new().with_name("Counter").with_context(context),
        );

        assert_eq!(provider.name(), "Counter");
        assert_eq!(provider.context(), Some(&context));
    }

    // === render Tests ===

    #[test]
    fn test_render_installs_value_before_children() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let provider = create_provider(ProviderSource::value("dark".to_string()), ProviderOptions::new());

        let rendered = provider
            .render(&scope, &cache, || use_provider(&provider, &scope))
            .unwrap();

        assert_eq!(rendered.view().unwrap().unwrap(), "dark");
    }

    #[test]
    fn test_render_calls_factory_each_time() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = create_provider(
            ProviderSource::factory(move || Resolve::Value(counter.fetch_add(1, Ordering::SeqCst))),
            ProviderOptions::new(),
        );

        provider.render(&scope, &cache, || ()).unwrap();
        provider.render(&scope, &cache, || ()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(use_provider(&provider, &scope).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_render_suspends_on_pending_promise() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let provider = create_provider(
            ProviderSource::from(Promise::resolved("user-1".to_string())),
            ProviderOptions::new().with_name("SessionProvider"),
        );

        let first = provider.render(&scope, &cache, || "page").unwrap();
        let Rendered::Suspended(settled) = first else {
            panic!("first render must suspend");
        };
        assert!(matches!(
            use_provider(&provider, &scope),
            Err(ProvisionError::NotMounted(_))
        ));

        settled.await;

        let second = provider.render(&scope, &cache, || "page").unwrap();
        assert_eq!(second.view(), Some("page"));
        assert_eq!(use_provider(&provider, &scope).unwrap(), "user-1");
    }

    #[tokio::test]
    async fn test_render_factory_returning_same_promise() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let promise = Promise::resolved(5u32);
        let provider = create_provider(
            ProviderSource::factory(move || Resolve::from(promise.clone())),
            ProviderOptions::new(),
        );

        if let Ok(Rendered::Suspended(settled)) = provider.render(&scope, &cache, || ()) {
            settled.await;
        }

        assert!(!provider.render(&scope, &cache, || ()).unwrap().is_suspended());
        assert_eq!(use_provider(&provider, &scope).unwrap(), 5);
    }

    #[tokio::test]
    async fn test_render_factory_with_memoized_promise() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let memo = Arc::new(crate::PromiseMemo::new());
        let provider = create_provider(
            ProviderSource::factory(move || {
                Resolve::from(memo.promise("cart-3", || Promise::new(async { Ok(3u32) })))
            }),
            ProviderOptions::new(),
        );

        if let Ok(Rendered::Suspended(settled)) = provider.render(&scope, &cache, || ()) {
            settled.await;
        }

        assert!(!provider.render(&scope, &cache, || ()).unwrap().is_suspended());
        assert_eq!(use_provider(&provider, &scope).unwrap(), 3);
    }

    #[tokio::test]
    async fn test_render_reraises_rejection() {
        let scope = MapScope::default();
        let cache = PromiseCache::new();
        let provider: Provider<u32> = create_provider(
            ProviderSource::from(Promise::rejected(anyhow::anyhow!("session expired"))),
            ProviderOptions::new(),
        );

        if let Ok(Rendered::Suspended(settled)) = provider.render(&scope, &cache, || ()) {
            settled.await;
        }

        let err = provider.render(&scope, &cache, || ()).unwrap_err();
        assert_eq!(err.to_string(), "Provider value rejected: session expired");
    }

    // === use_provider / mock_provider Tests ===

    #[test]
    fn test_use_provider_not_mounted() {
        let scope = MapScope::default();
        let provider = create_provider(
            ProviderSource::value(1u8),
            ProviderOptions::new().with_name("Counter"),
        );

        let err = use_provider(&provider, &scope).unwrap_err();
        assert!(matches!(err, ProvisionError::NotMounted(ref name) if name == "Counter"));
    }

    #[test]
    fn test_use_provider_not_attached() {
        let scope = MapScope::default();

        let err = use_provider(&PlainComponent, &scope).unwrap_err();
        assert_eq!(err.to_string(), "Context value not set on provider: PlainComponent");
    }

    #[test]
    fn test_mock_provider_overrides_value() {
        let scope = MapScope::default();
        let provider = create_provider(
            ProviderSource::factory(|| -> Resolve<String> { panic!("mock must not resolve") }),
            ProviderOptions::new(),
        );

        let mock = mock_provider(&provider, "mocked".to_string()).unwrap();
        let seen = mock.render(&scope, || use_provider(&provider, &scope).unwrap());

        assert_eq!(seen, "mocked");
        assert_eq!(mock.context(), provider.context());
    }

    #[test]
    fn test_mock_provider_not_attached() {
        let err = mock_provider(&PlainComponent, "x".to_string()).unwrap_err();

        assert!(matches!(err, ProvisionError::NotAttached(_)));
    }
}
