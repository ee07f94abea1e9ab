//! Nest wrapper components around a subtree.

use std::sync::Arc;

/// A component that wraps its children.
pub type Wrapper<V> = Arc<dyn Fn(V) -> V + Send + Sync>;

/// Composes wrappers so the first one is the outermost.
///
/// ```rust
/// use turbo_provision::Compose;
///
/// let page = Compose::new()
///     .with(|inner: String| format!("<theme>{inner}</theme>"))
///     .with(|inner: String| format!("<session>{inner}</session>"))
///     .render("<app/>".to_string());
///
/// assert_eq!(page, "<theme><session><app/></session></theme>");
/// ```
///
/// Wrappers that install context must run before their children are built,
/// so pick a lazy `V` (a children closure such as Leptos `Children`) for
/// them rather than an already rendered view.
pub struct Compose<V> {
    components: Vec<Wrapper<V>>,
}

impl<V> Compose<V> {
    /// Start with no wrappers.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Compose a list of wrappers, outermost first.
    pub fn from_components(components: impl IntoIterator<Item = Wrapper<V>>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Add a wrapper inside the ones already present.
    pub fn with(mut self, component: impl Fn(V) -> V + Send + Sync + 'static) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    /// Wrap `children` with every component, last one innermost.
    pub fn render(&self, children: V) -> V {
        self.components
            .iter()
            .rev()
            .fold(children, |inner, component| component(inner))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<V> Default for Compose<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Compose<V> {
    fn clone(&self) -> Self {
        Self {
            components: self.components.clone(),
        }
    }
}

impl<V> std::fmt::Debug for Compose<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compose")
            .field("components", &self.components.len())
            .finish()
    }
}

/// Build a reusable container that composes all `providers` around
/// whatever it is given.
pub fn create_container<V>(
    providers: impl IntoIterator<Item = Wrapper<V>>,
) -> impl Fn(V) -> V + Send + Sync
where
    V: 'static,
{
    let compose = Compose::from_components(providers);
    move |children| compose.render(children)
}
