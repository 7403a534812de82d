//! Walk configuration
//!
//! Tuning knobs and observation hooks for one walk. The defaults give
//! a strictly serial, silent walk; raise the parallelism for concurrent
//! branches and attach callbacks to watch nodes move through the
//! lattice.

use crate::graph::Key;

use super::WalkError;

/// Options for one [`Graph::walk`](crate::Graph::walk) invocation.
///
/// # Examples
///
/// ```
/// use trellis::WalkOptions;
///
/// let opts = WalkOptions::new()
///     .parallelism(4)
///     .on_complete(|key| println!("done: {key}"));
/// ```
pub struct WalkOptions {
    pub(crate) parallelism: usize,
    pub(crate) callbacks: Callbacks,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            parallelism: 1,
            callbacks: Callbacks::default(),
        }
    }
}

impl WalkOptions {
    /// Creates options with the defaults: serial walk, no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of node bodies in flight at once.
    ///
    /// `1` walks the graph strictly serially, in deterministic order.
    ///
    /// # Panics
    ///
    /// Panics if `parallelism` is zero; a pool of zero workers can
    /// never drain the graph, so this is a fatal misconfiguration.
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        if parallelism == 0 {
            panic!("parallelism must be at least 1");
        }
        self.parallelism = parallelism;
        self
    }

    /// Invoked every time a node completes successfully.
    ///
    /// Callbacks run inline on the coordinator: keep them fast or they
    /// throttle the walk.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&Key) + Send + 'static,
    {
        self.callbacks.on_complete = Some(Box::new(f));
        self
    }

    /// Invoked every time a node expands into a subgraph.
    pub fn on_expand<F>(mut self, f: F) -> Self
    where
        F: Fn(&Key) + Send + 'static,
    {
        self.callbacks.on_expand = Some(Box::new(f));
        self
    }

    /// Invoked every time a node errors.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&Key, &WalkError) + Send + 'static,
    {
        self.callbacks.on_error = Some(Box::new(f));
        self
    }
}

/// Optional observation hooks, with no-op defaults.
#[derive(Default)]
pub(crate) struct Callbacks {
    on_complete: Option<Box<dyn Fn(&Key) + Send>>,
    on_expand: Option<Box<dyn Fn(&Key) + Send>>,
    on_error: Option<Box<dyn Fn(&Key, &WalkError) + Send>>,
}

impl Callbacks {
    pub(crate) fn complete(&self, key: &Key) {
        if let Some(f) = &self.on_complete {
            f(key);
        }
    }

    pub(crate) fn expand(&self, key: &Key) {
        if let Some(f) = &self.on_expand {
            f(key);
        }
    }

    pub(crate) fn error(&self, key: &Key, err: &WalkError) {
        if let Some(f) = &self.on_error {
            f(key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parallelism_is_one() {
        assert_eq!(WalkOptions::new().parallelism, 1);
    }

    #[test]
    #[should_panic(expected = "parallelism must be at least 1")]
    fn test_zero_parallelism_panics() {
        let _ = WalkOptions::new().parallelism(0);
    }

    #[test]
    fn test_missing_callbacks_are_noops() {
        let callbacks = Callbacks::default();
        callbacks.complete(&Key::new("a"));
        callbacks.expand(&Key::new("a"));
    }
}
