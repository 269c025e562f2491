use crate::registry::DiffRegistry;

/// State of one review session: a single visit to one pull request's files page.
///
/// A new instance is built whenever the page path changes; in-page refreshes
/// rebuild `registry` and reseed `cursor` in place.
#[derive(Debug)]
pub struct NavigationState {
    path: String,
    pub registry: DiffRegistry,
    /// Index into `registry`. `None` only while the registry is empty.
    pub cursor: Option<usize>,
}

impl NavigationState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            registry: DiffRegistry::new(),
            cursor: None,
        }
    }

    /// Page path this session was built for.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
