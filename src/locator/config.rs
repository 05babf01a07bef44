use crate::models::BlockKind;

/// Levels below the page the container search descends.
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// What a failed child fetch means to the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Treat the block as childless and keep searching siblings.
    #[default]
    FailOpen,
    /// Abort the run with [`super::LocateError::Fetch`].
    Propagate,
}

/// Search parameters.
///
/// `header_kinds` is in priority order: an earlier kind wins over a later one
/// regardless of where the blocks sit in the container.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub depth_limit: usize,
    pub phrases: Vec<String>,
    pub header_kinds: Vec<BlockKind>,
    pub fetch_policy: FetchPolicy,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            phrases: Vec::new(),
            header_kinds: vec![BlockKind::Callout],
            fetch_policy: FetchPolicy::default(),
        }
    }
}

impl LocatorConfig {
    pub fn with_phrases<I, P>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_header_kinds(mut self, kinds: Vec<BlockKind>) -> Self {
        self.header_kinds = kinds;
        self
    }

    pub fn strict(mut self) -> Self {
        self.fetch_policy = FetchPolicy::Propagate;
        self
    }
}
