use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Arrange reached an item the measure pass never sized.
    #[error("item {index} has not been measured")]
    Unmeasured { index: usize },

    /// The cached item list no longer matches the host's collection.
    #[error("layout state caches {cached} items but the host reports {count}")]
    ItemCountMismatch { cached: usize, count: usize },

    /// The host could not create or size the element.
    #[error("element {index} is unavailable")]
    ElementUnavailable { index: usize },
}
