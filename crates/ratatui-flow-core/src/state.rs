use crate::uv::UvMeasure;

/// Cached flow-space size of one item.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ItemMeasure {
    #[default]
    Unmeasured,
    Measured(UvMeasure),
}

impl ItemMeasure {
    pub fn get(self) -> Option<UvMeasure> {
        match self {
            Self::Unmeasured => None,
            Self::Measured(m) => Some(m),
        }
    }

    pub fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapItem {
    pub index: usize,
    pub measure: ItemMeasure,
}

impl WrapItem {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            measure: ItemMeasure::Unmeasured,
        }
    }
}

/// Per-context item cache of a [`crate::wrap::WrapLayout`].
///
/// Items are stored densely by index and created on first access. The state remembers the
/// configuration generation it was filled under; a layout whose configuration changed since
/// clears it before the next pass.
#[derive(Clone, Debug, Default)]
pub struct WrapLayoutState {
    items: Vec<WrapItem>,
    generation: u64,
}

impl WrapLayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_generation(generation: u64) -> Self {
        Self {
            items: Vec::new(),
            generation,
        }
    }

    /// Number of items created so far. Not necessarily the host's item count.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&WrapItem> {
        self.items.get(index)
    }

    /// Returns the item at `index`, creating it and every missing item before it.
    pub fn item_at_mut(&mut self, index: usize) -> &mut WrapItem {
        if index >= self.items.len() {
            let start = self.items.len();
            self.items.extend((start..=index).map(WrapItem::new));
        }
        &mut self.items[index]
    }

    pub fn items(&self) -> &[WrapItem] {
        &self.items
    }

    /// Drops every cached item. Hosts call this after their collection changed.
    pub fn invalidate(&mut self) {
        self.items.clear();
    }

    /// Clears the cache if it was filled under a different configuration.
    pub(crate) fn sync_generation(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            return false;
        }
        self.generation = generation;
        self.invalidate();
        true
    }
}
