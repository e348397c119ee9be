use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::geometry::Size;

/// The side of a layout pass that owns the concrete elements.
///
/// A host exposes a dense collection `0..item_count()`, the window that is currently worth
/// realizing, and synchronous element sizing/placement. Layouts only ever call into the host
/// from inside `measure`/`arrange`, one pass at a time.
pub trait VirtualizingHost {
    fn item_count(&self) -> usize;

    /// Visible area plus any overscan, in the layout's coordinate space.
    fn realization_rect(&self) -> Rect;

    /// Gets or creates the element at `index`, measures it against `available` and returns its
    /// desired size.
    fn measure_element(&mut self, index: usize, available: Size) -> Result<Size, LayoutError>;

    /// Places the element at `index`.
    fn arrange_element(&mut self, index: usize, rect: Rect) -> Result<(), LayoutError>;
}

impl<H: VirtualizingHost + ?Sized> VirtualizingHost for &mut H {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn realization_rect(&self) -> Rect {
        (**self).realization_rect()
    }

    fn measure_element(&mut self, index: usize, available: Size) -> Result<Size, LayoutError> {
        (**self).measure_element(index, available)
    }

    fn arrange_element(&mut self, index: usize, rect: Rect) -> Result<(), LayoutError> {
        (**self).arrange_element(index, rect)
    }
}
