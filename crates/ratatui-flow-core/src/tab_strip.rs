use tracing::debug;

use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::geometry::Size;
use crate::host::VirtualizingHost;

/// Header row of a tab control.
///
/// Every header is offered an equal share of the width; the strip is as tall as its tallest
/// header. Headers are then placed left to right at their desired sizes. The host's realization
/// window is ignored, every header is realized.
#[derive(Clone, Debug, Default)]
pub struct TabStripLayout {
    desired: Vec<Size>,
}

impl TabStripLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Desired sizes reported by the last measure pass.
    pub fn desired_sizes(&self) -> &[Size] {
        &self.desired
    }

    pub fn measure<H>(&mut self, host: &mut H, available: Size) -> Result<Size, LayoutError>
    where
        H: VirtualizingHost + ?Sized,
    {
        self.desired.clear();
        let count = host.item_count();
        if count == 0 {
            return Ok(Size::new(available.width, 0.0));
        }

        let header = Size::new(available.width / count as f64, available.height);
        let mut height = 0.0f64;
        for index in 0..count {
            let desired = host.measure_element(index, header)?;
            height = height.max(desired.height);
            self.desired.push(desired);
        }

        debug!(count, height, "tab strip measured");
        Ok(Size::new(available.width, height))
    }

    pub fn arrange<H>(&self, host: &mut H, final_size: Size) -> Result<Size, LayoutError>
    where
        H: VirtualizingHost + ?Sized,
    {
        let mut x = 0.0;
        for index in 0..host.item_count() {
            let desired = self
                .desired
                .get(index)
                .copied()
                .ok_or(LayoutError::Unmeasured { index })?;
            host.arrange_element(index, Rect::new(x, 0.0, desired.width, desired.height))?;
            x += desired.width;
        }
        Ok(final_size)
    }
}
