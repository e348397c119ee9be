use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Deserialize;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::debug;
use tracing::trace;

use crate::error::LayoutError;
use crate::geometry::Orientation;
use crate::geometry::Size;
use crate::geometry::Thickness;
use crate::host::VirtualizingHost;
use crate::state::ItemMeasure;
use crate::state::WrapLayoutState;
use crate::uv::UvBounds;
use crate::uv::UvMeasure;
use crate::uv::uv_rect;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WrapLayoutOptions {
    /// Distance between items of a row (horizontal orientation) or between columns (vertical).
    pub horizontal_spacing: f64,
    /// Distance between rows (horizontal orientation) or between items of a column (vertical).
    pub vertical_spacing: f64,
    pub orientation: Orientation,
    pub padding: Thickness,
}

impl WrapLayoutOptions {
    fn sanitized(mut self) -> Self {
        self.horizontal_spacing = non_negative(self.horizontal_spacing);
        self.vertical_spacing = non_negative(self.vertical_spacing);
        self
    }
}

/// Virtualizing flow layout: places items one after another along the flow axis and starts a
/// new line when the next item no longer fits.
///
/// Both passes only do real work for the part of the collection that intersects the host's
/// realization window. Measure stops at the first line past the window; arrange stops at the
/// first item past it.
#[derive(Clone, Default)]
pub struct WrapLayout {
    options: WrapLayoutOptions,
    generation: u64,
    on_invalidate: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl fmt::Debug for WrapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapLayout")
            .field("options", &self.options)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl WrapLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WrapLayoutOptions) -> Self {
        Self {
            options: options.sanitized(),
            ..Self::default()
        }
    }

    pub fn options(&self) -> &WrapLayoutOptions {
        &self.options
    }

    /// Bumped whenever a layout-affecting option changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Called after every configuration change so the host can schedule a new layout.
    pub fn set_on_invalidate(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.on_invalidate = Some(Arc::new(f));
    }

    pub fn clear_on_invalidate(&mut self) {
        self.on_invalidate = None;
    }

    pub fn set_options(&mut self, options: WrapLayoutOptions) {
        let options = options.sanitized();
        if self.options == options {
            return;
        }
        self.options = options;
        self.invalidate();
    }

    pub fn set_horizontal_spacing(&mut self, spacing: f64) {
        self.set_options(WrapLayoutOptions {
            horizontal_spacing: spacing,
            ..self.options
        });
    }

    pub fn set_vertical_spacing(&mut self, spacing: f64) {
        self.set_options(WrapLayoutOptions {
            vertical_spacing: spacing,
            ..self.options
        });
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.set_options(WrapLayoutOptions {
            orientation,
            ..self.options
        });
    }

    pub fn set_padding(&mut self, padding: Thickness) {
        self.set_options(WrapLayoutOptions {
            padding,
            ..self.options
        });
    }

    /// Creates the item cache for a context that is being attached to this layout.
    pub fn initialize_for_context(&self) -> WrapLayoutState {
        trace!(generation = self.generation, "wrap layout attached to context");
        WrapLayoutState::with_generation(self.generation)
    }

    /// Clears the item cache of a context that is being detached. The state can be reused if
    /// the context is attached again.
    pub fn uninitialize_for_context(&self, state: &mut WrapLayoutState) {
        trace!(cached = state.len(), "wrap layout detached from context");
        state.invalidate();
    }

    /// Computes the size needed by the items up to (and including) the realization window.
    ///
    /// `available` is the space offered to the whole layout, padding included. The returned size
    /// excludes padding.
    pub fn measure<H>(
        &self,
        host: &mut H,
        state: &mut WrapLayoutState,
        available: Size,
    ) -> Result<Size, LayoutError>
    where
        H: VirtualizingHost + ?Sized,
    {
        if state.sync_generation(self.generation) {
            trace!(generation = self.generation, "dropped stale item cache");
        }

        let count = host.item_count();
        if state.len() > count {
            return Err(LayoutError::ItemCountMismatch {
                cached: state.len(),
                count,
            });
        }

        let WrapLayoutOptions {
            horizontal_spacing,
            vertical_spacing,
            orientation,
            padding,
        } = self.options;

        let available = Size::new(
            non_negative(available.width - padding.horizontal()),
            non_negative(available.height - padding.vertical()),
        );
        let parent = UvMeasure::from_size(orientation, available);
        let spacing = UvMeasure::new(orientation, horizontal_spacing, vertical_spacing);
        let bounds = UvBounds::new(orientation, host.realization_rect());

        let mut total = UvMeasure::ZERO;
        let mut line = UvMeasure::ZERO;
        let mut visited = 0usize;
        let mut host_calls = 0usize;

        for index in 0..count {
            visited += 1;
            let mut measured = false;
            let cached = state.item_at_mut(index).measure;
            let current = match cached {
                ItemMeasure::Measured(m) => m,
                ItemMeasure::Unmeasured => {
                    let m = measure_item(host, index, available, orientation)?;
                    host_calls += 1;
                    state.item_at_mut(index).measure = ItemMeasure::Measured(m);
                    measured = true;
                    m
                }
            };

            if current.u == 0.0 {
                continue;
            }

            // No spacing in front of the first item of a line.
            let u_change = if line.u == 0.0 {
                current.u
            } else {
                current.u + spacing.u
            };

            if parent.u >= u_change + line.u {
                line.u += u_change;
                line.v = line.v.max(current.v);
            } else {
                total.u = total.u.max(line.u);
                total.v += line.v + spacing.v;

                if parent.u >= current.u {
                    line = current;
                } else {
                    // Wider than the layout: the item is a line of its own.
                    total.u = total.u.max(current.u);
                    total.v += current.v;
                    line = UvMeasure::ZERO;
                }
            }

            if total.v > bounds.v_max {
                trace!(
                    index,
                    v = total.v,
                    v_max = bounds.v_max,
                    "measure past realization window"
                );
                break;
            }

            let v_end = total.v + current.v;
            if v_end >= bounds.v_min && !measured {
                // In or below the window: the host always gets a fresh measure call.
                let m = measure_item(host, index, available, orientation)?;
                host_calls += 1;
                state.item_at_mut(index).measure = ItemMeasure::Measured(m);
            }
        }

        total.u = total.u.max(line.u);
        total.v += line.v;
        total.u = total.u.ceil();

        let size = total.to_size(orientation);
        debug!(
            count,
            visited,
            host_calls,
            width = size.width,
            height = size.height,
            "wrap layout measured"
        );
        Ok(size)
    }

    /// Places every realized item. Items must have been measured by [`WrapLayout::measure`].
    pub fn arrange<H>(
        &self,
        host: &mut H,
        state: &mut WrapLayoutState,
        final_size: Size,
    ) -> Result<Size, LayoutError>
    where
        H: VirtualizingHost + ?Sized,
    {
        let count = host.item_count();
        if count == 0 {
            return Ok(final_size);
        }
        if state.sync_generation(self.generation) {
            trace!(generation = self.generation, "dropped stale item cache");
        }
        if state.len() > count {
            return Err(LayoutError::ItemCountMismatch {
                cached: state.len(),
                count,
            });
        }

        let WrapLayoutOptions {
            horizontal_spacing,
            vertical_spacing,
            orientation,
            padding,
        } = self.options;

        let parent = UvMeasure::from_size(orientation, final_size);
        let spacing = UvMeasure::new(orientation, horizontal_spacing, vertical_spacing);
        let padding_start = UvMeasure::new(orientation, padding.left, padding.top);
        let padding_end = UvMeasure::new(orientation, padding.right, padding.bottom);
        let bounds = UvBounds::new(orientation, host.realization_rect());

        let mut position = padding_start;
        let mut line_v = 0.0f64;
        let mut placed = 0usize;

        for index in 0..count {
            let Some(mut desired) = state.item(index).and_then(|item| item.measure.get()) else {
                // Measure stops once a line ends past the window, so the items after an
                // oversized line are never cached. They cannot start before the next line.
                if position.v + line_v + spacing.v > bounds.v_max {
                    trace!(
                        index,
                        v = position.v + line_v + spacing.v,
                        v_max = bounds.v_max,
                        "arrange reached unmeasured items past realization window"
                    );
                    break;
                }
                return Err(LayoutError::Unmeasured { index });
            };

            // Collapsed items take no space and no spacing.
            if desired.u == 0.0 {
                continue;
            }

            if desired.u + position.u + padding_end.u > parent.u {
                position.u = padding_start.u;
                position.v += line_v + spacing.v;
                line_v = 0.0;
            }

            if index + 1 == count {
                desired.u = desired.u.max(parent.u - position.u);
            }

            if position.v + desired.v >= bounds.v_min && position.v <= bounds.v_max {
                host.arrange_element(index, uv_rect(orientation, position, desired))?;
                placed += 1;
            } else if position.v > bounds.v_max {
                trace!(
                    index,
                    v = position.v,
                    v_max = bounds.v_max,
                    "arrange past realization window"
                );
                break;
            }

            position.u += desired.u + spacing.u;
            line_v = line_v.max(desired.v);
        }

        debug!(count, placed, "wrap layout arranged");
        Ok(final_size)
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(f) = &self.on_invalidate {
            f();
        }
    }
}

fn measure_item<H>(
    host: &mut H,
    index: usize,
    available: Size,
    orientation: Orientation,
) -> Result<UvMeasure, LayoutError>
where
    H: VirtualizingHost + ?Sized,
{
    let desired = host.measure_element(index, available)?;
    Ok(UvMeasure::new(
        orientation,
        non_negative(desired.width),
        non_negative(desired.height),
    ))
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    struct Host {
        sizes: Vec<Size>,
        window: Rect,
        measured: Vec<usize>,
        arranged: Vec<(usize, Rect)>,
    }

    impl Host {
        fn new(sizes: Vec<Size>) -> Self {
            Self {
                sizes,
                window: Rect::new(0.0, 0.0, 1_000.0, 1_000.0),
                measured: Vec::new(),
                arranged: Vec::new(),
            }
        }
    }

    impl VirtualizingHost for Host {
        fn item_count(&self) -> usize {
            self.sizes.len()
        }

        fn realization_rect(&self) -> Rect {
            self.window
        }

        fn measure_element(&mut self, index: usize, _: Size) -> Result<Size, LayoutError> {
            self.measured.push(index);
            self.sizes
                .get(index)
                .copied()
                .ok_or(LayoutError::ElementUnavailable { index })
        }

        fn arrange_element(&mut self, index: usize, rect: Rect) -> Result<(), LayoutError> {
            self.arranged.push((index, rect));
            Ok(())
        }
    }

    fn options(h: f64, v: f64) -> WrapLayoutOptions {
        WrapLayoutOptions {
            horizontal_spacing: h,
            vertical_spacing: v,
            ..Default::default()
        }
    }

    #[test]
    fn three_items_wrap_after_two() {
        let layout = WrapLayout::with_options(options(10.0, 5.0));
        let mut host = Host::new(vec![Size::new(40.0, 8.0); 3]);
        let mut state = layout.initialize_for_context();

        let size = layout
            .measure(&mut host, &mut state, Size::new(100.0, 1_000.0))
            .unwrap();
        assert_eq!(size, Size::new(90.0, 8.0 + 5.0 + 8.0));

        layout
            .arrange(&mut host, &mut state, Size::new(100.0, 1_000.0))
            .unwrap();
        let origins: Vec<_> = host.arranged.iter().map(|(_, r)| (r.x, r.y)).collect();
        assert_eq!(origins, vec![(0.0, 0.0), (50.0, 0.0), (0.0, 13.0)]);
    }

    #[test]
    fn collapsed_items_do_not_add_spacing() {
        let layout = WrapLayout::with_options(options(10.0, 0.0));
        let mut host = Host::new(vec![
            Size::new(40.0, 8.0),
            Size::new(0.0, 8.0),
            Size::new(40.0, 8.0),
        ]);
        let mut state = layout.initialize_for_context();
        let size = layout
            .measure(&mut host, &mut state, Size::new(90.0, 100.0))
            .unwrap();
        assert_eq!(size, Size::new(90.0, 8.0));

        layout
            .arrange(&mut host, &mut state, Size::new(90.0, 100.0))
            .unwrap();
        let placed: Vec<_> = host.arranged.iter().map(|(i, _)| *i).collect();
        assert_eq!(placed, vec![0, 2]);
    }

    #[test]
    fn last_item_fills_the_rest_of_its_line() {
        let layout = WrapLayout::new();
        let mut host = Host::new(vec![Size::new(10.0, 4.0), Size::new(10.0, 4.0)]);
        let mut state = layout.initialize_for_context();
        layout
            .measure(&mut host, &mut state, Size::new(50.0, 10.0))
            .unwrap();
        layout
            .arrange(&mut host, &mut state, Size::new(50.0, 10.0))
            .unwrap();
        assert_eq!(host.arranged[1], (1, Rect::new(10.0, 0.0, 40.0, 4.0)));
    }

    #[test]
    fn oversized_item_takes_its_own_line() {
        let layout = WrapLayout::new();
        let mut host = Host::new(vec![Size::new(150.0, 10.0), Size::new(20.0, 5.0)]);
        let mut state = layout.initialize_for_context();
        let size = layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(size, Size::new(150.0, 15.0));
    }

    #[test]
    fn padding_shrinks_available_space_and_offsets_items() {
        let layout = WrapLayout::with_options(WrapLayoutOptions {
            padding: Thickness::new(5.0, 2.0, 5.0, 2.0),
            ..Default::default()
        });
        let mut host = Host::new(vec![Size::new(45.0, 3.0); 3]);
        let mut state = layout.initialize_for_context();
        let size = layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(size, Size::new(90.0, 6.0));

        layout
            .arrange(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(host.arranged[0].1, Rect::new(5.0, 2.0, 45.0, 3.0));
        assert_eq!(host.arranged[1].1, Rect::new(50.0, 2.0, 45.0, 3.0));
        assert_eq!(host.arranged[2].1.y, 5.0);
    }

    #[test]
    fn negative_available_size_is_clamped() {
        let layout = WrapLayout::with_options(WrapLayoutOptions {
            padding: Thickness::uniform(20.0),
            ..Default::default()
        });
        let mut host = Host::new(vec![Size::new(10.0, 10.0); 2]);
        let mut state = layout.initialize_for_context();
        let size = layout
            .measure(&mut host, &mut state, Size::new(10.0, 10.0))
            .unwrap();
        // Every item is wider than zero and lands on a line of its own.
        assert_eq!(size, Size::new(10.0, 20.0));
    }

    #[test]
    fn empty_collection_measures_zero() {
        let layout = WrapLayout::new();
        let mut host = Host::new(Vec::new());
        let mut state = layout.initialize_for_context();
        let size = layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(size, Size::ZERO);
        assert_eq!(
            layout.arrange(&mut host, &mut state, Size::new(100.0, 100.0)),
            Ok(Size::new(100.0, 100.0))
        );
    }

    #[test]
    fn option_change_invalidates_cache_and_notifies() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut layout = WrapLayout::new();
        let counter = hits.clone();
        layout.set_on_invalidate(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let mut host = Host::new(vec![Size::new(10.0, 10.0); 2]);
        let mut state = layout.initialize_for_context();
        layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        assert_eq!(state.len(), 2);

        layout.set_horizontal_spacing(0.0);
        assert_eq!(hits.load(Ordering::Relaxed), 0);

        layout.set_horizontal_spacing(4.0);
        assert_eq!(hits.load(Ordering::Relaxed), 1);

        host.measured.clear();
        layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();
        // Cache was dropped, so both items are measured again exactly once.
        assert_eq!(host.measured, vec![0, 1]);
    }

    #[test]
    fn negative_spacing_is_clamped() {
        let mut layout = WrapLayout::new();
        layout.set_vertical_spacing(-3.0);
        layout.set_horizontal_spacing(f64::NAN);
        assert_eq!(layout.options().vertical_spacing, 0.0);
        assert_eq!(layout.options().horizontal_spacing, 0.0);
        assert_eq!(layout.generation(), 0);
    }

    #[test]
    fn shrinking_collection_is_reported() {
        let layout = WrapLayout::new();
        let mut host = Host::new(vec![Size::new(10.0, 10.0); 3]);
        let mut state = layout.initialize_for_context();
        layout
            .measure(&mut host, &mut state, Size::new(100.0, 100.0))
            .unwrap();

        host.sizes.pop();
        assert_eq!(
            layout.measure(&mut host, &mut state, Size::new(100.0, 100.0)),
            Err(LayoutError::ItemCountMismatch { cached: 3, count: 2 })
        );

        state.invalidate();
        assert!(
            layout
                .measure(&mut host, &mut state, Size::new(100.0, 100.0))
                .is_ok()
        );
    }

    #[test]
    fn arranging_before_measuring_is_an_error() {
        let layout = WrapLayout::new();
        let mut host = Host::new(vec![Size::new(10.0, 10.0)]);
        let mut state = layout.initialize_for_context();
        assert_eq!(
            layout.arrange(&mut host, &mut state, Size::new(100.0, 100.0)),
            Err(LayoutError::Unmeasured { index: 0 })
        );
    }

    #[test]
    fn host_failure_aborts_the_pass() {
        struct Broken;
        impl VirtualizingHost for Broken {
            fn item_count(&self) -> usize {
                1
            }
            fn realization_rect(&self) -> Rect {
                Rect::new(0.0, 0.0, 10.0, 10.0)
            }
            fn measure_element(&mut self, index: usize, _: Size) -> Result<Size, LayoutError> {
                Err(LayoutError::ElementUnavailable { index })
            }
            fn arrange_element(&mut self, _: usize, _: Rect) -> Result<(), LayoutError> {
                Ok(())
            }
        }

        let layout = WrapLayout::new();
        let mut state = layout.initialize_for_context();
        assert_eq!(
            layout.measure(&mut Broken, &mut state, Size::new(10.0, 10.0)),
            Err(LayoutError::ElementUnavailable { index: 0 })
        );
    }
}
