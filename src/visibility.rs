//! One-shot visibility watches.
//!
//! A watch observes one element until the element first satisfies its
//! threshold against the viewport, reports it once, and is then retired for
//! good. Counters, reveal animations and lazy images all share this.

use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WatchOptions {
    /// Fraction of the element's height that must be inside the viewport.
    pub(crate) threshold: f64,
    /// Shrinks the viewport from the bottom edge.
    pub(crate) bottom_margin: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatchTrigger {
    Counter,
    FadeIn,
    LazyImage,
}

impl WatchTrigger {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::FadeIn => "fade-in",
            Self::LazyImage => "lazy-image",
        }
    }
}

#[derive(Debug, Clone)]
struct Watch {
    node: NodeId,
    trigger: WatchTrigger,
    options: WatchOptions,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct VisibilityWatches {
    active: Vec<Watch>,
}

impl VisibilityWatches {
    pub(crate) fn watch(&mut self, node: NodeId, trigger: WatchTrigger, options: WatchOptions) {
        if self
            .active
            .iter()
            .any(|watch| watch.node == node && watch.trigger == trigger)
        {
            return;
        }
        self.active.push(Watch {
            node,
            trigger,
            options,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    /// Retires and returns every watch whose element currently meets its
    /// threshold, in registration order.
    pub(crate) fn take_triggered(
        &mut self,
        scroll_y: i64,
        viewport_height: i64,
        layout_of: impl Fn(NodeId) -> Option<LayoutBox>,
    ) -> Vec<(NodeId, WatchTrigger)> {
        let mut fired = Vec::new();
        self.active.retain(|watch| {
            // Detached elements have no box and never intersect.
            let Some(layout) = layout_of(watch.node) else {
                return true;
            };
            let view_top = scroll_y;
            let view_bottom = scroll_y + viewport_height - watch.options.bottom_margin;
            let visible = intersection_ratio(layout, view_top, view_bottom)
                .is_some_and(|ratio| ratio >= watch.options.threshold);
            if visible {
                fired.push((watch.node, watch.trigger));
            }
            !visible
        });
        fired
    }
}

/// Share of `target` inside `[view_top, view_bottom]`, or `None` when the two
/// do not touch. Edges count as touching; a zero-height box whose top lies
/// inside the range is fully visible.
pub(crate) fn intersection_ratio(target: LayoutBox, view_top: i64, view_bottom: i64) -> Option<f64> {
    if view_bottom < view_top {
        return None;
    }
    let top = target.top;
    let bottom = target.top + target.height.max(0);
    if top > view_bottom || bottom < view_top {
        return None;
    }
    if target.height <= 0 {
        return Some(1.0);
    }
    let overlap = bottom.min(view_bottom) - top.max(view_top);
    Some(overlap.max(0) as f64 / target.height as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(top: i64, height: i64) -> LayoutBox {
        LayoutBox { top, height }
    }

    #[test]
    fn ratio_covers_partial_full_and_edge_cases() {
        assert_eq!(intersection_ratio(layout(0, 100), 0, 768), Some(1.0));
        assert_eq!(intersection_ratio(layout(718, 100), 0, 768), Some(0.5));
        assert_eq!(intersection_ratio(layout(768, 100), 0, 768), Some(0.0));
        assert_eq!(intersection_ratio(layout(769, 100), 0, 768), None);
        assert_eq!(intersection_ratio(layout(300, 0), 0, 768), Some(1.0));
        assert_eq!(intersection_ratio(layout(-200, 100), 0, 768), None);
    }

    #[test]
    fn watches_fire_once_and_retire() {
        let mut watches = VisibilityWatches::default();
        let options = WatchOptions {
            threshold: 0.7,
            bottom_margin: 0,
        };
        watches.watch(NodeId(1), WatchTrigger::Counter, options);
        watches.watch(NodeId(1), WatchTrigger::Counter, options);
        assert_eq!(watches.len(), 1);

        let boxes = |top: i64| move |_: NodeId| Some(layout(top, 100));
        assert!(watches.take_triggered(0, 768, boxes(700)).is_empty());
        assert_eq!(
            watches.take_triggered(0, 768, boxes(600)),
            vec![(NodeId(1), WatchTrigger::Counter)]
        );
        assert!(watches.take_triggered(0, 768, boxes(600)).is_empty());
        assert_eq!(watches.len(), 0);
    }

    #[test]
    fn bottom_margin_shrinks_the_viewport() {
        let mut watches = VisibilityWatches::default();
        let options = WatchOptions {
            threshold: 0.1,
            bottom_margin: 50,
        };
        watches.watch(NodeId(4), WatchTrigger::FadeIn, options);
        // 30 of 100 units above the unshrunk bottom edge, none above the margin.
        assert!(
            watches
                .take_triggered(0, 768, |_| Some(layout(738, 100)))
                .is_empty()
        );
        assert_eq!(
            watches.take_triggered(100, 768, |_| Some(layout(738, 100))).len(),
            1
        );
    }
}
