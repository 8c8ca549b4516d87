use super::*;
use crate::visibility::{WatchOptions, WatchTrigger};

/// One-shot reveal for content blocks: hidden and shifted down at start,
/// restored the first time they scroll into view.
#[derive(Debug, Clone)]
pub(crate) struct FadeInAnimator {
    targets: Vec<NodeId>,
    options: WatchOptions,
    offset: i64,
    stagger_secs: f64,
}

impl FadeInAnimator {
    pub(crate) fn new(targets: Vec<NodeId>, config: &PageConfig) -> Self {
        Self {
            targets,
            options: WatchOptions {
                threshold: config.fade_threshold,
                bottom_margin: config.fade_bottom_margin,
            },
            offset: config.fade_offset,
            stagger_secs: config.fade_stagger_secs,
        }
    }

    pub(crate) fn install(&self, window: &mut Window) -> Result<()> {
        for (index, target) in self.targets.iter().enumerate() {
            let delay = format_css_number(index as f64 * self.stagger_secs);
            window.dom.style_set(*target, "opacity", "0")?;
            window
                .dom
                .style_set(*target, "transform", &format!("translateY({}px)", self.offset))?;
            window.dom.style_set(
                *target,
                "transition",
                &format!("opacity 0.6s ease {delay}s, transform 0.6s ease {delay}s"),
            )?;
            window.watches.watch(*target, WatchTrigger::FadeIn, self.options);
        }
        Ok(())
    }

    pub(crate) fn reveal(&self, window: &mut Window, node: NodeId) -> Result<()> {
        window.dom.class_add(node, "fade-in")?;
        window.dom.style_remove(node, "opacity")?;
        window.dom.style_remove(node, "transform")
    }
}
