use super::*;
use crate::visibility::{WatchOptions, WatchTrigger};

/// Swaps `data-src` into `src` for images once they come into view.
#[derive(Debug, Clone)]
pub(crate) struct LazyImageLoader {
    images: Vec<NodeId>,
}

impl LazyImageLoader {
    pub(crate) fn new(images: Vec<NodeId>) -> Self {
        Self { images }
    }

    pub(crate) fn install(&self, window: &mut Window) {
        let options = WatchOptions {
            threshold: 0.0,
            bottom_margin: 0,
        };
        for image in &self.images {
            window.watches.watch(*image, WatchTrigger::LazyImage, options);
        }
    }

    pub(crate) fn load(&self, window: &mut Window, image: NodeId) -> Result<()> {
        let Some(source) = window.dom.attr(image, "data-src") else {
            return Ok(());
        };
        window.dom.set_attr(image, "src", &source)?;
        window.dom.class_remove(image, "lazy")
    }
}
