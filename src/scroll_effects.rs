use super::*;
use crate::handles::ScrollHandles;

/// Navbar `scrolled` state and scroll-driven active link tracking.
///
/// Runs on every `scroll` event with no throttling.
#[derive(Debug, Clone)]
pub(crate) struct ScrollEffectsController {
    handles: ScrollHandles,
    scrolled_threshold: i64,
    section_offset: i64,
}

impl ScrollEffectsController {
    pub(crate) fn new(handles: ScrollHandles, config: &PageConfig) -> Self {
        Self {
            handles,
            scrolled_threshold: config.scrolled_threshold,
            section_offset: config.section_offset,
        }
    }

    pub(crate) fn install(&self, window: &mut Window) {
        let root = window.dom.root;
        window.add_listener(root, "scroll", Action::ScrollEffects);
    }

    pub(crate) fn on_scroll(&self, window: &mut Window) -> Result<()> {
        let scroll_y = window.viewport.scroll_y;
        if let Some(navbar) = self.handles.navbar {
            window
                .dom
                .class_set(navbar, "scrolled", scroll_y > self.scrolled_threshold)?;
        }
        self.update_active_link(window)
    }

    /// The last section, in document order, whose adjusted band contains the
    /// scroll offset.
    pub(crate) fn current_section(&self, window: &Window) -> Option<String> {
        let scroll_y = window.viewport.scroll_y;
        self.handles
            .sections
            .iter()
            .filter(|section| {
                let top = window.offset_top(**section) - self.section_offset;
                let bottom = top + window.client_height(**section);
                scroll_y >= top && scroll_y < bottom
            })
            .filter_map(|section| window.dom.attr(*section, "id"))
            .last()
    }

    fn update_active_link(&self, window: &mut Window) -> Result<()> {
        let wanted = self.current_section(window).map(|id| format!("#{id}"));
        for link in &self.handles.nav_links {
            let active = wanted.is_some() && window.dom.attr(*link, "href") == wanted;
            window.dom.class_set(*link, "active", active)?;
        }
        Ok(())
    }
}
