use super::*;
use crate::handles::NavigationHandles;

/// Mobile menu toggle, active link marking and in-page anchor scrolling.
#[derive(Debug, Clone)]
pub(crate) struct NavigationController {
    handles: NavigationHandles,
    header_offset: i64,
}

impl NavigationController {
    pub(crate) fn new(handles: NavigationHandles, config: &PageConfig) -> Self {
        Self {
            handles,
            header_offset: config.header_offset,
        }
    }

    pub(crate) fn install(&self, window: &mut Window) {
        if let Some(hamburger) = self.handles.hamburger {
            window.add_listener(hamburger, "click", Action::ToggleMenu);
        }
        for link in &self.handles.nav_links {
            window.add_listener(*link, "click", Action::SelectNavLink);
        }
        for anchor in &self.handles.anchors {
            window.add_listener(*anchor, "click", Action::SmoothScrollAnchor);
        }
    }

    pub(crate) fn toggle_menu(&self, window: &mut Window) -> Result<()> {
        for node in [self.handles.hamburger, self.handles.nav_menu]
            .into_iter()
            .flatten()
        {
            window.dom.class_toggle(node, "active")?;
        }
        Ok(())
    }

    pub(crate) fn select_link(&self, window: &mut Window, link: NodeId) -> Result<()> {
        for node in [self.handles.hamburger, self.handles.nav_menu]
            .into_iter()
            .flatten()
        {
            window.dom.class_remove(node, "active")?;
        }
        for other in &self.handles.nav_links {
            window.dom.class_remove(*other, "active")?;
        }
        window.dom.class_add(link, "active")
    }

    /// Scrolls so the anchor's target sits just below the fixed header. A
    /// missing or unparsable target leaves the page where it is.
    pub(crate) fn scroll_to_anchor(
        &self,
        window: &mut Window,
        anchor: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        event.prevent_default();
        let Some(href) = window.dom.attr(anchor, "href") else {
            return Ok(());
        };
        let Ok(Some(target)) = window.dom.query_selector(&href) else {
            tracing::debug!(%href, "anchor target not found");
            return Ok(());
        };
        let top = window.offset_top(target) - self.header_offset;
        window.scroll_to(top, ScrollBehavior::Smooth);
        Ok(())
    }
}
