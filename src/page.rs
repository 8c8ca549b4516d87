use super::*;
use crate::events::{EventPhase, event_path};
use crate::form_controls::{
    check_radio, form_is_valid_for_submit, input_type, is_submit_control, owning_form,
};

const DISPATCH_STACK_BYTES: usize = 32 * 1024 * 1024;

/// A parsed page with every site behaviour installed, driven by explicit
/// user actions and a virtual clock.
///
/// ```
/// use site_enhancer::Page;
///
/// let mut page = Page::from_html(
///     r#"<button id="hamburger"></button><ul id="nav-menu"></ul>"#,
/// )?;
/// page.click("#hamburger")?;
/// page.assert_class("#nav-menu", "active", true)?;
/// # Ok::<(), site_enhancer::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    pub(crate) window: Window,
    pub(crate) controller: PageController,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, PageConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: PageConfig) -> Result<Self> {
        Self::from_html_with_layouts(html, config, &[])
    }

    /// Like [`Page::from_html_with_config`], with layout boxes applied before
    /// the first visibility pass. Each entry targets the first element that
    /// matches its selector.
    pub fn from_html_with_layouts(
        html: &str,
        config: PageConfig,
        layouts: &[(&str, LayoutBox)],
    ) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let mut window = Window::new(dom);
        for (selector, layout) in layouts {
            let node = select_one(&window.dom, selector)?;
            window.set_layout(node, *layout);
        }
        let controller = PageController::install(&mut window, &config)?;
        let mut page = Self { window, controller };
        page.settle()?;
        Ok(page)
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)?;
        self.settle()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self.element_tag(selector, target)?;
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        if self.window.dom.disabled(target) {
            return Ok(());
        }
        self.window.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        self.settle()
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let tag = self.element_tag(selector, target)?;
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        if self.window.dom.disabled(target) {
            return Ok(());
        }
        self.window.dom.set_value(target, value)?;
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        self.settle()
    }

    /// Submits the form owning the matched element the way a user would:
    /// built-in constraint validation first, then the `submit` event.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if let Some(form) = owning_form(&self.window.dom, target) {
            self.request_form_submit(form)?;
        }
        self.settle()
    }

    /// Pointer moves onto the matched element from outside the document.
    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseover")?;
        for node in event_path(&self.window.dom, target) {
            self.dispatch_event(node, "mouseenter")?;
        }
        self.settle()
    }

    /// Pointer leaves the matched element and the document.
    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "mouseout")?;
        for node in event_path(&self.window.dom, target).into_iter().rev() {
            self.dispatch_event(node, "mouseleave")?;
        }
        self.settle()
    }

    /// Fires a bare event with no default action attached.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event_type)?;
        self.settle()
    }

    /// User scroll to an absolute offset; negative offsets clamp to the top.
    pub fn scroll_to(&mut self, top: i64) -> Result<()> {
        self.window.viewport.scroll_y = top.max(0);
        self.settle()
    }

    pub fn set_viewport_size(&mut self, width: i64, height: i64) -> Result<()> {
        if width < 0 || height < 0 {
            return Err(Error::Runtime(format!(
                "viewport size must not be negative (width={width}, height={height})"
            )));
        }
        self.window.viewport.width = width;
        self.window.viewport.height = height;
        self.settle()
    }

    pub fn set_layout(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.window.set_layout(target, layout);
        self.settle()
    }

    /// Invokes an entry point the page markup can call by name
    /// (`nextStep`, `prevStep`).
    pub fn call_global(&mut self, name: &str) -> Result<()> {
        self.controller.call_global(&mut self.window, name)?;
        self.settle()
    }

    /// Shows a toast the same way the page behaviours do, replacing any
    /// toast already on screen.
    pub fn show_notification(&mut self, message: &str, kind: NotificationKind) -> Result<()> {
        self.controller
            .show_notification(&mut self.window, message, kind)?;
        self.settle()
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        select_one(&self.window.dom, selector)
    }

    fn element_tag(&self, selector: &str, node: NodeId) -> Result<String> {
        self.window
            .dom
            .tag_name(node)
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "element".into(),
                actual: "non-element".into(),
            })
    }

    fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.window.dom.disabled(target) {
            return Ok(());
        }
        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        let dom = &self.window.dom;
        let kind = dom.is_tag(target, "input").then(|| input_type(dom, target));
        let checked = dom.checked(target);
        let toggled = match kind.as_deref() {
            Some("checkbox") => {
                self.window.dom.set_checked(target, !checked)?;
                true
            }
            Some("radio") if !checked => {
                check_radio(&mut self.window.dom, target)?;
                true
            }
            _ => false,
        };
        if toggled {
            self.dispatch_event(target, "input")?;
            self.dispatch_event(target, "change")?;
        }

        if is_submit_control(&self.window.dom, target) {
            if let Some(form) = owning_form(&self.window.dom, target) {
                self.request_form_submit(form)?;
            }
        }
        Ok(())
    }

    fn request_form_submit(&mut self, form: NodeId) -> Result<()> {
        if !form_is_valid_for_submit(&self.window.dom, form)? {
            tracing::debug!(form = %self.window.trace_node_label(form), "submission blocked by required fields");
            return Ok(());
        }
        self.dispatch_event(form, "submit")?;
        Ok(())
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let event = EventState::new(event_type, target, self.window.scheduler.now_ms);
        stacker::grow(DISPATCH_STACK_BYTES, || self.dispatch_prepared_event(event))
    }

    fn dispatch_prepared_event(&mut self, mut event: EventState) -> Result<EventState> {
        let target = event.target;
        let path = event_path(&self.window.dom, target);
        let ancestors = &path[..path.len().saturating_sub(1)];

        event.phase = EventPhase::AtTarget;
        event.current_target = target;
        self.invoke_listeners(target, &mut event)?;

        if event.bubbles {
            for node in ancestors.iter().rev() {
                event.phase = EventPhase::Bubbling;
                event.current_target = *node;
                self.invoke_listeners(*node, &mut event)?;
            }
        }

        self.trace_event_done(&event);
        Ok(event)
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut EventState) -> Result<()> {
        let actions = self.window.listeners.get(node, &event.event_type);
        for action in actions {
            let line = format!(
                "[event] {} target={} current={} phase={} action={}",
                event.event_type,
                self.window.trace_node_label(event.target),
                self.window.trace_node_label(event.current_target),
                event.phase.label(),
                action.label(),
            );
            self.window.trace_event_line(line);
            self.controller.handle(&mut self.window, &action, event)?;
        }
        Ok(())
    }

    fn trace_event_done(&mut self, event: &EventState) {
        let line = format!(
            "[event] done {} target={} default_prevented={} at_ms={}",
            event.event_type,
            self.window.trace_node_label(event.target),
            event.default_prevented,
            event.time_stamp_ms,
        );
        self.window.trace_event_line(line);
    }

    /// Rendering step after every action and timer task: one `scroll` event
    /// if the offset moved, then the visibility watches.
    pub(crate) fn settle(&mut self) -> Result<()> {
        if self.window.take_scroll_change() {
            let root = self.window.dom.root;
            self.dispatch_event(root, "scroll")?;
        }
        for (node, trigger) in self.window.take_visible() {
            self.controller.on_visible(&mut self.window, node, trigger)?;
        }
        Ok(())
    }
}

fn select_one(dom: &Dom, selector: &str) -> Result<NodeId> {
    dom.query_selector(selector)?
        .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
}
