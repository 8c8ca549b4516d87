use super::*;
use crate::visibility::{VisibilityWatches, WatchTrigger};

/// Mocked layout of one element: its top offset in document coordinates and
/// its rendered height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutBox {
    pub top: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

impl ScrollBehavior {
    fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Smooth => "smooth",
        }
    }
}

/// A scroll the page asked the window to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub top: i64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) scroll_y: i64,
    pub(crate) width: i64,
    pub(crate) height: i64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0,
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PlatformMocks {
    pub(crate) alert_messages: Vec<String>,
    pub(crate) console_logs: Vec<String>,
    pub(crate) scroll_requests: Vec<ScrollRequest>,
    pub(crate) icon_library_available: bool,
    pub(crate) icon_render_count: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

/// Everything the page script can reach: the document, its listeners, the
/// timer queue, the viewport and the host-provided side channels.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: SchedulerState,
    pub(crate) viewport: Viewport,
    pub(crate) watches: VisibilityWatches,
    pub(crate) platform: PlatformMocks,
    pub(crate) trace: TraceState,
    layouts: HashMap<NodeId, LayoutBox>,
    last_scroll_event_y: i64,
}

impl Window {
    pub(crate) fn new(dom: Dom) -> Self {
        Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: SchedulerState::default(),
            viewport: Viewport::default(),
            watches: VisibilityWatches::default(),
            platform: PlatformMocks::default(),
            trace: TraceState::default(),
            layouts: HashMap::new(),
            last_scroll_event_y: 0,
        }
    }

    pub(crate) fn add_listener(&mut self, node: NodeId, event: &str, action: Action) {
        self.listeners.add(node, event, action);
    }

    pub(crate) fn set_timeout(&mut self, task: TimerTask, delay_ms: i64) -> i64 {
        let label = task.label();
        let id = self.scheduler.schedule(task, delay_ms, false);
        self.trace_timer_line(format!(
            "[timer] schedule timeout id={id} task={label} delay_ms={delay_ms}"
        ));
        id
    }

    pub(crate) fn set_interval(&mut self, task: TimerTask, interval_ms: i64) -> i64 {
        let label = task.label();
        let id = self.scheduler.schedule(task, interval_ms, true);
        self.trace_timer_line(format!(
            "[timer] schedule interval id={id} task={label} interval_ms={interval_ms}"
        ));
        id
    }

    /// Clears the timer whose task is executing right now.
    pub(crate) fn cancel_running_timer(&mut self) {
        if let Some(id) = self.scheduler.running_timer_id {
            self.scheduler.clear(id);
            self.trace_timer_line(format!("[timer] clear id={id}"));
        }
    }

    pub(crate) fn scroll_to(&mut self, top: i64, behavior: ScrollBehavior) {
        let top = top.max(0);
        tracing::debug!(top, behavior = behavior.label(), "scroll requested");
        self.platform.scroll_requests.push(ScrollRequest { top, behavior });
        self.viewport.scroll_y = top;
    }

    /// Reports whether the scroll offset moved since the last `scroll`
    /// event, and marks the current offset as reported.
    pub(crate) fn take_scroll_change(&mut self) -> bool {
        if self.viewport.scroll_y == self.last_scroll_event_y {
            return false;
        }
        self.last_scroll_event_y = self.viewport.scroll_y;
        true
    }

    pub(crate) fn set_layout(&mut self, node: NodeId, layout: LayoutBox) {
        self.layouts.insert(node, layout);
    }

    pub(crate) fn layout(&self, node: NodeId) -> LayoutBox {
        self.layouts.get(&node).copied().unwrap_or_default()
    }

    pub(crate) fn offset_top(&self, node: NodeId) -> i64 {
        self.layout(node).top
    }

    pub(crate) fn client_height(&self, node: NodeId) -> i64 {
        self.layout(node).height
    }

    /// Retires and returns the watches that are satisfied at the current
    /// scroll offset. Elements no longer in the document are skipped.
    pub(crate) fn take_visible(&mut self) -> Vec<(NodeId, WatchTrigger)> {
        let Self {
            dom,
            watches,
            viewport,
            layouts,
            ..
        } = self;
        let fired = watches.take_triggered(viewport.scroll_y, viewport.height, |node| {
            dom.is_connected(node)
                .then(|| layouts.get(&node).copied().unwrap_or_default())
        });
        for (node, trigger) in &fired {
            tracing::debug!(node = node.0, trigger = trigger.label(), "visibility watch retired");
        }
        fired
    }

    pub(crate) fn alert(&mut self, message: String) {
        self.platform.alert_messages.push(message);
    }

    pub(crate) fn console_log(&mut self, line: String) {
        self.platform.console_logs.push(line);
    }

    /// Icon library pass: every `<i data-lucide="name">` placeholder becomes
    /// an inline `<svg>` carrying the icon classes. Does nothing when the
    /// library is not loaded.
    pub(crate) fn render_icons(&mut self) -> Result<()> {
        if !self.platform.icon_library_available {
            return Ok(());
        }
        for placeholder in self.dom.query_selector_all("i[data-lucide]")? {
            let name = self.dom.attr(placeholder, "data-lucide").unwrap_or_default();
            self.dom.set_tag_name(placeholder, "svg")?;
            self.dom.class_add(placeholder, "lucide")?;
            if !name.is_empty() {
                self.dom.class_add(placeholder, &format!("lucide-{name}"))?;
            }
        }
        self.platform.icon_render_count += 1;
        Ok(())
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        if node == self.dom.root {
            return "document".into();
        }
        let Some(tag) = self.dom.tag_name(node) else {
            return format!("node-{}", node.0);
        };
        match self.dom.attr(node, "id") {
            Some(id) if !id.is_empty() => format!("{tag}#{id}"),
            _ => tag.to_string(),
        }
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace.enabled && self.trace.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace.enabled && self.trace.timers {
            self.trace_line(line);
        }
    }

    fn trace_line(&mut self, line: String) {
        tracing::trace!(target: "site_enhancer::trace", "{line}");
        if self.trace.logs.len() >= self.trace.log_limit {
            self.trace.logs.pop_front();
        }
        self.trace.logs.push_back(line);
    }
}
