use super::*;

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Action>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, action: Action) {
        let actions = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        // Re-registering the same action is a no-op.
        if actions.contains(&action) {
            return;
        }
        actions.push(action);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Action> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventPhase {
    AtTarget,
    Bubbling,
}

impl EventPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::AtTarget => "target",
            Self::Bubbling => "bubble",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) phase: EventPhase,
    pub(crate) time_stamp_ms: i64,
    pub(crate) bubbles: bool,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId, time_stamp_ms: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            time_stamp_ms,
            bubbles: bubbles_by_default(event_type),
            default_prevented: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

fn bubbles_by_default(event_type: &str) -> bool {
    !matches!(
        event_type,
        "mouseenter" | "mouseleave" | "focus" | "blur" | "load" | "scroll"
    )
}

/// Ancestors of `target` from the root down, followed by `target` itself.
pub(crate) fn event_path(dom: &Dom, target: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        path.push(node);
        cursor = dom.parent(node);
    }
    path.reverse();
    path
}
