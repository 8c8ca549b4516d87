use num_traits::ToPrimitive;

use super::*;
use crate::visibility::{WatchOptions, WatchTrigger};

/// Progress of one running counter animation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CounterState {
    pub(crate) node: NodeId,
    pub(crate) target: i64,
    pub(crate) step: f64,
    pub(crate) current: f64,
}

impl CounterState {
    pub(crate) fn new(node: NodeId, target: i64, ticks: f64) -> Self {
        Self {
            node,
            target,
            step: target as f64 / ticks,
            current: 0.0,
        }
    }

    /// Advances one tick. Returns the value to display and whether the
    /// animation has reached its target.
    pub(crate) fn advance(&mut self) -> (i64, bool) {
        self.current += self.step;
        let target = self.target as f64;
        let done = self.current >= target;
        if done {
            self.current = target;
        }
        let shown = self.current.floor().to_i64().unwrap_or(self.target);
        (shown, done)
    }
}

/// Counts `.stat-number` elements up from zero once they are mostly visible.
#[derive(Debug, Clone)]
pub(crate) struct CounterAnimator {
    counters: Vec<NodeId>,
    threshold: f64,
    tick_ms: i64,
    ticks: f64,
}

impl CounterAnimator {
    pub(crate) fn new(counters: Vec<NodeId>, config: &PageConfig) -> Self {
        Self {
            counters,
            threshold: config.counter_threshold,
            tick_ms: config.counter_tick_ms,
            ticks: config.counter_ticks(),
        }
    }

    pub(crate) fn install(&self, window: &mut Window) {
        let options = WatchOptions {
            threshold: self.threshold,
            bottom_margin: 0,
        };
        for counter in &self.counters {
            window.watches.watch(*counter, WatchTrigger::Counter, options);
        }
    }

    /// Starts the animation for a counter that just became visible. A
    /// counter without a numeric `data-target` is left untouched.
    pub(crate) fn start(&self, window: &mut Window, node: NodeId) {
        let raw = window.dom.attr(node, "data-target").unwrap_or_default();
        let Some(target) = crate::pattern::parse_int_prefix(&raw) else {
            tracing::debug!(node = node.0, %raw, "counter target is not a number");
            return;
        };
        let state = CounterState::new(node, target, self.ticks);
        window.set_interval(TimerTask::CounterTick(state), self.tick_ms);
    }

    pub(crate) fn tick(&self, window: &mut Window, state: &mut CounterState) -> Result<()> {
        let (shown, done) = state.advance();
        if done {
            window.cancel_running_timer();
        }
        window.dom.set_text_content(state.node, &shown.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_to_the_exact_target_in_duration_over_tick_steps() {
        let mut state = CounterState::new(NodeId(1), 150, 125.0);
        let mut shown = Vec::new();
        loop {
            let (value, done) = state.advance();
            shown.push(value);
            if done {
                break;
            }
        }
        // Accumulated rounding may need one extra tick to cross the target.
        assert!((125..=126).contains(&shown.len()));
        assert_eq!(shown.first(), Some(&1));
        assert_eq!(shown.last(), Some(&150));
        assert!(shown.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn zero_target_finishes_on_the_first_tick() {
        let mut state = CounterState::new(NodeId(1), 0, 125.0);
        assert_eq!(state.advance(), (0, true));
    }
}
