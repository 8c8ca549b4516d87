use super::*;

/// Snapshot of a queued timer, as reported by [`Page::pending_timers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) task: TimerTask,
}

#[derive(Debug, Clone)]
pub(crate) struct SchedulerState {
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) now_ms: i64,
    pub(crate) timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
    pub(crate) running_timer_id: Option<i64>,
    pub(crate) running_timer_canceled: bool,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
            running_timer_id: None,
            running_timer_canceled: false,
        }
    }
}

impl SchedulerState {
    fn allocate_timer_id(&mut self) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }

    fn allocate_task_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }

    pub(crate) fn schedule(&mut self, task: TimerTask, delay_ms: i64, repeat: bool) -> i64 {
        let delay_ms = delay_ms.max(0);
        let id = self.allocate_timer_id();
        let order = self.allocate_task_order();
        self.task_queue.push(ScheduledTask {
            id,
            due_at: self.now_ms.saturating_add(delay_ms),
            order,
            interval_ms: repeat.then_some(delay_ms),
            task,
        });
        id
    }

    /// Removes a queued timer; clearing the timer that is currently running
    /// stops an interval from being requeued.
    pub(crate) fn clear(&mut self, timer_id: i64) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != timer_id);
        let running = self.running_timer_id == Some(timer_id);
        if running {
            self.running_timer_canceled = true;
        }
        running || self.task_queue.len() != before
    }

    pub(crate) fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn take_next(&mut self, due_limit: Option<i64>) -> Option<ScheduledTask> {
        let idx = self.next_task_index(due_limit)?;
        Some(self.task_queue.remove(idx))
    }

    pub(crate) fn begin_running(&mut self, timer_id: i64) {
        self.running_timer_id = Some(timer_id);
        self.running_timer_canceled = false;
    }

    /// Forgets the running task after it failed; it is not requeued.
    pub(crate) fn abort_running(&mut self) {
        self.running_timer_id = None;
        self.running_timer_canceled = false;
    }

    /// Finishes the running task and requeues it if it is an interval that
    /// was not cleared while it ran. Returns the new due time when requeued.
    pub(crate) fn finish_running(&mut self, finished: ScheduledTask) -> Option<i64> {
        let canceled = self.running_timer_canceled;
        self.running_timer_id = None;
        self.running_timer_canceled = false;

        let interval_ms = finished.interval_ms?;
        if canceled {
            return None;
        }
        let due_at = finished.due_at.saturating_add(interval_ms);
        let order = self.allocate_task_order();
        self.task_queue.push(ScheduledTask {
            due_at,
            order,
            ..finished
        });
        Some(due_at)
    }

    pub(crate) fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .next_task_index(due_limit)
            .and_then(|idx| self.task_queue.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},order={},interval_ms={},task={}",
                    task.id,
                    task.due_at,
                    task.order,
                    task.interval_ms
                        .map(|value| value.to_string())
                        .unwrap_or_else(|| "none".into()),
                    task.task.label()
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Runtime(format!(
            "timer queue exceeded max task steps (possible uncleared interval): limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={next_task_desc}",
            self.timer_step_limit,
            self.now_ms,
            self.task_queue.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dismiss(node: usize) -> TimerTask {
        TimerTask::DismissNotification {
            notification: NodeId(node),
        }
    }

    #[test]
    fn next_task_orders_by_due_time_then_registration() {
        let mut scheduler = SchedulerState::default();
        let late = scheduler.schedule(dismiss(1), 50, false);
        let first = scheduler.schedule(dismiss(2), 10, false);
        let second = scheduler.schedule(dismiss(3), 10, false);

        let order = std::iter::from_fn(|| scheduler.take_next(None).map(|task| task.id))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![first, second, late]);
    }

    #[test]
    fn due_limit_hides_future_tasks() {
        let mut scheduler = SchedulerState::default();
        scheduler.schedule(dismiss(1), 100, false);
        assert!(scheduler.next_task_index(Some(99)).is_none());
        assert!(scheduler.next_task_index(Some(100)).is_some());
    }

    #[test]
    fn interval_requeues_unless_cleared_while_running() {
        let mut scheduler = SchedulerState::default();
        let id = scheduler.schedule(dismiss(1), 16, true);

        let task = scheduler.take_next(None).expect("queued interval");
        scheduler.begin_running(task.id);
        assert_eq!(scheduler.finish_running(task), Some(32));

        let task = scheduler.take_next(None).expect("requeued interval");
        scheduler.begin_running(task.id);
        assert!(scheduler.clear(id));
        assert_eq!(scheduler.finish_running(task), None);
        assert!(scheduler.pending().is_empty());
    }
}
