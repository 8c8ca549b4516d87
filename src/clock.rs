use super::*;

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.window.scheduler.now_ms
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.window.scheduler.pending()
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.window.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.window.scheduler.now_ms;
        let to = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(to), true)?;
        self.window.scheduler.now_ms = to;
        let line = format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={to} ran_due={ran}"
        );
        self.window.trace_timer_line(line);
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.window.scheduler.now_ms;
        if target_ms < from {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        let ran = self.run_timer_queue(Some(target_ms), true)?;
        self.window.scheduler.now_ms = target_ms;
        self.window.trace_timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every task that is due at the current time without moving the
    /// clock. Returns how many ran.
    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now_ms = self.window.scheduler.now_ms;
        let ran = self.run_timer_queue(Some(now_ms), false)?;
        self.window
            .trace_timer_line(format!("[timer] run_due now_ms={now_ms} ran={ran}"));
        Ok(ran)
    }

    /// Jumps the clock to the earliest pending task and runs it. Returns
    /// `false` when nothing is queued.
    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.window.scheduler.take_next(None) else {
            self.window.trace_timer_line("[timer] run_next none".into());
            return Ok(false);
        };
        if task.due_at > self.window.scheduler.now_ms {
            self.window.scheduler.now_ms = task.due_at;
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    /// Runs the queue to exhaustion, moving the clock forward as needed.
    /// Intervals that never clear themselves hit the step limit.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.window.scheduler.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        let line = format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.window.scheduler.now_ms
        );
        self.window.trace_timer_line(line);
        Ok(())
    }

    /// Runs due tasks in order. With `advance_clock` the clock sits at each
    /// task's due time while it runs, so timers it schedules start from there.
    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while self.window.scheduler.next_task_index(due_limit).is_some() {
            steps += 1;
            if steps > self.window.scheduler.timer_step_limit {
                return Err(self.window.scheduler.step_limit_error(steps, due_limit));
            }
            let Some(task) = self.window.scheduler.take_next(due_limit) else {
                break;
            };
            if advance_clock && task.due_at > self.window.scheduler.now_ms {
                self.window.scheduler.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || self.execute_timer_task_impl(task))
    }

    fn execute_timer_task_impl(&mut self, mut task: ScheduledTask) -> Result<()> {
        let id = task.id;
        let line = format!(
            "[timer] run id={id} task={} due_at={} now_ms={}",
            task.task.label(),
            task.due_at,
            self.window.scheduler.now_ms
        );
        self.window.trace_timer_line(line);

        self.window.scheduler.begin_running(id);
        if let Err(err) = self.controller.run_timer(&mut self.window, &mut task.task) {
            self.window.scheduler.abort_running();
            return Err(err);
        }
        if let Some(due_at) = self.window.scheduler.finish_running(task) {
            self.window
                .trace_timer_line(format!("[timer] requeue id={id} due_at={due_at}"));
        }
        self.settle()
    }
}
