use super::*;
use crate::form_controls::{form_data_entries, is_checkable_input, reset_form};
use crate::handles::{FormHandles, InlineEntryPoint, WizardHandles};
use crate::notification::NotificationPresenter;

const VALIDATION_MESSAGE: &str = "Please fill in all required fields";
const ENQUIRY_SUCCESS_MESSAGE: &str = "Thank you! Your enquiry has been submitted successfully. We'll get back to you within 24 hours.";
const CONTACT_SUCCESS_MESSAGE: &str = "Message sent successfully! We'll respond to you soon.";
const ENQUIRY_BUSY_LABEL: &str = r#"<i data-lucide="loader-2"></i> Submitting..."#;
const CONTACT_BUSY_LABEL: &str = r#"<i data-lucide="loader-2"></i> Sending..."#;
const INVALID_BORDER: &str = "#ef4444";
const VALID_BORDER: &str = "#e2e8f0";

/// Position of the enquiry wizard. Always within `1..=total_steps` and only
/// ever moves to an adjacent step or back to the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
}

impl WizardState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 1,
            total_steps: total_steps.max(1),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.total_steps
    }

    /// Moves forward one step; `false` when already on the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Moves back one step; `false` when already on the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current_step <= 1 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.current_step = 1;
    }

    pub fn progress_percent(&self) -> f64 {
        self.current_step as f64 / self.total_steps as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmissionKind {
    Enquiry,
    Contact,
}

impl SubmissionKind {
    fn label(self) -> &'static str {
        match self {
            Self::Enquiry => "enquiry",
            Self::Contact => "contact",
        }
    }

    fn log_prefix(self) -> &'static str {
        match self {
            Self::Enquiry => "Enquiry Data",
            Self::Contact => "Contact Data",
        }
    }

    fn busy_label(self) -> &'static str {
        match self {
            Self::Enquiry => ENQUIRY_BUSY_LABEL,
            Self::Contact => CONTACT_BUSY_LABEL,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Enquiry => ENQUIRY_SUCCESS_MESSAGE,
            Self::Contact => CONTACT_SUCCESS_MESSAGE,
        }
    }
}

/// A submission waiting for its simulated network delay to elapse.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingSubmission {
    pub(crate) kind: SubmissionKind,
    pub(crate) form: NodeId,
    pub(crate) data: FormData,
    pub(crate) button: Option<(NodeId, String)>,
}

/// Enquiry wizard and contact form handling.
#[derive(Debug, Clone)]
pub(crate) struct FormController {
    wizard: WizardState,
    wizard_handles: WizardHandles,
    enquiry: FormHandles,
    contact: FormHandles,
    inline_entry_points: Vec<(NodeId, InlineEntryPoint)>,
    enquiry_delay_ms: i64,
    contact_delay_ms: i64,
}

impl FormController {
    pub(crate) fn new(
        wizard_handles: WizardHandles,
        enquiry: FormHandles,
        contact: FormHandles,
        inline_entry_points: Vec<(NodeId, InlineEntryPoint)>,
        config: &PageConfig,
    ) -> Self {
        Self {
            wizard: WizardState::new(config.total_steps),
            wizard_handles,
            enquiry,
            contact,
            inline_entry_points,
            enquiry_delay_ms: config.enquiry_submit_delay_ms,
            contact_delay_ms: config.contact_submit_delay_ms,
        }
    }

    pub(crate) fn wizard(&self) -> WizardState {
        self.wizard
    }

    pub(crate) fn install(&self, window: &mut Window) -> Result<()> {
        if let Some(form) = self.enquiry.form {
            window.add_listener(form, "submit", Action::EnquirySubmit);
            self.show_step(window)?;
            self.update_progress(window)?;
        }
        if let Some(form) = self.contact.form {
            window.add_listener(form, "submit", Action::ContactSubmit);
        }
        for (node, entry) in &self.inline_entry_points {
            let action = match entry {
                InlineEntryPoint::NextStep => Action::NextStep,
                InlineEntryPoint::PrevStep => Action::PrevStep,
            };
            window.add_listener(*node, "click", action);
        }
        Ok(())
    }

    pub(crate) fn next_step(
        &mut self,
        window: &mut Window,
        notifications: &NotificationPresenter,
    ) -> Result<()> {
        if self.wizard.is_last_step() {
            return Ok(());
        }
        if !self.validate_step(window, notifications, self.wizard.current_step())? {
            return Ok(());
        }
        self.wizard.advance();
        self.show_step(window)?;
        self.update_progress(window)
    }

    pub(crate) fn prev_step(&mut self, window: &mut Window) -> Result<()> {
        if !self.wizard.retreat() {
            return Ok(());
        }
        self.show_step(window)?;
        self.update_progress(window)
    }

    fn show_step(&self, window: &mut Window) -> Result<()> {
        let current = self.wizard.current_step();
        for (index, step) in self.wizard_handles.steps.iter().enumerate() {
            window.dom.class_set(*step, "active", index + 1 == current)?;
        }
        Ok(())
    }

    fn update_progress(&self, window: &mut Window) -> Result<()> {
        if let Some(fill) = self.wizard_handles.progress_fill {
            let width = format!("{}%", format_css_number(self.wizard.progress_percent()));
            window.dom.style_set(fill, "width", &width)?;
        }
        let current = self.wizard.current_step();
        for (index, indicator) in self.wizard_handles.indicators.iter().enumerate() {
            window.dom.class_set(*indicator, "active", index < current)?;
        }
        Ok(())
    }

    /// Checks every `[required]` field of the given step, painting each
    /// field's border by outcome. A step with no container is valid.
    pub(crate) fn validate_step(
        &self,
        window: &mut Window,
        notifications: &NotificationPresenter,
        step: usize,
    ) -> Result<bool> {
        let Some(container) = self.wizard_handles.step_element(&window.dom, step) else {
            return Ok(true);
        };

        let mut valid = true;
        for field in window.dom.query_selector_all_from(container, "[required]")? {
            let value = if is_checkable_input(&window.dom, field) {
                window.dom.attr(field, "value").unwrap_or_else(|| "on".into())
            } else {
                window.dom.value(field)?
            };
            let filled = !value.trim().is_empty();
            let border = if filled { VALID_BORDER } else { INVALID_BORDER };
            window.dom.style_set(field, "border-color", border)?;
            valid &= filled;
        }

        if !valid {
            notifications.show(window, VALIDATION_MESSAGE, NotificationKind::Error)?;
        }
        Ok(valid)
    }

    pub(crate) fn submit_enquiry(
        &mut self,
        window: &mut Window,
        notifications: &NotificationPresenter,
        event: &mut EventState,
    ) -> Result<()> {
        event.prevent_default();
        if submission_in_flight(window, self.enquiry.submit_button) {
            return Ok(());
        }
        if !self.validate_step(window, notifications, self.wizard.current_step())? {
            return Ok(());
        }
        self.begin_submission(
            window,
            SubmissionKind::Enquiry,
            event.current_target,
            self.enquiry.submit_button,
            self.enquiry_delay_ms,
        )
    }

    pub(crate) fn submit_contact(&mut self, window: &mut Window, event: &mut EventState) -> Result<()> {
        event.prevent_default();
        if submission_in_flight(window, self.contact.submit_button) {
            return Ok(());
        }
        self.begin_submission(
            window,
            SubmissionKind::Contact,
            event.current_target,
            self.contact.submit_button,
            self.contact_delay_ms,
        )
    }

    /// Captures the data, shows the busy label on the submit button and
    /// schedules completion. The button's current label is what gets restored.
    fn begin_submission(
        &self,
        window: &mut Window,
        kind: SubmissionKind,
        form: NodeId,
        button: Option<NodeId>,
        delay_ms: i64,
    ) -> Result<()> {
        let data = form_data_entries(&window.dom, form)?;
        let button = match button {
            Some(button) => {
                let original_label = window.dom.inner_html(button)?;
                window.dom.set_inner_html(button, kind.busy_label())?;
                window.dom.set_disabled(button, true)?;
                Some((button, original_label))
            }
            None => None,
        };
        tracing::info!(form = kind.label(), fields = data.len(), "submission started");
        let pending = PendingSubmission {
            kind,
            form,
            data,
            button,
        };
        window.set_timeout(TimerTask::CompleteSubmission(pending), delay_ms);
        Ok(())
    }

    pub(crate) fn complete_submission(
        &mut self,
        window: &mut Window,
        notifications: &NotificationPresenter,
        pending: &PendingSubmission,
    ) -> Result<()> {
        let json = pending.data.to_json();
        window.console_log(format!("{}: {json}", pending.kind.log_prefix()));
        tracing::info!(form = pending.kind.label(), data = %json, "submission completed");

        notifications.show(window, pending.kind.success_message(), NotificationKind::Success)?;
        reset_form(&mut window.dom, pending.form)?;
        if pending.kind == SubmissionKind::Enquiry {
            self.wizard.reset();
            self.show_step(window)?;
            self.update_progress(window)?;
        }
        if let Some((button, original_label)) = &pending.button {
            window.dom.set_inner_html(*button, original_label)?;
            window.dom.set_disabled(*button, false)?;
        }
        window.render_icons()
    }
}

/// A disabled submit button means an earlier submission is still pending.
fn submission_in_flight(window: &Window, button: Option<NodeId>) -> bool {
    let busy = button.is_some_and(|button| window.dom.disabled(button));
    if busy {
        tracing::debug!("submission ignored while the previous one is pending");
    }
    busy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_moves_between_adjacent_steps_only() {
        let mut wizard = WizardState::new(2);
        assert!(!wizard.retreat());
        assert!(wizard.advance());
        assert_eq!(wizard.current_step(), 2);
        assert!(!wizard.advance());
        assert_eq!(wizard.current_step(), 2);
        assert!(wizard.retreat());
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn progress_is_step_over_total() {
        let mut wizard = WizardState::new(2);
        assert_eq!(wizard.progress_percent(), 50.0);
        wizard.advance();
        assert_eq!(wizard.progress_percent(), 100.0);
        wizard.reset();
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(WizardState::new(0).total_steps(), 1);
    }
}
