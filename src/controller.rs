use super::*;
use crate::counter::{CounterAnimator, CounterState};
use crate::fade_in::FadeInAnimator;
use crate::forms::{FormController, PendingSubmission};
use crate::handles::InlineEntryPoint;
use crate::lazy_images::LazyImageLoader;
use crate::navigation::NavigationController;
use crate::notification::NotificationPresenter;
use crate::scroll_effects::ScrollEffectsController;
use crate::service_cards::ServiceCardController;
use crate::visibility::WatchTrigger;

/// What a registered listener does when its event reaches it. The node the
/// listener sits on arrives as the event's current target.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    ToggleMenu,
    SelectNavLink,
    SmoothScrollAnchor,
    ScrollEffects,
    ServiceCardEnter,
    ServiceCardLeave,
    ServiceLinkClick { card: NodeId },
    TechItemClick,
    EnquirySubmit,
    ContactSubmit,
    NextStep,
    PrevStep,
    DismissNotification { notification: NodeId },
}

impl Action {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::ToggleMenu => "toggle-menu",
            Self::SelectNavLink => "select-nav-link",
            Self::SmoothScrollAnchor => "smooth-scroll-anchor",
            Self::ScrollEffects => "scroll-effects",
            Self::ServiceCardEnter => "service-card-enter",
            Self::ServiceCardLeave => "service-card-leave",
            Self::ServiceLinkClick { .. } => "service-link-click",
            Self::TechItemClick => "tech-item-click",
            Self::EnquirySubmit => "enquiry-submit",
            Self::ContactSubmit => "contact-submit",
            Self::NextStep => "next-step",
            Self::PrevStep => "prev-step",
            Self::DismissNotification { .. } => "dismiss-notification",
        }
    }
}

/// Work queued on the virtual clock.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimerTask {
    CounterTick(CounterState),
    CompleteSubmission(PendingSubmission),
    DismissNotification { notification: NodeId },
}

impl TimerTask {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::CounterTick(_) => "counter-tick",
            Self::CompleteSubmission(_) => "complete-submission",
            Self::DismissNotification { .. } => "dismiss-notification",
        }
    }
}

/// Owns every page behaviour and routes listener actions, timer tasks and
/// visibility triggers to them.
#[derive(Debug, Clone)]
pub(crate) struct PageController {
    navigation: NavigationController,
    scroll_effects: ScrollEffectsController,
    counters: CounterAnimator,
    fade_in: FadeInAnimator,
    services: ServiceCardController,
    forms: FormController,
    lazy_images: LazyImageLoader,
    notifications: NotificationPresenter,
}

impl PageController {
    /// Resolves the page handles and wires every behaviour, in the order the
    /// site initializes them.
    pub(crate) fn install(window: &mut Window, config: &PageConfig) -> Result<Self> {
        let handles = PageHandles::resolve(&window.dom, config);
        let controller = Self {
            navigation: NavigationController::new(handles.navigation, config),
            scroll_effects: ScrollEffectsController::new(handles.scroll, config),
            counters: CounterAnimator::new(handles.counters, config),
            fade_in: FadeInAnimator::new(handles.fade_targets, config),
            services: ServiceCardController::new(handles.services),
            forms: FormController::new(
                handles.wizard,
                handles.enquiry,
                handles.contact,
                handles.inline_entry_points,
                config,
            ),
            lazy_images: LazyImageLoader::new(handles.lazy_images),
            notifications: NotificationPresenter::new(config),
        };

        // Lazy loading is set up while the script loads, before the
        // document-ready pass.
        controller.lazy_images.install(window);
        controller.navigation.install(window);
        controller.fade_in.install(window)?;
        controller.forms.install(window)?;
        controller.counters.install(window);
        controller.scroll_effects.install(window);
        controller.services.install(window);

        tracing::debug!(watches = window.watches.len(), "page behaviours installed");
        Ok(controller)
    }

    pub(crate) fn wizard(&self) -> WizardState {
        self.forms.wizard()
    }

    pub(crate) fn handle(
        &mut self,
        window: &mut Window,
        action: &Action,
        event: &mut EventState,
    ) -> Result<()> {
        let node = event.current_target;
        match action {
            Action::ToggleMenu => self.navigation.toggle_menu(window),
            Action::SelectNavLink => self.navigation.select_link(window, node),
            Action::SmoothScrollAnchor => self.navigation.scroll_to_anchor(window, node, event),
            Action::ScrollEffects => self.scroll_effects.on_scroll(window),
            Action::ServiceCardEnter => self.services.raise(window, node),
            Action::ServiceCardLeave => self.services.lower(window, node),
            Action::ServiceLinkClick { card } => self.services.enquire(window, *card, event),
            Action::TechItemClick => {
                self.services.describe_tech(window, node);
                Ok(())
            }
            Action::EnquirySubmit => {
                self.forms
                    .submit_enquiry(window, &self.notifications, event)
            }
            Action::ContactSubmit => self.forms.submit_contact(window, event),
            Action::NextStep => self.forms.next_step(window, &self.notifications),
            Action::PrevStep => self.forms.prev_step(window),
            Action::DismissNotification { notification } => {
                self.notifications.dismiss(window, *notification);
                Ok(())
            }
        }
    }

    pub(crate) fn run_timer(&mut self, window: &mut Window, task: &mut TimerTask) -> Result<()> {
        match task {
            TimerTask::CounterTick(state) => self.counters.tick(window, state),
            TimerTask::CompleteSubmission(pending) => {
                self.forms
                    .complete_submission(window, &self.notifications, pending)
            }
            TimerTask::DismissNotification { notification } => {
                self.notifications.dismiss(window, *notification);
                Ok(())
            }
        }
    }

    pub(crate) fn on_visible(
        &mut self,
        window: &mut Window,
        node: NodeId,
        trigger: WatchTrigger,
    ) -> Result<()> {
        match trigger {
            WatchTrigger::Counter => {
                self.counters.start(window, node);
                Ok(())
            }
            WatchTrigger::FadeIn => self.fade_in.reveal(window, node),
            WatchTrigger::LazyImage => self.lazy_images.load(window, node),
        }
    }

    pub(crate) fn show_notification(
        &self,
        window: &mut Window,
        message: &str,
        kind: NotificationKind,
    ) -> Result<()> {
        self.notifications.show(window, message, kind).map(|_| ())
    }

    /// Runs one of the entry points the page markup can call by name.
    pub(crate) fn call_global(&mut self, window: &mut Window, name: &str) -> Result<()> {
        match InlineEntryPoint::from_name(name) {
            Some(InlineEntryPoint::NextStep) => self.forms.next_step(window, &self.notifications),
            Some(InlineEntryPoint::PrevStep) => self.forms.prev_step(window),
            None => Err(Error::UnknownGlobal(name.to_string())),
        }
    }
}
