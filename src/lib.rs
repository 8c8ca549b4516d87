//! Deterministic page controller for a marketing site.
//!
//! [`Page`] parses a document, resolves the elements the site behaviours
//! need, and wires navigation toggling, scroll effects, animated counters,
//! reveal animations, service card interactions, the multi-step enquiry
//! form, the contact form and transient notifications. Time only moves
//! when the caller advances the virtual clock, so every behaviour can be
//! driven and observed step by step.

use std::collections::{HashMap, HashSet, VecDeque};

mod clock;
mod config;
mod controller;
mod counter;
mod dom;
mod dom_utils;
mod events;
mod fade_in;
mod form_controls;
mod forms;
mod handles;
mod html;
mod inspect;
mod lazy_images;
mod navigation;
mod notification;
mod page;
mod pattern;
mod scheduler;
mod scroll_effects;
mod selector;
mod service_cards;
mod visibility;
mod window;

pub use config::PageConfig;
pub use form_controls::FormData;
pub use forms::WizardState;
pub use notification::NotificationKind;
pub use page::Page;
pub use scheduler::PendingTimer;
pub use window::{LayoutBox, ScrollBehavior, ScrollRequest};

pub(crate) use controller::{Action, PageController, TimerTask};
pub(crate) use dom::{Dom, Element, NodeId, NodeType};
pub(crate) use dom_utils::*;
pub(crate) use events::{EventState, ListenerStore};
pub(crate) use handles::PageHandles;
pub(crate) use html::{is_raw_text_tag, is_void_tag, parse_html};
pub(crate) use scheduler::{ScheduledTask, SchedulerState};
pub(crate) use selector::*;
pub(crate) use window::Window;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unknown global entry point: {0}")]
    UnknownGlobal(String),
}
