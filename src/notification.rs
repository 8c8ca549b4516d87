use super::*;

const STYLE_BLOCK_ID: &str = "notification-styles";

const STYLE_RULES: &str = "
@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
.notification-content {
    display: flex;
    align-items: center;
    gap: 0.75rem;
}
.notification-close {
    background: none;
    border: none;
    color: white;
    cursor: pointer;
    padding: 0;
    margin-left: auto;
}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn background(self) -> &'static str {
        match self {
            Self::Info => "#3b82f6",
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "check-circle",
            Self::Error => "x-circle",
        }
    }
}

/// Shows at most one toast at a time; a new one evicts the old one.
#[derive(Debug, Clone)]
pub(crate) struct NotificationPresenter {
    lifetime_ms: i64,
}

impl NotificationPresenter {
    pub(crate) fn new(config: &PageConfig) -> Self {
        Self {
            lifetime_ms: config.notification_lifetime_ms,
        }
    }

    pub(crate) fn show(
        &self,
        window: &mut Window,
        message: &str,
        kind: NotificationKind,
    ) -> Result<NodeId> {
        if let Some(existing) = window.dom.query_selector(".notification")? {
            window.dom.remove_node(existing);
        }

        let notification = window.dom.create_detached_element("div");
        window.dom.set_attr(
            notification,
            "class",
            &format!("notification notification-{}", kind.as_str()),
        )?;
        window.dom.set_inner_html(
            notification,
            &format!(
                r#"<div class="notification-content"><i data-lucide="{icon}"></i><span>{message}</span><button class="notification-close"><i data-lucide="x"></i></button></div>"#,
                icon = kind.icon(),
                message = escape_html_text(message),
            ),
        )?;
        window.dom.set_style_text(
            notification,
            &format!(
                "position: fixed; top: 100px; right: 20px; background: {}; color: white; \
                 padding: 1rem 1.5rem; border-radius: 8px; \
                 box-shadow: 0 10px 25px rgba(0, 0, 0, 0.1); z-index: 10000; \
                 animation: slideInRight 0.3s ease-out; max-width: 400px;",
                kind.background()
            ),
        )?;
        if let Some(close) = window
            .dom
            .query_selector_from(notification, ".notification-close")?
        {
            window.add_listener(close, "click", Action::DismissNotification { notification });
        }

        self.ensure_styles(window)?;
        let body = window.dom.body_or_root();
        window.dom.append_child(body, notification)?;
        window.render_icons()?;
        window.set_timeout(TimerTask::DismissNotification { notification }, self.lifetime_ms);

        tracing::debug!(kind = kind.as_str(), message, "notification shown");
        Ok(notification)
    }

    /// Removes `notification` if it is still attached.
    pub(crate) fn dismiss(&self, window: &mut Window, notification: NodeId) {
        if window.dom.parent(notification).is_some() {
            window.dom.remove_node(notification);
            tracing::debug!(node = notification.0, "notification dismissed");
        }
    }

    fn ensure_styles(&self, window: &mut Window) -> Result<()> {
        if window.dom.element_by_id(STYLE_BLOCK_ID).is_some() {
            return Ok(());
        }
        let style = window.dom.create_detached_element("style");
        window.dom.set_attr(style, "id", STYLE_BLOCK_ID)?;
        window.dom.set_text_content(style, STYLE_RULES)?;
        let head = window.dom.head_or_body();
        window.dom.append_child(head, style)
    }
}
