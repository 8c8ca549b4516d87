use super::*;

#[test]
fn new_notification_replaces_the_current_one() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("First", NotificationKind::Info)?;
    page.show_notification("Second", NotificationKind::Success)?;

    assert_eq!(page.count(".notification")?, 1);
    page.assert_text(".notification span", "Second")?;
    page.assert_class(".notification", "notification-success", true)?;
    assert_eq!(page.count("#notification-styles")?, 1);
    Ok(())
}

#[test]
fn stale_dismiss_timer_leaves_the_replacement_alone() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("First", NotificationKind::Info)?;
    page.advance_time(1000)?;
    page.show_notification("Second", NotificationKind::Info)?;

    page.advance_time(4000)?;
    page.assert_text(".notification span", "Second")?;

    page.advance_time(999)?;
    assert_eq!(page.count(".notification")?, 1);
    page.advance_time(1)?;
    assert_eq!(page.count(".notification")?, 0);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn close_button_dismisses_immediately() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("Closable", NotificationKind::Error)?;
    page.click(".notification-close")?;
    assert_eq!(page.count(".notification")?, 0);

    // The pending auto-dismiss finds nothing to remove.
    page.flush()?;
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn message_is_shown_as_text() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("<b>Tom & Jerry</b>", NotificationKind::Info)?;
    page.assert_text(".notification span", "<b>Tom & Jerry</b>")?;
    assert_eq!(page.count(".notification b")?, 0);
    Ok(())
}

#[test]
fn background_and_icon_follow_the_kind() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    for (kind, background, icon) in [
        (NotificationKind::Info, "#3b82f6", "info"),
        (NotificationKind::Success, "#10b981", "check-circle"),
        (NotificationKind::Error, "#ef4444", "x-circle"),
    ] {
        page.show_notification("Status", kind)?;
        assert_eq!(
            page.style(".notification", "background")?.as_deref(),
            Some(background)
        );
        assert_eq!(
            page.attr(".notification-content i", "data-lucide")?.as_deref(),
            Some(icon)
        );
    }
    Ok(())
}

#[test]
fn icons_render_only_when_the_library_is_available() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("Plain", NotificationKind::Info)?;
    assert_eq!(page.icon_render_count(), 0);
    assert_eq!(page.count(".notification i[data-lucide]")?, 2);

    page.set_icon_library_available(true);
    page.show_notification("Fancy", NotificationKind::Info)?;
    assert_eq!(page.icon_render_count(), 1);
    assert_eq!(page.count(".notification svg.lucide")?, 2);
    assert_eq!(page.count(".notification svg.lucide-x")?, 1);
    Ok(())
}

#[test]
fn lifetime_comes_from_config() -> Result<()> {
    let config = PageConfig {
        notification_lifetime_ms: 250,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config("<main></main>", config)?;
    page.show_notification("Quick", NotificationKind::Info)?;
    page.advance_time(250)?;
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}
