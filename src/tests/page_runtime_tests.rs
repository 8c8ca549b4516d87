use super::*;

#[test]
fn missing_selector_reports_not_found() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    assert_eq!(
        page.click("#nope"),
        Err(Error::SelectorNotFound("#nope".into()))
    );
    assert!(matches!(page.text("div >"), Err(Error::UnsupportedSelector(_))));
    Ok(())
}

#[test]
fn typing_into_a_non_text_control_is_a_type_mismatch() -> Result<()> {
    let mut page = Page::from_html(r#"<div id="box"></div><select id="pick"></select>"#)?;
    match page.type_text("#box", "x") {
        Err(Error::TypeMismatch {
            selector, actual, ..
        }) => {
            assert_eq!(selector, "#box");
            assert_eq!(actual, "div");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        page.select_option("#box", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        page.type_text("#pick", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn malformed_markup_is_an_html_parse_error() {
    assert!(matches!(
        Page::from_html("<div><!-- never closed"),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn endless_counter_hits_the_timer_step_limit() -> Result<()> {
    let mut page =
        Page::from_html(r#"<div class="stat-number" id="n" data-target="1000">0</div>"#)?;
    assert!(page.set_timer_step_limit(0).is_err());
    page.set_timer_step_limit(5)?;
    match page.flush() {
        Err(Error::Runtime(message)) => {
            assert!(message.contains("limit=5"), "{message}");
            assert!(message.contains("task=counter-tick"), "{message}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn clock_only_moves_forward() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    assert!(page.advance_time(-1).is_err());
    page.advance_time(40)?;
    assert_eq!(page.now_ms(), 40);
    assert!(page.advance_time_to(39).is_err());
    page.advance_time_to(100)?;
    assert_eq!(page.now_ms(), 100);
    assert!(!page.run_next_timer()?);
    assert_eq!(page.run_due_timers()?, 0);
    Ok(())
}

#[test]
fn run_next_timer_jumps_to_the_earliest_task() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    page.show_notification("Hello", NotificationKind::Info)?;
    assert!(page.run_next_timer()?);
    assert_eq!(page.now_ms(), 5000);
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn trace_log_keeps_the_most_recent_lines() -> Result<()> {
    let mut page = Page::from_html(r#"<button id="hamburger"></button><ul id="nav-menu"></ul>"#)?;
    assert!(page.set_trace_log_limit(0).is_err());
    page.enable_trace(true);
    page.set_trace_log_limit(2)?;
    page.click("#hamburger")?;
    page.click("#hamburger")?;

    let logs = page.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[1].starts_with("[event] done click target=button#hamburger"));
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_lines_name_the_action_and_phase() -> Result<()> {
    let mut page = Page::from_html(r#"<button id="hamburger"></button><ul id="nav-menu"></ul>"#)?;
    page.enable_trace(true);
    page.set_trace_timers(false);
    page.click("#hamburger")?;
    let logs = page.take_trace_logs();
    assert!(
        logs.iter().any(|line| line
            == "[event] click target=button#hamburger current=button#hamburger phase=target action=toggle-menu"),
        "{logs:?}"
    );

    page.set_trace_events(false);
    page.click("#hamburger")?;
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn clicks_on_descendants_reach_ancestor_listeners_while_bubbling() -> Result<()> {
    let mut page = Page::from_html(
        r#"<div class="tech-item" id="react" data-tech="React"><b id="label">React</b></div>"#,
    )?;
    page.enable_trace(true);
    page.set_trace_timers(false);
    page.click("#label")?;
    let logs = page.take_trace_logs();
    assert_eq!(
        logs.first().map(String::as_str),
        Some("[event] click target=b#label current=div#react phase=bubble action=tech-item-click")
    );
    assert_eq!(
        page.take_alert_messages(),
        vec!["React: Modern frontend development and user interfaces".to_string()]
    );
    Ok(())
}

#[test]
fn config_json_overrides_only_named_fields() -> Result<()> {
    let config = PageConfig::from_json(r#"{"header_offset": 64, "total_steps": 3}"#)?;
    assert_eq!(config.header_offset, 64);
    assert_eq!(config.total_steps, 3);
    assert_eq!(config.counter_duration_ms, 2000);

    assert!(matches!(
        PageConfig::from_json(r#"{"header_ofset": 64}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        PageConfig::from_json(r#"{"fade_threshold": 1.5}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        PageConfig::from_json("not json"),
        Err(Error::Config(_))
    ));
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_parsing() {
    let config = PageConfig {
        counter_tick_ms: 0,
        ..PageConfig::default()
    };
    assert!(matches!(
        Page::from_html_with_config("<main></main>", config),
        Err(Error::Config(_))
    ));
}

#[test]
fn clicking_checkboxes_and_radios_updates_their_state() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="prefs">
            <input type="checkbox" name="news" id="news">
            <input type="radio" name="budget" value="small" id="small" checked>
            <input type="radio" name="budget" value="large" id="large">
        </form>
        <form id="other"><input type="radio" name="budget" value="outside" checked></form>"#,
    )?;
    page.click("#news")?;
    page.click("#large")?;

    let data = page.form_data("#prefs")?;
    assert_eq!(data.get("news"), Some("on"));
    assert_eq!(data.get("budget"), Some("large"));

    page.click("#news")?;
    page.click("#large")?;
    let data = page.form_data("#prefs")?;
    assert_eq!(data.get("news"), None);
    assert_eq!(data.get("budget"), Some("large"));
    assert_eq!(page.form_data("#other")?.get("budget"), Some("outside"));
    Ok(())
}

#[test]
fn disabled_controls_ignore_clicks() -> Result<()> {
    let mut page =
        Page::from_html(r#"<button id="hamburger" disabled></button><ul id="nav-menu"></ul>"#)?;
    page.click("#hamburger")?;
    page.assert_class("#nav-menu", "active", false)?;
    Ok(())
}

#[test]
fn failed_assertion_carries_a_dom_snippet() -> Result<()> {
    let page = Page::from_html(r#"<p id="greeting" class="lead">Hello</p>"#)?;
    page.assert_text("#greeting", "Hello")?;
    page.assert_exists("#greeting")?;
    match page.assert_text("#greeting", "Goodbye") {
        Err(Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        }) => {
            assert_eq!(expected, "Goodbye");
            assert_eq!(actual, "Hello");
            assert_eq!(dom_snippet, r#"<p class="lead" id="greeting">Hello</p>"#);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    match page.assert_class("#greeting", "lead", false) {
        Err(Error::AssertionFailed {
            expected, actual, ..
        }) => {
            assert_eq!(expected, "no class lead");
            assert_eq!(actual, "class lead");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn negative_viewport_is_rejected() -> Result<()> {
    let mut page = Page::from_html("<main></main>")?;
    assert!(matches!(
        page.set_viewport_size(-1, 600),
        Err(Error::Runtime(_))
    ));
    Ok(())
}
