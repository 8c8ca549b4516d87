use site_enhancer::{LayoutBox, NotificationKind, Page, PageConfig, ScrollBehavior, ScrollRequest};

const SITE_HTML: &str = include_str!("fixtures/site.html");

fn at(top: i64, height: i64) -> LayoutBox {
    LayoutBox { top, height }
}

fn site() -> site_enhancer::Result<Page> {
    Page::from_html_with_layouts(
        SITE_HTML,
        PageConfig::default(),
        &[
            ("#home", at(0, 700)),
            ("#services", at(700, 900)),
            ("#about", at(1600, 800)),
            ("#enquiry", at(2400, 1000)),
            ("#contact", at(3400, 700)),
            ("#stat-projects", at(500, 60)),
            ("#stat-clients", at(500, 60)),
            ("#stat-years", at(500, 60)),
            ("#card-web", at(900, 400)),
            ("#team-photo", at(1700, 300)),
            (".about-content", at(1650, 600)),
        ],
    )
}

#[test]
fn hero_counters_start_on_load_and_settle_on_their_targets() -> site_enhancer::Result<()> {
    let mut page = site()?;
    assert_eq!(page.pending_timers().len(), 3);
    page.advance_time(1000)?;
    let halfway = page.text("#stat-projects")?.parse::<u32>().unwrap_or_default();
    assert!(halfway > 0 && halfway < 150, "halfway value was {halfway}");

    page.flush()?;
    page.assert_text("#stat-projects", "150")?;
    page.assert_text("#stat-clients", "98")?;
    page.assert_text("#stat-years", "5")?;
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn mobile_menu_navigation_scrolls_and_tracks_the_section() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.assert_class("#card-web", "fade-in", false)?;

    page.click("#hamburger")?;
    page.assert_class("#nav-menu", "active", true)?;
    page.click(r##".nav-link[href="#services"]"##)?;

    page.assert_class("#nav-menu", "active", false)?;
    assert_eq!(
        page.take_scroll_requests(),
        vec![ScrollRequest {
            top: 620,
            behavior: ScrollBehavior::Smooth,
        }]
    );
    page.assert_class("#navbar", "scrolled", true)?;
    page.assert_class(r##".nav-link[href="#services"]"##, "active", true)?;
    page.assert_class(r##".nav-link[href="#home"]"##, "active", false)?;
    page.assert_class("#card-web", "fade-in", true)?;
    Ok(())
}

#[test]
fn enquiry_journey_from_a_service_card() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.click("#link-ai")?;
    page.assert_value("#project-type", "ai-solutions")?;
    assert_eq!(page.scroll_y(), 2400);
    page.assert_class(r##".nav-link[href="#enquiry"]"##, "active", true)?;

    page.type_text("#full-name", "Grace Hopper")?;
    page.click("#step-next")?;
    assert_eq!(page.wizard_state().current_step(), 1);
    page.assert_class(".notification", "notification-error", true)?;

    page.type_text("#email", "grace@example.com")?;
    page.click("#step-next")?;
    assert_eq!(page.wizard_state().current_step(), 2);
    assert_eq!(page.style(".progress-fill", "width")?.as_deref(), Some("100%"));

    page.select_option("#budget", "10k+")?;
    page.type_text("#details", "A support assistant for our shop")?;
    page.click("#enquiry-submit")?;
    assert!(page.is_disabled("#enquiry-submit")?);

    page.advance_time(2000)?;
    assert_eq!(
        page.take_console_logs(),
        vec![
            r#"Enquiry Data: {"fullName":"Grace Hopper","email":"grace@example.com","projectType":"ai-solutions","budget":"10k+","details":"A support assistant for our shop"}"#
                .to_string()
        ]
    );
    page.assert_class(".notification", "notification-success", true)?;
    assert_eq!(page.wizard_state().current_step(), 1);
    page.assert_value("#project-type", "")?;
    page.assert_value("#budget", "")?;
    assert!(!page.is_disabled("#enquiry-submit")?);
    assert_eq!(
        page.inner_html("#enquiry-submit")?,
        r#"<i data-lucide="send"></i> Submit Enquiry"#
    );
    Ok(())
}

#[test]
fn contact_form_needs_its_required_fields_before_sending() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.type_text("#contact-name", "Lin")?;
    page.click("#contact-submit")?;
    assert!(page.pending_timers().iter().all(|timer| timer.interval_ms.is_some()));

    page.type_text("#contact-email", "lin@example.com")?;
    page.click("#contact-submit")?;
    page.advance_time(1500)?;
    assert_eq!(
        page.take_console_logs(),
        vec![r#"Contact Data: {"name":"Lin","email":"lin@example.com","message":""}"#.to_string()]
    );
    page.assert_text(
        ".notification span",
        "Message sent successfully! We'll respond to you soon.",
    )?;
    Ok(())
}

#[test]
fn team_photo_loads_only_when_scrolled_into_view() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.scroll_to(2400)?;
    assert_eq!(page.attr("#team-photo", "src")?, None);
    page.assert_class(".about-content", "fade-in", false)?;

    page.scroll_to(1500)?;
    assert_eq!(
        page.attr("#team-photo", "src")?.as_deref(),
        Some("images/team.jpg")
    );
    page.assert_class(".about-content", "fade-in", true)?;
    Ok(())
}

#[test]
fn tech_stack_items_describe_themselves() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.click(r#".tech-item[data-tech="TensorFlow"]"#)?;
    assert_eq!(
        page.take_alert_messages(),
        vec!["TensorFlow: Deep learning and neural network frameworks".to_string()]
    );
    Ok(())
}

#[test]
fn icons_render_with_the_library_loaded() -> site_enhancer::Result<()> {
    let mut page = site()?;
    page.set_icon_library_available(true);
    page.show_notification("Welcome back", NotificationKind::Info)?;
    assert_eq!(page.icon_render_count(), 1);
    assert_eq!(page.count("i[data-lucide]")?, 0);
    page.assert_exists("#card-web svg.lucide-layout")?;
    Ok(())
}
