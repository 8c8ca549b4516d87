use site_enhancer::{Page, PageConfig};

#[test]
fn empty_document_installs_every_behaviour_without_targets() -> site_enhancer::Result<()> {
    let mut page = Page::from_html("")?;
    page.scroll_to(500)?;
    page.advance_time(10_000)?;
    page.call_global("nextStep")?;
    page.call_global("prevStep")?;
    assert_eq!(page.wizard_state().current_step(), 1);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn wizard_without_progress_bar_or_indicators_still_steps() -> site_enhancer::Result<()> {
    let html = r#"
    <form id="enquiry-form">
      <div class="form-step active" data-step="1"><input name="who" required value="me"></div>
      <div class="form-step" data-step="2"></div>
    </form>
    "#;
    let mut page = Page::from_html(html)?;
    page.call_global("nextStep")?;
    assert_eq!(page.wizard_state().current_step(), 2);
    assert!(page.has_class(r#".form-step[data-step="2"]"#, "active")?);
    Ok(())
}

#[test]
fn wizard_step_without_markup_is_treated_as_valid() -> site_enhancer::Result<()> {
    let config = PageConfig {
        total_steps: 3,
        ..PageConfig::default()
    };
    let html = r#"<form id="enquiry-form"><div class="form-step active" data-step="1"></div></form>"#;
    let mut page = Page::from_html_with_config(html, config)?;
    page.call_global("nextStep")?;
    page.call_global("nextStep")?;
    assert_eq!(page.wizard_state().current_step(), 3);
    assert_eq!(page.count(".form-step.active")?, 0);
    assert_eq!(page.count(".notification")?, 0);
    Ok(())
}

#[test]
fn enquiry_form_without_submit_button_still_completes() -> site_enhancer::Result<()> {
    let html = r#"
    <form id="enquiry-form">
      <div class="form-step active" data-step="1"><input name="topic" value="seo"></div>
    </form>
    "#;
    let config = PageConfig {
        total_steps: 1,
        ..PageConfig::default()
    };
    let mut page = Page::from_html_with_config(html, config)?;
    page.submit("#enquiry-form")?;
    page.flush()?;
    assert_eq!(
        page.take_console_logs(),
        vec![r#"Enquiry Data: {"topic":"seo"}"#.to_string()]
    );
    Ok(())
}

#[test]
fn service_link_outside_a_card_is_just_an_anchor() -> site_enhancer::Result<()> {
    let html = r##"
    <a href="#enquiry" class="service-link" id="stray">Enquire</a>
    <section id="enquiry"><select name="projectType" id="pt"><option value="">-</option></select></section>
    "##;
    let mut page = Page::from_html(html)?;
    page.click("#stray")?;
    page.assert_value("#pt", "")?;
    assert_eq!(page.take_scroll_requests().len(), 1);
    Ok(())
}

#[test]
fn unclosed_elements_and_stray_end_tags_are_tolerated() -> site_enhancer::Result<()> {
    let html = r#"
    <nav id="navbar"><div class="hamburger" id="hamburger"></span></div>
    <ul class="nav-menu" id="nav-menu"><li>One<li>Two</ul>
    <p>Unclosed paragraph
    <div class="stat-number" data-target="3">0
    "#;
    let mut page = Page::from_html(html)?;
    page.click("#hamburger")?;
    page.assert_class("#nav-menu", "active", true)?;
    page.flush()?;
    page.assert_text(".stat-number", "3")?;
    Ok(())
}

#[test]
fn unknown_project_type_clears_the_previous_selection() -> site_enhancer::Result<()> {
    let html = r##"
    <div class="service-card" data-service="quantum"><a href="#enquiry" class="service-link" id="q">Go</a></div>
    <section id="enquiry">
      <select name="projectType" id="pt">
        <option value="">-</option>
        <option value="web-design">Web</option>
      </select>
    </section>
    "##;
    let mut page = Page::from_html(html)?;
    page.select_option("#pt", "web-design")?;
    page.assert_value("#pt", "web-design")?;
    page.click("#q")?;
    page.assert_value("#pt", "")?;
    Ok(())
}
