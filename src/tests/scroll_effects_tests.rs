use super::*;

const SCROLL_HTML: &str = r##"
<nav id="navbar">
  <a class="nav-link" href="#home" id="link-home">Home</a>
  <a class="nav-link" href="#about" id="link-about">About</a>
</nav>
<section id="home"></section>
<section id="about"></section>
"##;

fn scroll_page() -> Result<Page> {
    Page::from_html_with_layouts(
        SCROLL_HTML,
        PageConfig::default(),
        &[("#home", layout(0, 700)), ("#about", layout(700, 800))],
    )
}

#[test]
fn navbar_is_marked_scrolled_past_the_threshold() -> Result<()> {
    let mut page = scroll_page()?;
    page.scroll_to(100)?;
    page.assert_class("#navbar", "scrolled", false)?;
    page.scroll_to(101)?;
    page.assert_class("#navbar", "scrolled", true)?;
    page.scroll_to(0)?;
    page.assert_class("#navbar", "scrolled", false)?;
    Ok(())
}

#[test]
fn active_link_follows_the_current_section() -> Result<()> {
    let mut page = scroll_page()?;

    page.scroll_to(150)?;
    page.assert_class("#link-home", "active", true)?;
    page.assert_class("#link-about", "active", false)?;

    page.scroll_to(600)?;
    page.assert_class("#link-home", "active", false)?;
    page.assert_class("#link-about", "active", true)?;
    Ok(())
}

#[test]
fn no_section_in_range_clears_every_link() -> Result<()> {
    let mut page = scroll_page()?;
    page.scroll_to(600)?;
    page.scroll_to(5000)?;
    page.assert_class("#link-home", "active", false)?;
    page.assert_class("#link-about", "active", false)?;
    Ok(())
}

#[test]
fn later_section_wins_when_bands_overlap() -> Result<()> {
    let mut page = Page::from_html_with_layouts(
        SCROLL_HTML,
        PageConfig::default(),
        &[("#home", layout(0, 1000)), ("#about", layout(500, 800))],
    )?;
    page.scroll_to(450)?;
    page.assert_class("#link-home", "active", false)?;
    page.assert_class("#link-about", "active", true)?;
    Ok(())
}

#[test]
fn scroll_event_fires_only_when_the_offset_moves() -> Result<()> {
    let mut page = scroll_page()?;
    page.enable_trace(true);
    page.scroll_to(300)?;
    page.scroll_to(300)?;
    let scroll_events = page
        .take_trace_logs()
        .into_iter()
        .filter(|line| line.starts_with("[event] done scroll"))
        .count();
    assert_eq!(scroll_events, 1);
    Ok(())
}
