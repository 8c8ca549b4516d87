//! Element handles the page behaviours operate on, resolved once after the
//! document is parsed. Every handle is optional: a missing element simply
//! switches the dependent behaviour off.

use super::*;

#[derive(Debug, Clone, Default)]
pub(crate) struct NavigationHandles {
    pub(crate) hamburger: Option<NodeId>,
    pub(crate) nav_menu: Option<NodeId>,
    pub(crate) nav_links: Vec<NodeId>,
    /// Every `a[href^="#"]`, nav links included.
    pub(crate) anchors: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScrollHandles {
    pub(crate) navbar: Option<NodeId>,
    pub(crate) sections: Vec<NodeId>,
    pub(crate) nav_links: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ServiceCardHandles {
    pub(crate) card: NodeId,
    pub(crate) link: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ServiceHandles {
    pub(crate) cards: Vec<ServiceCardHandles>,
    pub(crate) tech_items: Vec<NodeId>,
    pub(crate) enquiry_section: Option<NodeId>,
    pub(crate) project_type: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WizardHandles {
    pub(crate) steps: Vec<NodeId>,
    pub(crate) indicators: Vec<NodeId>,
    pub(crate) progress_fill: Option<NodeId>,
}

impl WizardHandles {
    /// The step container whose `data-step` attribute names `step`.
    pub(crate) fn step_element(&self, dom: &Dom, step: usize) -> Option<NodeId> {
        let wanted = step.to_string();
        self.steps
            .iter()
            .copied()
            .find(|node| dom.attr(*node, "data-step").as_deref() == Some(wanted.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FormHandles {
    pub(crate) form: Option<NodeId>,
    pub(crate) submit_button: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineEntryPoint {
    NextStep,
    PrevStep,
}

impl InlineEntryPoint {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "nextStep" => Some(Self::NextStep),
            "prevStep" => Some(Self::PrevStep),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PageHandles {
    pub(crate) navigation: NavigationHandles,
    pub(crate) scroll: ScrollHandles,
    pub(crate) counters: Vec<NodeId>,
    pub(crate) fade_targets: Vec<NodeId>,
    pub(crate) services: ServiceHandles,
    pub(crate) wizard: WizardHandles,
    pub(crate) enquiry: FormHandles,
    pub(crate) contact: FormHandles,
    pub(crate) lazy_images: Vec<NodeId>,
    pub(crate) inline_entry_points: Vec<(NodeId, InlineEntryPoint)>,
}

// A selector the engine rejects resolves to nothing.
fn query_all(dom: &Dom, selector: &str) -> Vec<NodeId> {
    dom.query_selector_all(selector).unwrap_or_default()
}

fn query_one(dom: &Dom, selector: &str) -> Option<NodeId> {
    dom.query_selector(selector).ok().flatten()
}

fn query_one_within(dom: &Dom, root: Option<NodeId>, selector: &str) -> Option<NodeId> {
    dom.query_selector_from(root?, selector).ok().flatten()
}

impl PageHandles {
    pub(crate) fn resolve(dom: &Dom, config: &PageConfig) -> Self {
        let nav_links = query_all(dom, ".nav-link");

        let cards = query_all(dom, ".service-card")
            .into_iter()
            .map(|card| ServiceCardHandles {
                card,
                link: query_one_within(dom, Some(card), ".service-link"),
            })
            .collect();

        let enquiry_form = dom.element_by_id("enquiry-form");
        let contact_form = dom.element_by_id("contact-form");

        let inline_entry_points = {
            let mut all = Vec::new();
            dom.collect_elements_dfs(dom.root, &mut all);
            all.into_iter()
                .filter_map(|node| {
                    let onclick = dom.attr(node, "onclick")?;
                    let name = crate::pattern::inline_call_target(&onclick)?;
                    Some((node, InlineEntryPoint::from_name(&name)?))
                })
                .collect()
        };

        Self {
            navigation: NavigationHandles {
                hamburger: dom.element_by_id("hamburger"),
                nav_menu: dom.element_by_id("nav-menu"),
                nav_links: nav_links.clone(),
                anchors: query_all(dom, r##"a[href^="#"]"##),
            },
            scroll: ScrollHandles {
                navbar: dom.element_by_id("navbar"),
                sections: query_all(dom, "section[id]"),
                nav_links,
            },
            counters: query_all(dom, ".stat-number"),
            fade_targets: query_all(
                dom,
                ".service-card, .about-content, .services-header, .contact-info, .tech-item",
            ),
            services: ServiceHandles {
                cards,
                tech_items: query_all(dom, ".tech-item"),
                enquiry_section: dom.element_by_id(&config.enquiry_section_id),
                project_type: query_one(
                    dom,
                    &format!(r#"select[name="{}"]"#, config.project_type_field),
                ),
            },
            wizard: WizardHandles {
                steps: query_all(dom, ".form-step"),
                indicators: query_all(dom, ".step-indicator"),
                progress_fill: query_one(dom, ".progress-fill"),
            },
            enquiry: FormHandles {
                form: enquiry_form,
                submit_button: query_one_within(dom, enquiry_form, ".submit-btn"),
            },
            contact: FormHandles {
                form: contact_form,
                submit_button: query_one_within(dom, contact_form, ".submit-btn"),
            },
            lazy_images: query_all(dom, "img[data-src]"),
            inline_entry_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_present_elements_and_tolerates_missing_ones() -> Result<()> {
        let dom = parse_html(
            r##"<nav id="navbar"><a class="nav-link" href="#home">Home</a></nav>
            <section id="home"></section>
            <form id="enquiry-form">
              <div class="form-step active" data-step="1"><button type="button" onclick="nextStep()">Next</button></div>
              <div class="form-step" data-step="2"><button type="button" onclick="prevStep();">Back</button></div>
            </form>"##,
        )?;
        let handles = PageHandles::resolve(&dom, &PageConfig::default());

        assert!(handles.navigation.hamburger.is_none());
        assert_eq!(handles.navigation.nav_links.len(), 1);
        assert_eq!(handles.navigation.anchors.len(), 1);
        assert!(handles.scroll.navbar.is_some());
        assert_eq!(handles.scroll.sections.len(), 1);
        assert!(handles.contact.form.is_none());
        assert!(handles.enquiry.submit_button.is_none());
        assert!(handles.services.project_type.is_none());
        assert_eq!(
            handles
                .inline_entry_points
                .iter()
                .map(|(_, entry)| *entry)
                .collect::<Vec<_>>(),
            vec![InlineEntryPoint::NextStep, InlineEntryPoint::PrevStep]
        );
        assert_eq!(
            handles.wizard.step_element(&dom, 2),
            Some(handles.wizard.steps[1])
        );
        Ok(())
    }

    #[test]
    fn unusable_field_name_resolves_to_no_target() -> Result<()> {
        let dom = parse_html(r#"<select name="projectType"></select>"#)?;
        let config = PageConfig {
            project_type_field: "bad\"]name[".into(),
            ..PageConfig::default()
        };
        assert!(PageHandles::resolve(&dom, &config).services.project_type.is_none());
        Ok(())
    }
}
