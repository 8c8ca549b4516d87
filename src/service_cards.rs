use super::*;
use crate::handles::ServiceHandles;

const CARD_RAISED: &str = "translateY(-15px) scale(1.02)";
const CARD_RESTING: &str = "translateY(0) scale(1)";
const FALLBACK_TECH_DESCRIPTION: &str = "Cutting-edge technology solution";

const TECH_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Python", "Advanced AI and machine learning development"),
    ("TensorFlow", "Deep learning and neural network frameworks"),
    ("React", "Modern frontend development and user interfaces"),
    ("Node.js", "Server-side JavaScript and API development"),
];

pub(crate) fn tech_description(tech: &str) -> &'static str {
    TECH_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == tech)
        .map_or(FALLBACK_TECH_DESCRIPTION, |(_, description)| description)
}

/// Hover lift on service cards, "enquire about this service" links, and
/// the technology blurbs.
#[derive(Debug, Clone)]
pub(crate) struct ServiceCardController {
    handles: ServiceHandles,
}

impl ServiceCardController {
    pub(crate) fn new(handles: ServiceHandles) -> Self {
        Self { handles }
    }

    pub(crate) fn install(&self, window: &mut Window) {
        for card in &self.handles.cards {
            window.add_listener(card.card, "mouseenter", Action::ServiceCardEnter);
            window.add_listener(card.card, "mouseleave", Action::ServiceCardLeave);
            if let Some(link) = card.link {
                window.add_listener(link, "click", Action::ServiceLinkClick { card: card.card });
            }
        }
        for item in &self.handles.tech_items {
            window.add_listener(*item, "click", Action::TechItemClick);
        }
    }

    pub(crate) fn raise(&self, window: &mut Window, card: NodeId) -> Result<()> {
        window.dom.style_set(card, "transform", CARD_RAISED)
    }

    pub(crate) fn lower(&self, window: &mut Window, card: NodeId) -> Result<()> {
        window.dom.style_set(card, "transform", CARD_RESTING)
    }

    /// Preselects the card's service in the enquiry form and brings the
    /// enquiry section into view. A card without a service clears the
    /// selection.
    pub(crate) fn enquire(
        &self,
        window: &mut Window,
        card: NodeId,
        event: &mut EventState,
    ) -> Result<()> {
        event.prevent_default();
        let service = window.dom.attr(card, "data-service");
        if let Some(select) = self.handles.project_type {
            match service.as_deref() {
                Some(service) => window.dom.set_value(select, service)?,
                None => window.dom.deselect_options(select),
            }
        }
        if let Some(section) = self.handles.enquiry_section {
            let top = window.offset_top(section);
            window.scroll_to(top, ScrollBehavior::Smooth);
        }
        tracing::debug!(service = service.as_deref().unwrap_or(""), "service enquiry prefilled");
        Ok(())
    }

    pub(crate) fn describe_tech(&self, window: &mut Window, item: NodeId) {
        let tech = window.dom.attr(item, "data-tech").unwrap_or_default();
        let description = tech_description(&tech);
        window.alert(format!("{tech}: {description}"));
    }
}
