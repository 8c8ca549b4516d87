use serde::ser::{Serialize, SerializeMap, Serializer};

use super::*;

/// Flat key/value snapshot of a form, in form order.
///
/// A name that appears more than once keeps its first position and its last
/// value, which is how a plain object built from the entries behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub(crate) fn insert(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) fn is_form_control(dom: &Dom, node_id: NodeId) -> bool {
    ["input", "select", "textarea", "button"]
        .iter()
        .any(|tag| dom.is_tag(node_id, tag))
}

pub(crate) fn input_type(dom: &Dom, node_id: NodeId) -> String {
    dom.attr(node_id, "type")
        .map(|kind| kind.to_ascii_lowercase())
        .unwrap_or_else(|| "text".to_string())
}

pub(crate) fn is_checkable_input(dom: &Dom, node_id: NodeId) -> bool {
    dom.is_tag(node_id, "input") && matches!(input_type(dom, node_id).as_str(), "checkbox" | "radio")
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    if dom.is_tag(node_id, "button") {
        return dom
            .attr(node_id, "type")
            .is_none_or(|kind| kind.eq_ignore_ascii_case("submit"));
    }
    dom.is_tag(node_id, "input") && matches!(input_type(dom, node_id).as_str(), "submit" | "image")
}

/// The form a control belongs to: the nearest `<form>` ancestor.
pub(crate) fn owning_form(dom: &Dom, node_id: NodeId) -> Option<NodeId> {
    if dom.is_tag(node_id, "form") {
        return Some(node_id);
    }
    dom.find_ancestor_by_tag(node_id, "form")
}

pub(crate) fn form_controls(dom: &Dom, form: NodeId) -> Vec<NodeId> {
    let mut all = Vec::new();
    dom.collect_elements_dfs(form, &mut all);
    all.retain(|node| is_form_control(dom, *node));
    all
}

pub(crate) fn form_data_entries(dom: &Dom, form: NodeId) -> Result<FormData> {
    let mut data = FormData::default();
    for control in form_controls(dom, form) {
        if dom.disabled(control) || dom.is_tag(control, "button") {
            continue;
        }
        let name = dom.attr(control, "name").unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        if dom.is_tag(control, "input") {
            match input_type(dom, control).as_str() {
                "submit" | "reset" | "button" | "image" | "file" => continue,
                "checkbox" | "radio" => {
                    if !dom.checked(control) {
                        continue;
                    }
                    let value = dom.attr(control, "value").unwrap_or_else(|| "on".into());
                    data.insert(name, value);
                    continue;
                }
                _ => {}
            }
        }
        data.insert(name, dom.value(control)?);
    }
    Ok(data)
}

/// Checks `radio` and unchecks the other radios sharing its name within the
/// same form.
pub(crate) fn check_radio(dom: &mut Dom, radio: NodeId) -> Result<()> {
    let name = dom.attr(radio, "name").unwrap_or_default();
    if !name.is_empty() {
        let scope = owning_form(dom, radio).unwrap_or(dom.root);
        let mut all = Vec::new();
        dom.collect_elements_dfs(scope, &mut all);
        for other in all {
            if other != radio
                && dom.is_tag(other, "input")
                && input_type(dom, other) == "radio"
                && dom.attr(other, "name").as_deref() == Some(name.as_str())
                && owning_form(dom, other) == owning_form(dom, radio)
            {
                dom.set_checked(other, false)?;
            }
        }
    }
    dom.set_checked(radio, true)
}

/// Built-in constraint check run before an interactive submission: every
/// enabled `required` control must hold a value (or be checked). Values are
/// not trimmed here.
pub(crate) fn form_is_valid_for_submit(dom: &Dom, form: NodeId) -> Result<bool> {
    if dom.has_attr(form, "novalidate") {
        return Ok(true);
    }
    for control in form_controls(dom, form) {
        if !dom.required(control) || dom.disabled(control) || dom.is_tag(control, "button") {
            continue;
        }
        let satisfied = if is_checkable_input(dom, control) {
            dom.checked(control)
        } else {
            !dom.value(control)?.is_empty()
        };
        if !satisfied {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Restores every control of `form` to its default state.
pub(crate) fn reset_form(dom: &mut Dom, form: NodeId) -> Result<()> {
    for control in form_controls(dom, form) {
        if is_checkable_input(dom, control) {
            let default_checked = dom.has_attr(control, "checked");
            dom.set_checked(control, default_checked)?;
        } else if dom.is_tag(control, "select") {
            dom.reset_select(control);
        } else if dom.is_tag(control, "textarea") {
            let default_value = dom.text_content(control);
            dom.set_value(control, &default_value)?;
        } else {
            let default_value = dom.attr(control, "value").unwrap_or_default();
            dom.set_value(control, &default_value)?;
        }
    }
    Ok(())
}

impl Dom {
    /// Gives freshly parsed controls their initial state.
    pub(crate) fn initialize_form_controls(&mut self) {
        let mut all = Vec::new();
        self.collect_elements_dfs(self.root, &mut all);
        for node in all {
            if self.is_tag(node, "textarea") {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text;
                }
            } else if self.is_tag(node, "select") {
                self.reset_select(node);
            }
        }
    }
}
