use super::*;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    // Selectedness of an <option>; the `selected` attribute only holds the default.
    pub(crate) selected: bool,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) required: bool,
}

impl Element {
    fn from_attrs(tag_name: String, attrs: HashMap<String, String>) -> Self {
        Self {
            value: attrs.get("value").cloned().unwrap_or_default(),
            selected: attrs.contains_key("selected"),
            checked: attrs.contains_key("checked"),
            disabled: attrs.contains_key("disabled"),
            required: attrs.contains_key("required"),
            tag_name,
            attrs,
        }
    }

    pub(crate) fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let element = Element::from_attrs(tag_name, attrs);
        self.create_node(Some(parent), NodeType::Element(element))
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        let element = Element::from_attrs(tag_name.to_ascii_lowercase(), HashMap::new());
        self.create_node(None, NodeType::Element(element))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&self, node_id: NodeId, what: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::Runtime(format!("{what} target is not an element")))
    }

    fn element_mut_or_err(&mut self, node_id: NodeId, what: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Runtime(format!("{what} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn is_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.element(node_id).is_some_and(|e| e.is_tag(tag))
    }

    pub(crate) fn set_tag_name(&mut self, node_id: NodeId, tag: &str) -> Result<()> {
        self.element_mut_or_err(node_id, "tagName")?.tag_name = tag.to_ascii_lowercase();
        Ok(())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == self.root || self.is_descendant_of(node_id, self.root)
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut_or_err(node_id, "setAttribute")?;
        match name.as_str() {
            "disabled" => element.disabled = true,
            "required" => element.required = true,
            _ => {}
        }
        element.attrs.insert(name, value.to_string());
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut_or_err(node_id, "removeAttribute")?;
        match name.as_str() {
            "disabled" => element.disabled = false,
            "required" => element.required = false,
            _ => {}
        }
        element.attrs.remove(&name);
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.disabled)
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "")
        } else {
            self.remove_attr(node_id, "disabled")
        }
    }

    pub(crate) fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.required)
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.checked)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.element_mut_or_err(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let present = !self.class_contains(node_id, class_name);
        self.class_set(node_id, class_name, present)?;
        Ok(present)
    }

    pub(crate) fn class_set(&mut self, node_id: NodeId, class_name: &str, on: bool) -> Result<()> {
        if on {
            self.class_add(node_id, class_name)
        } else {
            self.class_remove(node_id, class_name)
        }
    }

    pub(crate) fn style_get(&self, node_id: NodeId, property: &str) -> Option<String> {
        let element = self.element(node_id)?;
        parse_style_declarations(element.attrs.get("style").map(String::as_str))
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Sets one inline style property; an empty value removes it.
    pub(crate) fn style_set(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        let name = property.to_ascii_lowercase();
        let element = self.element_mut_or_err(node_id, "style")?;
        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        match decls.iter().position(|(prop, _)| *prop == name) {
            Some(pos) if value.is_empty() => {
                decls.remove(pos);
            }
            Some(pos) => decls[pos].1 = value.to_string(),
            None if value.is_empty() => {}
            None => decls.push((name, value.to_string())),
        }
        element
            .attrs
            .insert("style".to_string(), serialize_style_declarations(&decls));
        Ok(())
    }

    pub(crate) fn style_remove(&mut self, node_id: NodeId, property: &str) -> Result<()> {
        self.style_set(node_id, property, "")
    }

    pub(crate) fn set_style_text(&mut self, node_id: NodeId, css_text: &str) -> Result<()> {
        let decls = parse_style_declarations(Some(css_text));
        let element = self.element_mut_or_err(node_id, "style")?;
        element
            .attrs
            .insert("style".to_string(), serialize_style_declarations(&decls));
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.element_or_err(node_id, "value")?;
        if element.is_tag("select") {
            return Ok(self.select_value(node_id));
        }
        if element.is_tag("option") {
            return Ok(self.option_value(node_id));
        }
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.is_tag(node_id, "select") {
            self.set_select_value(node_id, value);
            return Ok(());
        }
        self.element_mut_or_err(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    pub(crate) fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            if self.is_tag(*child, "option") {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    pub(crate) fn option_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }

    /// Value of the selected option, or empty when no option is selected.
    pub(crate) fn select_value(&self, select: NodeId) -> String {
        let mut options = Vec::new();
        self.collect_select_options(select, &mut options);
        options
            .into_iter()
            .find(|option| self.element(*option).is_some_and(|e| e.selected))
            .map(|option| self.option_value(option))
            .unwrap_or_default()
    }

    /// Selects the first option whose value matches; with no match nothing
    /// stays selected and the select reports an empty value.
    pub(crate) fn set_select_value(&mut self, select: NodeId, requested: &str) {
        let mut options = Vec::new();
        self.collect_select_options(select, &mut options);
        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == requested);
        for option in options {
            if let Some(element) = self.element_mut(option) {
                element.selected = Some(option) == matched;
            }
        }
    }

    pub(crate) fn deselect_options(&mut self, select: NodeId) {
        let mut options = Vec::new();
        self.collect_select_options(select, &mut options);
        for option in options {
            if let Some(element) = self.element_mut(option) {
                element.selected = false;
            }
        }
    }

    /// Restores option selectedness from the `selected` attributes; a
    /// single-choice select without any falls back to its first option.
    pub(crate) fn reset_select(&mut self, select: NodeId) {
        let mut options = Vec::new();
        self.collect_select_options(select, &mut options);
        let mut any_selected = false;
        for option in &options {
            if let Some(element) = self.element_mut(*option) {
                element.selected = !any_selected && element.attrs.contains_key("selected");
                any_selected |= element.selected;
            }
        }
        if !any_selected {
            if let Some(element) = options.first().and_then(|first| self.element_mut(*first)) {
                element.selected = true;
            }
        }
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Text(text) => text.clone(),
            NodeType::Document | NodeType::Element(_) => {
                stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
                    node.children
                        .iter()
                        .map(|child| self.text_content(*child))
                        .collect()
                })
            }
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_or_err(node_id, "textContent")?;
        self.detach_children(node_id);
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> Result<String> {
        self.element_or_err(node_id, "innerHTML")?;
        Ok(self
            .children(node_id)
            .iter()
            .map(|child| self.dump_node(*child))
            .collect())
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        self.element_or_err(node_id, "innerHTML")?;
        let fragment = parse_html(html)?;
        self.detach_children(node_id);
        for child in fragment.children(fragment.root).to_vec() {
            self.import_subtree(&fragment, child, node_id);
        }
        Ok(())
    }

    fn detach_children(&mut self, node_id: NodeId) {
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
    }

    fn import_subtree(&mut self, fragment: &Dom, source: NodeId, parent: NodeId) -> NodeId {
        let node_type = fragment.nodes[source.0].node_type.clone();
        let copied = self.create_node(Some(parent), node_type);
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            for child in fragment.children(source) {
                self.import_subtree(fragment, *child, copied);
            }
        });
        copied
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(Error::Runtime("appendChild would create a cycle".into()));
        }
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    pub(crate) fn remove_node(&mut self, node_id: NodeId) {
        if let Some(parent) = self.parent(node_id) {
            self.nodes[parent.0].children.retain(|id| *id != node_id);
            self.nodes[node_id.0].parent = None;
        }
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            for child in self.children(node_id) {
                if self.element(*child).is_some() {
                    out.push(*child);
                }
                self.collect_elements_dfs(*child, out);
            }
        });
    }

    pub(crate) fn find_first_by_tag(&self, tag: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.collect_elements_dfs(self.root, &mut all);
        all.into_iter().find(|node| self.is_tag(*node, tag))
    }

    pub(crate) fn body_or_root(&self) -> NodeId {
        self.find_first_by_tag("body").unwrap_or(self.root)
    }

    pub(crate) fn head_or_body(&self) -> NodeId {
        self.find_first_by_tag("head")
            .unwrap_or_else(|| self.body_or_root())
    }

    pub(crate) fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.collect_elements_dfs(self.root, &mut all);
        all.into_iter()
            .find(|node| self.attr(*node, "id").as_deref() == Some(id))
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.is_tag(current, tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.query_selector_all_from(self.root, selector)
    }

    pub(crate) fn query_selector_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>> {
        Ok(self
            .query_selector_all_from(root, selector)?
            .into_iter()
            .next())
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut candidates = Vec::new();
        self.collect_elements_dfs(root, &mut candidates);

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
            })
            .filter(|candidate| seen.insert(*candidate))
            .collect())
    }

    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        let Some(combinator) = last.combinator else {
            return rest.is_empty();
        };
        if rest.is_empty() {
            return false;
        }

        match combinator {
            SelectorCombinator::Child => self
                .parent(node_id)
                .filter(|parent| self.element(*parent).is_some())
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.element(ancestor).is_some()
                        && self.matches_selector_chain(ancestor, rest)
                    {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
            SelectorCombinator::AdjacentSibling => self
                .previous_element_sibling(node_id)
                .is_some_and(|sibling| self.matches_selector_chain(sibling, rest)),
            SelectorCombinator::GeneralSibling => {
                let mut cursor = self.previous_element_sibling(node_id);
                while let Some(sibling) = cursor {
                    if self.matches_selector_chain(sibling, rest) {
                        return true;
                    }
                    cursor = self.previous_element_sibling(sibling);
                }
                false
            }
        }
    }

    pub(crate) fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.is_tag(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        if !step.attrs.iter().all(|cond| cond.matches(element)) {
            return false;
        }

        step.pseudo_classes.iter().all(|pseudo| match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::Checked => element.checked || element.selected,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Enabled => !element.disabled,
            SelectorPseudoClass::Required => element.required,
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
        })
    }

    fn sibling_elements(&self, node_id: NodeId) -> Option<(&[NodeId], usize)> {
        let parent = self.parent(node_id)?;
        let children = self.children(parent);
        let pos = children.iter().position(|id| *id == node_id)?;
        Some((children, pos))
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (children, pos) = self.sibling_elements(node_id)?;
        children[pos + 1..]
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (children, pos) = self.sibling_elements(node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document => node
                .children
                .iter()
                .map(|child| self.dump_node(*child))
                .collect(),
            NodeType::Text(text) => escape_html_text(text),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort_by(|(left, _), (right, _)| left.cmp(right));
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return out;
                }
                let raw_text = is_raw_text_tag(&element.tag_name);
                stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
                    for child in &node.children {
                        match &self.nodes[child.0].node_type {
                            NodeType::Text(text) if raw_text => out.push_str(text),
                            _ => out.push_str(&self.dump_node(*child)),
                        }
                    }
                });
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}
