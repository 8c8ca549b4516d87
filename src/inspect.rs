use super::*;

impl Page {
    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.window.dom.value(target)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.attr(target, name))
    }

    /// Inline style property of the matched element.
    pub fn style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.style_get(target, property))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.class_contains(target, class_name))
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.window.dom.query_selector_all(selector)?.len())
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.disabled(target))
    }

    pub fn inner_html(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.window.dom.inner_html(target)
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.window.dom.dump_node(target))
    }

    /// Entries the owning form of the matched element would submit.
    pub fn form_data(&self, selector: &str) -> Result<FormData> {
        let target = self.select_one(selector)?;
        let form = crate::form_controls::owning_form(&self.window.dom, target).ok_or_else(|| {
            Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form control".into(),
                actual: self.window.trace_node_label(target),
            }
        })?;
        crate::form_controls::form_data_entries(&self.window.dom, form)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.window.dom.text_content(target);
        self.check(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.window.dom.value(target)?;
        self.check(selector, target, expected, actual)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector).map(|_| ())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, present: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let describe = |on: bool| {
            if on {
                format!("class {class_name}")
            } else {
                format!("no class {class_name}")
            }
        };
        let actual = self.window.dom.class_contains(target, class_name);
        self.check(selector, target, &describe(present), describe(actual))
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: String) -> Result<()> {
        if actual == expected {
            return Ok(());
        }
        Err(Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual,
            dom_snippet: truncate_chars(&self.window.dom.dump_node(target), 200),
        })
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.window.platform.alert_messages)
    }

    pub fn take_console_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.window.platform.console_logs)
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.window.platform.scroll_requests)
    }

    pub fn scroll_y(&self) -> i64 {
        self.window.viewport.scroll_y
    }

    pub fn set_icon_library_available(&mut self, available: bool) {
        self.window.platform.icon_library_available = available;
    }

    pub fn icon_render_count(&self) -> usize {
        self.window.platform.icon_render_count
    }

    pub fn wizard_state(&self) -> WizardState {
        self.controller.wizard()
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.window.trace.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.window.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.window.trace.timers = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.window.trace.logs.drain(..).collect()
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.window.trace.log_limit = max_entries;
        while self.window.trace.logs.len() > max_entries {
            self.window.trace.logs.pop_front();
        }
        Ok(())
    }
}
