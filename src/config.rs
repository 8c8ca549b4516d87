use serde::Deserialize;

use super::*;

/// Tunable constants for every page behaviour.
///
/// All fields default to the values the site ships with, so a partial JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Height of the fixed header; anchor scrolls land this far above the target.
    pub header_offset: i64,
    /// Scroll offset past which the navbar is marked `scrolled`.
    pub scrolled_threshold: i64,
    /// Sections count as current this far before their top edge.
    pub section_offset: i64,
    pub counter_duration_ms: i64,
    pub counter_tick_ms: i64,
    pub counter_threshold: f64,
    pub fade_threshold: f64,
    pub fade_bottom_margin: i64,
    pub fade_offset: i64,
    pub fade_stagger_secs: f64,
    pub enquiry_submit_delay_ms: i64,
    pub contact_submit_delay_ms: i64,
    pub notification_lifetime_ms: i64,
    pub total_steps: usize,
    pub project_type_field: String,
    pub enquiry_section_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_offset: 80,
            scrolled_threshold: 100,
            section_offset: 100,
            counter_duration_ms: 2000,
            counter_tick_ms: 16,
            counter_threshold: 0.7,
            fade_threshold: 0.1,
            fade_bottom_margin: 50,
            fade_offset: 30,
            fade_stagger_secs: 0.1,
            enquiry_submit_delay_ms: 2000,
            contact_submit_delay_ms: 1500,
            notification_lifetime_ms: 5000,
            total_steps: 2,
            project_type_field: "projectType".to_string(),
            enquiry_section_id: "enquiry".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(src: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(src).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_steps == 0 {
            return Err(Error::Config("total_steps must be at least 1".into()));
        }
        if self.counter_tick_ms <= 0 {
            return Err(Error::Config("counter_tick_ms must be positive".into()));
        }
        if self.counter_duration_ms <= 0 {
            return Err(Error::Config("counter_duration_ms must be positive".into()));
        }
        for (name, value) in [
            ("counter_threshold", self.counter_threshold),
            ("fade_threshold", self.fade_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        for (name, value) in [
            ("enquiry_submit_delay_ms", self.enquiry_submit_delay_ms),
            ("contact_submit_delay_ms", self.contact_submit_delay_ms),
            ("notification_lifetime_ms", self.notification_lifetime_ms),
        ] {
            if value < 0 {
                return Err(Error::Config(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }

    pub(crate) fn counter_ticks(&self) -> f64 {
        self.counter_duration_ms as f64 / self.counter_tick_ms as f64
    }
}
