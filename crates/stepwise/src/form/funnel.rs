//! Funnel aggregation over recorded analytics events.
//!
//! A [`FunnelReport`] answers the questions a form owner asks of the event
//! stream: how far people get, which fields trip them up and how many finish.
//! It is built in one pass and holds counts only, so its size depends on the
//! form's shape rather than on the number of events.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::analytics::AnalyticsEvent;

/// Completion counts for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFunnel {
    /// Title seen on the most recent completion.
    pub title: String,
    /// Number of `step_complete` events.
    pub completions: usize,
}

/// Aggregated counts for one form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunnelReport {
    steps: BTreeMap<usize, StepFunnel>,
    field_errors: IndexMap<String, usize>,
    field_focus: IndexMap<String, usize>,
    form_completions: usize,
}

impl FunnelReport {
    /// Aggregate every event.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a AnalyticsEvent>,
    {
        let mut report = Self::default();
        for event in events {
            report.record(event);
        }
        report
    }

    /// Aggregate only the events for `form_id`.
    pub fn for_form<'a, I>(form_id: &str, events: I) -> Self
    where
        I: IntoIterator<Item = &'a AnalyticsEvent>,
    {
        Self::from_events(events.into_iter().filter(|e| e.form_id() == form_id))
    }

    /// Add one event to the counts.
    pub fn record(&mut self, event: &AnalyticsEvent) {
        match event {
            AnalyticsEvent::FieldFocus { field, .. } => {
                *self.field_focus.entry(field.clone()).or_default() += 1;
            }
            AnalyticsEvent::FieldError { field, .. } => {
                *self.field_errors.entry(field.clone()).or_default() += 1;
            }
            AnalyticsEvent::StepComplete {
                step, step_title, ..
            } => {
                let entry = self.steps.entry(*step).or_insert_with(|| StepFunnel {
                    title: String::new(),
                    completions: 0,
                });
                entry.title.clone_from(step_title);
                entry.completions += 1;
            }
            AnalyticsEvent::FormComplete { .. } => self.form_completions += 1,
            AnalyticsEvent::FieldBlur { .. } => {}
        }
    }

    /// Per-step completion counts, by visible step index.
    pub fn steps(&self) -> &BTreeMap<usize, StepFunnel> {
        &self.steps
    }

    /// Number of times `step` was completed.
    pub fn step_completions(&self, step: usize) -> usize {
        self.steps.get(&step).map_or(0, |s| s.completions)
    }

    /// Number of errors reported for `field`.
    pub fn field_error_count(&self, field: &str) -> usize {
        self.field_errors.get(field).copied().unwrap_or(0)
    }

    /// Number of times `field` gained focus.
    pub fn field_focus_count(&self, field: &str) -> usize {
        self.field_focus.get(field).copied().unwrap_or(0)
    }

    /// Error counts per field, in first-seen order.
    pub fn field_errors(&self) -> &IndexMap<String, usize> {
        &self.field_errors
    }

    /// The field with the most errors. Ties go to the field seen first.
    pub fn most_failed_field(&self) -> Option<(&str, usize)> {
        self.field_errors
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (field, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((field.as_str(), count)),
            })
    }

    /// Number of `form_complete` events.
    pub fn completions(&self) -> usize {
        self.form_completions
    }

    /// Completions as a fraction of first-step completions.
    ///
    /// Returns `None` when no one has finished the first step, which includes
    /// single-step forms.
    pub fn completion_rate(&self) -> Option<f64> {
        let started = self.step_completions(0);
        if started == 0 {
            return None;
        }
        Some((self.form_completions as f64 / started as f64).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_complete(step: usize, title: &str) -> AnalyticsEvent {
        AnalyticsEvent::StepComplete {
            form_id: "enroll".to_string(),
            step,
            step_title: title.to_string(),
        }
    }

    fn field_error(field: &str) -> AnalyticsEvent {
        AnalyticsEvent::FieldError {
            form_id: "enroll".to_string(),
            field: field.to_string(),
            message: "required".to_string(),
            step: 0,
            step_title: "Contact".to_string(),
        }
    }

    #[test]
    fn test_counts() {
        let events = vec![
            AnalyticsEvent::FieldFocus {
                form_id: "enroll".to_string(),
                field: "email".to_string(),
                step: 0,
                step_title: "Contact".to_string(),
            },
            field_error("email"),
            field_error("phone"),
            field_error("phone"),
            step_complete(0, "Contact"),
            step_complete(0, "Contact"),
            step_complete(1, "Course"),
            AnalyticsEvent::FormComplete {
                form_id: "enroll".to_string(),
                user_email: None,
            },
        ];

        let report = FunnelReport::from_events(&events);
        assert_eq!(report.step_completions(0), 2);
        assert_eq!(report.step_completions(1), 1);
        assert_eq!(report.step_completions(5), 0);
        assert_eq!(report.steps()[&1].title, "Course");
        assert_eq!(report.field_focus_count("email"), 1);
        assert_eq!(report.field_error_count("phone"), 2);
        assert_eq!(report.most_failed_field(), Some(("phone", 2)));
        assert_eq!(report.completions(), 1);
        assert_eq!(report.completion_rate(), Some(0.5));
    }

    #[test]
    fn test_for_form_filters() {
        let mut other = step_complete(0, "Contact");
        if let AnalyticsEvent::StepComplete { ref mut form_id, .. } = other {
            *form_id = "newsletter".to_string();
        }
        let events = [step_complete(0, "Contact"), other];

        assert_eq!(FunnelReport::for_form("enroll", &events).step_completions(0), 1);
        assert_eq!(FunnelReport::from_events(&events).step_completions(0), 2);
    }

    #[test]
    fn test_empty_report() {
        let report = FunnelReport::default();
        assert_eq!(report.completion_rate(), None);
        assert_eq!(report.most_failed_field(), None);
    }

    #[test]
    fn test_most_failed_field_tie_keeps_first() {
        let report = FunnelReport::from_events(&[field_error("email"), field_error("phone")]);
        assert_eq!(report.most_failed_field(), Some(("email", 1)));
    }
}
