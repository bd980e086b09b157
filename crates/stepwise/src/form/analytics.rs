//! Form analytics.
//!
//! The form engine reports five kinds of behavioral events to an
//! [`AnalyticsSink`]: field focus, field blur, field error, step complete and
//! form complete. Reporting is fire-and-forget. The engine never reads a
//! result back from the sink, and [`FormAnalytics`] contains sink panics so a
//! broken sink cannot stop the user from moving through the form.
//!
//! # Built-in Sinks
//!
//! - [`TracingSink`]: Emits each event as a structured `tracing` event
//! - [`RecordingSink`]: Keeps events in memory, in order
//! - [`NullSink`]: Discards everything
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stepwise::form::{FormAnalytics, RecordingSink};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let analytics = FormAnalytics::new("enroll", sink.clone());
//!
//! analytics.step_complete(0, "Contact");
//! assert_eq!(sink.count("step_complete"), 1);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stepwise_core::logging::targets;

// ============================================================================
// AnalyticsSink
// ============================================================================

/// Receives form analytics events.
///
/// `form_id` is passed through verbatim from the form configuration.
/// Step indices are zero-based positions among the visible steps.
pub trait AnalyticsSink: Send + Sync {
    /// A field gained focus.
    fn track_field_focus(&self, form_id: &str, field: &str, step: usize, step_title: &str);

    /// A field lost focus.
    fn track_field_blur(&self, form_id: &str, field: &str, step: usize, step_title: &str);

    /// A field failed validation. `message` may be empty.
    fn track_field_error(
        &self,
        form_id: &str,
        field: &str,
        message: &str,
        step: usize,
        step_title: &str,
    );

    /// A step was completed by moving forward from it.
    fn track_step_complete(&self, form_id: &str, step: usize, step_title: &str);

    /// The form was completed.
    fn track_form_complete(&self, form_id: &str, user_email: Option<&str>);
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for Arc<S> {
    fn track_field_focus(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        (**self).track_field_focus(form_id, field, step, step_title)
    }

    fn track_field_blur(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        (**self).track_field_blur(form_id, field, step, step_title)
    }

    fn track_field_error(
        &self,
        form_id: &str,
        field: &str,
        message: &str,
        step: usize,
        step_title: &str,
    ) {
        (**self).track_field_error(form_id, field, message, step, step_title)
    }

    fn track_step_complete(&self, form_id: &str, step: usize, step_title: &str) {
        (**self).track_step_complete(form_id, step, step_title)
    }

    fn track_form_complete(&self, form_id: &str, user_email: Option<&str>) {
        (**self).track_form_complete(form_id, user_email)
    }
}

// ============================================================================
// AnalyticsEvent
// ============================================================================

/// A recorded analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A field gained focus.
    FieldFocus {
        form_id: String,
        field: String,
        step: usize,
        step_title: String,
    },
    /// A field lost focus.
    FieldBlur {
        form_id: String,
        field: String,
        step: usize,
        step_title: String,
    },
    /// A field failed validation.
    FieldError {
        form_id: String,
        field: String,
        message: String,
        step: usize,
        step_title: String,
    },
    /// A step was completed.
    StepComplete {
        form_id: String,
        step: usize,
        step_title: String,
    },
    /// The form was completed.
    FormComplete {
        form_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_email: Option<String>,
    },
}

impl AnalyticsEvent {
    /// The wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FieldFocus { .. } => "field_focus",
            Self::FieldBlur { .. } => "field_blur",
            Self::FieldError { .. } => "field_error",
            Self::StepComplete { .. } => "step_complete",
            Self::FormComplete { .. } => "form_complete",
        }
    }

    /// The form the event belongs to.
    pub fn form_id(&self) -> &str {
        match self {
            Self::FieldFocus { form_id, .. }
            | Self::FieldBlur { form_id, .. }
            | Self::FieldError { form_id, .. }
            | Self::StepComplete { form_id, .. }
            | Self::FormComplete { form_id, .. } => form_id,
        }
    }

    /// Replay this event into a sink.
    pub fn send_to(&self, sink: &dyn AnalyticsSink) {
        match self {
            Self::FieldFocus {
                form_id,
                field,
                step,
                step_title,
            } => sink.track_field_focus(form_id, field, *step, step_title),
            Self::FieldBlur {
                form_id,
                field,
                step,
                step_title,
            } => sink.track_field_blur(form_id, field, *step, step_title),
            Self::FieldError {
                form_id,
                field,
                message,
                step,
                step_title,
            } => sink.track_field_error(form_id, field, message, *step, step_title),
            Self::StepComplete {
                form_id,
                step,
                step_title,
            } => sink.track_step_complete(form_id, *step, step_title),
            Self::FormComplete {
                form_id,
                user_email,
            } => sink.track_form_complete(form_id, user_email.as_deref()),
        }
    }
}

// ============================================================================
// Built-in sinks
// ============================================================================

/// Emits analytics events as structured `tracing` events at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track_field_focus(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        tracing::info!(target: targets::ANALYTICS, event = "field_focus", form_id, field, step, step_title);
    }

    fn track_field_blur(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        tracing::info!(target: targets::ANALYTICS, event = "field_blur", form_id, field, step, step_title);
    }

    fn track_field_error(
        &self,
        form_id: &str,
        field: &str,
        message: &str,
        step: usize,
        step_title: &str,
    ) {
        tracing::info!(
            target: targets::ANALYTICS,
            event = "field_error",
            form_id,
            field,
            message,
            step,
            step_title
        );
    }

    fn track_step_complete(&self, form_id: &str, step: usize, step_title: &str) {
        tracing::info!(target: targets::ANALYTICS, event = "step_complete", form_id, step, step_title);
    }

    fn track_form_complete(&self, form_id: &str, user_email: Option<&str>) {
        tracing::info!(target: targets::ANALYTICS, event = "form_complete", form_id, user_email);
    }
}

/// Keeps every event in memory, in the order received.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of all recorded events.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    /// Count recorded events with the given wire name.
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}

impl AnalyticsSink for RecordingSink {
    fn track_field_focus(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        self.push(AnalyticsEvent::FieldFocus {
            form_id: form_id.to_string(),
            field: field.to_string(),
            step,
            step_title: step_title.to_string(),
        });
    }

    fn track_field_blur(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        self.push(AnalyticsEvent::FieldBlur {
            form_id: form_id.to_string(),
            field: field.to_string(),
            step,
            step_title: step_title.to_string(),
        });
    }

    fn track_field_error(
        &self,
        form_id: &str,
        field: &str,
        message: &str,
        step: usize,
        step_title: &str,
    ) {
        self.push(AnalyticsEvent::FieldError {
            form_id: form_id.to_string(),
            field: field.to_string(),
            message: message.to_string(),
            step,
            step_title: step_title.to_string(),
        });
    }

    fn track_step_complete(&self, form_id: &str, step: usize, step_title: &str) {
        self.push(AnalyticsEvent::StepComplete {
            form_id: form_id.to_string(),
            step,
            step_title: step_title.to_string(),
        });
    }

    fn track_form_complete(&self, form_id: &str, user_email: Option<&str>) {
        self.push(AnalyticsEvent::FormComplete {
            form_id: form_id.to_string(),
            user_email: user_email.map(str::to_string),
        });
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn track_field_focus(&self, _: &str, _: &str, _: usize, _: &str) {}
    fn track_field_blur(&self, _: &str, _: &str, _: usize, _: &str) {}
    fn track_field_error(&self, _: &str, _: &str, _: &str, _: usize, _: &str) {}
    fn track_step_complete(&self, _: &str, _: usize, _: &str) {}
    fn track_form_complete(&self, _: &str, _: Option<&str>) {}
}

// ============================================================================
// FormAnalytics
// ============================================================================

/// The analytics handle a form instance reports through.
///
/// Binds the form id and the optional user email to a sink. Every call is
/// isolated: if the sink panics, the panic is logged and swallowed.
#[derive(Clone)]
pub struct FormAnalytics {
    form_id: String,
    user_email: Option<String>,
    sink: Arc<dyn AnalyticsSink>,
}

impl FormAnalytics {
    /// Create a handle for `form_id`.
    pub fn new(form_id: impl Into<String>, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            form_id: form_id.into(),
            user_email: None,
            sink,
        }
    }

    /// Create a handle that discards everything.
    pub fn disabled(form_id: impl Into<String>) -> Self {
        Self::new(form_id, Arc::new(NullSink))
    }

    /// Set the user email reported on completion using builder pattern.
    pub fn with_user_email(mut self, email: Option<String>) -> Self {
        self.user_email = email;
        self
    }

    /// Get the form id.
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Get the user email.
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// Report a field focus.
    pub fn field_focus(&self, field: &str, step: usize, step_title: &str) {
        self.guarded("field_focus", |sink| {
            sink.track_field_focus(&self.form_id, field, step, step_title)
        });
    }

    /// Report a field blur.
    pub fn field_blur(&self, field: &str, step: usize, step_title: &str) {
        self.guarded("field_blur", |sink| {
            sink.track_field_blur(&self.form_id, field, step, step_title)
        });
    }

    /// Report a field error.
    pub fn field_error(&self, field: &str, message: &str, step: usize, step_title: &str) {
        self.guarded("field_error", |sink| {
            sink.track_field_error(&self.form_id, field, message, step, step_title)
        });
    }

    /// Report a completed step.
    pub fn step_complete(&self, step: usize, step_title: &str) {
        self.guarded("step_complete", |sink| {
            sink.track_step_complete(&self.form_id, step, step_title)
        });
    }

    /// Report form completion with the bound user email.
    pub fn form_complete(&self) {
        self.guarded("form_complete", |sink| {
            sink.track_form_complete(&self.form_id, self.user_email.as_deref())
        });
    }

    fn guarded(&self, event: &'static str, call: impl FnOnce(&dyn AnalyticsSink)) {
        let sink = self.sink.as_ref();
        if catch_unwind(AssertUnwindSafe(|| call(sink))).is_err() {
            tracing::warn!(
                target: targets::ANALYTICS,
                form_id = %self.form_id,
                event,
                "analytics sink panicked; event dropped"
            );
        }
    }
}

impl std::fmt::Debug for FormAnalytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormAnalytics")
            .field("form_id", &self.form_id)
            .field("user_email", &self.user_email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingSink;

    impl AnalyticsSink for PanickingSink {
        fn track_field_focus(&self, _: &str, _: &str, _: usize, _: &str) {
            panic!("collector offline");
        }
        fn track_field_blur(&self, _: &str, _: &str, _: usize, _: &str) {
            panic!("collector offline");
        }
        fn track_field_error(&self, _: &str, _: &str, _: &str, _: usize, _: &str) {
            panic!("collector offline");
        }
        fn track_step_complete(&self, _: &str, _: usize, _: &str) {
            panic!("collector offline");
        }
        fn track_form_complete(&self, _: &str, _: Option<&str>) {
            panic!("collector offline");
        }
    }

    #[test]
    fn test_recording_sink_order() {
        let sink = Arc::new(RecordingSink::new());
        let analytics = FormAnalytics::new("enroll", sink.clone())
            .with_user_email(Some("ada@example.com".to_string()));

        analytics.field_focus("email", 0, "Contact");
        analytics.field_blur("email", 0, "Contact");
        analytics.field_error("email", "", 0, "Contact");
        analytics.step_complete(0, "Contact");
        analytics.form_complete();

        let names: Vec<&str> = sink.events().iter().map(AnalyticsEvent::name).collect();
        assert_eq!(
            names,
            vec!["field_focus", "field_blur", "field_error", "step_complete", "form_complete"]
        );
        assert!(sink.events().iter().all(|e| e.form_id() == "enroll"));
        assert_eq!(
            sink.events().last(),
            Some(&AnalyticsEvent::FormComplete {
                form_id: "enroll".to_string(),
                user_email: Some("ada@example.com".to_string()),
            })
        );

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_panicking_sink_is_contained() {
        let analytics = FormAnalytics::new("enroll", Arc::new(PanickingSink));
        analytics.field_focus("email", 0, "Contact");
        analytics.step_complete(0, "Contact");
        analytics.form_complete();
    }

    #[test]
    fn test_event_json_shape() {
        let event = AnalyticsEvent::StepComplete {
            form_id: "enroll".to_string(),
            step: 1,
            step_title: "Course".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "step_complete");
        assert_eq!(json["step"], 1);

        let done = AnalyticsEvent::FormComplete {
            form_id: "enroll".to_string(),
            user_email: None,
        };
        let json = serde_json::to_string(&done).unwrap();
        assert_eq!(json, r#"{"event":"form_complete","form_id":"enroll"}"#);
        let back: AnalyticsEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, done);
    }

    #[test]
    fn test_replay_into_sink() {
        let source = RecordingSink::new();
        source.track_field_error("enroll", "email", "Invalid email", 0, "Contact");

        let target = RecordingSink::new();
        for event in source.events() {
            event.send_to(&target);
        }
        assert_eq!(target.events(), source.events());
    }
}
