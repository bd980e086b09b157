//! Course enrollment form walkthrough.
//!
//! Drives a three-step form the way a user would: a failed attempt, an
//! answer that reveals an optional step, and completion. Analytics go to the
//! tracing sink, so run with `RUST_LOG=stepwise=debug` to see every event.
//!
//! Run with: cargo run -p stepwise --example enrollment_form

use std::sync::Arc;

use stepwise::form::{
    AnalyticsEvent, AnalyticsSink, FormConfig, FunnelReport, IndicatorVariant, MultiStepForm,
    NavOutcome, RecordingSink, StepDefinition, StepSchema, TracingSink,
};
use stepwise::{Element, FormData, FormDataStore};
use tracing_subscriber::EnvFilter;

/// Forwards every event to two sinks.
struct Tee(TracingSink, Arc<RecordingSink>);

impl AnalyticsSink for Tee {
    fn track_field_focus(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        self.0.track_field_focus(form_id, field, step, step_title);
        self.1.track_field_focus(form_id, field, step, step_title);
    }

    fn track_field_blur(&self, form_id: &str, field: &str, step: usize, step_title: &str) {
        self.0.track_field_blur(form_id, field, step, step_title);
        self.1.track_field_blur(form_id, field, step, step_title);
    }

    fn track_field_error(&self, form_id: &str, field: &str, message: &str, step: usize, step_title: &str) {
        self.0.track_field_error(form_id, field, message, step, step_title);
        self.1.track_field_error(form_id, field, message, step, step_title);
    }

    fn track_step_complete(&self, form_id: &str, step: usize, step_title: &str) {
        self.0.track_step_complete(form_id, step, step_title);
        self.1.track_step_complete(form_id, step, step_title);
    }

    fn track_form_complete(&self, form_id: &str, user_email: Option<&str>) {
        self.0.track_form_complete(form_id, user_email);
        self.1.track_form_complete(form_id, user_email);
    }
}

fn print_view(form: &mut MultiStepForm) {
    let view = form.render();
    println!("{}", view.indicator);
    if view.show_progress {
        println!("progress: {}", view.progress_label());
    }
    for error in &view.errors {
        println!("  ! {error}");
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FormConfig::from_toml_str(
        r#"
        form_id = "course-enrollment"
        variant = "compact"
        user_email = "ada@example.com"
        "#,
    )?;

    let store = FormDataStore::new();
    let recording = Arc::new(RecordingSink::new());
    let sink = Arc::new(Tee(TracingSink, recording.clone()));

    let steps = vec![
        StepDefinition::new(1, "Contact")
            .with_description("How can we reach you?")
            .with_content(
                Element::new("form")
                    .with_child(Element::new("input").with_id("email"))
                    .with_child(Element::new("input").with_name("wantsExtra").with_attr("type", "checkbox")),
            )
            .with_schema(
                StepSchema::new()
                    .required("email", "Email is required")
                    .email("email", "Please enter a valid email"),
            )
            .with_schema_validation(store.clone()),
        StepDefinition::new(2, "Extras")
            .with_description("Optional add-ons")
            .with_condition(|data: &FormData| data.is_true("wantsExtra")),
        StepDefinition::new(3, "Review").with_content(Element::new("input").with_id("terms")),
    ];

    let mut form = MultiStepForm::from_config(&config, steps, store.clone(), sink)
        .on_complete(|| println!("Enrollment submitted."));
    print_view(&mut form);

    let view = form.render();
    view.content.dispatch_focus("email");
    view.content.dispatch_blur("email");

    if let NavOutcome::Blocked { errors } = form.next() {
        println!("blocked: {}", errors.join(", "));
    }
    print_view(&mut form);

    store.set("email", "ada@example.com");
    store.set("wantsExtra", true);
    form.next();
    print_view(&mut form);

    form = form.with_variant(IndicatorVariant::Vertical);
    while form.next() != NavOutcome::Completed {
        print_view(&mut form);
    }

    let events: Vec<AnalyticsEvent> = recording.events();
    let report = FunnelReport::for_form(config.form_id.as_str(), &events);
    println!(
        "events: {}, step completions: {:?}, form completions: {}",
        events.len(),
        report.steps().values().map(|s| s.completions).collect::<Vec<_>>(),
        report.completions()
    );

    Ok(())
}
