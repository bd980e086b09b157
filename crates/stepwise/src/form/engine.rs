//! Multi-step form engine.
//!
//! [`MultiStepForm`] owns the navigation state of one form instance: which
//! visible step is current, which validation messages are pending, and
//! whether the user has tried to advance from the current step yet.
//!
//! # Navigation
//!
//! - `next()` runs the current step's validation strategy. A failing result
//!   keeps the form where it is and surfaces the non-empty messages; a passing
//!   result advances, or completes the form on the last visible step.
//! - `back()` moves to the previous visible step and discards pending
//!   messages.
//!
//! Visibility is re-evaluated against the shared form data on every
//! `render()`, `next()` and `back()`, so answering a question on one step can
//! add or remove later steps. Every navigation method takes `&mut self` and
//! applies its whole transition before returning, so two clicks are always
//! two separate transitions.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use stepwise::form::{FormAnalytics, MultiStepForm, NavOutcome, StepDefinition, ValidationResult};
//! use stepwise_core::FormDataStore;
//!
//! let mut form = MultiStepForm::new(
//!     vec![
//!         StepDefinition::new(1, "Contact")
//!             .with_validator(|| ValidationResult::field_error("email", "Invalid email")),
//!         StepDefinition::new(2, "Course"),
//!     ],
//!     FormDataStore::new(),
//!     FormAnalytics::disabled("enroll"),
//! );
//!
//! assert!(matches!(form.next(), NavOutcome::Blocked { .. }));
//! assert_eq!(form.render().errors, vec!["Invalid email".to_string()]);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepwise_core::logging::targets;
use stepwise_core::{FormDataStore, Node, Signal};

use super::analytics::{AnalyticsSink, FormAnalytics};
use super::config::FormConfig;
use super::indicator::{IndicatorVariant, StepIndicator};
use super::instrument::{FieldContext, instrument_fields};
use super::step::StepDefinition;

// ============================================================================
// ShrinkPolicy
// ============================================================================

/// What happens to the current step when the visible list shrinks past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkPolicy {
    /// Move to the last visible step.
    #[default]
    ClampToLast,
    /// Move to the first step.
    ResetToStart,
}

// ============================================================================
// NavOutcome
// ============================================================================

/// The result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Moved forward.
    Advanced { from: usize, to: usize },
    /// Moved backward.
    Retreated { from: usize, to: usize },
    /// Validation failed; the displayable messages are attached.
    Blocked { errors: Vec<String> },
    /// The last step passed validation and the form completed.
    Completed,
    /// Already on the first step.
    AtStart,
    /// No step is currently visible.
    NoSteps,
}

// ============================================================================
// FormView
// ============================================================================

/// Everything needed to draw the form in its current state.
#[derive(Debug, Clone)]
pub struct FormView {
    /// Position of the current step among the visible steps.
    pub current_step: usize,
    /// Number of visible steps.
    pub step_count: usize,
    /// Id of the current step.
    pub step_id: Option<u32>,
    /// Title of the current step.
    pub title: Option<String>,
    /// Description of the current step.
    pub description: Option<String>,
    /// Progress through the visible steps, `0.0..=100.0`.
    pub progress: f32,
    /// Whether the progress bar is shown.
    pub show_progress: bool,
    /// The step indicator.
    pub indicator: StepIndicator,
    /// The current step's content, with field reporting attached.
    pub content: Node,
    /// The messages in the error banner. Empty when no banner is shown.
    pub errors: Vec<String>,
    /// Whether the Back button is enabled.
    pub can_go_back: bool,
    /// Whether the primary button completes the form.
    pub is_last_step: bool,
}

impl FormView {
    /// Progress rounded to a whole percentage, for labels.
    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress.round() as u32)
    }

    /// Check whether the error banner is shown.
    pub fn has_error_banner(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ============================================================================
// MultiStepForm
// ============================================================================

/// A form split into steps, with validation gating and field analytics.
///
/// # Signals
///
/// - `current_step_changed(usize)`: Emitted when the current visible step changes
/// - `completed(())`: Emitted when the last step passes validation
/// - `validation_failed(Vec<String>)`: Emitted with the displayable messages
///   when a step refuses to advance
pub struct MultiStepForm {
    /// All step definitions, in order.
    steps: Vec<StepDefinition>,
    /// Shared answers; read for visibility only.
    data: Arc<FormDataStore>,
    /// Where events are reported.
    analytics: FormAnalytics,
    /// Indicator layout.
    variant: IndicatorVariant,
    /// Whether the progress bar is shown.
    show_progress: bool,
    /// Behavior when the visible list shrinks past the current step.
    shrink_policy: ShrinkPolicy,

    /// Current index into the visible steps.
    current_step: usize,
    /// Displayable messages from the last failed advance.
    validation_errors: Vec<String>,
    /// Whether the user has tried to advance from the current step.
    attempted_next: bool,
    /// The index the last step change started from.
    previous_step: usize,

    /// Signal emitted when the current step changes.
    pub current_step_changed: Signal<usize>,
    /// Signal emitted when the form completes.
    pub completed: Signal<()>,
    /// Signal emitted when validation blocks an advance.
    pub validation_failed: Signal<Vec<String>>,
}

impl MultiStepForm {
    /// Create a form over `steps`, reading visibility from `data`.
    pub fn new(
        steps: Vec<StepDefinition>,
        data: Arc<FormDataStore>,
        analytics: FormAnalytics,
    ) -> Self {
        Self {
            steps,
            data,
            analytics,
            variant: IndicatorVariant::Default,
            show_progress: true,
            shrink_policy: ShrinkPolicy::ClampToLast,
            current_step: 0,
            validation_errors: Vec::new(),
            attempted_next: false,
            previous_step: 0,
            current_step_changed: Signal::new(),
            completed: Signal::new(),
            validation_failed: Signal::new(),
        }
    }

    /// Create a form from a configuration, reporting to `sink`.
    pub fn from_config(
        config: &FormConfig,
        steps: Vec<StepDefinition>,
        data: Arc<FormDataStore>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let analytics =
            FormAnalytics::new(config.form_id.clone(), sink).with_user_email(config.user_email.clone());
        Self::new(steps, data, analytics)
            .with_variant(config.variant)
            .with_show_progress(config.show_progress)
            .with_shrink_policy(config.shrink_policy)
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the indicator variant using builder pattern.
    pub fn with_variant(mut self, variant: IndicatorVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Show or hide the progress bar using builder pattern.
    pub fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set the shrink policy using builder pattern.
    pub fn with_shrink_policy(mut self, policy: ShrinkPolicy) -> Self {
        self.shrink_policy = policy;
        self
    }

    /// Run `callback` each time the form completes.
    pub fn on_complete<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.completed.connect(move |_| callback());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get all step definitions, visible or not.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Get the shared form data.
    pub fn data(&self) -> &Arc<FormDataStore> {
        &self.data
    }

    /// Get the analytics handle.
    pub fn analytics(&self) -> &FormAnalytics {
        &self.analytics
    }

    /// Get the indicator variant.
    pub fn variant(&self) -> IndicatorVariant {
        self.variant
    }

    /// Get the current index into the visible steps.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Get the messages from the last failed advance, shown or not.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Check whether the user has tried to advance from the current step.
    pub fn attempted_next(&self) -> bool {
        self.attempted_next
    }

    /// Get the messages currently shown in the error banner.
    pub fn displayed_errors(&self) -> &[String] {
        if self.attempted_next {
            &self.validation_errors
        } else {
            &[]
        }
    }

    /// Get the steps whose visibility condition currently holds, in order.
    pub fn visible_steps(&self) -> Vec<&StepDefinition> {
        self.visible_indices()
            .into_iter()
            .map(|index| &self.steps[index])
            .collect()
    }

    /// Get the current step definition.
    pub fn current_step_definition(&self) -> Option<&StepDefinition> {
        self.visible_indices()
            .get(self.current_step)
            .map(|&index| &self.steps[index])
    }

    /// Progress through the visible steps, `0.0..=100.0`.
    pub fn progress(&self) -> f32 {
        progress_percent(self.current_step, self.visible_indices().len())
    }

    /// Check whether the current step is the last visible one.
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.visible_indices().len()
    }

    /// Check whether Back would move.
    pub fn can_go_back(&self) -> bool {
        self.current_step > 0
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Try to advance past the current step.
    #[tracing::instrument(skip_all, target = "stepwise::form", level = "debug", fields(form_id = %self.analytics.form_id()))]
    pub fn next(&mut self) -> NavOutcome {
        let visible = self.visible_indices();
        self.sync_to_visible(visible.len());
        if visible.is_empty() {
            return NavOutcome::NoSteps;
        }

        self.attempted_next = true;
        let current = self.current_step;
        let step = &self.steps[visible[current]];

        if let Some(result) = step.validate()
            && !result.is_valid()
        {
            self.validation_errors = result.displayable_errors();
            for (field, message) in result.errors() {
                self.analytics.field_error(field, message, current, step.title());
            }
            tracing::debug!(
                target: targets::FORM,
                step = current,
                error_count = result.errors().len(),
                "validation blocked advance"
            );
            self.validation_failed.emit(self.validation_errors.clone());
            return NavOutcome::Blocked {
                errors: self.validation_errors.clone(),
            };
        }

        self.validation_errors.clear();

        if current + 1 < visible.len() {
            self.attempted_next = false;
            self.move_to(current + 1, &visible);
            NavOutcome::Advanced {
                from: current,
                to: current + 1,
            }
        } else {
            tracing::debug!(target: targets::FORM, step = current, "form completed");
            self.analytics.form_complete();
            self.completed.emit(());
            NavOutcome::Completed
        }
    }

    /// Move to the previous visible step.
    #[tracing::instrument(skip_all, target = "stepwise::form", level = "debug", fields(form_id = %self.analytics.form_id()))]
    pub fn back(&mut self) -> NavOutcome {
        let visible = self.visible_indices();
        self.sync_to_visible(visible.len());
        if visible.is_empty() {
            return NavOutcome::NoSteps;
        }
        if self.current_step == 0 {
            return NavOutcome::AtStart;
        }

        let from = self.current_step;
        self.attempted_next = false;
        self.validation_errors.clear();
        self.move_to(from - 1, &visible);
        NavOutcome::Retreated { from, to: from - 1 }
    }

    /// Discard all navigation state, as if the form were mounted afresh.
    pub fn reset(&mut self) {
        let changed = self.current_step != 0;
        self.current_step = 0;
        self.previous_step = 0;
        self.validation_errors.clear();
        self.attempted_next = false;
        if changed {
            self.current_step_changed.emit(0);
        }
    }

    /// Produce a view of the current state.
    pub fn render(&mut self) -> FormView {
        let visible = self.visible_indices();
        self.sync_to_visible(visible.len());

        let steps: Vec<&StepDefinition> = visible.iter().map(|&i| &self.steps[i]).collect();
        let current = self.current_step;
        let current_def = steps.get(current).copied();

        let content = current_def
            .map(|step| {
                let context = FieldContext::new(self.analytics.clone(), current, step.title());
                instrument_fields(step.content().clone(), &context)
            })
            .unwrap_or_default();

        FormView {
            current_step: current,
            step_count: steps.len(),
            step_id: current_def.map(StepDefinition::id),
            title: current_def.map(|s| s.title().to_string()),
            description: current_def.and_then(|s| s.description().map(str::to_string)),
            progress: progress_percent(current, steps.len()),
            show_progress: self.show_progress,
            indicator: StepIndicator::new(steps.iter().copied(), current, self.variant),
            content,
            errors: self.displayed_errors().to_vec(),
            can_go_back: current > 0,
            is_last_step: current + 1 >= steps.len(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn visible_indices(&self) -> Vec<usize> {
        let data = self.data.snapshot();
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.should_show(&data))
            .map(|(index, _)| index)
            .collect()
    }

    /// Pull the current step back inside the visible range.
    fn sync_to_visible(&mut self, visible_len: usize) {
        if self.current_step < visible_len || (visible_len == 0 && self.current_step == 0) {
            return;
        }

        let target = match self.shrink_policy {
            _ if visible_len == 0 => 0,
            ShrinkPolicy::ClampToLast => visible_len - 1,
            ShrinkPolicy::ResetToStart => 0,
        };
        tracing::debug!(
            target: targets::FORM,
            from = self.current_step,
            to = target,
            visible_len,
            "visible steps shrank past current step"
        );

        self.current_step = target;
        self.previous_step = target;
        self.validation_errors.clear();
        self.attempted_next = false;
        self.current_step_changed.emit(target);
    }

    fn move_to(&mut self, step: usize, visible: &[usize]) {
        tracing::debug!(target: targets::FORM, from = self.current_step, to = step, "step changed");
        self.current_step = step;
        self.record_step_change(visible);
        self.current_step_changed.emit(step);
    }

    /// Report the step just left if the change moved forward.
    fn record_step_change(&mut self, visible: &[usize]) {
        let previous = self.previous_step;
        if self.current_step > previous
            && let Some(step) = visible.get(previous).map(|&index| &self.steps[index])
        {
            self.analytics.step_complete(previous, step.title());
        }
        self.previous_step = self.current_step;
    }
}

impl std::fmt::Debug for MultiStepForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiStepForm")
            .field("form_id", &self.analytics.form_id())
            .field("steps", &self.steps.len())
            .field("current_step", &self.current_step)
            .field("validation_errors", &self.validation_errors)
            .field("attempted_next", &self.attempted_next)
            .finish()
    }
}

fn progress_percent(current_step: usize, visible_len: usize) -> f32 {
    if visible_len == 0 {
        return 0.0;
    }
    (current_step + 1) as f32 / visible_len as f32 * 100.0
}
