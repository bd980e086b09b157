//! Multi-step forms.
//!
//! A [`MultiStepForm`] walks the user through an ordered list of
//! [`StepDefinition`]s. Steps can be hidden based on earlier answers, each
//! step can refuse to advance until its validation passes, and every field
//! interaction is reported to an [`AnalyticsSink`].
//!
//! # Building a Form
//!
//! ```
//! use std::sync::Arc;
//! use stepwise::form::{
//!     FormConfig, MultiStepForm, NavOutcome, RecordingSink, StepDefinition, StepSchema,
//! };
//! use stepwise_core::{Element, FormData, FormDataStore};
//!
//! let store = FormDataStore::new();
//! let sink = Arc::new(RecordingSink::new());
//!
//! let steps = vec![
//!     StepDefinition::new(1, "Contact")
//!         .with_content(Element::new("input").with_id("email"))
//!         .with_schema(StepSchema::new().required("email", "Email is required"))
//!         .with_schema_validation(store.clone()),
//!     StepDefinition::new(2, "Extras").with_condition(|data: &FormData| data.is_true("wantsExtra")),
//!     StepDefinition::new(3, "Review"),
//! ];
//!
//! let mut form = MultiStepForm::from_config(&FormConfig::new("enroll"), steps, store.clone(), sink.clone());
//! assert_eq!(form.render().step_count, 2);
//!
//! assert!(matches!(form.next(), NavOutcome::Blocked { .. }));
//! store.set("email", "ada@example.com");
//! assert_eq!(form.next(), NavOutcome::Advanced { from: 0, to: 1 });
//! assert_eq!(sink.count("step_complete"), 1);
//! ```
//!
//! # Modules
//!
//! - Validation: [`ValidationResult`], [`StepSchema`]
//! - Steps: [`StepDefinition`]
//! - Analytics: [`AnalyticsSink`], [`FormAnalytics`], [`FunnelReport`]
//! - Display: [`StepIndicator`], [`FormView`]

mod analytics;
mod config;
mod engine;
mod funnel;
mod indicator;
mod instrument;
mod step;
mod validation;

pub use analytics::{AnalyticsEvent, AnalyticsSink, FormAnalytics, NullSink, RecordingSink, TracingSink};
pub use config::FormConfig;
pub use engine::{FormView, MultiStepForm, NavOutcome, ShrinkPolicy};
pub use funnel::{FunnelReport, StepFunnel};
pub use indicator::{IndicatorItem, IndicatorVariant, StepIndicator, StepStatus};
pub use instrument::{FieldContext, instrument_fields};
pub use step::{StepCondition, StepDefinition, StepValidator};
pub use validation::{FieldRule, RuleKind, StepSchema, ValidationResult};
