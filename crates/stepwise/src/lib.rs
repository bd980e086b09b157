//! Stepwise - multi-step forms with conditional steps, validation gating and
//! field analytics.
//!
//! This is the main crate. It re-exports the primitives from `stepwise-core`
//! (signals, form data, the render tree) and adds the form component itself.
//!
//! # Example
//!
//! ```
//! use stepwise::prelude::*;
//!
//! let mut form = MultiStepForm::new(
//!     vec![StepDefinition::new(1, "Contact"), StepDefinition::new(2, "Review")],
//!     FormDataStore::new(),
//!     FormAnalytics::disabled("signup"),
//! );
//!
//! assert_eq!(form.next(), NavOutcome::Advanced { from: 0, to: 1 });
//! assert_eq!(form.next(), NavOutcome::Completed);
//! ```

pub use stepwise_core::*;

pub mod form;
pub mod prelude;
