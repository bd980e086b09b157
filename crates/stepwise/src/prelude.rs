//! Prelude module for Stepwise.
//!
//! ```ignore
//! use stepwise::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signals (`Signal`, `ConnectionId`)
//! - Form data and the render tree (`FormData`, `FormDataStore`, `Element`, `Node`)
//! - The form component (`MultiStepForm`, `StepDefinition`, `NavOutcome`)
//! - Validation and analytics (`ValidationResult`, `StepSchema`, `FormAnalytics`)

// ============================================================================
// Core Primitives
// ============================================================================

pub use crate::{ConnectionId, Error, Signal};
pub use crate::{Element, FormData, FormDataStore, Node, RenderNode};

// ============================================================================
// Form Component
// ============================================================================

pub use crate::form::{
    FormConfig, FormView, IndicatorVariant, MultiStepForm, NavOutcome, ShrinkPolicy,
    StepDefinition, StepIndicator,
};

// ============================================================================
// Validation and Analytics
// ============================================================================

pub use crate::form::{
    AnalyticsSink, FormAnalytics, RecordingSink, StepSchema, TracingSink, ValidationResult,
};
