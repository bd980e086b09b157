//! Step definitions.
//!
//! A [`StepDefinition`] describes one screen of a multi-step form: its labels,
//! its content, how it is validated and when it is shown. Definitions carry no
//! navigation state; the form engine owns that.

use std::sync::Arc;

use stepwise_core::{FormData, FormDataStore, Node};

use super::validation::{StepSchema, ValidationResult};

/// A validation strategy. Called with no arguments; the step reads its own
/// current values.
pub type StepValidator = Arc<dyn Fn() -> ValidationResult + Send + Sync>;

/// A visibility predicate evaluated against the shared form data.
pub type StepCondition = Arc<dyn Fn(&FormData) -> bool + Send + Sync>;

/// One step of a multi-step form.
#[derive(Clone)]
pub struct StepDefinition {
    /// Stable identity, used for keying only. Ordering is list position.
    id: u32,
    /// The step title.
    title: String,
    /// Optional description shown under the title.
    description: Option<String>,
    /// The interactive payload.
    content: Node,
    /// Declarative rules over form data. Never evaluated by the engine.
    schema: Option<StepSchema>,
    /// The validation strategy.
    validator: Option<StepValidator>,
    /// Condition for whether this step is shown.
    condition: Option<StepCondition>,
}

impl StepDefinition {
    /// Create a step with an id and a title.
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            content: Node::Empty,
            schema: None,
            validator: None,
            condition: None,
        }
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the description using builder pattern.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the content using builder pattern.
    pub fn with_content(mut self, content: impl Into<Node>) -> Self {
        self.content = content.into();
        self
    }

    /// Attach a schema using builder pattern.
    pub fn with_schema(mut self, schema: StepSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the validation strategy using builder pattern.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn() -> ValidationResult + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Set the visibility condition using builder pattern.
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Validate this step by evaluating its schema against `store`.
    ///
    /// Replaces any validation strategy set earlier. Does nothing if the step
    /// has no schema.
    pub fn with_schema_validation(mut self, store: Arc<FormDataStore>) -> Self {
        if let Some(schema) = self.schema.clone() {
            self.validator = Some(Arc::new(move || store.read(|data| schema.validate(data))));
        }
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the step id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the step title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the step description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the step content.
    pub fn content(&self) -> &Node {
        &self.content
    }

    /// Get the schema.
    pub fn schema(&self) -> Option<&StepSchema> {
        self.schema.as_ref()
    }

    /// Check whether the step has a validation strategy.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Run the validation strategy. Returns `None` if the step has none.
    pub fn validate(&self) -> Option<ValidationResult> {
        self.validator.as_ref().map(|validator| validator())
    }

    /// Check if this step should be shown for `data`.
    pub fn should_show(&self, data: &FormData) -> bool {
        match self.condition {
            Some(ref condition) => condition(data),
            None => true,
        }
    }
}

impl std::fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("has_schema", &self.schema.is_some())
            .field("has_validator", &self.validator.is_some())
            .field("has_condition", &self.condition.is_some())
            .finish()
    }
}
