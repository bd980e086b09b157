//! Field instrumentation.
//!
//! Before a step's content is shown, it is passed through
//! [`instrument_fields`], which walks the render tree and decorates every
//! field (a node with an `id` or a `name`) so that focusing or leaving it
//! reports a `field_focus` / `field_blur` event. The report fires first; the
//! field's own handler, if it has one, then runs with the same event.
//!
//! Containers without an identity are not decorated themselves, only walked.
//! Text and empty nodes pass through untouched. The pass works on any
//! [`RenderNode`], not just [`stepwise_core::Node`].

use std::sync::Arc;

use stepwise_core::{FieldEvent, FieldEventKind, RenderNode};

use super::analytics::FormAnalytics;

/// Where the fields being instrumented live.
#[derive(Debug, Clone)]
pub struct FieldContext {
    analytics: FormAnalytics,
    step: usize,
    step_title: String,
}

impl FieldContext {
    /// Create a context for the step at visible index `step`.
    pub fn new(analytics: FormAnalytics, step: usize, step_title: impl Into<String>) -> Self {
        Self {
            analytics,
            step,
            step_title: step_title.into(),
        }
    }

    /// Get the visible step index.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Get the step title.
    pub fn step_title(&self) -> &str {
        &self.step_title
    }

    fn report(&self, kind: FieldEventKind, field: &str) {
        match kind {
            FieldEventKind::Focus => self.analytics.field_focus(field, self.step, &self.step_title),
            FieldEventKind::Blur => self.analytics.field_blur(field, self.step, &self.step_title),
        }
    }
}

/// Decorate every field in `content` with focus/blur reporting.
///
/// Returns the content unchanged if it is not an element.
pub fn instrument_fields<N: RenderNode>(mut content: N, context: &FieldContext) -> N {
    instrument_node(&mut content, context);
    content
}

fn instrument_node<N: RenderNode>(node: &mut N, context: &FieldContext) {
    if !node.is_element() {
        return;
    }

    if let Some(field) = node.field_identity().map(str::to_string) {
        if let Some(handlers) = node.handlers_mut() {
            for kind in [FieldEventKind::Focus, FieldEventKind::Blur] {
                let original = handlers.take(kind);
                let context = context.clone();
                let field = field.clone();
                handlers.set(
                    kind,
                    Some(Arc::new(move |event: &FieldEvent| {
                        context.report(kind, &field);
                        if let Some(ref original) = original {
                            original(event);
                        }
                    })),
                );
            }
        }
        return;
    }

    for child in node.children_mut() {
        instrument_node(child, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::analytics::{AnalyticsEvent, RecordingSink};
    use parking_lot::Mutex;
    use stepwise_core::{Element, Node};

    fn context(sink: &Arc<RecordingSink>) -> FieldContext {
        FieldContext::new(FormAnalytics::new("enroll", sink.clone()), 1, "Contact")
    }

    #[test]
    fn test_non_elements_pass_through() {
        let sink = Arc::new(RecordingSink::new());
        let ctx = context(&sink);

        match instrument_fields(Node::text("Tell us about yourself"), &ctx) {
            Node::Text(text) => assert_eq!(text, "Tell us about yourself"),
            other => panic!("expected text, got {other:?}"),
        }
        assert!(matches!(instrument_fields(Node::Empty, &ctx), Node::Empty));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_field_reports_before_original_handler() {
        let sink = Arc::new(RecordingSink::new());
        let seen_by_handler = Arc::new(Mutex::new(None));

        let sink_clone = sink.clone();
        let seen_clone = seen_by_handler.clone();
        let content = Node::element(Element::new("input").with_id("email").on_focus(move |event| {
            *seen_clone.lock() = Some((sink_clone.events().len(), event.target.clone()));
        }));

        let content = instrument_fields(content, &context(&sink));
        assert!(content.dispatch_focus("email"));

        assert_eq!(*seen_by_handler.lock(), Some((1, Some("email".to_string()))));
        assert_eq!(
            sink.events(),
            vec![AnalyticsEvent::FieldFocus {
                form_id: "enroll".to_string(),
                field: "email".to_string(),
                step: 1,
                step_title: "Contact".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_handlers_are_tolerated() {
        let sink = Arc::new(RecordingSink::new());
        let content = instrument_fields(
            Node::element(Element::new("input").with_name("phone")),
            &context(&sink),
        );

        content.dispatch_focus("phone");
        content.dispatch_blur("phone");
        assert_eq!(sink.count("field_focus"), 1);
        assert_eq!(sink.count("field_blur"), 1);
    }

    #[test]
    fn test_nested_fields_in_containers() {
        let sink = Arc::new(RecordingSink::new());
        let content = Node::element(
            Element::new("form").with_child(
                Element::new("div")
                    .with_text("Name")
                    .with_child(Element::new("input").with_id("name"))
                    .with_child(Node::fragment([Element::new("select").with_name("course")])),
            ),
        );

        let content = instrument_fields(content, &context(&sink));
        content.dispatch_blur("name");
        content.dispatch_blur("course");

        let fields: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                AnalyticsEvent::FieldBlur { field, .. } => Some(field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["name".to_string(), "course".to_string()]);
    }

    #[test]
    fn test_anonymous_leaf_keeps_handler_unwrapped() {
        let sink = Arc::new(RecordingSink::new());
        let calls = Arc::new(Mutex::new(0));
        let calls_clone = calls.clone();

        let content = instrument_fields(
            Node::element(Element::new("button").on_focus(move |_| *calls_clone.lock() += 1)),
            &context(&sink),
        );

        let button = content.as_element().unwrap();
        button.dispatch(FieldEventKind::Focus);
        assert_eq!(*calls.lock(), 1);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_identified_field_children_are_not_walked() {
        let sink = Arc::new(RecordingSink::new());
        let content = instrument_fields(
            Node::element(
                Element::new("fieldset")
                    .with_id("address")
                    .with_child(Element::new("input").with_id("street")),
            ),
            &context(&sink),
        );

        content.dispatch_focus("street");
        assert!(sink.events().is_empty());

        content.dispatch_focus("address");
        assert_eq!(sink.count("field_focus"), 1);
    }
}
