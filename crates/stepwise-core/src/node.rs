//! Render tree for step content.
//!
//! Step content is an opaque tree of [`Node`]s as far as the form engine is
//! concerned. The only consumer that looks inside is the field
//! instrumentation pass, and it does so through the [`RenderNode`]
//! capability trait rather than through `Node` itself, so any UI backend can
//! plug its own node type in.
//!
//! # Example
//!
//! ```
//! use stepwise_core::node::{Element, Node};
//!
//! let content = Node::element(
//!     Element::new("fieldset")
//!         .with_child(Element::new("label").with_text("Email"))
//!         .with_child(Element::new("input").with_id("email").on_blur(|event| {
//!             println!("left {:?}", event.target);
//!         })),
//! );
//!
//! assert!(content.find_field("email").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// The kind of field interaction being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEventKind {
    /// The field gained focus.
    Focus,
    /// The field lost focus.
    Blur,
}

/// A focus or blur event delivered to a field's handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEvent {
    /// The kind of interaction.
    pub kind: FieldEventKind,
    /// The resolved identity of the field (`id`, else `name`).
    pub target: Option<String>,
    /// The field's current `value` attribute, if any.
    pub value: Option<String>,
}

impl FieldEvent {
    /// Create an event for `target`.
    pub fn new(kind: FieldEventKind, target: Option<String>) -> Self {
        Self {
            kind,
            target,
            value: None,
        }
    }

    /// Attach the field value using builder pattern.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A focus or blur handler.
pub type Handler = Arc<dyn Fn(&FieldEvent) + Send + Sync>;

/// The interaction handlers attached to an element.
#[derive(Clone, Default)]
pub struct EventHandlers {
    on_focus: Option<Handler>,
    on_blur: Option<Handler>,
}

impl EventHandlers {
    /// Get the handler registered for `kind`.
    pub fn get(&self, kind: FieldEventKind) -> Option<&Handler> {
        match kind {
            FieldEventKind::Focus => self.on_focus.as_ref(),
            FieldEventKind::Blur => self.on_blur.as_ref(),
        }
    }

    /// Replace the handler for `kind`.
    pub fn set(&mut self, kind: FieldEventKind, handler: Option<Handler>) {
        match kind {
            FieldEventKind::Focus => self.on_focus = handler,
            FieldEventKind::Blur => self.on_blur = handler,
        }
    }

    /// Remove and return the handler for `kind`.
    pub fn take(&mut self, kind: FieldEventKind) -> Option<Handler> {
        match kind {
            FieldEventKind::Focus => self.on_focus.take(),
            FieldEventKind::Blur => self.on_blur.take(),
        }
    }

    /// Invoke the handler matching the event kind, if any.
    pub fn dispatch(&self, event: &FieldEvent) {
        if let Some(handler) = self.get(event.kind) {
            handler(event);
        }
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("has_on_focus", &self.on_focus.is_some())
            .field("has_on_blur", &self.on_blur.is_some())
            .finish()
    }
}

/// An element in the render tree.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    id: Option<String>,
    name: Option<String>,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
    handlers: EventHandlers,
}

impl Element {
    /// Create an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            name: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
            handlers: EventHandlers::default(),
        }
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the `id` using builder pattern.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the `name` using builder pattern.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set an attribute using builder pattern.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a child using builder pattern.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children using builder pattern.
    pub fn with_children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child using builder pattern.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Set the focus handler using builder pattern.
    pub fn on_focus<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FieldEvent) + Send + Sync + 'static,
    {
        self.handlers.set(FieldEventKind::Focus, Some(Arc::new(handler)));
        self
    }

    /// Set the blur handler using builder pattern.
    pub fn on_blur<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FieldEvent) + Send + Sync + 'static,
    {
        self.handlers.set(FieldEventKind::Blur, Some(Arc::new(handler)));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the `id`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Get the `name`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Get the children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Get the handlers.
    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    /// Get the field identity: a non-empty `id`, else a non-empty `name`.
    pub fn field_identity(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.name.as_deref().filter(|name| !name.is_empty()))
    }

    /// Dispatch a focus or blur event to this element's handlers.
    pub fn dispatch(&self, kind: FieldEventKind) {
        let mut event = FieldEvent::new(kind, self.field_identity().map(str::to_string));
        if let Some(value) = self.attribute("value") {
            event = event.with_value(value);
        }
        self.handlers.dispatch(&event);
    }
}

/// A node in the render tree.
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Nothing is rendered.
    #[default]
    Empty,
    /// Plain text.
    Text(String),
    /// An element with attributes, handlers and children.
    Element(Element),
    /// A group of sibling nodes without a wrapping element.
    Fragment(Vec<Node>),
}

impl Node {
    /// Wrap an element.
    pub fn element(element: Element) -> Self {
        Self::Element(element)
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a fragment.
    pub fn fragment<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self::Fragment(nodes.into_iter().map(Into::into).collect())
    }

    /// Get the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Find the first element (depth-first) whose field identity is `field`.
    pub fn find_field(&self, field: &str) -> Option<&Element> {
        match self {
            Self::Element(element) => {
                if element.field_identity() == Some(field) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find_field(field))
            }
            Self::Fragment(nodes) => nodes.iter().find_map(|c| c.find_field(field)),
            Self::Empty | Self::Text(_) => None,
        }
    }

    /// Simulate focus on the field named `field`.
    ///
    /// Returns `false` if no such field exists.
    pub fn dispatch_focus(&self, field: &str) -> bool {
        self.dispatch_to(field, FieldEventKind::Focus)
    }

    /// Simulate blur on the field named `field`.
    ///
    /// Returns `false` if no such field exists.
    pub fn dispatch_blur(&self, field: &str) -> bool {
        self.dispatch_to(field, FieldEventKind::Blur)
    }

    fn dispatch_to(&self, field: &str, kind: FieldEventKind) -> bool {
        match self.find_field(field) {
            Some(element) => {
                element.dispatch(kind);
                true
            }
            None => false,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// The capabilities a render node exposes to tree visitors.
///
/// Implement this for a UI backend's node type to make it instrumentable.
pub trait RenderNode: Sized {
    /// Whether this node is a real element (as opposed to text or nothing).
    fn is_element(&self) -> bool;

    /// The identity used to report this node as a field, if it has one.
    fn field_identity(&self) -> Option<&str>;

    /// Mutable access to this node's interaction handlers.
    fn handlers_mut(&mut self) -> Option<&mut EventHandlers>;

    /// Mutable access to this node's children.
    fn children_mut(&mut self) -> &mut [Self];
}

impl RenderNode for Node {
    fn is_element(&self) -> bool {
        matches!(self, Self::Element(_) | Self::Fragment(_))
    }

    fn field_identity(&self) -> Option<&str> {
        match self {
            Self::Element(element) => element.field_identity(),
            _ => None,
        }
    }

    fn handlers_mut(&mut self) -> Option<&mut EventHandlers> {
        match self {
            Self::Element(element) => Some(&mut element.handlers),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> &mut [Self] {
        match self {
            Self::Element(element) => &mut element.children,
            Self::Fragment(nodes) => nodes,
            Self::Empty | Self::Text(_) => Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_field_identity_prefers_id() {
        let both = Element::new("input").with_id("email").with_name("user_email");
        assert_eq!(both.field_identity(), Some("email"));

        let name_only = Element::new("input").with_name("phone");
        assert_eq!(name_only.field_identity(), Some("phone"));

        let empty_id = Element::new("input").with_id("").with_name("zip");
        assert_eq!(empty_id.field_identity(), Some("zip"));

        assert_eq!(Element::new("div").field_identity(), None);
    }

    #[test]
    fn test_find_field_depth_first() {
        let tree = Node::fragment([
            Node::text("intro"),
            Element::new("div")
                .with_child(Element::new("input").with_name("first").with_attr("value", "a"))
                .into(),
            Element::new("input").with_name("first").with_attr("value", "b").into(),
        ]);

        let found = tree.find_field("first").unwrap();
        assert_eq!(found.attribute("value"), Some("a"));
        assert!(tree.find_field("missing").is_none());
    }

    #[test]
    fn test_dispatch_carries_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let tree = Node::element(
            Element::new("input")
                .with_id("email")
                .with_attr("value", "ada@example.com")
                .on_blur(move |event| seen_clone.lock().push(event.clone())),
        );

        assert!(tree.dispatch_blur("email"));
        assert!(tree.dispatch_focus("email"));
        assert!(!tree.dispatch_blur("nope"));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, FieldEventKind::Blur);
        assert_eq!(seen[0].target.as_deref(), Some("email"));
        assert_eq!(seen[0].value.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_render_node_children() {
        let mut text = Node::text("plain");
        assert!(!text.is_element());
        assert!(text.children_mut().is_empty());
        assert!(text.handlers_mut().is_none());

        let mut group = Node::fragment([Node::Empty, Node::text("x")]);
        assert!(group.is_element());
        assert_eq!(group.children_mut().len(), 2);
    }
}
