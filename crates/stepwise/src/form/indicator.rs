//! Step indicator.
//!
//! [`StepIndicator`] is a pure function of the visible steps, the current
//! index and a display variant. It classifies each step as completed, current
//! or upcoming and renders them in list order, without filtering.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::step::StepDefinition;

/// The visual layout of a step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorVariant {
    /// Horizontal row of numbered steps with titles.
    #[default]
    Default,
    /// A dot strip followed by "Step N of M".
    Compact,
    /// One step per line, with descriptions.
    Vertical,
}

/// Where a step stands relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// Before the current step.
    Completed,
    /// The current step.
    Current,
    /// After the current step.
    Upcoming,
}

impl StepStatus {
    /// Classify the step at `index` given the current step.
    pub fn classify(index: usize, current_step: usize) -> Self {
        if index < current_step {
            Self::Completed
        } else if index == current_step {
            Self::Current
        } else {
            Self::Upcoming
        }
    }
}

/// One entry of a step indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorItem {
    /// Zero-based position among the visible steps.
    pub index: usize,
    /// The step title.
    pub title: String,
    /// The step description.
    pub description: Option<String>,
    /// The step's classification.
    pub status: StepStatus,
}

impl IndicatorItem {
    /// One-based display number.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// The progress display for a multi-step form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    items: Vec<IndicatorItem>,
    current_step: usize,
    variant: IndicatorVariant,
}

impl StepIndicator {
    /// Build an indicator for `steps` with `current_step` highlighted.
    pub fn new<'a, I>(steps: I, current_step: usize, variant: IndicatorVariant) -> Self
    where
        I: IntoIterator<Item = &'a StepDefinition>,
    {
        let items = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| IndicatorItem {
                index,
                title: step.title().to_string(),
                description: step.description().map(str::to_string),
                status: StepStatus::classify(index, current_step),
            })
            .collect();

        Self {
            items,
            current_step,
            variant,
        }
    }

    /// Get the entries, in step order.
    pub fn items(&self) -> &[IndicatorItem] {
        &self.items
    }

    /// Get the current step index.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Get the variant.
    pub fn variant(&self) -> IndicatorVariant {
        self.variant
    }

    /// Number of steps shown.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether there are no steps.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render as plain text in the configured variant.
    pub fn render_text(&self) -> String {
        match self.variant {
            IndicatorVariant::Default => self.render_default(),
            IndicatorVariant::Compact => self.render_compact(),
            IndicatorVariant::Vertical => self.render_vertical(),
        }
    }

    fn render_default(&self) -> String {
        self.items
            .iter()
            .map(|item| match item.status {
                StepStatus::Completed => format!("(✓) {}", item.title),
                StepStatus::Current => format!("[{}] {}", item.number(), item.title),
                StepStatus::Upcoming => format!("({}) {}", item.number(), item.title),
            })
            .collect::<Vec<_>>()
            .join(" ── ")
    }

    fn render_compact(&self) -> String {
        let Some(current) = self.items.get(self.current_step) else {
            return String::new();
        };
        let dots: String = self
            .items
            .iter()
            .map(|item| match item.status {
                StepStatus::Completed => '●',
                StepStatus::Current => '◉',
                StepStatus::Upcoming => '○',
            })
            .collect();
        format!(
            "{dots} Step {} of {}: {}",
            current.number(),
            self.items.len(),
            current.title
        )
    }

    fn render_vertical(&self) -> String {
        let mut lines = Vec::with_capacity(self.items.len() * 2);
        for item in &self.items {
            let marker = match item.status {
                StepStatus::Completed => '✓',
                StepStatus::Current => '▶',
                StepStatus::Upcoming => '○',
            };
            lines.push(format!("{marker} {}. {}", item.number(), item.title));
            if let Some(ref description) = item.description {
                lines.push(format!("     {description}"));
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for StepIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new(1, "Contact").with_description("Your details"),
            StepDefinition::new(2, "Course"),
            StepDefinition::new(3, "Schedule"),
            StepDefinition::new(4, "Review"),
        ]
    }

    #[test]
    fn test_classification() {
        let indicator = StepIndicator::new(&steps(), 1, IndicatorVariant::Default);
        let statuses: Vec<StepStatus> = indicator.items().iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Completed,
                StepStatus::Current,
                StepStatus::Upcoming,
                StepStatus::Upcoming
            ]
        );
        assert_eq!(indicator.len(), 4);
        assert_eq!(indicator.items()[2].number(), 3);
    }

    #[test]
    fn test_order_is_preserved() {
        let indicator = StepIndicator::new(&steps(), 0, IndicatorVariant::Vertical);
        let titles: Vec<&str> = indicator.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Contact", "Course", "Schedule", "Review"]);
    }

    #[test]
    fn test_render_default() {
        let indicator = StepIndicator::new(&steps(), 1, IndicatorVariant::Default);
        assert_eq!(
            indicator.render_text(),
            "(✓) Contact ── [2] Course ── (3) Schedule ── (4) Review"
        );
    }

    #[test]
    fn test_render_compact() {
        let indicator = StepIndicator::new(&steps(), 2, IndicatorVariant::Compact);
        assert_eq!(indicator.to_string(), "●●◉○ Step 3 of 4: Schedule");

        let empty = StepIndicator::new(&[], 0, IndicatorVariant::Compact);
        assert!(empty.is_empty());
        assert_eq!(empty.render_text(), "");
    }

    #[test]
    fn test_render_vertical() {
        let indicator = StepIndicator::new(&steps()[..2], 0, IndicatorVariant::Vertical);
        assert_eq!(
            indicator.render_text(),
            "▶ 1. Contact\n     Your details\n○ 2. Course"
        );
    }

    #[test]
    fn test_variant_names() {
        let variant: IndicatorVariant = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(variant, IndicatorVariant::Vertical);
        assert_eq!(IndicatorVariant::default(), IndicatorVariant::Default);
    }
}
