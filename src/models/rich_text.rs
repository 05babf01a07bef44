use serde::{Deserialize, Serialize};

/// A typed span of text inside a block.
///
/// Only the fields the locator and updaters care about are modeled. Notion
/// fills `plain_text` on reads; requests leave it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: RichTextKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<EquationContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RichTextKind {
    Text,
    Equation,
    Mention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationContent {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub underline: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            underline: false,
            color: default_color(),
        }
    }
}

impl RichText {
    /// A plain text run, optionally linked.
    pub fn text(content: impl Into<String>, link: Option<&str>) -> Self {
        Self {
            kind: RichTextKind::Text,
            plain_text: String::new(),
            text: Some(TextContent {
                content: content.into(),
                link: link.map(|url| Link {
                    url: url.to_string(),
                }),
            }),
            equation: None,
            annotations: None,
        }
    }

    /// An inline equation run.
    pub fn equation(expression: impl Into<String>) -> Self {
        Self {
            kind: RichTextKind::Equation,
            plain_text: String::new(),
            text: None,
            equation: Some(EquationContent {
                expression: expression.into(),
            }),
            annotations: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// The string this run contributes when a block's text is flattened.
    ///
    /// Equation runs contribute their expression; everything else its plain
    /// text, or the request-side `text.content` when `plain_text` is absent.
    pub fn flat_text(&self) -> &str {
        match self.kind {
            RichTextKind::Equation => self
                .equation
                .as_ref()
                .map(|eq| eq.expression.as_str())
                .unwrap_or(&self.plain_text),
            RichTextKind::Text | RichTextKind::Mention => {
                if !self.plain_text.is_empty() {
                    &self.plain_text
                } else {
                    self.text.as_ref().map(|t| t.content.as_str()).unwrap_or("")
                }
            }
        }
    }
}

/// Concatenate the flattened text of every run.
pub fn flatten(runs: &[RichText]) -> String {
    runs.iter().map(RichText::flat_text).collect()
}
