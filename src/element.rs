// src/element.rs

//! The renderable node kinds a page is made of.
//!
//! Every element turns into a plain text fragment. Rendering is pure apart
//! from `Line`, whose length follows the terminal width captured in the
//! `RenderContext` at render time.

use serde_json::{Map, Value};

use crate::error::ElementError;

/// Terminal facts an element may need while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Current terminal width in character cells.
    pub columns: u16,
}

impl RenderContext {
    pub fn new(columns: u16) -> Self {
        Self { columns }
    }
}

/// Verbatim text, optionally carrying an attribute mapping.
///
/// Attributes are kept with the element but have no effect on the output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    text: String,
    attributes: Map<String, Value>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builds a label from `[text]` or `[text, {attributes}]`.
    pub fn from_args(args: &[Value]) -> Result<Self, ElementError> {
        text_with_attributes("label", args)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn render(&self) -> String {
        self.text.clone()
    }
}

/// A label followed by a line break.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Para {
    label: Label,
}

impl Para {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            label: Label::new(text),
        }
    }

    pub fn from_args(args: &[Value]) -> Result<Self, ElementError> {
        text_with_attributes("para", args).map(|label| Self { label })
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn render(&self) -> String {
        let mut text = self.label.render();
        text.push('\n');
        text
    }
}

/// A horizontal rule spanning the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    fill: char,
}

impl Line {
    /// Only the last character of `fill` is used.
    pub fn new(fill: &str) -> Result<Self, ElementError> {
        fill.chars()
            .last()
            .map(|fill| Self { fill })
            .ok_or(ElementError::EmptyFill)
    }

    pub fn from_args(args: &[Value]) -> Result<Self, ElementError> {
        match args {
            [Value::String(fill)] => Self::new(fill),
            [_] => Err(ElementError::ArgumentType {
                tag: "line",
                position: 1,
                expected: "a string",
            }),
            _ => Err(ElementError::Arity {
                tag: "line",
                expected: "1",
                got: args.len(),
            }),
        }
    }

    pub fn fill(&self) -> char {
        self.fill
    }

    pub fn render(&self, ctx: &RenderContext) -> String {
        std::iter::repeat(self.fill)
            .take(ctx.columns as usize)
            .collect()
    }
}

/// A node of a page after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Label(Label),
    Para(Para),
    Line(Line),
    NewLine,
    /// Renders nothing. Stands in for any node that failed to decode.
    Nothing,
}

impl Element {
    pub fn new_line_from_args(args: &[Value]) -> Result<Self, ElementError> {
        if args.is_empty() {
            Ok(Element::NewLine)
        } else {
            Err(ElementError::Arity {
                tag: "nl",
                expected: "0",
                got: args.len(),
            })
        }
    }

    pub fn render(&self, ctx: &RenderContext) -> String {
        match self {
            Element::Label(label) => label.render(),
            Element::Para(para) => para.render(),
            Element::Line(line) => line.render(ctx),
            Element::NewLine => "\n".to_string(),
            Element::Nothing => String::new(),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Element::Nothing)
    }
}

fn text_with_attributes(tag: &'static str, args: &[Value]) -> Result<Label, ElementError> {
    let (text, attributes) = match args {
        [text] => (text, None),
        [text, attributes] => (text, Some(attributes)),
        _ => {
            return Err(ElementError::Arity {
                tag,
                expected: "1 or 2",
                got: args.len(),
            })
        }
    };

    let text = text.as_str().ok_or(ElementError::ArgumentType {
        tag,
        position: 1,
        expected: "a string",
    })?;

    let label = Label::new(text);
    match attributes {
        None => Ok(label),
        Some(Value::Object(map)) => Ok(label.with_attributes(map.clone())),
        Some(_) => Err(ElementError::ArgumentType {
            tag,
            position: 2,
            expected: "an attribute mapping",
        }),
    }
}
