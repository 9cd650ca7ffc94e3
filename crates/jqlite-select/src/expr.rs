//! Expression table
//!
//! Every filter fragment is looked up by its prefix (`""`, `#`, `.`, `:`,
//! `@`, `[`) and name into a [`Predicate`]. Predicates are evaluated per
//! candidate with the candidate's index in the current set, so positional
//! pseudo-classes (`:eq`, `:odd`, `:last`) count within the set being
//! filtered, not within the DOM.

use jqlite_dom::{DomTree, NodeId};

use crate::engine::SelectorEngine;
use crate::grammar::Fragment;
use crate::SelectorError;

/// Test applied to an attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrTest {
    /// `[@a]` - present and non-empty
    Present,
    /// `[@a=v]`
    Equals(String),
    /// `[@a!=v]` - also true when the attribute is missing
    NotEquals(String),
    /// `[@a^=v]`
    StartsWith(String),
    /// `[@a$=v]`
    EndsWith(String),
    /// `[@a*=v]`
    Contains(String),
}

impl AttrTest {
    /// Look up an attribute operator
    pub fn from_operator(op: &str, value: &str) -> Result<Self, SelectorError> {
        let value = value.to_string();
        Ok(match op {
            "" => Self::Present,
            "=" => Self::Equals(value),
            "!=" => Self::NotEquals(value),
            "^=" => Self::StartsWith(value),
            "$=" => Self::EndsWith(value),
            "*=" => Self::Contains(value),
            other => {
                return Err(SelectorError::UnknownAttributeOperator { op: other.to_string() });
            }
        })
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (Self::NotEquals(expected), v) => v != Some(expected.as_str()),
            (_, None) => false,
            (Self::Present, Some(v)) => !v.is_empty(),
            (Self::Equals(expected), Some(v)) => v == expected,
            (Self::StartsWith(expected), Some(v)) => !v.is_empty() && v.starts_with(expected.as_str()),
            (Self::EndsWith(expected), Some(v)) => !v.is_empty() && v.ends_with(expected.as_str()),
            (Self::Contains(expected), Some(v)) => !v.is_empty() && v.contains(expected.as_str()),
        }
    }
}

/// Position test against the index within the candidate set.
///
/// `None` arguments come from non-numeric input and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Eq(Option<i64>),
    Lt(Option<i64>),
    Gt(Option<i64>),
    First,
    Last,
}

/// Parity of the index within the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

/// `:nth-child` argument, 0-based among element siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthChild {
    Even,
    Odd,
    Index(Option<usize>),
}

/// A compiled filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Tag name, `*` for any node
    Tag(String),
    Id(String),
    ClassHas(String),
    Attribute { name: String, test: AttrTest },
    /// `[selector]` - at least one descendant matches
    HasMatch(String),
    Position(Position),
    PositionParity(Parity),
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(NthChild),
    /// `:parent`
    HasChildren,
    Empty,
    Contains(String),
    Visible,
    Hidden,
    Enabled,
    Disabled,
    Checked,
    Selected,
    /// `:input`
    FormControl,
    /// `:text`, `:radio`, ...
    InputType(&'static str),
    Header,
}

/// What a predicate can see besides the node under test
pub struct MatchContext<'a, 'd> {
    pub engine: &'a SelectorEngine<'d>,
    /// The set being filtered
    pub candidates: &'a [NodeId],
}

impl Predicate {
    /// Look a fragment up in the expression table
    pub fn from_fragment(fragment: &Fragment) -> Result<Self, SelectorError> {
        match fragment {
            Fragment::Simple { prefix, name } => match prefix.as_str() {
                "" => Ok(Self::Tag(name.clone())),
                "#" => Ok(Self::Id(name.clone())),
                "." => Ok(Self::ClassHas(name.clone())),
                other => Err(SelectorError::UnknownPrefix { prefix: other.to_string() }),
            },
            Fragment::Attribute { name, op, value } => Ok(Self::Attribute {
                name: name.clone(),
                test: AttrTest::from_operator(op, value)?,
            }),
            Fragment::Nested(selector) => Ok(Self::HasMatch(selector.clone())),
            Fragment::Pseudo { name, arg } => Self::pseudo(name, arg.as_deref()),
        }
    }

    fn pseudo(name: &str, arg: Option<&str>) -> Result<Self, SelectorError> {
        let predicate = match name {
            "lt" => Self::Position(Position::Lt(numeric(arg))),
            "gt" => Self::Position(Position::Gt(numeric(arg))),
            "nth" | "eq" => Self::Position(Position::Eq(numeric(arg))),
            "first" => Self::Position(Position::First),
            "last" => Self::Position(Position::Last),
            "even" => Self::PositionParity(Parity::Even),
            "odd" => Self::PositionParity(Parity::Odd),

            "nth-child" => Self::NthChild(match arg.map(str::trim) {
                Some("even") => NthChild::Even,
                Some("odd") => NthChild::Odd,
                other => NthChild::Index(other.and_then(|s| s.parse().ok())),
            }),
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,

            "parent" => Self::HasChildren,
            "empty" => Self::Empty,
            "contains" => Self::Contains(arg.unwrap_or_default().to_string()),

            "visible" => Self::Visible,
            "hidden" => Self::Hidden,

            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "checked" => Self::Checked,
            "selected" => Self::Selected,

            "input" => Self::FormControl,
            "text" => Self::InputType("text"),
            "radio" => Self::InputType("radio"),
            "checkbox" => Self::InputType("checkbox"),
            "password" => Self::InputType("password"),
            "submit" => Self::InputType("submit"),
            "image" => Self::InputType("image"),
            "reset" => Self::InputType("reset"),
            "button" => Self::InputType("button"),
            "file" => Self::InputType("file"),
            "header" => Self::Header,

            other => return Err(SelectorError::UnknownPseudo { name: other.to_string() }),
        };
        Ok(predicate)
    }

    /// Evaluate against `node` at `index` within `ctx.candidates`
    pub fn matches(
        &self,
        ctx: &MatchContext<'_, '_>,
        node: NodeId,
        index: usize,
    ) -> Result<bool, SelectorError> {
        let tree = ctx.engine.document().tree();
        let i = index as i64;

        let matched = match self {
            Self::Tag(tag) => {
                tag == "*" || tree.tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
            }
            Self::Id(id) => tree.element_id(node).is_some_and(|v| !v.is_empty() && v == id),
            Self::ClassHas(class) => tree.has_class(node, class),
            Self::Attribute { name, test } => test.matches(tree.get_attribute(node, name)),
            Self::HasMatch(selector) => !ctx.engine.resolve(selector, Some(node))?.is_empty(),

            Self::Position(pos) => match pos {
                Position::Eq(n) => *n == Some(i),
                Position::Lt(n) => n.is_some_and(|n| i < n),
                Position::Gt(n) => n.is_some_and(|n| i > n),
                Position::First => index == 0,
                Position::Last => index + 1 == ctx.candidates.len(),
            },
            Self::PositionParity(Parity::Even) => index % 2 == 0,
            Self::PositionParity(Parity::Odd) => index % 2 == 1,

            Self::FirstChild => Siblings::of(tree, node).position == Some(0),
            Self::LastChild => Siblings::of(tree, node).is_last(),
            Self::OnlyChild => Siblings::of(tree, node).elements.len() == 1,
            Self::NthChild(nth) => {
                let position = Siblings::of(tree, node).position;
                match nth {
                    NthChild::Even => position.is_some_and(|n| n % 2 == 0),
                    NthChild::Odd => position.is_some_and(|n| n % 2 == 1),
                    NthChild::Index(n) => n.is_some() && position == *n,
                }
            }

            Self::HasChildren => tree.first_child(node).is_some(),
            Self::Empty => tree.first_child(node).is_none(),
            Self::Contains(text) => tree.text_content(node).contains(text.as_str()),

            Self::Visible => !is_hidden(tree, node),
            Self::Hidden => is_hidden(tree, node),

            Self::Enabled => !tree.has_attribute(node, "disabled"),
            Self::Disabled => tree.has_attribute(node, "disabled"),
            Self::Checked => tree.has_attribute(node, "checked"),
            Self::Selected => tree.has_attribute(node, "selected"),

            Self::FormControl => matches!(
                tree.tag_name(node),
                Some("input" | "select" | "textarea" | "button")
            ),
            Self::InputType(kind) => control_type(tree, node).as_deref() == Some(*kind),
            Self::Header => matches!(
                tree.tag_name(node),
                Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6")
            ),
        };
        Ok(matched)
    }
}

/// Positional argument: blank counts as 0, anything non-numeric never matches
fn numeric(arg: Option<&str>) -> Option<i64> {
    let arg = arg?.trim();
    if arg.is_empty() {
        Some(0)
    } else {
        arg.parse().ok()
    }
}

/// Element siblings of a node (itself included) and its position among
/// them
#[derive(Debug)]
pub struct Siblings {
    pub elements: Vec<NodeId>,
    pub position: Option<usize>,
}

impl Siblings {
    pub fn of(tree: &DomTree, node: NodeId) -> Self {
        let elements = tree.element_siblings(node);
        let position = elements.iter().position(|&e| e == node);
        Self { elements, position }
    }

    pub fn is_last(&self) -> bool {
        self.position.is_some_and(|n| n + 1 == self.elements.len())
    }
}

/// `type` as the DOM reports it, with the element defaults filled in
fn control_type(tree: &DomTree, node: NodeId) -> Option<String> {
    let declared = tree.get_attribute(node, "type").map(str::to_ascii_lowercase);
    match tree.tag_name(node)? {
        "input" => Some(declared.unwrap_or_else(|| "text".to_string())),
        "button" => Some(declared.unwrap_or_else(|| "submit".to_string())),
        _ => declared,
    }
}

/// Hidden inputs, the `hidden` attribute, and inline `display: none` or
/// `visibility: hidden`
fn is_hidden(tree: &DomTree, node: NodeId) -> bool {
    if tree.get_attribute(node, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        || tree.has_attribute(node, "hidden")
    {
        return true;
    }

    let Some(style) = tree.get_attribute(node, "style") else {
        return false;
    };
    style.split(';').any(|decl| {
        let Some((property, value)) = decl.split_once(':') else {
            return false;
        };
        let value = value.trim().to_ascii_lowercase();
        match property.trim().to_ascii_lowercase().as_str() {
            "display" => value == "none",
            "visibility" => value == "hidden",
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_operators() {
        let eq = AttrTest::from_operator("=", "a").unwrap();
        assert!(eq.matches(Some("a")));
        assert!(!eq.matches(None));

        let ne = AttrTest::from_operator("!=", "a").unwrap();
        assert!(ne.matches(None));
        assert!(ne.matches(Some("b")));
        assert!(!ne.matches(Some("a")));

        let suffix = AttrTest::from_operator("$=", ".pdf").unwrap();
        assert!(suffix.matches(Some("report.pdf")));
        assert!(!suffix.matches(Some("report.doc")));

        let present = AttrTest::from_operator("", "").unwrap();
        assert!(present.matches(Some("x")));
        assert!(!present.matches(Some("")));
    }

    #[test]
    fn test_unknown_operator_is_error() {
        let err = AttrTest::from_operator("~=", "a").unwrap_err();
        assert!(matches!(err, SelectorError::UnknownAttributeOperator { ref op } if op == "~="));
    }

    #[test]
    fn test_pseudo_table() {
        let frag = Fragment::Pseudo { name: "eq".into(), arg: Some("1".into()) };
        assert_eq!(
            Predicate::from_fragment(&frag).unwrap(),
            Predicate::Position(Position::Eq(Some(1)))
        );

        let frag = Fragment::Pseudo { name: "lt".into(), arg: Some("x".into()) };
        assert_eq!(
            Predicate::from_fragment(&frag).unwrap(),
            Predicate::Position(Position::Lt(None))
        );

        let frag = Fragment::Pseudo { name: "blink".into(), arg: None };
        assert!(matches!(
            Predicate::from_fragment(&frag),
            Err(SelectorError::UnknownPseudo { .. })
        ));
    }

    #[test]
    fn test_unknown_prefix() {
        let frag = Fragment::Simple { prefix: ".#".into(), name: "a".into() };
        assert!(matches!(
            Predicate::from_fragment(&frag),
            Err(SelectorError::UnknownPrefix { .. })
        ));
    }

    #[test]
    fn test_numeric_argument() {
        assert_eq!(numeric(Some(" 3 ")), Some(3));
        assert_eq!(numeric(Some("")), Some(0));
        assert_eq!(numeric(Some("two")), None);
        assert_eq!(numeric(None), None);
    }

    #[test]
    fn test_inline_style_hidden() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        assert!(!is_hidden(&tree, div));

        tree.set_attribute(div, "style", "color: red; DISPLAY : None");
        assert!(is_hidden(&tree, div));

        tree.set_attribute(div, "style", "visibility:hidden");
        assert!(is_hidden(&tree, div));
    }

    #[test]
    fn test_control_type_defaults() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let button = tree.create_element("button");
        assert_eq!(control_type(&tree, input).as_deref(), Some("text"));
        assert_eq!(control_type(&tree, button).as_deref(), Some("submit"));

        tree.set_attribute(input, "type", "CheckBox");
        assert_eq!(control_type(&tree, input).as_deref(), Some("checkbox"));
    }
}
