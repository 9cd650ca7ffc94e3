//! Filter fragment grammar
//!
//! Four anchored patterns, tried in order:
//! - `[@attr op 'value']`
//! - `[selector]`
//! - `:name(arg)`
//! - `([:.#]*)name` (tag, `#id`, `.class`, `:pseudo`)

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Name production shared by every pattern
const NAME: &str = r"([a-z0-9*_-]+)";

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^\[ *@{NAME} *([!*$^=]*) *(?:'([^']*)'|"([^"]*)"|([^\]]*?)) *\]"#
    ))
});

static NESTED: LazyLock<Regex> = LazyLock::new(|| compile(r"^\[\s*(.*?)\s*\]"));

static PSEUDO_ARG: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r#"^:{NAME}\((?:"([^"]*)"|'([^']*)'|((?:[^()]|\([^()]*\))*))\)"#
    ))
});

static SIMPLE: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"^([:.#]*){NAME}")));

/// Characters that can start a filter fragment
static FILTER_START: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-z\[({<*:.#]"));

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("fragment pattern is valid")
}

/// One parsed filter fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// `[@name op value]`
    Attribute { name: String, op: String, value: String },
    /// `[selector]`
    Nested(String),
    /// `:name` or `:name(arg)`
    Pseudo { name: String, arg: Option<String> },
    /// `name`, `#name`, `.name`, or an unrecognised prefix run
    Simple { prefix: String, name: String },
}

/// Check whether `text` still looks like a filter expression
pub fn starts_filter(text: &str) -> bool {
    FILTER_START.is_match(text)
}

/// Parse the fragment at the head of `text`, returning it with the number
/// of bytes consumed
pub fn next_fragment(text: &str) -> Option<(Fragment, usize)> {
    if let Some(caps) = ATTRIBUTE.captures(text) {
        let value = first_group(&caps, &[3, 4, 5]);
        let fragment = Fragment::Attribute {
            name: group(&caps, 1),
            op: group(&caps, 2),
            value,
        };
        return Some((fragment, consumed(&caps)));
    }
    if let Some(caps) = NESTED.captures(text) {
        return Some((Fragment::Nested(group(&caps, 1)), consumed(&caps)));
    }
    if let Some(caps) = PSEUDO_ARG.captures(text) {
        let fragment = Fragment::Pseudo {
            name: group(&caps, 1),
            arg: Some(first_group(&caps, &[2, 3, 4])),
        };
        return Some((fragment, consumed(&caps)));
    }
    if let Some(caps) = SIMPLE.captures(text) {
        let prefix = group(&caps, 1);
        let name = group(&caps, 2);
        let fragment = if prefix == ":" {
            Fragment::Pseudo { name, arg: None }
        } else {
            Fragment::Simple { prefix, name }
        };
        return Some((fragment, consumed(&caps)));
    }
    None
}

fn group(caps: &Captures<'_>, i: usize) -> String {
    caps.get(i).map_or_else(String::new, |m| m.as_str().to_string())
}

fn first_group(caps: &Captures<'_>, indices: &[usize]) -> String {
    indices
        .iter()
        .find_map(|&i| caps.get(i))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

fn consumed(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.end())
}
