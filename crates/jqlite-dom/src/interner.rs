//! String Interner
//!
//! Tag names, attribute names, ids and class names repeat constantly in a
//! document. They are stored once and referenced by a 4-byte handle, which
//! also turns name comparisons during selector matching into integer
//! comparisons.

use std::collections::HashMap;

/// Interned string handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// String interner for deduplicating names
#[derive(Debug)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    map: HashMap<Box<str>, u32>,
}

impl StringInterner {
    /// Create an interner with the names the selector engine asks for most
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(128),
            map: HashMap::with_capacity(128),
        };

        interner.intern("");

        const COMMON: &[&str] = &[
            "html", "head", "body", "div", "span", "p", "a", "ul", "ol", "li",
            "table", "tr", "td", "form", "input", "select", "option", "textarea",
            "button", "h1", "h2", "h3", "h4", "h5", "h6",
            "id", "class", "style", "type", "name", "value", "href", "title",
            "disabled", "checked", "selected", "hidden",
        ];
        for name in COMMON {
            interner.intern(name);
        }

        interner
    }

    /// Intern a string, returning the existing handle if already present
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&idx) = self.map.get(s) {
            return InternedString(idx);
        }

        let idx = self.strings.len() as u32;
        self.strings.push(s.into());
        self.map.insert(s.into(), idx);
        InternedString(idx)
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&idx| InternedString(idx))
    }

    /// Get the string for a handle (empty for an unknown handle)
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.strings.get(id.0 as usize).map(|s| &**s).unwrap_or("")
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
