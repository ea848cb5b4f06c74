use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Position of a declaration in the Kconfig sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Source file, relative to the tree root.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl Location {
    /// Creates a location from a file name and line.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Value type of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    /// `n` or `y`.
    Bool,
    /// `n`, `m` or `y`.
    Tristate,
    /// Free-form text.
    String,
    /// Decimal integer.
    Int,
    /// Hexadecimal integer.
    Hex,
}

impl SymbolType {
    /// Whether the symbol takes one of the `n`/`m`/`y` values.
    pub fn is_tristate_like(self) -> bool {
        matches!(self, SymbolType::Bool | SymbolType::Tristate)
    }

    /// Lower-case type keyword, as spelled in Kconfig.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolType::Bool => "bool",
            SymbolType::Tristate => "tristate",
            SymbolType::String => "string",
            SymbolType::Int => "int",
            SymbolType::Hex => "hex",
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configurable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Symbol {
    /// Name without the `CONFIG_` prefix.
    pub name: String,
    /// Value type.
    #[serde(rename = "type")]
    pub sym_type: SymbolType,
    /// Current value. Empty means `n` for bool/tristate symbols.
    #[serde(default)]
    pub value: String,
    /// Where the symbol is declared, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Symbol {
    /// Creates a symbol with the given type and value.
    pub fn new(name: impl Into<String>, sym_type: SymbolType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sym_type,
            value: value.into(),
            location: None,
        }
    }

    /// Current value, with the empty value read as `n` for bool/tristate.
    pub fn value(&self) -> &str {
        if self.value.is_empty() && self.sym_type.is_tristate_like() {
            "n"
        } else {
            &self.value
        }
    }

    /// Whether this is a bool/tristate symbol set to `m` or `y`.
    pub fn is_active(&self) -> bool {
        self.sym_type.is_tristate_like() && matches!(self.value(), "m" | "y")
    }
}

/// A transparent grouping of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Menu {
    /// Menu title.
    pub title: String,
    /// Declaration site; part of the anchor identifier.
    pub location: Location,
    /// Child nodes in declaration order.
    #[serde(default)]
    pub children: Vec<ConfigNode>,
}

impl Menu {
    /// Creates an empty menu.
    pub fn new(title: impl Into<String>, location: Location) -> Self {
        Self {
            title: title.into(),
            location,
            children: Vec::new(),
        }
    }

    /// Appends children, builder style.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ConfigNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A group of mutually exclusive symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    /// Prompt shown for the choice.
    pub prompt: String,
    /// Declaration site; part of the anchor identifier.
    pub location: Location,
    /// Name of the active member, if set explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    /// Member symbols in declaration order.
    #[serde(default)]
    pub children: Vec<ConfigNode>,
}

impl Choice {
    /// Creates an empty choice.
    pub fn new(prompt: impl Into<String>, location: Location) -> Self {
        Self {
            prompt: prompt.into(),
            location,
            selection: None,
            children: Vec::new(),
        }
    }

    /// Appends member symbols, builder style.
    pub fn with_members(mut self, members: impl IntoIterator<Item = Symbol>) -> Self {
        self.children
            .extend(members.into_iter().map(ConfigNode::Symbol));
        self
    }

    /// Sets the explicit selection, builder style.
    pub fn with_selection(mut self, name: impl Into<String>) -> Self {
        self.selection = Some(name.into());
        self
    }

    /// Member symbols; non-symbol children are skipped.
    pub fn members(&self) -> impl Iterator<Item = &Symbol> {
        self.children.iter().filter_map(ConfigNode::as_symbol)
    }

    /// Name of the active member: the explicit selection, otherwise the
    /// first member whose value is `y`.
    pub fn selected_member(&self) -> Option<&str> {
        match &self.selection {
            Some(name) => Some(name.as_str()),
            None => self
                .members()
                .find(|s| s.value() == "y")
                .map(|s| s.name.as_str()),
        }
    }
}

/// Non-selectable annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    /// Comment text.
    pub text: String,
    /// Declaration site, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Comment {
    /// Creates a comment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }
}

/// One node of the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConfigNode {
    /// Leaf configurable item.
    Symbol(Symbol),
    /// Grouping subtree.
    Menu(Menu),
    /// Mutually exclusive group.
    Choice(Choice),
    /// Annotation.
    Comment(Comment),
}

impl ConfigNode {
    pub fn is_symbol(&self) -> bool {
        matches!(self, ConfigNode::Symbol(_))
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, ConfigNode::Menu(_))
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, ConfigNode::Choice(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, ConfigNode::Comment(_))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            ConfigNode::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Lower-case kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigNode::Symbol(_) => "symbol",
            ConfigNode::Menu(_) => "menu",
            ConfigNode::Choice(_) => "choice",
            ConfigNode::Comment(_) => "comment",
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[ConfigNode] {
        match self {
            ConfigNode::Menu(m) => &m.children,
            ConfigNode::Choice(c) => &c.children,
            ConfigNode::Symbol(_) | ConfigNode::Comment(_) => &[],
        }
    }
}

impl From<Symbol> for ConfigNode {
    fn from(value: Symbol) -> Self {
        ConfigNode::Symbol(value)
    }
}

impl From<Menu> for ConfigNode {
    fn from(value: Menu) -> Self {
        ConfigNode::Menu(value)
    }
}

impl From<Choice> for ConfigNode {
    fn from(value: Choice) -> Self {
        ConfigNode::Choice(value)
    }
}

impl From<Comment> for ConfigNode {
    fn from(value: Comment) -> Self {
        ConfigNode::Comment(value)
    }
}
