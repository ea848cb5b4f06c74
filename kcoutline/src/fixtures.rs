//! Small trees shared by the unit tests.

use crate::data::{Choice, ConfigNode, Location, Menu, Symbol, SymbolType};

pub(crate) fn sym(name: &str, ty: SymbolType, value: &str) -> ConfigNode {
    ConfigNode::Symbol(Symbol::new(name, ty, value))
}

pub(crate) fn bool_sym(name: &str, value: &str) -> ConfigNode {
    sym(name, SymbolType::Bool, value)
}

pub(crate) fn menu(title: &str, line: u32, children: Vec<ConfigNode>) -> ConfigNode {
    ConfigNode::Menu(Menu::new(title, Location::new("Kconfig", line)).with_children(children))
}

pub(crate) fn choice(prompt: &str, line: u32, members: Vec<Symbol>) -> ConfigNode {
    ConfigNode::Choice(Choice::new(prompt, Location::new("Kconfig", line)).with_members(members))
}

/// Menu `A` holding `X=y` and choice `C` with members `C1=y`, `C2=n`.
pub(crate) fn scenario() -> Vec<ConfigNode> {
    vec![menu(
        "A",
        1,
        vec![
            bool_sym("X", "y"),
            choice(
                "C",
                5,
                vec![
                    Symbol::new("C1", SymbolType::Bool, "y"),
                    Symbol::new("C2", SymbolType::Bool, "n"),
                ],
            ),
        ],
    )]
}
