//! Recursive visitor over the configuration tree.
//!
//! [`TreeWalker`] dispatches every node to one handler per kind. Menus and
//! choices open a *subtree scope*: [`TreeWalker::make_subtree`] creates the
//! scope from its parent, the children are walked into it, and the finished
//! scope is handed back to the handler so it can fold the results into the
//! parent. Implementors override a handler and call [`TreeWalker::descend`]
//! (or the counting helpers) first, then add their own side effects.

use std::ops::Deref;

use crate::{
    data::{Choice, Comment, ConfigModel, ConfigNode, Location, Menu, Symbol},
    error::{Error, Result},
};

/// Kind of node that opens a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtreeKind {
    Menu,
    Choice,
}

impl SubtreeKind {
    /// Lower-case kind name, also used as CSS class and anchor prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            SubtreeKind::Menu => "menu",
            SubtreeKind::Choice => "choice",
        }
    }
}

/// A menu or choice being descended into.
#[derive(Debug, Clone, Copy)]
pub enum Subtree<'a> {
    Menu(&'a Menu),
    Choice(&'a Choice),
}

impl<'a> Subtree<'a> {
    pub fn kind(self) -> SubtreeKind {
        match self {
            Subtree::Menu(_) => SubtreeKind::Menu,
            Subtree::Choice(_) => SubtreeKind::Choice,
        }
    }

    /// Menu title or choice prompt.
    pub fn title(self) -> &'a str {
        match self {
            Subtree::Menu(m) => &m.title,
            Subtree::Choice(c) => &c.prompt,
        }
    }

    pub fn location(self) -> &'a Location {
        match self {
            Subtree::Menu(m) => &m.location,
            Subtree::Choice(c) => &c.location,
        }
    }

    pub fn children(self) -> &'a [ConfigNode] {
        match self {
            Subtree::Menu(m) => &m.children,
            Subtree::Choice(c) => &c.children,
        }
    }

    /// The choice owning the children, if this subtree is a choice.
    pub fn as_choice(self) -> Option<&'a Choice> {
        match self {
            Subtree::Menu(_) => None,
            Subtree::Choice(c) => Some(c),
        }
    }

    /// Anchor identifier: kind plus declaration site, e.g.
    /// `menu-init/Kconfig:700`.
    ///
    /// Unique as long as no two subtrees of the same kind share a
    /// location; renderers must still reject duplicates.
    pub fn anchor_id(self) -> String {
        format!("{}-{}", self.kind().as_str(), self.location())
    }
}

/// A symbol seen together with the choice that owns it.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRef<'a> {
    /// The symbol itself.
    pub symbol: &'a Symbol,
    /// Enclosing choice when the symbol is a choice member.
    pub choice: Option<&'a Choice>,
}

impl SymbolRef<'_> {
    pub fn is_choice_member(&self) -> bool {
        self.choice.is_some()
    }

    /// Whether this member is the active selection of its choice.
    pub fn is_choice_selection(&self) -> bool {
        self.choice
            .and_then(Choice::selected_member)
            .is_some_and(|name| name == self.symbol.name)
    }
}

impl Deref for SymbolRef<'_> {
    type Target = Symbol;

    fn deref(&self) -> &Self::Target {
        self.symbol
    }
}

/// Visitor over [`ConfigNode`]s in document order.
///
/// Every node is visited exactly once, depth first, children in
/// declaration order.
pub trait TreeWalker {
    /// State owned by one menu/choice subtree while it is being walked.
    type Scope;

    /// Creates the scope for `subtree`, entered from `parent`.
    fn make_subtree(&mut self, parent: &Self::Scope, subtree: Subtree<'_>) -> Result<Self::Scope>;

    fn on_symbol(&mut self, _scope: &mut Self::Scope, _symbol: SymbolRef<'_>) -> Result<()> {
        Ok(())
    }

    fn on_comment(&mut self, _scope: &mut Self::Scope, _comment: &Comment) -> Result<()> {
        Ok(())
    }

    /// Walks the menu's children into a fresh scope and returns it.
    fn on_menu(&mut self, scope: &mut Self::Scope, menu: &Menu) -> Result<Self::Scope> {
        self.descend(scope, Subtree::Menu(menu))
    }

    /// Walks the choice's members into a fresh scope and returns it.
    fn on_choice(&mut self, scope: &mut Self::Scope, choice: &Choice) -> Result<Self::Scope> {
        self.descend(scope, Subtree::Choice(choice))
    }

    /// Opens a subtree scope and walks all children of `subtree` into it.
    fn descend(&mut self, parent: &Self::Scope, subtree: Subtree<'_>) -> Result<Self::Scope> {
        let mut scope = self.make_subtree(parent, subtree)?;
        self.traverse_items(&mut scope, subtree.children(), subtree.as_choice())?;
        Ok(scope)
    }

    /// Walks a sibling list. `choice` is the owner when the siblings are
    /// choice members.
    fn traverse_items(
        &mut self,
        scope: &mut Self::Scope,
        nodes: &[ConfigNode],
        choice: Option<&Choice>,
    ) -> Result<()> {
        walk_items(self, scope, nodes, choice)
    }
}

/// Default sibling walk, for implementors that override
/// [`TreeWalker::traverse_items`] and still need the plain behavior.
pub fn walk_items<W: TreeWalker + ?Sized>(
    walker: &mut W,
    scope: &mut W::Scope,
    nodes: &[ConfigNode],
    choice: Option<&Choice>,
) -> Result<()> {
    for node in nodes {
        traverse(walker, scope, node, choice)?;
    }
    Ok(())
}

/// Validates `node` and dispatches it to the matching handler.
pub fn traverse<W: TreeWalker + ?Sized>(
    walker: &mut W,
    scope: &mut W::Scope,
    node: &ConfigNode,
    choice: Option<&Choice>,
) -> Result<()> {
    if let Some(owner) = choice
        && !node.is_symbol()
    {
        return Err(Error::ChoiceChild {
            choice: owner.prompt.clone(),
            location: owner.location.clone(),
            kind: node.kind(),
        });
    }

    match node {
        ConfigNode::Symbol(symbol) => {
            check_symbol(symbol)?;
            walker.on_symbol(scope, SymbolRef { symbol, choice })
        }
        ConfigNode::Menu(menu) => walker.on_menu(scope, menu).map(drop),
        ConfigNode::Choice(choice) => {
            check_choice(choice)?;
            walker.on_choice(scope, choice).map(drop)
        }
        ConfigNode::Comment(comment) => walker.on_comment(scope, comment),
    }
}

/// Walks every top-level node of `model` into `root` and returns it.
pub fn walk_model<W, M>(walker: &mut W, mut root: W::Scope, model: &M) -> Result<W::Scope>
where
    W: TreeWalker + ?Sized,
    M: ConfigModel + ?Sized,
{
    walker.traverse_items(&mut root, model.top_level(), None)?;
    Ok(root)
}

fn check_symbol(symbol: &Symbol) -> Result<()> {
    if symbol.name.is_empty() {
        let at = symbol
            .location
            .as_ref()
            .map_or_else(|| "an unknown location".to_string(), Location::to_string);
        return Err(Error::MissingName(at));
    }
    if symbol.sym_type.is_tristate_like() && !matches!(symbol.value(), "n" | "m" | "y") {
        return Err(Error::InvalidValue {
            name: symbol.name.clone(),
            ty: symbol.sym_type.as_str(),
            value: symbol.value.clone(),
        });
    }
    Ok(())
}

fn check_choice(choice: &Choice) -> Result<()> {
    if let Some(selection) = &choice.selection
        && !choice.members().any(|m| &m.name == selection)
    {
        return Err(Error::UnknownSelection {
            choice: choice.prompt.clone(),
            location: choice.location.clone(),
            selection: selection.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SymbolType;
    use crate::fixtures::{bool_sym, choice, menu, scenario};

    /// Records the order handlers fire in.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TreeWalker for Recorder {
        type Scope = usize;

        fn make_subtree(&mut self, parent: &usize, subtree: Subtree<'_>) -> Result<usize> {
            self.events.push(format!("enter {}", subtree.title()));
            Ok(parent + 1)
        }

        fn on_symbol(&mut self, depth: &mut usize, symbol: SymbolRef<'_>) -> Result<()> {
            let tag = if symbol.is_choice_selection() {
                " (selected)"
            } else if symbol.is_choice_member() {
                " (member)"
            } else {
                ""
            };
            self.events.push(format!("{depth}: {}{tag}", symbol.name));
            Ok(())
        }

        fn on_comment(&mut self, depth: &mut usize, comment: &Comment) -> Result<()> {
            self.events.push(format!("{depth}: # {}", comment.text));
            Ok(())
        }
    }

    #[test]
    fn test_document_order_dispatch() {
        let mut nodes = scenario();
        nodes.push(ConfigNode::Comment(Comment::new("tail")));
        let mut rec = Recorder::default();
        let depth = walk_model(&mut rec, 0, &nodes).unwrap();
        assert_eq!(depth, 0);
        assert_eq!(
            rec.events,
            [
                "enter A",
                "1: X",
                "enter C",
                "2: C1 (selected)",
                "2: C2 (member)",
                "0: # tail",
            ]
        );
    }

    #[test]
    fn test_choice_with_menu_child_fails() {
        let mut bad = Choice::new("Bad", Location::new("Kconfig", 9));
        bad.children.push(menu("Nested", 10, vec![]));
        let nodes = vec![ConfigNode::Choice(bad)];
        let err = walk_model(&mut Recorder::default(), 0, &nodes).unwrap_err();
        assert!(matches!(err, Error::ChoiceChild { kind: "menu", .. }));
    }

    #[test]
    fn test_invalid_tristate_value_fails() {
        let nodes = vec![bool_sym("DEBUG", "yes")];
        let err = walk_model(&mut Recorder::default(), 0, &nodes).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref name, .. } if name == "DEBUG"));
    }

    #[test]
    fn test_unknown_selection_fails() {
        let ConfigNode::Choice(c) = choice(
            "Mode",
            4,
            vec![Symbol::new("FAST", SymbolType::Bool, "y")],
        ) else {
            unreachable!()
        };
        let nodes = vec![ConfigNode::Choice(c.with_selection("SLOW"))];
        let err = walk_model(&mut Recorder::default(), 0, &nodes).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownSelection { ref selection, .. } if selection == "SLOW"
        ));
    }

    #[test]
    fn test_missing_name_fails() {
        let nodes = vec![ConfigNode::Symbol(Symbol::new("", SymbolType::Int, "3"))];
        let err = walk_model(&mut Recorder::default(), 0, &nodes).unwrap_err();
        assert!(matches!(err, Error::MissingName(_)));
    }

    #[test]
    fn test_anchor_id() {
        let m = Menu::new("Drivers", Location::new("drivers/Kconfig", 2));
        assert_eq!(Subtree::Menu(&m).anchor_id(), "menu-drivers/Kconfig:2");
    }
}
