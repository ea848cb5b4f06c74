//! Interactive HTML outline renderer.
//!
//! [`HtmlRenderer`] walks the tree with the counting rules of
//! [`crate::count`] and writes one nested `<ul>`/`<li>` fragment per node:
//!
//! - symbols become disabled checkboxes (bool/tristate), radio buttons
//!   (choice members, grouped per choice) or read-only text fields, each
//!   preceded by the absolute `selected/total` counter at that point;
//! - menus and choices become a toggle checkbox, a `Title [selected/count]`
//!   label and the nested child list; the toggle starts checked when the
//!   subtree holds any active selection and carries its totals as
//!   `data-*` attributes for the navigation runtime;
//! - comments become plain list items.
//!
//! The output is XML-compatible so it can be loaded back with
//! [`crate::nav::Document`].

use std::collections::HashSet;

use crate::{
    count::SubtreeCount,
    data::{Choice, Comment, ConfigModel, ConfigNode, Menu},
    error::{Error, Result},
    walker::{Subtree, SymbolRef, TreeWalker, walk_items, walk_model},
};

/// Markup buffer and scoped element guard.
pub mod markup;

/// Page template around the outline.
pub mod page;

pub use markup::{Markup, Tag};
pub use page::PageOptions;

/// Class shared by every menu and choice toggle.
pub const SUBTREE_CLASS: &str = "subtree";

/// Class of every symbol control.
pub const SYMBOL_CLASS: &str = "symbol";

/// Per-subtree render state: counters plus the subtree's own markup.
#[derive(Debug, Default)]
pub struct RenderScope {
    /// Counters of this subtree.
    pub counts: SubtreeCount,
    /// Markup of the children rendered so far.
    pub markup: Markup,
    anchor: Option<String>,
}

impl RenderScope {
    /// Anchor of the menu/choice owning this scope; `None` at the root.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }
}

impl AsMut<Markup> for RenderScope {
    fn as_mut(&mut self) -> &mut Markup {
        &mut self.markup
    }
}

/// Tree walker producing the outline markup.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    anchors: HashSet<String>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the `<li>` of a finished subtree into its parent scope.
    ///
    /// Choices are preceded by the parent's running counter, like symbols.
    fn write_subtree(
        parent: &mut RenderScope,
        subtree: Subtree<'_>,
        child: &mut RenderScope,
    ) {
        let anchor = child.anchor.as_deref().unwrap_or_default();
        let counts = child.counts;
        let kind = subtree.kind().as_str();
        let counter = subtree.as_choice().map(|_| parent.counts.running_counter());

        let mut li = Tag::open(parent, "li");
        let m = &mut li.markup;
        if let Some(counter) = counter {
            m.text(&counter);
        }
        m.raw("<input")
            .attr("type", "checkbox")
            .attr("id", anchor)
            .attr("class", &format!("{kind} {SUBTREE_CLASS}"))
            .attr("data-label", subtree.title())
            .attr("data-selected-count", &counts.selected_count.to_string())
            .attr("data-count", &counts.count.to_string());
        if counts.selected_count > 0 {
            m.flag("checked");
        }
        m.raw("/><label")
            .attr("for", anchor)
            .raw(">")
            .text(&format!(
                "{} [{}/{}]",
                subtree.title(),
                counts.selected_count,
                counts.count
            ))
            .raw("</label>\n");
        m.append(std::mem::take(&mut child.markup));
    }
}

impl TreeWalker for HtmlRenderer {
    type Scope = RenderScope;

    fn make_subtree(
        &mut self,
        parent: &RenderScope,
        subtree: Subtree<'_>,
    ) -> Result<RenderScope> {
        let anchor = subtree.anchor_id();
        if !self.anchors.insert(anchor.clone()) {
            return Err(Error::DuplicateAnchor(anchor));
        }
        debug!("rendering {anchor}");
        Ok(RenderScope {
            counts: parent.counts.child(),
            markup: Markup::new(),
            anchor: Some(anchor),
        })
    }

    fn traverse_items(
        &mut self,
        scope: &mut RenderScope,
        nodes: &[ConfigNode],
        choice: Option<&Choice>,
    ) -> Result<()> {
        let mut ul = Tag::open(scope, "ul");
        walk_items(self, &mut *ul, nodes, choice)
    }

    fn on_symbol(&mut self, scope: &mut RenderScope, symbol: SymbolRef<'_>) -> Result<()> {
        scope.counts.add_symbol(symbol);
        let counter = scope.counts.running_counter();
        let group = symbol.choice.map(|c| Subtree::Choice(c).anchor_id());
        let id = format!("CONFIG_{}", symbol.name);

        let mut li = Tag::open(scope, "li");
        let m = &mut li.markup;
        m.text(&counter)
            .raw("<input")
            .flag("disabled")
            .attr("id", &id)
            .attr("class", SYMBOL_CLASS);
        if let Some(group) = group {
            m.attr("type", "radio").attr("name", &group);
            if symbol.is_choice_selection() {
                m.flag("checked");
            }
        } else if symbol.sym_type.is_tristate_like() {
            m.attr("type", "checkbox");
            if symbol.is_active() {
                m.flag("checked");
            }
        } else {
            m.attr("type", "text").attr("value", symbol.value());
        }
        m.raw("/><label")
            .attr("for", &id)
            .raw(">")
            .text(&symbol.name)
            .raw("</label>");
        Ok(())
    }

    fn on_comment(&mut self, scope: &mut RenderScope, comment: &Comment) -> Result<()> {
        let mut li = Tag::with_class(scope, "li", "comment");
        li.markup.text(&comment.text);
        Ok(())
    }

    fn on_menu(&mut self, scope: &mut RenderScope, menu: &Menu) -> Result<RenderScope> {
        let subtree = Subtree::Menu(menu);
        let mut child = self.descend(scope, subtree)?;
        scope.counts.add_menu(&child.counts);
        Self::write_subtree(scope, subtree, &mut child);
        Ok(child)
    }

    fn on_choice(&mut self, scope: &mut RenderScope, choice: &Choice) -> Result<RenderScope> {
        let subtree = Subtree::Choice(choice);
        let mut child = self.descend(scope, subtree)?;
        scope.counts.add_choice(&mut child.counts);
        Self::write_subtree(scope, subtree, &mut child);
        Ok(child)
    }
}

/// Rendered outline plus the totals of the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// The nested `<ul>` markup.
    pub html: String,
    /// Totals of the whole tree.
    pub counts: SubtreeCount,
}

/// Renders the outline of `model`.
///
/// Either the complete outline is returned or an error; nothing is
/// emitted for a tree that fails validation.
pub fn render_outline<M: ConfigModel + ?Sized>(model: &M) -> Result<Outline> {
    let mut renderer = HtmlRenderer::new();
    let root = walk_model(&mut renderer, RenderScope::default(), model)?;
    debug!(
        "rendered {} menus/choices, {} items, {} selected",
        renderer.anchors.len(),
        root.counts.count,
        root.counts.selected_count
    );
    Ok(Outline {
        html: root.markup.into_string(),
        counts: root.counts,
    })
}

impl Outline {
    /// Wraps the outline into a complete, self-contained HTML document.
    pub fn to_document(&self, page: &PageOptions) -> String {
        page::assemble(self, page)
    }
}

/// Renders `model` as a complete, self-contained HTML document.
pub fn render_document<M: ConfigModel + ?Sized>(
    model: &M,
    page: &PageOptions,
) -> Result<String> {
    Ok(render_outline(model)?.to_document(page))
}
