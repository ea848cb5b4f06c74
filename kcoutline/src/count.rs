//! Per-subtree selectable/selected totals.
//!
//! Counting rules:
//!
//! - a symbol that is not a choice member adds one selectable unit;
//! - a bool/tristate symbol set to `m` or `y` adds one selected unit,
//!   choice members included;
//! - a menu adds exactly what its children add;
//! - a choice adds its members' selected units plus one selectable unit
//!   for itself.
//!
//! Besides its local totals every subtree carries running offsets: the
//! totals of everything before it in document order, across all ancestor
//! levels. `offset + count` is therefore an absolute position in the whole
//! document.
//!
//! A single choice member can show more selected than selectable units
//! locally, because members add to `selected_count` but never to `count`.
//! That ratio is kept as is.

use crate::{
    data::{Choice, ConfigModel, Menu},
    error::Result,
    walker::{Subtree, SubtreeKind, SymbolRef, TreeWalker, walk_model},
};

/// Counters owned by one subtree while it is walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtreeCount {
    /// Selectable units inside the subtree.
    pub count: usize,
    /// Units currently set to `m` or `y`.
    pub selected_count: usize,
    /// Selectable units before the subtree in document order.
    pub offset: usize,
    /// Selected units before the subtree in document order.
    pub selected_offset: usize,
}

impl SubtreeCount {
    /// Counters for a subtree entered at the current running position.
    ///
    /// Siblings therefore chain: the next sibling starts where the previous
    /// one's `offset + count` ended.
    pub fn child(&self) -> Self {
        Self {
            offset: self.running_count(),
            selected_offset: self.running_selected(),
            ..Self::default()
        }
    }

    /// Accounts for one symbol visited directly inside this subtree.
    pub fn add_symbol(&mut self, symbol: SymbolRef<'_>) {
        // A choice is picked as a whole, see `add_choice`.
        if !symbol.is_choice_member() {
            self.count += 1;
        }
        if symbol.is_active() {
            self.selected_count += 1;
        }
    }

    /// Folds a finished menu subtree into this one.
    pub fn add_menu(&mut self, menu: &SubtreeCount) {
        self.count += menu.count;
        self.selected_count += menu.selected_count;
    }

    /// Closes a finished choice subtree, which then counts as one unit,
    /// and folds it into this one.
    pub fn add_choice(&mut self, choice: &mut SubtreeCount) {
        choice.count += 1;
        self.add_menu(choice);
    }

    /// `offset + count`.
    pub fn running_count(&self) -> usize {
        self.offset + self.count
    }

    /// `selected_offset + selected_count`.
    pub fn running_selected(&self) -> usize {
        self.selected_offset + self.selected_count
    }

    /// Absolute `selected/total ` prefix shown before symbols and choices.
    pub fn running_counter(&self) -> String {
        format!("{}/{} ", self.running_selected(), self.running_count())
    }
}

/// Totals of one menu or choice, as recorded by [`CountingWalker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeRecord {
    pub kind: SubtreeKind,
    pub title: String,
    pub anchor_id: String,
    /// Nesting level, 0 for top-level subtrees.
    pub depth: usize,
    pub counts: SubtreeCount,
}

/// Tree walker that only counts.
///
/// Every visited subtree is recorded in document order.
#[derive(Debug, Default)]
pub struct CountingWalker {
    records: Vec<SubtreeRecord>,
    depth: usize,
}

impl CountingWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded subtrees in document order.
    pub fn records(&self) -> &[SubtreeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SubtreeRecord> {
        self.records
    }

    fn walk_subtree(
        &mut self,
        scope: &mut SubtreeCount,
        subtree: Subtree<'_>,
    ) -> Result<SubtreeCount> {
        let slot = self.records.len();
        self.records.push(SubtreeRecord {
            kind: subtree.kind(),
            title: subtree.title().to_string(),
            anchor_id: subtree.anchor_id(),
            depth: self.depth,
            counts: SubtreeCount::default(),
        });

        self.depth += 1;
        let walked = self.descend(scope, subtree);
        self.depth -= 1;
        let mut child = walked?;

        match subtree.kind() {
            SubtreeKind::Menu => scope.add_menu(&child),
            SubtreeKind::Choice => scope.add_choice(&mut child),
        }
        self.records[slot].counts = child;
        Ok(child)
    }
}

impl TreeWalker for CountingWalker {
    type Scope = SubtreeCount;

    fn make_subtree(
        &mut self,
        parent: &SubtreeCount,
        _subtree: Subtree<'_>,
    ) -> Result<SubtreeCount> {
        Ok(parent.child())
    }

    fn on_symbol(&mut self, scope: &mut SubtreeCount, symbol: SymbolRef<'_>) -> Result<()> {
        scope.add_symbol(symbol);
        Ok(())
    }

    fn on_menu(&mut self, scope: &mut SubtreeCount, menu: &Menu) -> Result<SubtreeCount> {
        self.walk_subtree(scope, Subtree::Menu(menu))
    }

    fn on_choice(
        &mut self,
        scope: &mut SubtreeCount,
        choice: &Choice,
    ) -> Result<SubtreeCount> {
        self.walk_subtree(scope, Subtree::Choice(choice))
    }
}

/// Totals for the whole tree.
pub fn count_tree<M: ConfigModel + ?Sized>(model: &M) -> Result<SubtreeCount> {
    walk_model(&mut CountingWalker::new(), SubtreeCount::default(), model)
}

/// Totals for the whole tree plus one record per menu/choice.
pub fn count_subtrees<M: ConfigModel + ?Sized>(
    model: &M,
) -> Result<(SubtreeCount, Vec<SubtreeRecord>)> {
    let mut walker = CountingWalker::new();
    let root = walk_model(&mut walker, SubtreeCount::default(), model)?;
    Ok((root, walker.into_records()))
}
