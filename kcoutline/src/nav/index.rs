use std::{collections::HashMap, fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    nav::dom::{Document, NodeId},
    render::{SUBTREE_CLASS, SYMBOL_CLASS},
};

/// One indexed menu or choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub anchor_id: String,
    pub label: String,
    pub selected_count: usize,
    pub count: usize,
    /// Position of the structural parent entry in document order.
    pub parent: Option<usize>,
    /// Position of this entry in document order.
    pub position: usize,
    control: NodeId,
}

/// Ordering of the navigation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Anchor identifier, ascending.
    #[default]
    Name,
    /// Selected units, descending.
    SelectedCount,
    /// Selectable units, descending.
    Count,
}

impl SortKey {
    /// Value of the matching `menuSort` radio button.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "menuId",
            SortKey::SelectedCount => "selectedCount",
            SortKey::Count => "count",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "menuId" | "name" => Ok(SortKey::Name),
            "selectedCount" | "sel" => Ok(SortKey::SelectedCount),
            "count" | "cnt" => Ok(SortKey::Count),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

/// Navigation over a rendered outline.
///
/// Mirrors the browser runtime: the index is built from the menu/choice
/// controls found in the document and every operation acts on the
/// document's checked/hidden state, never on the config tree.
#[derive(Debug, Clone)]
pub struct NavigationIndex {
    doc: Document,
    entries: Vec<NavigationEntry>,
    order: Vec<usize>,
    by_anchor: HashMap<String, usize>,
    target: Option<usize>,
}

impl NavigationIndex {
    /// Loads rendered markup and indexes it.
    pub fn parse(markup: &str) -> Result<Self> {
        Self::build(Document::parse(markup)?)
    }

    /// Indexes every menu/choice control of `doc`.
    pub fn build(doc: Document) -> Result<Self> {
        let controls = doc.select("input", SUBTREE_CLASS);
        let mut entries = Vec::with_capacity(controls.len());
        let mut by_anchor = HashMap::with_capacity(controls.len());
        let mut by_node = HashMap::with_capacity(controls.len());

        for (position, &control) in controls.iter().enumerate() {
            let el = doc.get(control);
            let anchor_id = el.attr("id").unwrap_or_default().to_string();
            let entry = NavigationEntry {
                label: el.attr("data-label").unwrap_or(&anchor_id).to_string(),
                selected_count: int_data(
                    el.attr("data-selected-count"),
                    &anchor_id,
                    "data-selected-count",
                )?,
                count: int_data(el.attr("data-count"), &anchor_id, "data-count")?,
                parent: None,
                position,
                control,
                anchor_id,
            };
            by_anchor.entry(entry.anchor_id.clone()).or_insert(position);
            by_node.insert(control, position);
            entries.push(entry);
        }

        // Parents always precede their children, so one pass suffices.
        for entry in &mut entries {
            entry.parent =
                parent_control(&doc, entry.control).and_then(|c| by_node.get(&c).copied());
        }

        debug!("indexed {} menus/choices", entries.len());
        Ok(Self {
            order: (0..entries.len()).collect(),
            doc,
            entries,
            by_anchor,
            target: None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the current sort order.
    pub fn entries(&self) -> impl Iterator<Item = &NavigationEntry> + '_ {
        self.order.iter().map(|&i| &self.entries[i])
    }

    pub fn entry(&self, anchor: &str) -> Option<&NavigationEntry> {
        self.by_anchor.get(anchor).map(|&i| &self.entries[i])
    }

    /// The structural parent entry of `entry`.
    pub fn parent_of(&self, entry: &NavigationEntry) -> Option<&NavigationEntry> {
        entry.parent.map(|i| &self.entries[i])
    }

    /// The underlying document with its current state.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn expand_all(&mut self) {
        self.set_all_expanded(true);
    }

    pub fn collapse_all(&mut self) {
        self.set_all_expanded(false);
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        for entry in &self.entries {
            self.doc.set_checked(entry.control, expanded);
        }
    }

    pub fn is_expanded(&self, anchor: &str) -> Result<bool> {
        let i = self.position(anchor)?;
        Ok(self.doc.get(self.entries[i].control).is_checked())
    }

    /// Hides or shows the item of every unchecked symbol.
    ///
    /// Returns how many items were affected.
    pub fn hide_disabled(&mut self, hide: bool) -> usize {
        let items: Vec<_> = self
            .doc
            .select("input", SYMBOL_CLASS)
            .into_iter()
            .filter(|&s| !self.doc.get(s).is_checked())
            .filter_map(|s| self.doc.parent(s))
            .collect();
        for &item in &items {
            self.doc.set_hidden(item, hide);
        }
        items.len()
    }

    /// Whether the item holding the control with `id` is hidden.
    pub fn is_item_hidden(&self, id: &str) -> Option<bool> {
        let control = self.doc.element_by_id(id)?;
        let item = self.doc.parent(control)?;
        Some(self.doc.get(item).is_hidden())
    }

    /// Reorders the entries by `key`. Ties keep document order.
    pub fn sort(&mut self, key: SortKey) {
        let entries = &self.entries;
        self.order.sort_by(|&a, &b| {
            let (ea, eb) = (&entries[a], &entries[b]);
            let primary = match key {
                SortKey::Name => ea.anchor_id.cmp(&eb.anchor_id),
                SortKey::SelectedCount => eb.selected_count.cmp(&ea.selected_count),
                SortKey::Count => eb.count.cmp(&ea.count),
            };
            primary.then(ea.position.cmp(&eb.position))
        });
    }

    /// Anchors of every ancestor of `anchor`, nearest first.
    pub fn ancestors(&self, anchor: &str) -> Result<Vec<&str>> {
        let mut next = self.entries[self.position(anchor)?].parent;
        let mut chain = Vec::new();
        while let Some(i) = next {
            chain.push(self.entries[i].anchor_id.as_str());
            next = self.entries[i].parent;
        }
        Ok(chain)
    }

    /// Expands every ancestor of `anchor` and makes it the target.
    pub fn navigate(&mut self, anchor: &str) -> Result<()> {
        let i = self.position(anchor)?;
        let mut next = self.entries[i].parent;
        while let Some(p) = next {
            self.doc.set_checked(self.entries[p].control, true);
            next = self.entries[p].parent;
        }
        self.target = Some(i);
        Ok(())
    }

    /// Entry of the last successful [`Self::navigate`].
    pub fn target(&self) -> Option<&NavigationEntry> {
        self.target.map(|i| &self.entries[i])
    }

    fn position(&self, anchor: &str) -> Result<usize> {
        self.by_anchor
            .get(anchor)
            .copied()
            .ok_or_else(|| Error::UnknownAnchor(anchor.to_string()))
    }
}

fn int_data(value: Option<&str>, anchor: &str, attr: &'static str) -> Result<usize> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| Error::MissingData {
            anchor: anchor.to_string(),
            attr,
        })
}

/// control -> item -> list, then back through the list's preceding
/// siblings to the nearest menu/choice control.
fn parent_control(doc: &Document, control: NodeId) -> Option<NodeId> {
    let item = doc.parent(control)?;
    let list = doc.parent(item)?;
    if doc.get(list).name != "ul" {
        return None;
    }
    doc.preceding_siblings(list).find(|&s| {
        let el = doc.get(s);
        el.name == "input" && el.has_class(SUBTREE_CLASS)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario;
    use crate::render::render_outline;

    fn index_of(nodes: &[crate::data::ConfigNode]) -> NavigationIndex {
        NavigationIndex::parse(&render_outline(nodes).unwrap().html).unwrap()
    }

    #[test]
    fn test_scenario_index() {
        let index = index_of(&scenario());
        let entries: Vec<_> = index
            .entries()
            .map(|e| (e.anchor_id.as_str(), e.label.as_str(), e.selected_count, e.count))
            .collect();
        assert_eq!(
            entries,
            [
                ("menu-Kconfig:1", "A", 2, 2),
                ("choice-Kconfig:5", "C", 1, 1)
            ]
        );
        let c = index.entry("choice-Kconfig:5").unwrap();
        assert_eq!(index.parent_of(c).unwrap().anchor_id, "menu-Kconfig:1");
    }

    #[test]
    fn test_missing_data_attribute() {
        let html = r#"<ul><li><input id="menu-K:1" class="menu subtree" data-count="3"/></li></ul>"#;
        let err = NavigationIndex::parse(html).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingData { attr: "data-selected-count", .. }
        ));
    }

    #[test]
    fn test_hide_disabled_is_reversible() {
        let mut index = index_of(&scenario());
        // Only C2 is unchecked.
        assert_eq!(index.hide_disabled(true), 1);
        assert_eq!(index.is_item_hidden("CONFIG_C2"), Some(true));
        assert_eq!(index.is_item_hidden("CONFIG_C1"), Some(false));
        index.hide_disabled(false);
        assert_eq!(index.is_item_hidden("CONFIG_C2"), Some(false));
    }

    #[test]
    fn test_unknown_anchor() {
        let mut index = index_of(&scenario());
        assert!(matches!(
            index.navigate("menu-nowhere:0"),
            Err(Error::UnknownAnchor(_))
        ));
        assert!(index.target().is_none());
    }

    #[test]
    fn test_sort_key_names() {
        for key in [SortKey::Name, SortKey::SelectedCount, SortKey::Count] {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert!("size".parse::<SortKey>().is_err());
    }
}
