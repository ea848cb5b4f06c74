use kcoutline::{
    ConfigNode, ConfigTree, NavigationIndex, SortKey,
    count::count_subtrees,
    data::{Choice, Comment, Location, Menu, Symbol, SymbolType},
    render::{PageOptions, render_document, render_outline},
};
use pretty_assertions::assert_eq;

/// Deterministic pseudo-random tree builder.
struct TreeGen {
    state: u64,
    line: u32,
}

impl TreeGen {
    fn new(seed: u64) -> Self {
        Self { state: seed, line: 0 }
    }

    fn next(&mut self, bound: u64) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) % bound
    }

    fn location(&mut self) -> Location {
        self.line += 1;
        Location::new("arch/Kconfig", self.line)
    }

    fn symbol(&mut self) -> Symbol {
        self.line += 1;
        let (ty, value) = match self.next(6) {
            0 => (SymbolType::Bool, "y"),
            1 => (SymbolType::Bool, "n"),
            2 => (SymbolType::Tristate, "m"),
            3 => (SymbolType::Tristate, ""),
            4 => (SymbolType::Int, "64"),
            _ => (SymbolType::String, "y"),
        };
        Symbol::new(format!("SYM_{}", self.line), ty, value)
    }

    fn nodes(&mut self, depth: usize) -> Vec<ConfigNode> {
        let len = 1 + self.next(5);
        (0..len)
            .map(|_| match self.next(if depth == 0 { 2 } else { 5 }) {
                0 => ConfigNode::Symbol(self.symbol()),
                1 => ConfigNode::Comment(Comment::new(format!("note {}", self.line))),
                2 | 3 => {
                    let location = self.location();
                    let children = self.nodes(depth - 1);
                    let title = format!("Menu {}", location.line);
                    ConfigNode::Menu(Menu::new(title, location).with_children(children))
                }
                _ => {
                    let location = self.location();
                    let members: Vec<_> = (0..1 + self.next(3))
                        .map(|_| {
                            let mut s = self.symbol();
                            s.sym_type = SymbolType::Bool;
                            s.value = "n".into();
                            s
                        })
                        .collect();
                    let mut choice = Choice::new(format!("Choice {}", location.line), location);
                    if self.next(2) == 0 {
                        choice = choice.with_selection(members[0].name.clone());
                    }
                    ConfigNode::Choice(choice.with_members(members))
                }
            })
            .collect()
    }
}

#[derive(Default)]
struct Census {
    units: usize,
    selected: usize,
    subtrees: usize,
}

fn census(nodes: &[ConfigNode], in_choice: bool, acc: &mut Census) {
    for node in nodes {
        match node {
            ConfigNode::Symbol(s) => {
                if !in_choice {
                    acc.units += 1;
                }
                if s.is_active() {
                    acc.selected += 1;
                }
            }
            ConfigNode::Menu(m) => {
                acc.subtrees += 1;
                census(&m.children, false, acc);
            }
            ConfigNode::Choice(c) => {
                acc.subtrees += 1;
                acc.units += 1;
                census(&c.children, true, acc);
            }
            ConfigNode::Comment(_) => {}
        }
    }
}

fn generated() -> ConfigTree {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree_gen = TreeGen::new(0x5eed);
    let mut nodes = Vec::new();
    while nodes.len() < 40 {
        nodes.extend(tree_gen.nodes(5));
    }
    ConfigTree::new(nodes)
}

#[test]
fn counts_follow_the_counting_rules() {
    let tree = generated();
    let mut expected = Census::default();
    census(&tree.nodes, false, &mut expected);

    let (root, records) = count_subtrees(&tree).unwrap();
    assert_eq!(root.count, expected.units);
    assert_eq!(root.selected_count, expected.selected);
    assert_eq!(records.len(), expected.subtrees);
    assert!(records.iter().any(|r| r.depth >= 3), "tree is too shallow");
}

#[test]
fn index_has_one_entry_per_subtree() {
    let tree = generated();
    let (_, records) = count_subtrees(&tree).unwrap();
    let html = render_document(&tree, &PageOptions::default()).unwrap();
    let index = NavigationIndex::parse(&html).unwrap();

    assert_eq!(index.len(), records.len());
    for (entry, record) in index.entries().zip(&records) {
        assert_eq!(entry.anchor_id, record.anchor_id);
        assert_eq!(entry.label, record.title);
        assert_eq!(
            (entry.selected_count, entry.count),
            (record.counts.selected_count, record.counts.count)
        );
    }
}

#[test]
fn expand_collapse_expand_leaves_everything_expanded() {
    let html = render_outline(&generated()).unwrap().html;
    let mut index = NavigationIndex::parse(&html).unwrap();

    index.expand_all();
    index.collapse_all();
    let anchors: Vec<_> = index.entries().map(|e| e.anchor_id.clone()).collect();
    assert!(anchors.iter().all(|a| !index.is_expanded(a).unwrap()));

    index.expand_all();
    assert!(anchors.iter().all(|a| index.is_expanded(a).unwrap()));
}

#[test]
fn subtrees_with_selections_start_expanded() {
    let html = render_outline(&generated()).unwrap().html;
    let index = NavigationIndex::parse(&html).unwrap();
    for entry in index.entries() {
        assert_eq!(
            index.is_expanded(&entry.anchor_id).unwrap(),
            entry.selected_count > 0,
            "{}",
            entry.anchor_id
        );
    }
}

#[test]
fn navigate_expands_the_whole_ancestor_chain() {
    let tree = generated();
    let (_, records) = count_subtrees(&tree).unwrap();
    let deepest = records.iter().max_by_key(|r| r.depth).unwrap();

    let html = render_outline(&tree).unwrap().html;
    let mut index = NavigationIndex::parse(&html).unwrap();
    index.collapse_all();

    let ancestors: Vec<String> = index
        .ancestors(&deepest.anchor_id)
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(ancestors.len(), deepest.depth);

    index.navigate(&deepest.anchor_id).unwrap();
    assert_eq!(index.target().unwrap().anchor_id, deepest.anchor_id);
    for anchor in &ancestors {
        assert!(index.is_expanded(anchor).unwrap(), "{anchor} stayed collapsed");
    }
    // Only the chain was touched.
    let expanded = index
        .entries()
        .filter(|e| index.is_expanded(&e.anchor_id).unwrap())
        .count();
    assert_eq!(expanded, ancestors.len());
}

#[test]
fn sorting_is_stable_and_idempotent() {
    let html = render_outline(&generated()).unwrap().html;
    let mut index = NavigationIndex::parse(&html).unwrap();

    for key in [SortKey::Count, SortKey::SelectedCount, SortKey::Name] {
        index.sort(key);
        let first: Vec<_> = index.entries().map(|e| e.position).collect();
        index.sort(SortKey::Name);
        index.sort(key);
        let second: Vec<_> = index.entries().map(|e| e.position).collect();
        assert_eq!(first, second);

        let entries: Vec<_> = index.entries().collect();
        for pair in entries.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordered = match key {
                SortKey::Name => (&a.anchor_id, a.position) <= (&b.anchor_id, b.position),
                SortKey::SelectedCount => {
                    a.selected_count > b.selected_count
                        || (a.selected_count == b.selected_count && a.position < b.position)
                }
                SortKey::Count => {
                    a.count > b.count || (a.count == b.count && a.position < b.position)
                }
            };
            assert!(ordered, "{key}: {} before {}", a.anchor_id, b.anchor_id);
        }
    }
}

#[test]
fn hostile_names_are_escaped_and_recoverable() {
    let name = r#"A<B>&"C""#;
    let tree = ConfigTree::new([ConfigNode::Menu(
        Menu::new(name, Location::new("Kconfig", 1)).with_children([ConfigNode::Symbol(
            Symbol::new(name, SymbolType::Bool, "y"),
        )]),
    )]);
    let html = render_document(&tree, &PageOptions::titled(name)).unwrap();
    assert!(!html.contains(name));
    assert!(html.contains("A&lt;B&gt;&amp;&quot;C&quot;"));

    let label = format!(">{}</label>", html_escape::encode_quoted_attribute(name));
    let start = html.find(&label).unwrap() + 1;
    let end = start + label.len() - "></label>".len();
    assert_eq!(html_escape::decode_html_entities(&html[start..end]), name);

    let index = NavigationIndex::parse(&html).unwrap();
    assert_eq!(index.entry("menu-Kconfig:1").unwrap().label, name);
}

#[test]
fn rendering_is_byte_identical_across_runs() {
    let page = PageOptions::titled("Kernel configuration for 6.8.0");
    let first = render_document(&generated(), &page).unwrap();
    let second = render_document(&generated(), &page).unwrap();
    assert!(first == second);
}
