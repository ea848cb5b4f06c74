//! Pre-selection overlays in the `.config` format.
//!
//! ```text
//! CONFIG_64BIT=y
//! CONFIG_LOCALVERSION="-custom"
//! # CONFIG_SWAP is not set
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    data::{Choice, ConfigNode, Symbol},
    error::{Error, Result},
};

const PREFIX: &str = "CONFIG_";

/// Symbol values read from a `.config` file, keyed by name without prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    values: BTreeMap<String, String>,
}

/// Outcome of [`Overlay::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Symbol occurrences whose value was assigned.
    pub applied: usize,
    /// Overlay names that matched no symbol in the tree.
    pub unknown: Vec<String>,
}

impl Overlay {
    /// Parses `.config` text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(name) = comment
                    .trim()
                    .strip_prefix(PREFIX)
                    .and_then(|rest| rest.strip_suffix(" is not set"))
                {
                    values.insert(name.to_string(), "n".to_string());
                }
                continue;
            }

            let err = |reason: &str| Error::Overlay {
                line: idx + 1,
                reason: reason.to_string(),
            };
            let rest = line
                .strip_prefix(PREFIX)
                .ok_or_else(|| err("expected `CONFIG_<NAME>=<value>`"))?;
            let (name, value) = rest
                .split_once('=')
                .ok_or_else(|| err("missing `=`"))?;
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(err("invalid symbol name"));
            }
            let value = if value.starts_with('"') {
                unquote(value).ok_or_else(|| err("unterminated string value"))?
            } else {
                value.to_string()
            };
            values.insert(name.to_string(), value);
        }
        Ok(Self { values })
    }

    /// Value assigned to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Assigns overlay values to every matching symbol below `nodes`.
    ///
    /// A choice member set to `y` becomes its choice's selection and the
    /// other `y` members of that choice drop to `n`.
    pub fn apply(&self, nodes: &mut [ConfigNode]) -> Result<OverlayReport> {
        let mut report = OverlayReport::default();
        let mut seen = BTreeSet::new();
        self.apply_nodes(nodes, &mut report, &mut seen)?;

        report.unknown = self
            .values
            .keys()
            .filter(|name| !seen.contains(name.as_str()))
            .cloned()
            .collect();
        for name in &report.unknown {
            warn!("overlay sets unknown symbol {PREFIX}{name}");
        }
        debug!(
            "overlay applied to {} symbol occurrence(s), {} unknown",
            report.applied,
            report.unknown.len()
        );
        Ok(report)
    }

    fn apply_nodes<'a>(
        &'a self,
        nodes: &mut [ConfigNode],
        report: &mut OverlayReport,
        seen: &mut BTreeSet<&'a str>,
    ) -> Result<()> {
        for node in nodes {
            match node {
                ConfigNode::Symbol(sym) => {
                    self.apply_symbol(sym, report, seen)?;
                }
                ConfigNode::Menu(menu) => self.apply_nodes(&mut menu.children, report, seen)?,
                ConfigNode::Choice(choice) => self.apply_choice(choice, report, seen)?,
                ConfigNode::Comment(_) => {}
            }
        }
        Ok(())
    }

    fn apply_symbol<'a>(
        &'a self,
        sym: &mut Symbol,
        report: &mut OverlayReport,
        seen: &mut BTreeSet<&'a str>,
    ) -> Result<bool> {
        let Some((name, value)) = self.values.get_key_value(&sym.name) else {
            return Ok(false);
        };
        if sym.sym_type.is_tristate_like() && !matches!(value.as_str(), "n" | "m" | "y") {
            return Err(Error::InvalidValue {
                name: sym.name.clone(),
                ty: sym.sym_type.as_str(),
                value: value.clone(),
            });
        }
        sym.value = value.clone();
        seen.insert(name.as_str());
        report.applied += 1;
        Ok(true)
    }

    fn apply_choice<'a>(
        &'a self,
        choice: &mut Choice,
        report: &mut OverlayReport,
        seen: &mut BTreeSet<&'a str>,
    ) -> Result<()> {
        let mut picked = None;
        for child in &mut choice.children {
            if let ConfigNode::Symbol(sym) = child
                && self.apply_symbol(sym, report, seen)?
                && sym.value == "y"
            {
                picked = Some(sym.name.clone());
            }
        }
        // Non-symbol children are left for the walker to reject.
        let Some(picked) = picked else {
            // A selection the overlay switched off falls back to the first
            // `y` member.
            if let Some(selection) = &choice.selection
                && self.values.contains_key(selection)
                && choice
                    .members()
                    .any(|m| &m.name == selection && m.value() != "y")
            {
                choice.selection = None;
            }
            return Ok(());
        };
        for sym in choice.children.iter_mut().filter_map(|c| match c {
            ConfigNode::Symbol(s) => Some(s),
            _ => None,
        }) {
            if sym.name != picked && sym.value == "y" {
                sym.value = "n".to_string();
            }
        }
        choice.selection = Some(picked);
        Ok(())
    }
}

/// Strips the quotes of a `.config` string value and resolves `\"`, `\\`.
fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Location, Menu, SymbolType};

    const DOT_CONFIG: &str = r#"
#
# Automatically generated file; DO NOT EDIT.
#
CONFIG_64BIT=y
CONFIG_LOCALVERSION="-rc \"test\""
# CONFIG_SWAP is not set
CONFIG_NR_CPUS=64
CONFIG_MODULES=m
"#;

    #[test]
    fn test_parse_dot_config() {
        let overlay = Overlay::parse(DOT_CONFIG).unwrap();
        assert_eq!(overlay.len(), 5);
        assert_eq!(overlay.get("64BIT"), Some("y"));
        assert_eq!(overlay.get("LOCALVERSION"), Some("-rc \"test\""));
        assert_eq!(overlay.get("SWAP"), Some("n"));
        assert_eq!(overlay.get("NR_CPUS"), Some("64"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Overlay::parse("CONFIG_A=y\nbogus line\n").unwrap_err();
        assert!(matches!(err, Error::Overlay { line: 2, .. }));

        let err = Overlay::parse("CONFIG_S=\"open").unwrap_err();
        assert!(matches!(err, Error::Overlay { line: 1, .. }));
    }

    #[test]
    fn test_apply_updates_choice_selection() {
        let mut nodes = vec![ConfigNode::Menu(
            Menu::new("Processor", Location::new("arch/x86/Kconfig", 10)).with_children([
                ConfigNode::Symbol(Symbol::new("SMP", SymbolType::Bool, "n")),
                ConfigNode::Choice(
                    Choice::new("Processor family", Location::new("arch/x86/Kconfig.cpu", 4))
                        .with_members([
                            Symbol::new("GENERIC_CPU", SymbolType::Bool, "y"),
                            Symbol::new("MCORE2", SymbolType::Bool, "n"),
                        ])
                        .with_selection("GENERIC_CPU"),
                ),
            ]),
        )];
        let overlay = Overlay::parse("CONFIG_SMP=y\nCONFIG_MCORE2=y\nCONFIG_GONE=y\n").unwrap();
        let report = overlay.apply(&mut nodes).unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.unknown, vec!["GONE".to_string()]);

        let ConfigNode::Menu(menu) = &nodes[0] else {
            unreachable!()
        };
        let ConfigNode::Choice(choice) = &menu.children[1] else {
            unreachable!()
        };
        assert_eq!(choice.selection.as_deref(), Some("MCORE2"));
        let values: Vec<_> = choice.members().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["n", "y"]);
    }

    #[test]
    fn test_apply_reaches_symbols_inside_menus() {
        let mut nodes = vec![ConfigNode::Menu(
            Menu::new("General setup", Location::new("init/Kconfig", 12))
                .with_children([ConfigNode::Symbol(Symbol::new("SWAP", SymbolType::Bool, "y"))]),
        )];
        let overlay = Overlay::parse("# CONFIG_SWAP is not set\n").unwrap();
        let report = overlay.apply(&mut nodes).unwrap();
        assert_eq!(report.applied, 1);
        assert!(report.unknown.is_empty());

        let ConfigNode::Menu(menu) = &nodes[0] else {
            unreachable!()
        };
        assert_eq!(menu.children[0].as_symbol().unwrap().value, "n");
    }

    fn mode_choice() -> Choice {
        Choice::new("Mode", Location::new("Kconfig", 3))
            .with_members([
                Symbol::new("FAST", SymbolType::Bool, "y"),
                Symbol::new("SLOW", SymbolType::Bool, "n"),
            ])
            .with_selection("FAST")
    }

    #[test]
    fn test_switched_off_selection_is_cleared() {
        let mut nodes = vec![ConfigNode::Choice(mode_choice())];
        let overlay = Overlay::parse("# CONFIG_FAST is not set\n").unwrap();
        overlay.apply(&mut nodes).unwrap();

        let ConfigNode::Choice(choice) = &nodes[0] else {
            unreachable!()
        };
        assert_eq!(choice.selection, None);
        assert_eq!(choice.selected_member(), None);
    }

    #[test]
    fn test_untouched_selection_is_kept() {
        let mut nodes = vec![ConfigNode::Choice(mode_choice())];
        let overlay = Overlay::parse("CONFIG_SLOW=n\n").unwrap();
        overlay.apply(&mut nodes).unwrap();

        let ConfigNode::Choice(choice) = &nodes[0] else {
            unreachable!()
        };
        assert_eq!(choice.selection.as_deref(), Some("FAST"));
    }

    #[test]
    fn test_apply_rejects_bad_tristate() {
        let mut nodes = vec![ConfigNode::Symbol(Symbol::new("USB", SymbolType::Tristate, "n"))];
        let overlay = Overlay::parse("CONFIG_USB=maybe").unwrap();
        assert!(matches!(
            overlay.apply(&mut nodes),
            Err(Error::InvalidValue { .. })
        ));
    }
}
