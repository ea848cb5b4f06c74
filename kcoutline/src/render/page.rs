use crate::render::{Markup, Outline};

const STYLE: &str = include_str!("../../assets/outline.css");
const SCRIPT: &str = include_str!("../../assets/navigation.js");

const TOOLBOX: &str = r#"<div id="toolbox">
<button type="button" id="expandAll">Expand all menus</button>
<button type="button" id="collapseAll">Collapse all menus</button>
<br/>
<label><input type="checkbox" id="hideDisabled"/> Hide disabled options</label>
<br/>
Sort:
<label><input type="radio" name="menuSort" value="menuId"/> Name</label>
<label><input type="radio" name="menuSort" value="selectedCount"/> Sel</label>
<label><input type="radio" name="menuSort" value="count"/> Cnt</label>
<ul id="menuNav"></ul>
</div>
"#;

/// Document-level settings for [`super::render_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// `<title>` and heading text.
    pub title: String,
    /// Content of the generator `<meta>` tag.
    pub generator: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Kernel configuration".to_string(),
            generator: format!("kcoutline {}", crate::VERSION),
        }
    }
}

impl PageOptions {
    /// Options with the given title and the default generator.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Wraps an outline into the full page: head, summary, toolbox, runtime.
pub(crate) fn assemble(outline: &Outline, page: &PageOptions) -> String {
    let mut doc = Markup::new();
    doc.raw("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n<meta")
        .attr("name", "generator")
        .attr("content", &page.generator)
        .raw("/>\n<title>")
        .text(&page.title)
        .raw("</title>\n<style>\n")
        .raw(STYLE)
        .raw("</style>\n</head>\n<body>\n<h1>")
        .text(&page.title)
        .raw("</h1>\n<p id=\"summary\">")
        .text(&format!(
            "{} items, {} selected",
            outline.counts.count, outline.counts.selected_count
        ))
        .raw("</p>\n")
        .raw(&outline.html)
        .raw(TOOLBOX)
        // CDATA keeps the runtime opaque to XML readers; browsers see comments.
        .raw("<script>\n//<![CDATA[\n")
        .raw(SCRIPT)
        .raw("//]]>\n</script>\n</body>\n</html>\n");
    doc.into_string()
}
