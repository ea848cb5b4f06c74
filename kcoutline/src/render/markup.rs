//! Markup buffer with mandatory escaping and scoped element emission.

use std::ops::{Deref, DerefMut};

/// Growing markup buffer.
///
/// Text and attribute values always go through HTML escaping; only
/// [`Markup::raw`] writes verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes trusted markup as is.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Writes escaped text content.
    pub fn text(&mut self, text: &str) -> &mut Self {
        html_escape::encode_quoted_attribute_to_string(text, &mut self.buf);
        self
    }

    /// Writes ` name="value"` with the value escaped.
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("=\"");
        html_escape::encode_quoted_attribute_to_string(value, &mut self.buf);
        self.buf.push('"');
        self
    }

    /// Writes a boolean attribute in its XML-compatible spelling.
    pub fn flag(&mut self, name: &str) -> &mut Self {
        self.attr(name, name)
    }

    /// Moves the content of `other` to the end of this buffer.
    pub fn append(&mut self, other: Markup) -> &mut Self {
        if self.buf.is_empty() {
            self.buf = other.buf;
        } else {
            self.buf.push_str(&other.buf);
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl AsMut<Markup> for Markup {
    fn as_mut(&mut self) -> &mut Markup {
        self
    }
}

/// An open element.
///
/// The opening tag is written on [`Tag::open`] and the closing tag when the
/// guard is dropped, so every exit path of the enclosing block, early
/// returns and `?` included, leaves balanced markup. The guard dereferences
/// to the wrapped target, which keeps it usable while the element is open.
pub struct Tag<'a, T: AsMut<Markup>> {
    target: &'a mut T,
    name: &'static str,
}

impl<'a, T: AsMut<Markup>> Tag<'a, T> {
    /// Writes `<name>`.
    pub fn open(target: &'a mut T, name: &'static str) -> Self {
        target.as_mut().raw("<").raw(name).raw(">");
        Self { target, name }
    }

    /// Writes `<name class="class">`.
    pub fn with_class(target: &'a mut T, name: &'static str, class: &str) -> Self {
        target
            .as_mut()
            .raw("<")
            .raw(name)
            .attr("class", class)
            .raw(">");
        Self { target, name }
    }
}

impl<T: AsMut<Markup>> Deref for Tag<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: AsMut<Markup>> DerefMut for Tag<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: AsMut<Markup>> Drop for Tag<'_, T> {
    fn drop(&mut self) {
        self.target.as_mut().raw("</").raw(self.name).raw(">\n");
    }
}
