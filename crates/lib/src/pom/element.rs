//! Owned element tree with structural path queries.

/// A single element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
  name: String,
  text: String,
  children: Vec<Element>,
}

impl Element {
  /// Create an empty element with the given local name.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      text: String::new(),
      children: Vec::new(),
    }
  }

  /// Local tag name, without any namespace prefix.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Text content directly inside this element, trimmed.
  pub fn text(&self) -> &str {
    self.text.trim()
  }

  /// Child elements in document order.
  pub fn elements(&self) -> &[Element] {
    &self.children
  }

  /// First direct child with the given name.
  pub fn child(&self, name: &str) -> Option<&Element> {
    self.children.iter().find(|c| c.name == name)
  }

  /// All direct children with the given name.
  pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    self.children.iter().filter(move |c| c.name == name)
  }

  /// Trimmed text of the first direct child with the given name.
  ///
  /// Returns `None` when the child is missing or its text is empty.
  pub fn child_text(&self, name: &str) -> Option<&str> {
    self.child(name).map(Element::text).filter(|t| !t.is_empty())
  }

  /// Follow a chain of direct children, taking the first match at each step.
  pub fn path(&self, names: &[&str]) -> Option<&Element> {
    names.iter().try_fold(self, |el, name| el.child(name))
  }

  /// Every element below this one with the given name, in document order.
  ///
  /// The element itself is not included.
  pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_descendants(self, name, &mut found);
    found
  }

  pub(super) fn push_text(&mut self, text: &str) {
    self.text.push_str(text);
  }

  pub(super) fn push_child(&mut self, child: Element) {
    self.children.push(child);
  }
}

fn collect_descendants<'a>(el: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
  for child in &el.children {
    if child.name == name {
      found.push(child);
    }
    collect_descendants(child, name, found);
  }
}
