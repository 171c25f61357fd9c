//! Event-driven construction of the element tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::trace;

use super::Element;

/// Errors that can occur while parsing a manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  /// The document bytes are not UTF-8.
  #[error("manifest is not valid UTF-8: {0}")]
  Encoding(#[from] std::str::Utf8Error),

  /// The markup itself is malformed.
  #[error("malformed XML at byte {position}: {message}")]
  Xml { position: u64, message: String },

  /// The document ended while an element was still open.
  #[error("element <{0}> is never closed")]
  Unclosed(String),

  /// Non-whitespace text appears outside the root element.
  #[error("unexpected text outside the root element at byte {0}")]
  StrayText(u64),

  /// More than one top-level element.
  #[error("document has more than one root element")]
  MultipleRoots,

  /// No element at all.
  #[error("document has no root element")]
  Empty,
}

/// Parse a UTF-8 XML document into its root [`Element`].
///
/// Comments, processing instructions, the XML declaration and doctypes are
/// skipped. Entity references in text are unescaped and CDATA sections are
/// kept verbatim.
///
/// # Errors
///
/// Returns [`ParseError`] for any malformed input; no partial tree is returned.
pub fn parse(input: &[u8]) -> Result<Element, ParseError> {
  let text = std::str::from_utf8(input)?;
  let text = text.strip_prefix('\u{feff}').unwrap_or(text);

  let mut reader = Reader::from_str(text);
  let mut stack: Vec<Element> = Vec::new();
  let mut root = None;

  loop {
    let position = reader.buffer_position() as u64;
    let event = match reader.read_event() {
      Ok(event) => event,
      Err(e) => {
        return Err(ParseError::Xml {
          position,
          message: e.to_string(),
        });
      }
    };

    match event {
      Event::Start(start) => stack.push(Element::new(local_name(&start)?)),
      Event::Empty(start) => {
        let element = Element::new(local_name(&start)?);
        attach(element, &mut stack, &mut root)?;
      }
      Event::End(_) => {
        // The reader rejects mismatched end tags, so the top of the stack is the element being closed.
        if let Some(element) = stack.pop() {
          attach(element, &mut stack, &mut root)?;
        }
      }
      Event::Text(content) => {
        let value = content.unescape().map_err(|e| ParseError::Xml {
          position,
          message: e.to_string(),
        })?;
        match stack.last_mut() {
          Some(current) => current.push_text(&value),
          None if value.trim().is_empty() => {}
          None => return Err(ParseError::StrayText(position)),
        }
      }
      Event::CData(data) => {
        let bytes = data.into_inner();
        let value = std::str::from_utf8(&bytes)?;
        match stack.last_mut() {
          Some(current) => current.push_text(value),
          None => return Err(ParseError::StrayText(position)),
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if let Some(open) = stack.pop() {
    return Err(ParseError::Unclosed(open.name().to_string()));
  }

  let root = root.ok_or(ParseError::Empty)?;
  trace!(root = root.name(), "parsed document");
  Ok(root)
}

fn local_name(start: &BytesStart<'_>) -> Result<String, ParseError> {
  let name = start.local_name();
  Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<(), ParseError> {
  match stack.last_mut() {
    Some(parent) => {
      parent.push_child(element);
      Ok(())
    }
    None if root.is_none() => {
      *root = Some(element);
      Ok(())
    }
    None => Err(ParseError::MultipleRoots),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_namespace_prefixes() {
    let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
<m:project xmlns:m="http://maven.apache.org/POM/4.0.0">
  <m:version>1.0</m:version>
</m:project>"#;
    let root = parse(doc).unwrap();
    assert_eq!(root.name(), "project");
    assert_eq!(root.child_text("version"), Some("1.0"));
  }

  #[test]
  fn default_namespace_leaves_names_plain() {
    let doc = br#"<project xmlns="http://maven.apache.org/POM/4.0.0"><artifactId>x</artifactId></project>"#;
    let root = parse(doc).unwrap();
    assert_eq!(root.child_text("artifactId"), Some("x"));
  }

  #[test]
  fn unescapes_entities_and_keeps_cdata() {
    let doc = b"<p><a>x &amp; y</a><b><![CDATA[<raw>]]></b></p>";
    let root = parse(doc).unwrap();
    assert_eq!(root.child_text("a"), Some("x & y"));
    assert_eq!(root.child_text("b"), Some("<raw>"));
  }

  #[test]
  fn comments_are_ignored() {
    let doc = b"<!-- head --><p><!-- inner --><a>1</a></p>";
    let root = parse(doc).unwrap();
    assert_eq!(root.elements().len(), 1);
    assert_eq!(root.child_text("a"), Some("1"));
  }

  #[test]
  fn self_closing_elements_are_children() {
    let root = parse(b"<p><a/><b>2</b></p>").unwrap();
    let names: Vec<_> = root.elements().iter().map(Element::name).collect();
    assert_eq!(names, vec!["a", "b"]);
  }

  #[test]
  fn leading_byte_order_mark_is_accepted() {
    let root = parse("\u{feff}<p/>".as_bytes()).unwrap();
    assert_eq!(root.name(), "p");
  }

  #[test]
  fn error_mismatched_end_tag() {
    let result = parse(b"<p><a></p>");
    assert!(matches!(result, Err(ParseError::Xml { .. })));
  }

  #[test]
  fn error_unclosed_element() {
    let result = parse(b"<p><a>1</a>");
    assert_eq!(result, Err(ParseError::Unclosed("p".to_string())));
  }

  #[test]
  fn error_multiple_roots() {
    assert_eq!(parse(b"<a/><b/>"), Err(ParseError::MultipleRoots));
  }

  #[test]
  fn error_empty_document() {
    assert_eq!(parse(b"  \n"), Err(ParseError::Empty));
  }

  #[test]
  fn error_text_outside_root() {
    assert!(matches!(parse(b"not xml at all"), Err(ParseError::StrayText(_))));
  }

  #[test]
  fn error_invalid_utf8() {
    assert!(matches!(parse(&[0x3c, 0xff, 0xfe, 0x3e]), Err(ParseError::Encoding(_))));
  }
}
