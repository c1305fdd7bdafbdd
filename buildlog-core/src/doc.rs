//! Styled documents
//!
//! A [`Doc`] is an immutable tree of text fragments, hard line breaks,
//! indentation and foreground colours. It is built once by the
//! [`Render`](crate::render::Render) capability and then flattened by each
//! sink in one of two modes:
//!
//! - [`Doc::plain`]: text only, used by the file and database sinks
//! - [`Doc::ansi`]: text decorated with ANSI colour sequences, used by the
//!   terminal sink
//!
//! Both modes lay out line breaks the same way: each level of
//! [`Doc::nest`] indents the following lines by [`INDENT`] spaces.

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::Command;
use std::fmt;
use std::ops::Add;

/// Spaces added per nesting level.
pub const INDENT: usize = 2;

/// An immutable styled document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc(Node);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Node {
    #[default]
    Empty,
    Text(String),
    Line,
    Cat(Vec<Doc>),
    Nest(usize, Box<Doc>),
    Fg(Color, Box<Doc>),
}

impl Doc {
    /// The empty document.
    pub fn empty() -> Self {
        Doc(Node::Empty)
    }

    /// A text fragment. Embedded newlines become hard line breaks so they
    /// pick up the surrounding indentation.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if !s.contains('\n') {
            return if s.is_empty() {
                Doc::empty()
            } else {
                Doc(Node::Text(s))
            };
        }

        let mut parts = Vec::new();
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                parts.push(Doc::line());
            }
            if !line.is_empty() {
                parts.push(Doc(Node::Text(line.to_string())));
            }
        }
        Doc::concat(parts)
    }

    /// A hard line break.
    pub fn line() -> Self {
        Doc(Node::Line)
    }

    /// Concatenate documents left to right.
    pub fn concat(docs: impl IntoIterator<Item = Doc>) -> Self {
        let mut parts: Vec<Doc> = Vec::new();
        for doc in docs {
            match doc.0 {
                Node::Empty => {}
                Node::Cat(inner) => parts.extend(inner),
                node => parts.push(Doc(node)),
            }
        }
        match parts.len() {
            0 => Doc::empty(),
            1 => parts.remove(0),
            _ => Doc(Node::Cat(parts)),
        }
    }

    /// Append `other` after this document.
    pub fn append(self, other: impl Into<Doc>) -> Self {
        Doc::concat([self, other.into()])
    }

    /// Indent every line break inside this document by one more level.
    pub fn nest(self) -> Self {
        if self.is_empty() {
            return self;
        }
        Doc(Node::Nest(INDENT, Box::new(self)))
    }

    /// Annotate this document with a foreground colour.
    pub fn fg(self, color: Color) -> Self {
        if self.is_empty() {
            return self;
        }
        Doc(Node::Fg(color, Box::new(self)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.0, Node::Empty)
    }

    /// Plain-text flattening, no escape sequences.
    pub fn plain(&self) -> Plain<'_> {
        Plain(self)
    }

    /// ANSI-decorated flattening.
    pub fn ansi(&self) -> Ansi<'_> {
        Ansi(self)
    }

    /// Shorthand for `self.plain().to_string()`.
    pub fn to_plain_string(&self) -> String {
        self.plain().to_string()
    }

    /// Shorthand for `self.ansi().to_string()`.
    pub fn to_ansi_string(&self) -> String {
        self.ansi().to_string()
    }
}

impl From<&str> for Doc {
    fn from(s: &str) -> Self {
        Doc::text(s)
    }
}

impl From<String> for Doc {
    fn from(s: String) -> Self {
        Doc::text(s)
    }
}

impl FromIterator<Doc> for Doc {
    fn from_iter<I: IntoIterator<Item = Doc>>(iter: I) -> Self {
        Doc::concat(iter)
    }
}

impl<T: Into<Doc>> Add<T> for Doc {
    type Output = Doc;

    fn add(self, rhs: T) -> Doc {
        self.append(rhs)
    }
}

/// Plain-text view of a [`Doc`].
pub struct Plain<'a>(&'a Doc);

impl fmt::Display for Plain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Layout::new(f, false).walk(self.0, 0)
    }
}

/// ANSI-decorated view of a [`Doc`].
pub struct Ansi<'a>(&'a Doc);

impl fmt::Display for Ansi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Layout::new(f, true).walk(self.0, 0)
    }
}

struct Layout<'w, W> {
    out: &'w mut W,
    ansi: bool,
    // Colours currently open, innermost last.
    colors: Vec<Color>,
}

impl<'w, W: fmt::Write> Layout<'w, W> {
    fn new(out: &'w mut W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            colors: Vec::new(),
        }
    }

    fn walk(&mut self, doc: &Doc, indent: usize) -> fmt::Result {
        match &doc.0 {
            Node::Empty => Ok(()),
            Node::Text(s) => self.out.write_str(s),
            Node::Line => {
                self.out.write_char('\n')?;
                for _ in 0..indent {
                    self.out.write_char(' ')?;
                }
                Ok(())
            }
            Node::Cat(parts) => parts.iter().try_for_each(|part| self.walk(part, indent)),
            Node::Nest(n, inner) => self.walk(inner, indent + n),
            Node::Fg(color, inner) => {
                if !self.ansi {
                    return self.walk(inner, indent);
                }
                SetForegroundColor(*color).write_ansi(&mut *self.out)?;
                self.colors.push(*color);
                self.walk(inner, indent)?;
                self.colors.pop();
                // Restore the enclosing colour rather than resetting past it.
                match self.colors.last() {
                    Some(outer) => SetForegroundColor(*outer).write_ansi(&mut *self.out),
                    None => ResetColor.write_ansi(&mut *self.out),
                }
            }
        }
    }
}
