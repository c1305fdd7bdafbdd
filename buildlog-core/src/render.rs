//! Conversion of domain values into styled documents
//!
//! Anything that can appear in a log message implements [`Render`]. New
//! types join by implementing the trait next to their definition; call
//! sites do not change.

use crate::doc::Doc;
use crate::event::Severity;
use crate::types::{JobId, PackageName, Version, VersionRange};
use crossterm::style::Color;
use std::path::{Path, PathBuf};

/// Convert a value into a [`Doc`].
///
/// Implementations must be pure: the same value always yields the same
/// document.
pub trait Render {
    fn render(&self) -> Doc;
}

impl Render for Doc {
    fn render(&self) -> Doc {
        self.clone()
    }
}

impl Render for str {
    fn render(&self) -> Doc {
        Doc::text(self)
    }
}

impl Render for String {
    fn render(&self) -> Doc {
        Doc::text(self.as_str())
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> Doc {
        (**self).render()
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&self) -> Doc {
        (**self).render()
    }
}

impl Render for PackageName {
    fn render(&self) -> Doc {
        Doc::text(self.as_str())
    }
}

impl Render for Version {
    fn render(&self) -> Doc {
        Doc::text(self.to_string())
    }
}

impl Render for VersionRange {
    fn render(&self) -> Doc {
        Doc::text(self.to_string())
    }
}

impl Render for JobId {
    fn render(&self) -> Doc {
        Doc::text(self.as_str())
    }
}

impl Render for Severity {
    fn render(&self) -> Doc {
        Doc::text(self.as_str())
    }
}

impl Render for Path {
    fn render(&self) -> Doc {
        Doc::text(self.display().to_string()).fg(Color::Cyan)
    }
}

impl Render for PathBuf {
    fn render(&self) -> Doc {
        self.as_path().render()
    }
}
