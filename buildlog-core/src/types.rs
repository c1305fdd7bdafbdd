//! Domain types that appear in build-job log messages
//!
//! | Term | Definition |
//! |------|------------|
//! | **PackageName** | Name of a package being built or resolved |
//! | **Version** | Dotted numeric package version (`1.2.3`) |
//! | **VersionRange** | A constraint over versions (`>=1.2 && <2`) |
//! | **JobId** | Opaque key tying stored log rows to one unit of work |
//! | **LogRow** | One persisted log event |

use crate::error::{Error, Result};
use crate::event::Severity;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

// ============================================
// Packages
// ============================================

/// Name of a package, e.g. `text` or `http-client`.
///
/// Names are non-empty and made of ASCII letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let valid = !s.is_empty()
            && !s.starts_with('-')
            && !s.ends_with('-')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(Error::parse("package name", s));
        }
        Ok(PackageName(s.to_string()))
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A package version: one or more non-negative components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(Vec<u64>);

impl Version {
    /// Build a version from its components.
    ///
    /// Returns `None` for an empty component list.
    pub fn new(components: impl Into<Vec<u64>>) -> Option<Self> {
        let components = components.into();
        if components.is_empty() {
            None
        } else {
            Some(Version(components))
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let components = s
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::parse("version", s))?;
        Version::new(components).ok_or_else(|| Error::parse("version", s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

/// A constraint over versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionRange {
    /// Any version at all
    Any,
    /// Exactly this version
    Exactly(Version),
    /// This version or later
    AtLeast(Version),
    /// Strictly earlier than this version
    Below(Version),
    /// Both constraints hold
    Intersect(Box<VersionRange>, Box<VersionRange>),
    /// Either constraint holds
    Union(Box<VersionRange>, Box<VersionRange>),
}

impl VersionRange {
    /// `>=lower && <upper`
    pub fn between(lower: Version, upper: Version) -> Self {
        VersionRange::AtLeast(lower).and(VersionRange::Below(upper))
    }

    pub fn and(self, other: VersionRange) -> Self {
        VersionRange::Intersect(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: VersionRange) -> Self {
        VersionRange::Union(Box::new(self), Box::new(other))
    }

    /// Whether `version` satisfies this range.
    pub fn contains(&self, version: &Version) -> bool {
        match self {
            VersionRange::Any => true,
            VersionRange::Exactly(v) => version == v,
            VersionRange::AtLeast(v) => version >= v,
            VersionRange::Below(v) => version < v,
            VersionRange::Intersect(a, b) => a.contains(version) && b.contains(version),
            VersionRange::Union(a, b) => a.contains(version) || b.contains(version),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Any => f.write_str("-any"),
            VersionRange::Exactly(v) => write!(f, "=={}", v),
            VersionRange::AtLeast(v) => write!(f, ">={}", v),
            VersionRange::Below(v) => write!(f, "<{}", v),
            VersionRange::Intersect(a, b) => {
                // && binds tighter than ||, so only unions need parentheses here
                for (i, side) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" && ")?;
                    }
                    if matches!(**side, VersionRange::Union(..)) {
                        write!(f, "({})", side)?;
                    } else {
                        write!(f, "{}", side)?;
                    }
                }
                Ok(())
            }
            VersionRange::Union(a, b) => write!(f, "{} || {}", a, b),
        }
    }
}

// ============================================
// Jobs and stored rows
// ============================================

/// Opaque identifier of a unit of work whose log rows are stored together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        JobId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId(s)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One log event as persisted by the database sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// When the row was written
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub job_id: JobId,
    /// Plain-text flattening of the event's document
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_package_name_validation() {
        assert!("http-client".parse::<PackageName>().is_ok());
        assert!("base64".parse::<PackageName>().is_ok());
        assert!("".parse::<PackageName>().is_err());
        assert!("-lead".parse::<PackageName>().is_err());
        assert!("has space".parse::<PackageName>().is_err());
    }

    #[test]
    fn test_version_parse_and_display() {
        assert_eq!(v("1.2.3").components(), &[1, 2, 3]);
        assert_eq!(v("0.10").to_string(), "0.10");
        assert!("1..2".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
        assert!("1.x".parse::<Version>().is_err());
        assert!(Version::new(Vec::<u64>::new()).is_none());
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("2") > v("1.99.99"));
    }

    #[test]
    fn test_version_range_display() {
        assert_eq!(VersionRange::Any.to_string(), "-any");
        assert_eq!(VersionRange::Exactly(v("1.2")).to_string(), "==1.2");
        assert_eq!(
            VersionRange::between(v("1.2"), v("2")).to_string(),
            ">=1.2 && <2"
        );

        let union = VersionRange::Exactly(v("1.0")).or(VersionRange::AtLeast(v("3")));
        assert_eq!(union.to_string(), "==1.0 || >=3");
        assert_eq!(
            union.and(VersionRange::Below(v("4"))).to_string(),
            "(==1.0 || >=3) && <4"
        );
    }

    #[test]
    fn test_version_range_contains() {
        let range = VersionRange::between(v("1.2"), v("2"));
        assert!(range.contains(&v("1.2")));
        assert!(range.contains(&v("1.9.9")));
        assert!(!range.contains(&v("2")));
        assert!(!range.contains(&v("1.1")));
        assert!(VersionRange::Any.contains(&v("0")));
    }

    #[test]
    fn test_job_id_generate_is_unique() {
        assert_ne!(JobId::generate(), JobId::generate());
        assert_eq!(JobId::from("job-42").as_str(), "job-42");
    }
}
