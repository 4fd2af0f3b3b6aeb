// src/version/mod.rs

//! Version handling and range matching for package dependencies
//!
//! Package versions use the `major[.minor[.patch...]][-qualifier]` form
//! common to content-package manifests. Dependency declarations carry either
//! a bare minimum version or an interval range such as `[1.0,2.0)`.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// A parsed package version with numeric components and an optional qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
    pub parts: Vec<u64>,
    pub qualifier: Option<String>,
}

impl PackageVersion {
    /// Parse a version string
    ///
    /// Format: `major[.minor[.patch...]][-qualifier]`
    /// Examples:
    /// - "1.2.3" → parts=[1,2,3], qualifier=None
    /// - "1.0" → parts=[1,0], qualifier=None
    /// - "2.4.1-SNAPSHOT" → parts=[2,4,1], qualifier=Some("SNAPSHOT")
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::VersionParse("empty version string".to_string()));
        }

        let (numeric, qualifier) = if let Some(dash_pos) = s.find('-') {
            let (n, q) = s.split_at(dash_pos);
            (n, Some(q[1..].to_string()))
        } else {
            (s, None)
        };

        if let Some(ref q) = qualifier {
            if q.is_empty() {
                return Err(Error::VersionParse(format!("Empty qualifier in '{}'", s)));
            }
        }

        let mut parts = Vec::new();
        for part in numeric.split('.') {
            let value = part.parse::<u64>().map_err(|e| {
                Error::VersionParse(format!("Invalid component '{}' in '{}': {}", part, s, e))
            })?;
            parts.push(value);
        }

        Ok(Self { parts, qualifier })
    }

    /// Compare two package versions
    pub fn compare(&self, other: &PackageVersion) -> Ordering {
        // Numeric components first; missing components count as zero
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        // A plain release sorts above any qualified build. When both sides
        // are semver-compliant, semver's pre-release rules decide; otherwise
        // qualifiers compare lexicographically.
        match (&self.qualifier, &other.qualifier) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                match (
                    Version::parse(&self.to_string()),
                    Version::parse(&other.to_string()),
                ) {
                    (Ok(va), Ok(vb)) => va.cmp(&vb),
                    _ => a.cmp(b),
                }
            }
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", numeric.join("."))?;
        if let Some(ref qualifier) = self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A version range used by dependency declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRange {
    /// Any version is acceptable
    Any,
    /// Bare version: the named version or anything newer
    AtLeast(PackageVersion),
    /// Exact version match, `[1.0]`
    Exact(PackageVersion),
    /// Interval, e.g. `[1.0,2.0)`; an empty bound is unbounded
    Between {
        lo: Option<PackageVersion>,
        lo_inclusive: bool,
        hi: Option<PackageVersion>,
        hi_inclusive: bool,
    },
}

impl VersionRange {
    /// Parse a version range string
    ///
    /// Examples:
    /// - "1.2" → AtLeast(1.2)
    /// - "[1.2]" → Exact(1.2)
    /// - "[1.0,2.0)" → 1.0 <= v < 2.0
    /// - "(,2.0]" → v <= 2.0
    /// - "" or "*" → Any
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(VersionRange::Any);
        }

        let lo_inclusive = match s.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => {
                // No interval syntax: a bare version is a minimum
                return Ok(VersionRange::AtLeast(PackageVersion::parse(s)?));
            }
        };
        let hi_inclusive = match s.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => {
                return Err(Error::VersionParse(format!(
                    "Unterminated version range '{}'",
                    s
                )));
            }
        };

        let inner = &s[1..s.len() - 1];
        let Some((lo_str, hi_str)) = inner.split_once(',') else {
            if !(lo_inclusive && hi_inclusive) {
                return Err(Error::VersionParse(format!(
                    "Exact version range must use square brackets: '{}'",
                    s
                )));
            }
            return Ok(VersionRange::Exact(PackageVersion::parse(inner)?));
        };
        let lo = if lo_str.trim().is_empty() {
            None
        } else {
            Some(PackageVersion::parse(lo_str)?)
        };
        let hi = if hi_str.trim().is_empty() {
            None
        } else {
            Some(PackageVersion::parse(hi_str)?)
        };

        Ok(VersionRange::Between {
            lo,
            lo_inclusive,
            hi,
            hi_inclusive,
        })
    }

    /// Check if a version falls inside this range
    pub fn contains(&self, version: &PackageVersion) -> bool {
        match self {
            VersionRange::Any => true,
            VersionRange::AtLeast(min) => version >= min,
            VersionRange::Exact(v) => version == v,
            VersionRange::Between {
                lo,
                lo_inclusive,
                hi,
                hi_inclusive,
            } => {
                if let Some(lo) = lo {
                    let ok = if *lo_inclusive {
                        version >= lo
                    } else {
                        version > lo
                    };
                    if !ok {
                        return false;
                    }
                }
                if let Some(hi) = hi {
                    let ok = if *hi_inclusive {
                        version <= hi
                    } else {
                        version < hi
                    };
                    if !ok {
                        return false;
                    }
                }
                true
            }
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Any => write!(f, "*"),
            VersionRange::AtLeast(v) => write!(f, "{}", v),
            VersionRange::Exact(v) => write!(f, "[{}]", v),
            VersionRange::Between {
                lo,
                lo_inclusive,
                hi,
                hi_inclusive,
            } => {
                write!(f, "{}", if *lo_inclusive { '[' } else { '(' })?;
                if let Some(lo) = lo {
                    write!(f, "{}", lo)?;
                }
                write!(f, ",")?;
                if let Some(hi) = hi {
                    write!(f, "{}", hi)?;
                }
                write!(f, "{}", if *hi_inclusive { ']' } else { ')' })
            }
        }
    }
}
