//! File-name classification by glob pattern.

use compact_str::CompactString;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::PatternError;

/// Maps a file name to a type tag. `None` means the file is excluded.
pub trait Classify {
    /// Classify a base file name.
    fn classify(&self, name: &str) -> Option<CompactString>;
}

impl<F> Classify for F
where
    F: Fn(&str) -> Option<String>,
{
    fn classify(&self, name: &str) -> Option<CompactString> {
        self(name).filter(|tag| !tag.is_empty()).map(CompactString::from)
    }
}

/// Ordered set of `(glob pattern, type tag)` rules.
///
/// Patterns use shell-glob syntax (`*`, `?`, `[...]`) and are matched
/// against the base name only. When several patterns match, the earliest
/// rule wins. Rules usually come from a JSON object, which has no meaningful
/// order, so callers should treat the tag of a multiply-matched name as any
/// one of the matching tags.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Vec<String>,
    tags: Vec<CompactString>,
    set: GlobSet,
}

impl Classifier {
    /// Compile a classifier from rules, in evaluation order.
    pub fn new<I, P, T>(rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<CompactString>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();
        let mut tags = Vec::new();

        for (pattern, tag) in rules {
            let pattern = pattern.as_ref();
            let tag = tag.into();
            if tag.is_empty() {
                return Err(PatternError::EmptyTag {
                    pattern: pattern.to_string(),
                });
            }
            let glob = Glob::new(pattern).map_err(|source| PatternError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
            patterns.push(pattern.to_string());
            tags.push(tag);
        }

        let set = builder.build().map_err(|source| PatternError::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self {
            patterns,
            tags,
            set,
        })
    }

    /// Classify a file name, returning the tag of the first matching rule.
    pub fn classify(&self, name: &str) -> Option<&str> {
        self.set
            .matches(name)
            .into_iter()
            .min()
            .map(|index| self.tags[index].as_str())
    }

    /// Rules as `(pattern, tag)` pairs, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns
            .iter()
            .zip(&self.tags)
            .map(|(pattern, tag)| (pattern.as_str(), tag.as_str()))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Classify for Classifier {
    fn classify(&self, name: &str) -> Option<CompactString> {
        Classifier::classify(self, name).map(CompactString::from)
    }
}
