use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One (interpreter, abi, platform) combination drawn from a wheel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagTriple<'a> {
    pub python: &'a str,
    pub abi: &'a str,
    pub platform: &'a str,
}

impl fmt::Display for TagTriple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.python, self.abi, self.platform)
    }
}

/// Cross product of the dot-separated tag fields, python outermost.
pub fn tag_triples<'a>(
    py_version: &'a str,
    abi: &'a str,
    platform: &'a str,
) -> impl Iterator<Item = TagTriple<'a>> + 'a {
    py_version.split('.').flat_map(move |python| {
        abi.split('.').flat_map(move |abi| {
            platform.split('.').map(move |platform| TagTriple {
                python,
                abi,
                platform,
            })
        })
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportedTag {
    pub python: String,
    pub abi: String,
    pub platform: String,
}

impl SupportedTag {
    pub fn new(python: &str, abi: &str, platform: &str) -> Self {
        Self {
            python: python.to_string(),
            abi: abi.to_string(),
            platform: platform.to_string(),
        }
    }
}

impl From<TagTriple<'_>> for SupportedTag {
    fn from(triple: TagTriple<'_>) -> Self {
        Self::new(triple.python, triple.abi, triple.platform)
    }
}

/// The tag set a host interpreter accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedTags {
    tags: HashSet<SupportedTag>,
}

impl SupportedTags {
    pub fn contains(&self, triple: TagTriple<'_>) -> bool {
        self.tags.contains(&SupportedTag::from(triple))
    }

    /// True as soon as any triple is supported; stops at the first hit.
    pub fn is_compatible<'a>(&self, mut triples: impl Iterator<Item = TagTriple<'a>>) -> bool {
        triples.any(|triple| self.contains(triple))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<SupportedTag> for SupportedTags {
    fn from_iter<I: IntoIterator<Item = SupportedTag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}
