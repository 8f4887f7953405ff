use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serializer, Serialize, Deserialize, Deserializer};
use serde::de;

use failure_derive::Fail;

/// Version strings that some platforms report instead of the real version id.
const ALIASES: &[(&str, &str)] = &[
    ("(MC: 1.7.3)", "b1.7.3"),
];

/// A Minecraft version id like `1.20.1`, `b1.7.3` or `24w14a`.
///
/// Versions are ordered with the FlexVer algorithm, and equality follows that ordering,
/// so `1.20.01` and `1.20.1` are the same version.
/// The [`UNKNOWN`](MinecraftVersion::UNKNOWN) sentinel means "no bound" when used
/// as either end of a range.
#[derive(Clone, Debug)]
pub struct MinecraftVersion {
    text: Cow<'static, str>
}
impl MinecraftVersion {
    pub const UNKNOWN: MinecraftVersion = MinecraftVersion { text: Cow::Borrowed("unknown") };

    /// Parse the specified version, normalizing known aliases
    pub fn parse(text: &str) -> Result<MinecraftVersion, InvalidMinecraftVersion> {
        let text = text.trim();
        if text.is_empty() || (text.chars().any(char::is_whitespace) && !is_alias(text)) {
            return Err(InvalidMinecraftVersion(text.into()))
        }
        for &(needle, canonical) in ALIASES {
            if text.contains(needle) {
                return Ok(MinecraftVersion::from_static(canonical))
            }
        }
        Ok(MinecraftVersion { text: Cow::Owned(text.into()) })
    }
    #[inline]
    pub(crate) const fn from_static(text: &'static str) -> MinecraftVersion {
        MinecraftVersion { text: Cow::Borrowed(text) }
    }
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.text == "unknown"
    }
    #[inline]
    fn components(&self) -> Components {
        let text: &str = &self.text;
        // Anything after '+' is build metadata and never affects ordering
        let text = text.split('+').next().unwrap_or(text);
        Components { remaining: text }
    }
    #[inline]
    pub fn is(&self, other: &MinecraftVersion) -> bool {
        self == other
    }
    #[inline]
    pub fn is_newer_than(&self, other: &MinecraftVersion) -> bool {
        self > other
    }
    #[inline]
    pub fn is_at_least(&self, other: &MinecraftVersion) -> bool {
        self >= other
    }
    #[inline]
    pub fn is_older_than(&self, other: &MinecraftVersion) -> bool {
        self < other
    }
    #[inline]
    pub fn is_at_most(&self, other: &MinecraftVersion) -> bool {
        self <= other
    }
    /// Check if this version is within `[start, end]`, where an unknown bound is unbounded
    #[inline]
    pub fn is_in_range(&self, start: &MinecraftVersion, end: &MinecraftVersion) -> bool {
        self.is_in_range_with(true, start, true, end)
    }
    pub fn is_in_range_with(
        &self,
        start_inclusive: bool, start: &MinecraftVersion,
        end_inclusive: bool, end: &MinecraftVersion
    ) -> bool {
        let above_start = start.is_unknown() || match self.cmp(start) {
            Ordering::Greater => true,
            Ordering::Equal => start_inclusive,
            Ordering::Less => false,
        };
        let below_end = end.is_unknown() || match self.cmp(end) {
            Ordering::Less => true,
            Ordering::Equal => end_inclusive,
            Ordering::Greater => false,
        };
        above_start && below_end
    }
    /// Check this version against a range like `[1.17,1.20)`.
    ///
    /// Anything that isn't a range is treated as a single version to compare against.
    pub fn matches_range(&self, range: &str) -> bool {
        match range.parse::<VersionRange>() {
            Ok(range) => range.contains(self),
            Err(_) => MinecraftVersion::parse(range)
                .map_or(false, |other| self.is(&other)),
        }
    }
}
#[inline]
fn is_alias(text: &str) -> bool {
    ALIASES.iter().any(|&(needle, _)| text.contains(needle))
}
impl FromStr for MinecraftVersion {
    type Err = InvalidMinecraftVersion;

    #[inline]
    fn from_str(s: &str) -> Result<Self, InvalidMinecraftVersion> {
        MinecraftVersion::parse(s)
    }
}
impl Default for MinecraftVersion {
    #[inline]
    fn default() -> Self {
        MinecraftVersion::UNKNOWN
    }
}
impl Display for MinecraftVersion {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}
impl Ord for MinecraftVersion {
    fn cmp(&self, other: &MinecraftVersion) -> Ordering {
        let mut left = self.components();
        let mut right = other.components();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (a, b) => {
                    let ordering = Component::compare(a, b);
                    if ordering != Ordering::Equal {
                        return ordering
                    }
                }
            }
        }
    }
}
impl PartialOrd for MinecraftVersion {
    #[inline]
    fn partial_cmp(&self, other: &MinecraftVersion) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for MinecraftVersion {
    #[inline]
    fn eq(&self, other: &MinecraftVersion) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for MinecraftVersion {}
impl Hash for MinecraftVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for component in self.components() {
            component.hash(state);
        }
    }
}
impl Serialize for MinecraftVersion {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where
        S: Serializer {
        serializer.serialize_str(&self.text)
    }
}
impl<'de> Deserialize<'de> for MinecraftVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error> where
        D: Deserializer<'de> {
        struct VersionVisitor;
        impl<'de> de::Visitor<'de> for VersionVisitor {
            type Value = MinecraftVersion;

            fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
                formatter.write_str("a MinecraftVersion")
            }

            fn visit_str<E>(self, v: &str) -> Result<MinecraftVersion, E> where
                E: de::Error, {
                MinecraftVersion::from_str(v).map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_str(VersionVisitor)
    }
}

/// One FlexVer component: a run of digits, a run of anything else,
/// or a pre-release marker like `-pre`.
#[derive(Copy, Clone, Debug)]
enum Component<'a> {
    Numeric(&'a str),
    Text(&'a str),
    PreRelease(&'a str),
}
impl<'a> Component<'a> {
    #[inline]
    fn text(self) -> &'a str {
        match self {
            Component::Numeric(s) | Component::Text(s) | Component::PreRelease(s) => s
        }
    }
    #[inline]
    fn digits(self) -> &'a str {
        self.text().trim_start_matches('0')
    }
    /// A missing component sorts below any present component except a pre-release.
    ///
    /// Text sorts below digits when the two meet, so alpha (`a1.2.6`) and beta (`b1.7.3`)
    /// ids come before every release.
    fn compare(left: Option<Component>, right: Option<Component>) -> Ordering {
        use self::Component::*;
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(PreRelease(_))) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (Some(PreRelease(_)), None) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(PreRelease(a)), Some(PreRelease(b))) => a.cmp(b),
            (Some(PreRelease(_)), Some(_)) => Ordering::Less,
            (Some(_), Some(PreRelease(_))) => Ordering::Greater,
            (Some(a @ Numeric(_)), Some(b @ Numeric(_))) => {
                let (a, b) = (a.digits(), b.digits());
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            },
            (Some(Text(_)), Some(Numeric(_))) => Ordering::Less,
            (Some(Numeric(_)), Some(Text(_))) => Ordering::Greater,
            (Some(a), Some(b)) => a.text().cmp(b.text()),
        }
    }
}
impl<'a> Hash for Component<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            Component::Numeric(_) => {
                0u8.hash(state);
                self.digits().hash(state);
            },
            Component::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            },
            Component::PreRelease(s) => {
                2u8.hash(state);
                s.hash(state);
            }
        }
    }
}
struct Components<'a> {
    remaining: &'a str
}
impl<'a> Iterator for Components<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Component<'a>> {
        let first = self.remaining.chars().next()?;
        let numeric = first.is_ascii_digit();
        let end = self.remaining.char_indices()
            .find(|&(_, c)| c.is_ascii_digit() != numeric)
            .map_or(self.remaining.len(), |(index, _)| index);
        let (run, remaining) = self.remaining.split_at(end);
        self.remaining = remaining;
        Some(if numeric {
            Component::Numeric(run)
        } else if run.len() > 1 && run.starts_with('-') {
            Component::PreRelease(run)
        } else {
            Component::Text(run)
        })
    }
}

/// A range of versions in interval notation: `[1.17,1.20)`, `(,1.12.2]` or `[1.18,)`.
///
/// An empty end is stored as [`MinecraftVersion::UNKNOWN`], which leaves that side unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub start: MinecraftVersion,
    pub start_inclusive: bool,
    pub end: MinecraftVersion,
    pub end_inclusive: bool
}
impl VersionRange {
    #[inline]
    pub fn contains(&self, version: &MinecraftVersion) -> bool {
        version.is_in_range_with(
            self.start_inclusive, &self.start,
            self.end_inclusive, &self.end
        )
    }
}
impl FromStr for VersionRange {
    type Err = InvalidVersionRange;

    fn from_str(s: &str) -> Result<VersionRange, InvalidVersionRange> {
        let error = || InvalidVersionRange(s.into());
        let trimmed = s.trim();
        let start_inclusive = match trimmed.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(error())
        };
        let end_inclusive = match trimmed.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(error())
        };
        if trimmed.len() < 2 {
            return Err(error())
        }
        let inner = &trimmed[1..trimmed.len() - 1];
        let comma = inner.find(',').ok_or_else(error)?;
        if inner[comma + 1..].contains(',') {
            return Err(error())
        }
        let bound = |text: &str| -> Result<MinecraftVersion, InvalidVersionRange> {
            let text = text.trim();
            if text.is_empty() {
                Ok(MinecraftVersion::UNKNOWN)
            } else {
                MinecraftVersion::parse(text).map_err(|_| error())
            }
        };
        Ok(VersionRange {
            start: bound(&inner[..comma])?,
            start_inclusive,
            end: bound(&inner[comma + 1..])?,
            end_inclusive
        })
    }
}
impl Display for VersionRange {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(if self.start_inclusive { "[" } else { "(" })?;
        if !self.start.is_unknown() {
            write!(f, "{}", self.start)?;
        }
        f.write_str(",")?;
        if !self.end.is_unknown() {
            write!(f, "{}", self.end)?;
        }
        f.write_str(if self.end_inclusive { "]" } else { ")" })
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Invalid minecraft version {:?}", _0)]
pub struct InvalidMinecraftVersion(String);
#[derive(Debug, Fail)]
#[fail(display = "Invalid version range {:?}", _0)]
pub struct InvalidVersionRange(String);
