/*!
Canonical representation of what a parameter is called.

An [`Identifier`] is exactly one of three things: a set of named aliases
(`-v`, `--verbose`), a positional index, or the catch-all marker used by
variadic queries. Identifiers are constructed at each query call site,
validated on the spot, and live for a single resolution cycle.

Call sites rarely build an [`Identifier`] by hand; the query methods on
[`Resolver`][crate::Resolver] accept anything implementing
[`IntoIdentifier`], so `args.require::<i32>(["-c", "--count"])` and
`args.require::<String>(0)` both work directly.
*/

use core::cmp::Ordering;
use core::fmt;

use joinery::JoinableIterator;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    /// Aliases, sorted shorter-then-longer at construction so that the
    /// display form is independent of declaration order.
    Named { aliases: Vec<String> },
    Positional { index: usize, name: Option<String> },
    Variadic,
}

/**
The name (alias set), position, or catch-all marker a parameter is requested
by, plus its help metadata.

Identifiers are immutable once built, except for the `optional` flag: a query
that supplies a default (or has a benign absent state) marks the identifier
optional via [`set_optional`][Identifier::set_optional], exactly once, so
that help listings can sort required parameters first.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    shape: Shape,
    description: Option<String>,
    optional: bool,
}

impl Identifier {
    /**
    Build a named identifier from a list of strings.

    Strings starting with a hyphen are aliases and must be well formed:
    single-letter names take exactly one hyphen (`-x`, never a digit),
    longer names take exactly two (`--example`). A string with no hyphen is
    a description; if several are given, the last one wins. Empty strings
    are ignored.
    */
    pub fn named<I, S>(strings: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(strings, None)
    }

    /// Build a positional identifier for the 0-based index `index`.
    #[must_use]
    pub fn positional(index: usize) -> Self {
        Self {
            shape: Shape::Positional { index, name: None },
            description: None,
            optional: false,
        }
    }

    /// Build the catch-all marker claimed by variadic queries. It carries
    /// no name and overlaps nothing, including another catch-all.
    #[must_use]
    pub fn variadic() -> Self {
        Self {
            shape: Shape::Variadic,
            description: None,
            optional: false,
        }
    }

    pub(crate) fn build<I, S>(strings: I, position: Option<usize>) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aliases: Vec<String> = Vec::new();
        let mut description = None;
        let mut name = None;

        for string in strings {
            let string = string.as_ref();

            if string.is_empty() {
                continue;
            } else if string.starts_with('-') {
                validate_alias(string)?;

                if aliases.iter().any(|known| known == string) {
                    return Err(Error::RepeatedAlias {
                        alias: string.to_owned(),
                    });
                }

                aliases.push(string.to_owned());
            } else if position.is_some() && string.starts_with('<') && string.ends_with('>') {
                name = Some(string.to_owned());
            } else {
                description = Some(string.to_owned());
            }
        }

        let shape = match (aliases.is_empty(), position) {
            (false, Some(_)) => return Err(Error::NamedAndPositional),
            (true, None) => return Err(Error::UnnamedParameter),
            (true, Some(index)) => Shape::Positional { index, name },
            (false, None) => {
                aliases.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
                Shape::Named { aliases }
            }
        };

        Ok(Self {
            shape,
            description,
            optional: false,
        })
    }

    /// Two identifiers overlap iff they are both positional with equal
    /// index, or they share at least one alias. Symmetric.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match (&self.shape, &other.shape) {
            (Shape::Named { aliases }, Shape::Named { aliases: others }) => {
                aliases.iter().any(|alias| others.contains(alias))
            }
            (Shape::Positional { index, .. }, Shape::Positional { index: other, .. }) => {
                index == other
            }
            _ => false,
        }
    }

    /// Whether `alias` (hyphens included) is one of this identifier's names.
    #[must_use]
    pub fn contains_alias(&self, alias: &str) -> bool {
        match self.shape {
            Shape::Named { ref aliases } => aliases.iter().any(|known| known == alias),
            _ => false,
        }
    }

    /// Whether this identifier covers the positional index `index`.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        matches!(self.shape, Shape::Positional { index: own, .. } if own == index)
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        match self.shape {
            Shape::Named { ref aliases } => aliases,
            _ => &[],
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self.shape {
            Shape::Positional { index, .. } => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self.shape, Shape::Named { .. })
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        matches!(self.shape, Shape::Variadic)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Mark this identifier optional for help-listing purposes. Called at
    /// most once, by the query that knows a default exists.
    pub fn set_optional(&mut self) {
        debug_assert!(!self.optional);
        self.optional = true;
    }

    /**
    Ordering for help listings only: positionals sort by index and precede
    all named identifiers; among named ones, required precede optional,
    then lexicographic by the longest alias with hyphens stripped and
    uppercase folded to lowercase (so `-a` < `-B` < `-c`); the catch-all
    sorts last.

    Deliberately not an [`Ord`] implementation: distinct identifiers can
    compare equal here.
    */
    #[must_use]
    pub fn usage_order(&self, other: &Self) -> Ordering {
        self.usage_key().cmp(&other.usage_key())
    }

    fn usage_key(&self) -> (u8, usize, bool, String) {
        match self.shape {
            Shape::Positional { index, .. } => (0, index, false, String::new()),
            Shape::Named { ref aliases } => {
                // sorted shorter-then-longer, so the longest is last
                let longest = aliases.last().expect("a named identifier has aliases");
                let folded = longest.trim_start_matches('-').to_lowercase();
                (1, 0, self.optional, folded)
            }
            Shape::Variadic => (2, 0, false, String::new()),
        }
    }
}

/**
The canonical display form: aliases shorter-then-longer joined by `|`
(`-l|--long`), `<index>` or the declared `<name>` for positionals, and an
ellipsis for the catch-all.
*/
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Named { ref aliases } => write!(f, "{}", aliases.iter().join_with('|')),
            Shape::Positional { index, ref name } => match name {
                Some(name) => f.write_str(name),
                None => write!(f, "<{index}>"),
            },
            Shape::Variadic => f.write_str("..."),
        }
    }
}

fn validate_alias(alias: &str) -> Result<(), Error> {
    let malformed = || Error::MalformedAlias {
        alias: alias.to_owned(),
    };

    if let Some(name) = alias.strip_prefix("--") {
        // long names may contain digits anywhere, but never a third hyphen
        match name.len() >= 2 && !name.starts_with('-') {
            true => Ok(()),
            false => Err(malformed()),
        }
    } else {
        let name = &alias[1..];
        let mut chars = name.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_ascii_digit() => Ok(()),
            _ => Err(malformed()),
        }
    }
}

/**
Conversion into an [`Identifier`], giving query call sites their compact
spellings:

- `"-v"`: a single alias
- `["-c", "--count", "how many times"]`: aliases plus a description
- `0`: a positional index
- `(0, "<input>")` / `("<input>", 0)`: a positional index plus a display
  name (angle-bracketed) or description (plain)

Conversion validates on the spot, so a malformed name surfaces as the query
call's error.
*/
pub trait IntoIdentifier {
    fn into_identifier(self) -> Result<Identifier, Error>;
}

impl IntoIdentifier for Identifier {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Ok(self)
    }
}

impl IntoIdentifier for &str {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Identifier::build([self], None)
    }
}

impl IntoIdentifier for usize {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Ok(Identifier::positional(self))
    }
}

impl IntoIdentifier for (usize, &str) {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Identifier::build([self.1], Some(self.0))
    }
}

impl IntoIdentifier for (&str, usize) {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Identifier::build([self.0], Some(self.1))
    }
}

impl<const N: usize> IntoIdentifier for [&str; N] {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Identifier::build(self, None)
    }
}

impl IntoIdentifier for &[&str] {
    #[inline]
    fn into_identifier(self) -> Result<Identifier, Error> {
        Identifier::build(self.iter().copied(), None)
    }
}
