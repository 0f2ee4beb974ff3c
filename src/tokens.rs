/*!
Classification of the raw argument vector into tokens.

A [`TokenStream`] is built once per resolution cycle from the process
argument vector (element 0, the program name, is dropped). Shell quoting is
long gone by the time we see the vector: each element is one atomic value,
and only the *first* `=` in a `name=value` element acts as a delimiter.

The stream also carries the claim marks that make "each token is consumed at
most once" enforceable; only the [`Matcher`][crate::matcher::Matcher]
mutates them.
*/

use std::collections::HashSet;
use std::fmt;

use crate::error::Error;

/// Reserved names that ask for the usage message instead of a value cycle.
const HELP_SHORT: &str = "-h";
const HELP_LONG: &str = "--help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    Unclaimed,
    Claimed,
    ByVariadic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `name=value`, or a bare flag fused with its following value.
    Assignment { name: String, value: String },

    /// A bare `-x` or `--name`, including each letter of a `-abc` bundle.
    Flag { name: String },

    /// Anything else, in original order. `ordinal` is the 0-based index
    /// among positional tokens.
    Positional { value: String, ordinal: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) claim: Claim,
}

impl Token {
    fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            claim: Claim::Unclaimed,
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Assignment { ref name, .. } | TokenKind::Flag { ref name } => Some(name),
            TokenKind::Positional { .. } => None,
        }
    }

    pub(crate) fn ordinal(&self) -> Option<usize> {
        match self.kind {
            TokenKind::Positional { ordinal, .. } => Some(ordinal),
            _ => None,
        }
    }
}

/// Render a token the way the user typed it, for error messages.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Assignment { ref name, ref value } => write!(f, "{name}={value}"),
            TokenKind::Flag { ref name } => f.write_str(name),
            TokenKind::Positional { ref value, .. } => f.write_str(value),
        }
    }
}

/// Intermediate classification, before fusion strips the separator and
/// assigns positional ordinals.
#[derive(Debug)]
enum Item {
    Assignment { name: String, value: String },
    Flag { name: String, last_in_bundle: bool },
    Positional { value: String },
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    help_requested: bool,
}

impl TokenStream {
    /**
    Classify a raw argument vector. The first element is the program name
    and is dropped; the rest become assignment, flag, and positional tokens,
    with the first `--` acting as the end-of-options separator.

    Duplicate flag names (in any mix of `name=value` and bare form) and
    malformed flag-shaped tokens are rejected here, before any query runs.
    */
    pub fn parse<I>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::parse_expecting(args, &HashSet::new())
    }

    /**
    Like [`parse`][Self::parse], but with the set of flag names known to
    expect an attached value (hyphens included, e.g. `"-x"`).

    A bare flag in that set, last in its bundle and immediately followed by
    a positional element, fuses with that element into an assignment: given
    `-x -1`, a program that queries `-x` as an integer sees `x = -1`, while
    one that queries it as a boolean sees a flag and a positional `-1`. The
    set comes from the discovery pass's query log.
    */
    pub fn parse_expecting<I>(args: I, value_names: &HashSet<String>) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut items = Vec::new();
        let mut help_requested = false;
        let mut separated = false;

        for arg in args.into_iter().skip(1) {
            let arg: String = arg.into();

            if separated {
                items.push(Item::Positional { value: arg });
            } else if arg == "--" {
                separated = true;
                items.push(Item::Separator);
            } else if arg.starts_with('-') && !leads_with_digit(&arg[1..]) && arg != "-" {
                classify_flag_shaped(arg, &mut items, &mut help_requested)?;
            } else {
                items.push(Item::Positional { value: arg });
            }
        }

        let items = fuse_values(items, value_names);

        // each flag name may be supplied at most once per invocation
        let mut seen = HashSet::new();
        for item in &items {
            if let Item::Assignment { name, .. } | Item::Flag { name, .. } = item {
                if !seen.insert(name.clone()) {
                    return Err(Error::RepeatedToken { token: name.clone() });
                }
            }
        }

        let mut tokens = Vec::with_capacity(items.len());
        let mut ordinal = 0;

        for item in items {
            tokens.push(Token::new(match item {
                Item::Separator => continue,
                Item::Assignment { name, value } => TokenKind::Assignment { name, value },
                Item::Flag { name, .. } => TokenKind::Flag { name },
                Item::Positional { value } => {
                    let token = TokenKind::Positional { value, ordinal };
                    ordinal += 1;
                    token
                }
            }));
        }

        Ok(Self {
            tokens,
            help_requested,
        })
    }

    /// Whether the reserved `-h`/`--help` pair appeared before the
    /// separator. Help tokens never enter the stream itself.
    #[must_use]
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn claim(&mut self, index: usize, claim: Claim) {
        debug_assert!(self.tokens[index].claim == Claim::Unclaimed);
        self.tokens[index].claim = claim;
    }

    /// Indices of unclaimed named tokens whose name is one of `aliases`.
    pub(crate) fn unclaimed_named(&self, aliases: &[String]) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.claim == Claim::Unclaimed)
            .filter(|(_, token)| {
                token
                    .name()
                    .is_some_and(|name| aliases.iter().any(|alias| alias == name))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// The positional token with the given ordinal, claimed or not.
    pub(crate) fn positional(&self, ordinal: usize) -> Option<usize> {
        self.tokens
            .iter()
            .position(|token| token.ordinal() == Some(ordinal))
    }

    /// Indices of all unclaimed positional tokens, in original order.
    pub(crate) fn unclaimed_positionals(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.claim == Claim::Unclaimed)
            .filter(|(_, token)| matches!(token.kind, TokenKind::Positional { .. }))
            .map(|(index, _)| index)
            .collect()
    }

    /// The first token never claimed by any query, for completeness errors.
    pub(crate) fn first_unclaimed(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|token| token.claim == Claim::Unclaimed)
    }
}

fn leads_with_digit(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Classify one flag-shaped element (leading hyphen, not a negative number,
/// not the separator) into items, expanding short bundles.
fn classify_flag_shaped(
    arg: String,
    items: &mut Vec<Item>,
    help_requested: &mut bool,
) -> Result<(), Error> {
    let unrecognized = |token: &str| Error::UnrecognizedToken {
        token: token.to_owned(),
    };

    let (name, value) = match memchr::memchr(b'=', arg.as_bytes()) {
        Some(split) => (&arg[..split], Some(&arg[split + 1..])),
        None => (&arg[..], None),
    };

    if let Some(long) = name.strip_prefix("--") {
        // a third hyphen or a one-letter long name is always rejected
        if long.len() < 2 || long.starts_with('-') {
            return Err(unrecognized(&arg));
        }

        match value {
            Some(value) => items.push(Item::Assignment {
                name: name.to_owned(),
                value: value.to_owned(),
            }),
            None if name == HELP_LONG => *help_requested = true,
            None => items.push(Item::Flag {
                name: name.to_owned(),
                last_in_bundle: true,
            }),
        }
    } else {
        let shorts = &name[1..];

        if shorts.is_empty() || shorts.chars().any(|c| c.is_ascii_digit()) {
            return Err(unrecognized(&arg));
        }

        match value {
            // an attached value is only valid on a single short flag
            Some(value) => match shorts.chars().count() {
                1 => items.push(Item::Assignment {
                    name: name.to_owned(),
                    value: value.to_owned(),
                }),
                _ => return Err(unrecognized(&arg)),
            },
            None => {
                let count = shorts.chars().count();
                for (position, short) in shorts.chars().enumerate() {
                    let name = format!("-{short}");
                    match name == HELP_SHORT {
                        true => *help_requested = true,
                        false => items.push(Item::Flag {
                            name,
                            last_in_bundle: position + 1 == count,
                        }),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Fuse bare flags that are known to expect a value with the positional
/// element that immediately follows them. The separator blocks fusion, so
/// `-x -- val` never binds `val` to `-x`.
fn fuse_values(items: Vec<Item>, value_names: &HashSet<String>) -> Vec<Item> {
    let mut fused = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();

    while let Some(item) = items.next() {
        match item {
            Item::Flag {
                name,
                last_in_bundle: true,
            } if value_names.contains(&name)
                && matches!(items.peek(), Some(Item::Positional { .. })) =>
            {
                let Some(Item::Positional { value }) = items.next() else {
                    unreachable!()
                };
                fused.push(Item::Assignment { name, value });
            }
            item => fused.push(item),
        }
    }

    fused
}
