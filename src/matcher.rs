/*!
The resolution engine: binds identifiers to tokens.

The [`Matcher`] owns the [`TokenStream`] for one cycle and is the single
source of truth for which tokens are claimed and which identifiers have
already been queried. It works entirely in raw token text; typed conversion
and defaults live a layer up, in [`Resolver`][crate::Resolver].

Strict mode carries the number of distinct identifiers the cycle is
expected to query (known from the discovery pass). The completeness check
runs the moment that count is reached, including at construction when it
is zero, so the query that crosses the threshold is the one that reports
any token left unclaimed.
*/

use crate::error::Error;
use crate::identifier::Identifier;
use crate::tokens::{Claim, Token, TokenKind, TokenStream};

/// Whether a cycle enforces completeness, and against what expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Incremental use: unclaimed tokens are never an error.
    Lenient,

    /// Every token must be claimed and exactly `expected` distinct
    /// identifiers must be queried by the end of the cycle.
    Strict { expected: usize },
}

/// How a named identifier was bound to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'m> {
    /// Bound to `name=value` (or a bare flag fused with its value).
    Value(&'m str),

    /// Bound to a bare flag: presence only.
    Presence,
}

#[derive(Debug)]
pub struct Matcher {
    stream: TokenStream,
    strictness: Strictness,
    queried: Vec<Identifier>,
    variadic_done: bool,
}

impl Matcher {
    /**
    Bind a matcher to a token stream for one resolution cycle.

    In strict mode with an expectation of zero the completeness check runs
    immediately, so a stream that still contains tokens fails here rather
    than at some query that will never come.
    */
    pub fn new(stream: TokenStream, strictness: Strictness) -> Result<Self, Error> {
        let matcher = Self {
            stream,
            strictness,
            queried: Vec::new(),
            variadic_done: false,
        };

        if strictness == (Strictness::Strict { expected: 0 }) {
            matcher.unclaimed_check()?;
        }

        Ok(matcher)
    }

    #[must_use]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /**
    Locate and claim the unclaimed token matching any alias of `identifier`.

    `Ok(None)` means no match; whether that is a default or a
    missing-argument error is the caller's decision. Two unclaimed matches
    mean the same logical parameter was supplied twice under different
    aliases, which is an error here and now.
    */
    pub fn resolve_named(&mut self, identifier: &Identifier) -> Result<Option<Binding<'_>>, Error> {
        debug_assert!(identifier.is_named());
        self.record_query(identifier)?;

        let matches = self.stream.unclaimed_named(identifier.aliases());
        let found = match matches[..] {
            [] => None,
            [index] => {
                self.stream.claim(index, Claim::Claimed);
                Some(index)
            }
            _ => {
                return Err(Error::RepeatedToken {
                    token: identifier.to_string(),
                });
            }
        };

        self.crossing_check()?;

        Ok(found.map(|index| match self.stream.tokens()[index].kind {
            TokenKind::Assignment { ref value, .. } => Binding::Value(value),
            TokenKind::Flag { .. } => Binding::Presence,
            TokenKind::Positional { .. } => unreachable!("named lookup returned a positional"),
        }))
    }

    /**
    Locate and claim the positional token at `identifier`'s index.

    An index already swallowed by the catch-all is a conflict in every
    mode; re-querying an index claimed individually is caught earlier, as a
    duplicate query.
    */
    pub fn resolve_positional(&mut self, identifier: &Identifier) -> Result<Option<&str>, Error> {
        let ordinal = identifier
            .position()
            .expect("resolve_positional requires a positional identifier");
        self.record_query(identifier)?;

        let found = match self.stream.positional(ordinal) {
            None => None,
            Some(index) => match self.stream.tokens()[index].claim {
                Claim::Unclaimed => {
                    self.stream.claim(index, Claim::Claimed);
                    Some(index)
                }
                _ => {
                    return Err(Error::VariadicConflict {
                        identifier: identifier.to_string(),
                    });
                }
            },
        };

        self.crossing_check()?;

        Ok(found.map(|index| token_value(&self.stream.tokens()[index])))
    }

    /**
    Claim every remaining unclaimed positional token, in original order.

    If some indices were already claimed individually, only the remainder
    is yielded. A second catch-all query in the same cycle is not a
    duplicate; it simply finds nothing left.
    */
    pub fn resolve_variadic(&mut self) -> Result<Vec<&str>, Error> {
        if !self.variadic_done {
            self.variadic_done = true;
            self.queried.push(Identifier::variadic());
        }

        let indices = self.stream.unclaimed_positionals();
        for &index in &indices {
            self.stream.claim(index, Claim::ByVariadic);
        }

        self.crossing_check()?;

        Ok(indices
            .iter()
            .map(|&index| token_value(&self.stream.tokens()[index]))
            .collect())
    }

    /**
    End-of-cycle check. Strict mode fails if any token was never claimed,
    or if the number of distinct queries differs from the expectation.
    Lenient cycles always pass.
    */
    pub fn finalize(&self) -> Result<(), Error> {
        if let Strictness::Strict { expected } = self.strictness {
            self.unclaimed_check()?;

            if self.queried.len() != expected {
                return Err(Error::QueryCountMismatch {
                    resolved: self.queried.len(),
                    expected,
                });
            }
        }

        Ok(())
    }

    /// Record a query for duplicate detection. `queried` stays free of
    /// overlaps, so its length is the distinct-query count.
    fn record_query(&mut self, identifier: &Identifier) -> Result<(), Error> {
        if self.queried.iter().any(|known| known.overlaps(identifier)) {
            return Err(Error::DuplicateQuery {
                identifier: identifier.to_string(),
            });
        }

        self.queried.push(identifier.clone());
        Ok(())
    }

    /// Run the unclaimed-token check at the moment the distinct-query count
    /// reaches the expectation. Queries beyond it are left for `finalize`,
    /// so a more specific per-query error can surface first.
    fn crossing_check(&self) -> Result<(), Error> {
        match self.strictness {
            Strictness::Strict { expected } if self.queried.len() == expected => {
                self.unclaimed_check()
            }
            _ => Ok(()),
        }
    }

    fn unclaimed_check(&self) -> Result<(), Error> {
        match self.stream.first_unclaimed() {
            Some(token) => Err(Error::UnrecognizedToken {
                token: token.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn token_value(token: &Token) -> &str {
    match token.kind {
        TokenKind::Positional { ref value, .. } => value,
        _ => unreachable!("positional lookup returned a named token"),
    }
}
