/*!
The typed query surface a routine resolves its parameters through.

A [`Resolver`] is handed to the routine explicitly (there is no process
global) and runs in one of two modes. *Discovery* answers every query with
its default (or a placeholder) and records it, reconstructing the parameter
surface without touching any real tokens. *Execution* matches queries
against the actual token stream, converting and enforcing for real. The
[`Command`][crate::Command] driver runs the same routine through both, in
that order.

Optional results are explicit: [`Value<T>`] is `Present(T)` or `Absent`,
and a query either takes no default ([`get`][Resolver::get]), takes one and
returns `T` directly ([`get_or`][Resolver::get_or]), or requires the
argument outright ([`require`][Resolver::require]). An optional query with
a default is not expressible, by design.
*/

use crate::convert::{ConvertError, FromToken};
use crate::error::Error;
use crate::identifier::{Identifier, IntoIdentifier};
use crate::log::QueryLog;
use crate::matcher::{Binding, Matcher, Strictness};
use crate::tokens::TokenStream;

/**
An optional resolution result: the value, or nothing.

Mirrors [`Option`] deliberately, but as its own type so that use sites
match on presence explicitly rather than coercing.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Value<T> {
    Present(T),
    Absent,
}

impl<T> Value<T> {
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Value::Present(_))
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The value, if present.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Value::Present(value) => Some(value),
            Value::Absent => None,
        }
    }

    /// The value, or `default` if absent.
    #[inline]
    pub fn value_or(self, default: T) -> T {
        match self {
            Value::Present(value) => value,
            Value::Absent => default,
        }
    }
}

impl<T> From<Value<T>> for Option<T> {
    #[inline]
    fn from(value: Value<T>) -> Self {
        value.value()
    }
}

#[derive(Debug)]
enum Phase {
    Discovery,
    Execution(Matcher),
}

#[derive(Debug)]
pub struct Resolver {
    phase: Phase,
    log: QueryLog,
}

impl Resolver {
    /**
    A discovery-mode resolver: queries are logged and always succeed with
    the supplied default or a type placeholder. Malformed identifiers still
    fail; naming errors are hard errors in every mode.
    */
    #[must_use]
    pub fn discovery() -> Self {
        Self {
            phase: Phase::Discovery,
            log: QueryLog::new(),
        }
    }

    /// An execution-mode resolver over an already-classified stream.
    pub fn new(stream: TokenStream, strictness: Strictness) -> Result<Self, Error> {
        Ok(Self {
            phase: Phase::Execution(Matcher::new(stream, strictness)?),
            log: QueryLog::new(),
        })
    }

    /**
    Convenience for incremental use: classify `args` (program name first)
    and resolve leniently, with no completeness checking.
    */
    pub fn lenient<I>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(TokenStream::parse(args)?, Strictness::Lenient)
    }

    /**
    Query a boolean flag: `true` iff the flag is present.

    Flags are presence-only. A flag supplied as `name=value` fails to
    convert, whatever the value says.
    */
    pub fn flag(&mut self, identifier: impl IntoIdentifier) -> Result<bool, Error> {
        let mut identifier = identifier.into_identifier()?;
        identifier.set_optional();
        self.log.record(&identifier, false);

        match self.phase {
            Phase::Discovery => Ok(false),
            Phase::Execution(ref mut matcher) => match matcher.resolve_named(&identifier)? {
                None => Ok(false),
                Some(Binding::Presence) => Ok(true),
                Some(Binding::Value(raw)) => Err(Error::conversion(
                    &identifier,
                    ConvertError::PresenceOnly {
                        raw: raw.to_owned(),
                    },
                )),
            },
        }
    }

    /// Query an optional argument with no default.
    pub fn get<T: FromToken>(&mut self, identifier: impl IntoIdentifier) -> Result<Value<T>, Error> {
        let mut identifier = identifier.into_identifier()?;
        identifier.set_optional();
        self.log.record(&identifier, identifier.is_named());

        match self.phase {
            Phase::Discovery => Ok(Value::Absent),
            Phase::Execution(ref mut matcher) => Ok(match resolve_value(matcher, &identifier)? {
                Some(value) => Value::Present(value),
                None => Value::Absent,
            }),
        }
    }

    /// Query an optional argument, falling back to `default` when absent.
    pub fn get_or<T: FromToken>(
        &mut self,
        identifier: impl IntoIdentifier,
        default: T,
    ) -> Result<T, Error> {
        let mut identifier = identifier.into_identifier()?;
        identifier.set_optional();
        self.log.record(&identifier, identifier.is_named());

        match self.phase {
            Phase::Discovery => Ok(default),
            Phase::Execution(ref mut matcher) => {
                Ok(resolve_value(matcher, &identifier)?.unwrap_or(default))
            }
        }
    }

    /// Query a required argument. Absence is a hard error in every mode;
    /// there is no silent-missing behavior for required arguments.
    pub fn require<T: FromToken>(&mut self, identifier: impl IntoIdentifier) -> Result<T, Error> {
        let identifier = identifier.into_identifier()?;
        self.log.record(&identifier, identifier.is_named());

        match self.phase {
            Phase::Discovery => Ok(T::default()),
            Phase::Execution(ref mut matcher) => resolve_value(matcher, &identifier)?
                .ok_or_else(|| Error::MissingArgument {
                    identifier: identifier.to_string(),
                }),
        }
    }

    /**
    The catch-all query: claim every remaining positional token and convert
    each independently, preserving original order. Empty if nothing is
    left.
    */
    pub fn rest<T: FromToken>(&mut self) -> Result<Vec<T>, Error> {
        let mut identifier = Identifier::variadic();
        identifier.set_optional();
        self.log.record(&identifier, false);

        match self.phase {
            Phase::Discovery => Ok(Vec::new()),
            Phase::Execution(ref mut matcher) => {
                let raws = matcher.resolve_variadic()?;
                raws.into_iter()
                    .map(|raw| {
                        T::from_token(raw)
                            .map_err(|error| Error::conversion(Identifier::variadic(), error))
                    })
                    .collect()
            }
        }
    }

    #[must_use]
    pub fn log(&self) -> &QueryLog {
        &self.log
    }

    /**
    End the cycle: run the strict-mode completeness check, if any, and
    yield the query log. Discovery resolvers finish unconditionally;
    their log is the discovered parameter surface.
    */
    pub fn finish(self) -> Result<QueryLog, Error> {
        if let Phase::Execution(ref matcher) = self.phase {
            matcher.finalize()?;
        }

        Ok(self.log)
    }
}

/// Resolve a named or positional identifier to a converted value, or
/// `None` when no token matched.
fn resolve_value<T: FromToken>(
    matcher: &mut Matcher,
    identifier: &Identifier,
) -> Result<Option<T>, Error> {
    let raw = if identifier.is_named() {
        match matcher.resolve_named(identifier)? {
            None => None,
            Some(Binding::Value(raw)) => Some(raw),
            Some(Binding::Presence) => {
                return Err(Error::NeedsValue {
                    identifier: identifier.to_string(),
                });
            }
        }
    } else {
        matcher.resolve_positional(identifier)?
    };

    raw.map(|raw| T::from_token(raw).map_err(|error| Error::conversion(identifier, error)))
        .transpose()
}
