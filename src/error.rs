/*!
The error type shared by every stage of resolution.

Every operation in this crate reports failure by returning an [`Error`];
nothing in the library prints or terminates the process. The variants exist
so that tests (and embedders that want to) can distinguish failure causes,
but a driver is free to treat them all the same way: print the message and
exit with the usage failure code (see [`Command::execute`][crate::Command::execute]).
*/

use crate::convert::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An alias had a malformed hyphen prefix: single-letter names take one
    /// hyphen, longer names take two, and short names cannot be digits.
    #[error("invalid parameter name {alias:?} (expected \"-x\" or \"--name\")")]
    MalformedAlias { alias: String },

    /// The same alias was listed more than once for one parameter.
    #[error("parameter name {alias:?} is listed more than once")]
    RepeatedAlias { alias: String },

    /// A parameter declared both aliases and a position.
    #[error("a parameter cannot be both named and positional")]
    NamedAndPositional,

    /// A parameter declared neither aliases nor a position.
    #[error("a parameter must have at least one name or a position")]
    UnnamedParameter,

    /// A command-line token was malformed (three-hyphen prefixes, `--x`
    /// long names of one letter, digits inside a short bundle), or a
    /// flag-shaped token was never claimed by any query.
    #[error("unrecognized argument {token:?}")]
    UnrecognizedToken { token: String },

    /// The same flag name was supplied more than once on the command line,
    /// in any mix of `name=value` and bare form, or one query matched more
    /// than one token.
    #[error("argument {token} was supplied more than once")]
    RepeatedToken { token: String },

    /// The same identifier (by alias overlap or equal position) was queried
    /// more than once in one resolution cycle.
    #[error("parameter {identifier} was queried more than once")]
    DuplicateQuery { identifier: String },

    /// A required argument had no matching token and no default.
    #[error("required argument {identifier} is missing")]
    MissingArgument { identifier: String },

    /// A positional index was queried after the catch-all query had already
    /// claimed that token.
    #[error("argument {identifier} was already consumed by a catch-all query")]
    VariadicConflict { identifier: String },

    /// A bare flag was queried as a value type, and no value could be bound
    /// to it.
    #[error("{identifier} expects a value, supplied as {identifier}=<value>")]
    NeedsValue { identifier: String },

    /// A matched token's value failed to convert to the requested type.
    #[error("{identifier}: {error}")]
    Conversion {
        identifier: String,
        error: ConvertError,
    },

    /// Strict-mode completeness failure: the number of distinct queries did
    /// not come out equal to the declared parameter count.
    #[error("{resolved} parameters were queried, but {expected} were declared")]
    QueryCountMismatch { resolved: usize, expected: usize },
}

impl Error {
    pub(crate) fn conversion(identifier: impl ToString, error: ConvertError) -> Self {
        Self::Conversion {
            identifier: identifier.to_string(),
            error,
        }
    }
}
