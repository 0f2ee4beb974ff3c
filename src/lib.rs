/*!
Parley is a query-driven command-line argument resolver: a program declares
its parameters implicitly, by asking for them, instead of through a schema
or a declarative struct.

Each logical parameter is one query against a [`Resolver`], by flag
aliases, by positional index, or by the catch-all, and the engine
discovers, matches, converts, and bounds-checks the value on the spot:

```
use parley::{Command, Error, Outcome, Resolver};

fn options(args: &mut Resolver) -> Result<(String, u32, bool, Vec<String>), Error> {
    Ok((
        args.require(["-o", "--output", "where to write"])?,
        args.get_or(["-c", "--count", "how many times"], 1)?,
        args.flag(["-v", "--verbose", "say more"])?,
        args.rest()?,
    ))
}

let outcome = Command::new("demo")
    .run(["demo", "-o=out.txt", "-c", "3", "a", "b"], options)
    .unwrap();

assert_eq!(
    outcome,
    Outcome::Ready((
        "out.txt".to_owned(),
        3,
        false,
        vec!["a".to_owned(), "b".to_owned()],
    )),
);
```

There is no schema, so the full parameter surface (needed for `--help` and
for rejecting arguments nothing will ever claim) is reconstructed by
running the same routine twice: a logging *discovery* pass whose answers
are all defaults and placeholders, then the real *execution* pass, strict
about completeness, against the actual tokens. [`Command`] drives the two
phases; a [`Resolver`] can also be used on its own, leniently and
incrementally. See the [`command`] module docs for the protocol details.
*/

pub mod command;
pub mod convert;
pub mod error;
pub mod identifier;
pub mod log;
pub mod matcher;
pub mod resolver;
pub mod tokens;
pub mod usage;

pub use command::{Command, Outcome, USAGE_FAILURE_CODE};
pub use convert::{ConvertError, FromToken};
pub use error::Error;
pub use identifier::{Identifier, IntoIdentifier};
pub use log::QueryLog;
pub use matcher::{Binding, Matcher, Strictness};
pub use resolver::{Resolver, Value};
pub use tokens::TokenStream;
