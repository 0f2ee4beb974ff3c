/*!
The two-phase driver.

A program's parameter surface is whatever its routine queries. To know the
full surface (for help, and for strict completeness checking) before
extracting real values, [`Command::run`] invokes the routine twice:

1. **Discovery**: against a [`Resolver::discovery`] context. Every query is
   logged and answered with its default or a placeholder; the resulting
   query log is the authoritative surface.
2. **Execution**: against a strict resolver bound to the real token stream,
   with the expected query count and the bare-flag value expectations taken
   from the discovery log.

A `-h`/`--help` anywhere before the `--` separator short-circuits between
the phases: the discovery log is rendered as a usage message and execution
never runs.

The discovery pass runs the routine's body, so the routine must be free of
externally visible effects: compute and return a value, act on it after
`run` comes back.

Nothing below [`Command::execute`] prints or exits; resolution failures are
ordinary [`Error`] values until the outermost driver decides what to do
with them.
*/

use std::{env, process};

use crate::error::Error;
use crate::matcher::Strictness;
use crate::resolver::Resolver;
use crate::tokens::TokenStream;
use crate::usage;

/// Exit code for every resolution failure. There is exactly one failure
/// code; the error taxonomy exists for testability, not for exit statuses.
pub const USAGE_FAILURE_CODE: i32 = 1;

/// The result of a completed [`Command::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// Both phases ran; here is the routine's value.
    Ready(T),

    /// Help was requested; here is the rendered usage message. Execution
    /// was bypassed entirely.
    Help(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Command<'p> {
    program: &'p str,
    description: &'p str,
}

impl<'p> Command<'p> {
    #[must_use]
    pub fn new(program: &'p str) -> Self {
        Self {
            program,
            description: "",
        }
    }

    /// A one-paragraph description shown in the usage message.
    #[must_use]
    pub fn description(mut self, description: &'p str) -> Self {
        self.description = description;
        self
    }

    /**
    Run `routine` through both phases against `args` (program name first).

    The routine is invoked once in discovery mode and, unless help was
    requested, once in execution mode; only the second invocation's value
    is returned. Identifier errors surface from either phase; matching,
    conversion, and completeness errors surface from execution.
    */
    pub fn run<T, I, F>(&self, args: I, mut routine: F) -> Result<Outcome<T>, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: FnMut(&mut Resolver) -> Result<T, Error>,
    {
        let mut discovery = Resolver::discovery();
        routine(&mut discovery)?;
        let log = discovery.finish()?;

        let stream = TokenStream::parse_expecting(args, &log.value_names())?;

        if stream.help_requested() {
            return Ok(Outcome::Help(usage::render(
                self.program,
                self.description,
                &log,
            )));
        }

        let expected = log.distinct_count();
        let mut resolver = Resolver::new(stream, Strictness::Strict { expected })?;
        let value = routine(&mut resolver)?;
        resolver.finish()?;

        Ok(Outcome::Ready(value))
    }

    /**
    The outermost driver: resolve against [`std::env::args`], print help to
    stdout and exit 0, or print a usage error to stderr and exit with
    [`USAGE_FAILURE_CODE`]. Returns the routine's value otherwise.
    */
    pub fn execute<T, F>(&self, routine: F) -> T
    where
        F: FnMut(&mut Resolver) -> Result<T, Error>,
    {
        match self.run(env::args(), routine) {
            Ok(Outcome::Ready(value)) => value,
            Ok(Outcome::Help(text)) => {
                print!("{text}");
                process::exit(0);
            }
            Err(error) => {
                eprintln!("{program}: {error}", program = self.program);
                eprintln!("try \"{program} --help\" for usage", program = self.program);
                process::exit(USAGE_FAILURE_CODE);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run<T>(
        args: &[&str],
        routine: impl FnMut(&mut Resolver) -> Result<T, Error>,
    ) -> Result<Outcome<T>, Error> {
        Command::new("prog").run(args.iter().copied(), routine)
    }

    #[test]
    fn both_phases_run() {
        let outcome = run(&["./prog", "-c=3", "input"], |args| {
            let count: i32 = args.get_or("-c", 1)?;
            let input: String = args.require(0)?;
            Ok((count, input))
        })
        .unwrap();

        assert_eq!(outcome, Outcome::Ready((3, "input".to_owned())));
    }

    #[test]
    fn help_bypasses_execution() {
        // the stray "1" would fail strict completeness, but execution
        // never runs
        let outcome = run(&["./prog", "--help", "1"], |args| {
            args.require::<i32>("-i")
        })
        .unwrap();

        let Outcome::Help(text) = outcome else {
            panic!("expected help");
        };
        assert!(text.contains("-i=<value>"));
        assert!(text.contains("-h|--help"));
    }

    #[test]
    fn unclaimed_tokens_fail_strict_execution() {
        let result = run(&["./prog", "--unknown"], |args| args.get_or("-c", 1));
        assert!(matches!(
            result,
            Err(Error::UnrecognizedToken { token }) if token == "--unknown"
        ));
    }

    #[test]
    fn discovery_drives_value_fusion() {
        // `-x -1`: fused when -x is queried as an integer...
        let outcome = run(&["./prog", "-x", "-1"], |args| args.require::<i32>("-x")).unwrap();
        assert_eq!(outcome, Outcome::Ready(-1));

        // ...but a boolean -x leaves -1 positional
        let outcome = run(&["./prog", "-x", "-1"], |args| {
            Ok((args.flag("-x")?, args.require::<i32>(0)?))
        })
        .unwrap();
        assert_eq!(outcome, Outcome::Ready((true, -1)));
    }

    #[test]
    fn identifier_errors_surface_from_discovery() {
        let result = run(&["./prog"], |args| args.require::<i32>("-long"));
        assert!(matches!(result, Err(Error::MalformedAlias { .. })));
    }
}
