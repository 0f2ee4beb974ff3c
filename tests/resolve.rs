//! End-to-end resolution scenarios over the public API: incremental lenient
//! use, strict cycles, and the full two-phase protocol.

use parley::{
    Command, ConvertError, Error, Outcome, Resolver, Strictness, TokenStream, Value,
};

fn lenient(args: &[&str]) -> Resolver {
    Resolver::lenient(args.iter().copied()).unwrap()
}

fn strict(args: &[&str], expected: usize) -> Result<Resolver, Error> {
    let stream = TokenStream::parse(args.iter().copied())?;
    Resolver::new(stream, Strictness::Strict { expected })
}

#[test]
fn invalid_input_is_rejected_before_any_query() {
    for args in [
        &["./prog", "--i"][..],
        &["./prog", "-ab=0"],
        &["./prog", "-aa"],
        &["./prog", "-x=0", "-x", "0"],
        &["./prog", "--flag", "--flag"],
        &["./prog", "---x"],
    ] {
        assert!(
            Resolver::lenient(args.iter().copied()).is_err(),
            "{args:?} should fail at classification"
        );
    }
}

#[test]
fn bundled_short_flags() {
    let mut args = lenient(&["./prog", "-a", "-bcd"]);

    assert!(args.flag("-a").unwrap());
    assert!(args.flag("-b").unwrap());
    assert!(args.flag("-c").unwrap());
    assert!(args.flag("-d").unwrap());
}

#[test]
fn assignments_split_at_the_first_equals() {
    let mut args = lenient(&["./prog", "-a=b", "--abc=xy", "-x=y=z"]);

    assert_eq!(args.require::<String>("-a").unwrap(), "b");
    assert_eq!(args.require::<String>("--abc").unwrap(), "xy");
    assert_eq!(args.require::<String>("-x").unwrap(), "y=z");
}

#[test]
fn separator_makes_everything_positional() {
    let mut args = lenient(&["./prog", "--"]);
    assert_eq!(args.rest::<String>().unwrap(), Vec::<String>::new());

    let mut args = lenient(&[
        "./prog", "--flag1", "name0", "--", "name1", "-name2", "--name3", "---name4",
    ]);
    assert_eq!(
        args.rest::<String>().unwrap(),
        vec!["name0", "name1", "-name2", "--name3", "---name4"]
    );
}

#[test]
fn positional_resolution() {
    let mut args = lenient(&["./prog", "0", "1"]);
    assert_eq!(args.require::<i32>(0).unwrap(), 0);
    assert_eq!(args.require::<i32>(("first", 1)).unwrap(), 1);
    assert!(matches!(
        args.require::<i32>(2),
        Err(Error::MissingArgument { .. })
    ));

    let mut args = lenient(&["./prog", "0", "-x=3", "1"]);
    assert_eq!(args.require::<i32>("-x").unwrap(), 3);
    assert_eq!(args.require::<i32>(0).unwrap(), 0);
    assert_eq!(args.require::<i32>(1).unwrap(), 1);
    assert_eq!(args.get_or(2, -1).unwrap(), -1);
    assert_eq!(args.get::<i32>((3, "fourth")).unwrap(), Value::Absent);

    // re-querying an index is a duplicate even though it was absent
    assert!(matches!(
        args.get::<i32>(2),
        Err(Error::DuplicateQuery { .. })
    ));
}

#[test]
fn variadic_yields_the_unclaimed_remainder() {
    let mut args = lenient(&["./prog", "0", "-x=3", "1"]);
    args.require::<i32>(0).unwrap();

    assert_eq!(args.rest::<i32>().unwrap(), vec![1]);
    assert_eq!(args.rest::<i32>().unwrap(), Vec::<i32>::new());
}

#[test]
fn positional_after_variadic_is_a_conflict() {
    let mut args = lenient(&["./prog", "0", "1"]);
    args.rest::<i32>().unwrap();

    assert!(matches!(
        args.get::<i32>(0),
        Err(Error::VariadicConflict { .. })
    ));
}

#[test]
fn width_checked_conversions() {
    let mut args = lenient(&[
        "./prog",
        "--65535=65535",
        "--65536=65536",
        "--permitted=1000000000000",
        "--overflow=100000000000000000000000000000000000000",
    ]);

    assert_eq!(args.require::<u16>("--65535").unwrap(), 65535);
    assert!(matches!(
        args.require::<u16>("--65536"),
        Err(Error::Conversion {
            error: ConvertError::OutOfRange { .. },
            ..
        })
    ));
    assert_eq!(args.require::<i64>("--permitted").unwrap(), 1_000_000_000_000);
    assert!(matches!(
        args.require::<i64>("--overflow"),
        Err(Error::Conversion {
            error: ConvertError::OutOfRange { .. },
            ..
        })
    ));

    // the same literal converts at a wider width
    let mut args = lenient(&["./prog", "--65536=65536"]);
    assert_eq!(args.require::<u32>("--65536").unwrap(), 65536);
}

#[test]
fn strict_cycle_enforces_completeness() {
    // scenario: one declared parameter, one matching token
    let mut args = strict(&["./prog", "-x=0"], 1).unwrap();
    assert_eq!(args.require::<i32>("-x").unwrap(), 0);
    args.finish().unwrap();

    // a token no query will ever claim fails at construction
    assert!(matches!(
        strict(&["./prog", "-i=1"], 0),
        Err(Error::UnrecognizedToken { .. })
    ));

    // expected two queries: -i resolves, then the missing -x reports
    let mut args = strict(&["./prog", "-i=1"], 2).unwrap();
    assert_eq!(args.require::<i32>("-i").unwrap(), 1);
    assert!(matches!(
        args.require::<i32>("-x"),
        Err(Error::MissingArgument { .. })
    ));

    // the query that reaches the expected count reports unclaimed tokens,
    // even when it carries a default
    let mut args = strict(&["./prog", "-i=1"], 1).unwrap();
    assert!(matches!(
        args.get_or("-x", 0),
        Err(Error::UnrecognizedToken { .. })
    ));
}

#[test]
fn strict_positional_cycles() {
    let mut args = strict(&["./prog", "0", "1"], 1).unwrap();
    assert!(matches!(
        args.require::<i32>(0),
        Err(Error::UnrecognizedToken { .. })
    ));

    let mut args = strict(&["./prog", "1"], 2).unwrap();
    assert_eq!(args.get::<i32>(0).unwrap(), Value::Present(1));
    assert_eq!(args.get::<i32>(1).unwrap(), Value::Absent);
    args.finish().unwrap();

    // the catch-all satisfies both tokens as one query
    let mut args = strict(&["./prog", "0", "1"], 1).unwrap();
    assert_eq!(args.rest::<i32>().unwrap(), vec![0, 1]);
    args.finish().unwrap();
}

#[test]
fn duplicate_queries_are_fatal_even_with_defaults() {
    let mut args = strict(&["./prog"], 2).unwrap();

    assert_eq!(args.get_or("--undefined", 0).unwrap(), 0);
    assert!(matches!(
        args.get_or("--undefined", 0),
        Err(Error::DuplicateQuery { .. })
    ));
}

#[test]
fn over_queried_cycles_fail_at_finish() {
    let mut args = strict(&["./prog", "-i=1"], 1).unwrap();
    assert_eq!(args.require::<i32>("-i").unwrap(), 1);
    assert_eq!(args.get_or("-x", 7).unwrap(), 7);

    assert!(matches!(
        args.finish(),
        Err(Error::QueryCountMismatch {
            resolved: 2,
            expected: 1
        })
    ));
}

#[test]
fn two_phase_resolution_with_dashed_values() {
    let outcome = Command::new("prog")
        .run(
            [
                "./prog", "-x", "-1", "-y=-1", "-z=-name", "-w=--name", "-q=---name",
            ],
            |args| {
                Ok((
                    args.require::<i32>("-x")?,
                    args.require::<i32>("-y")?,
                    args.require::<String>("-z")?,
                    args.require::<String>("-w")?,
                    args.require::<String>("-q")?,
                ))
            },
        )
        .unwrap();

    let Outcome::Ready((x, y, z, w, q)) = outcome else {
        panic!("expected a ready outcome");
    };
    assert_eq!(x, -1);
    assert_eq!(y, -1);
    assert_eq!(z, "-name");
    assert_eq!(w, "--name");
    assert_eq!(q, "---name");
}

#[test]
fn discovery_disambiguates_flag_values() {
    let args = ["./prog", "-x", "1"];

    // -x queried as an integer: "1" becomes its value
    let outcome = Command::new("prog")
        .run(args, |args| args.require::<i32>("-x"))
        .unwrap();
    assert_eq!(outcome, Outcome::Ready(1));

    // -x queried as a boolean: "1" stays positional
    let outcome = Command::new("prog")
        .run(args, |args| Ok((args.flag("-x")?, args.require::<i32>(0)?)))
        .unwrap();
    assert_eq!(outcome, Outcome::Ready((true, 1)));
}

#[test]
fn help_enumerates_the_surface_and_bypasses_execution() {
    let routine = |args: &mut Resolver| {
        Ok((
            args.require::<i32>(["--i1", "first knob"])?,
            args.require::<i32>("--i2")?,
            args.get_or("--i3", 0)?,
        ))
    };

    for args in [
        &["./prog", "-h"][..],
        &["./prog", "--help"],
        &["./prog", "--help", "1"],
        &["./prog", "-h", "--i1=5"],
    ] {
        let outcome = Command::new("prog")
            .description("a test program")
            .run(args.iter().copied(), routine)
            .unwrap();

        let Outcome::Help(text) = outcome else {
            panic!("{args:?} should produce help");
        };
        assert!(text.contains("--i1=<value>"));
        assert!(text.contains("first knob"));
        assert!(text.contains("--i2"));
        assert!(text.contains("--i3"));
        assert!(text.contains("a test program"));
    }
}

#[test]
fn string_values_keep_their_equals_signs() {
    let outcome = Command::new("prog")
        .run(["./prog", "-x=y=z"], |args| args.require::<String>("-x"))
        .unwrap();
    assert_eq!(outcome, Outcome::Ready("y=z".to_owned()));
}

#[test]
fn full_surface_end_to_end() {
    let routine = |args: &mut Resolver| {
        Ok((
            args.flag(["-v", "--verbose"])?,
            args.get_or(["-c", "--count"], 1u32)?,
            args.require::<String>((0, "<input>"))?,
            args.rest::<String>()?,
        ))
    };

    let outcome = Command::new("prog")
        .run(
            ["./prog", "--verbose", "--count", "3", "main.txt", "a", "b"],
            routine,
        )
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Ready((
            true,
            3,
            "main.txt".to_owned(),
            vec!["a".to_owned(), "b".to_owned()]
        ))
    );

    // the same routine, minimal invocation: defaults fill in
    let outcome = Command::new("prog")
        .run(["./prog", "main.txt"], routine)
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Ready((false, 1, "main.txt".to_owned(), Vec::new()))
    );
}
