//! `lines`: print a range of lines from each input file.
//!
//! A small demonstration of resolving arguments by query: the `options`
//! routine below is the program's entire parameter declaration. Run with
//! `--help` to see the surface it produces.

use std::fs;

use anyhow::Context;
use parley::{Command, Error, Resolver};

#[derive(Debug)]
struct Options {
    numbered: bool,
    from: u32,
    to: Option<u32>,
    paths: Vec<String>,
}

fn options(args: &mut Resolver) -> Result<Options, Error> {
    Ok(Options {
        numbered: args.flag(["-n", "--number", "prefix each line with its number"])?,
        from: args.get_or(["-f", "--from", "first line to print, 1-based"], 1)?,
        to: args.get(["-t", "--to", "last line to print"])?.value(),
        paths: args.rest()?,
    })
}

fn main() -> anyhow::Result<()> {
    let options = Command::new("lines")
        .description("Print a range of lines from each input file.")
        .execute(options);

    for path in &options.paths {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;

        for (index, line) in content.lines().enumerate() {
            let number = index as u32 + 1;

            if number < options.from {
                continue;
            }
            if options.to.is_some_and(|last| number > last) {
                break;
            }

            match options.numbered {
                true => println!("{number:>6}  {line}"),
                false => println!("{line}"),
            }
        }
    }

    Ok(())
}
