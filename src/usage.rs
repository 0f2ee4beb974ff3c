/*!
Rendering of the usage message from a discovery-pass query log.

Formatting here is deliberately plain: a usage line, an arguments section,
an options section. The interesting part is that the listing is derived
entirely from the queries the routine made; there is no schema to walk.
*/

use core::fmt::{self, Write};

use indent_write::fmt::IndentWriter;
use lazy_format::lazy_format;

use crate::identifier::Identifier;
use crate::log::QueryLog;

const WRAP_COLUMN: usize = 76;

/// Render the usage message for `program` from the queries in `log`.
#[must_use]
pub fn render(program: &str, description: &str, log: &QueryLog) -> String {
    let mut out = String::new();
    write_usage(&mut out, program, description, log).expect("writing to a String cannot fail");
    out
}

fn write_usage(
    out: &mut String,
    program: &str,
    description: &str,
    log: &QueryLog,
) -> fmt::Result {
    let mut entries = log.distinct_entries();
    entries.sort_by(|(a, _), (b, _)| a.usage_order(b));

    let (named, arguments): (Vec<(&Identifier, bool)>, Vec<(&Identifier, bool)>) = entries
        .into_iter()
        .partition(|(identifier, _)| identifier.is_named());

    write!(out, "Usage: {program} [options]")?;
    for &(identifier, _) in &arguments {
        match (identifier.is_variadic(), identifier.is_optional()) {
            (true, _) => write!(out, " [...]")?,
            (_, true) => write!(out, " [{identifier}]")?,
            (_, false) => write!(out, " {identifier}")?,
        }
    }
    writeln!(out)?;

    if !description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", textwrap::fill(description, WRAP_COLUMN))?;
    }

    if !arguments.is_empty() {
        let rows: Vec<(String, Option<&str>)> = arguments
            .iter()
            .map(|&(identifier, _)| (identifier.to_string(), identifier.description()))
            .collect();
        section(out, "Arguments", &rows)?;
    }

    let mut rows: Vec<(String, Option<&str>)> = named
        .iter()
        .map(|&(identifier, assignment_style)| {
            (form(identifier, assignment_style), identifier.description())
        })
        .collect();
    rows.push(("-h|--help".to_owned(), Some("print this usage message")));
    section(out, "Options", &rows)
}

fn form(identifier: &Identifier, assignment_style: bool) -> String {
    let form = lazy_format!(match (assignment_style) {
        true => ("{identifier}=<value>"),
        false => ("{identifier}"),
    });
    form.to_string()
}

fn section(out: &mut String, title: &str, rows: &[(String, Option<&str>)]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}:")?;

    let width = rows.iter().map(|(form, _)| form.len()).max().unwrap_or(0);
    let wrap = WRAP_COLUMN.saturating_sub(width + 4).max(24);
    let mut out = IndentWriter::new("  ", out);

    for (form, description) in rows {
        match description {
            None => writeln!(out, "{form}")?,
            Some(text) => {
                let lines = textwrap::wrap(text, wrap);
                let mut lines = lines.iter();

                match lines.next() {
                    None => writeln!(out, "{form}")?,
                    Some(first) => writeln!(out, "{form:width$}  {first}")?,
                }
                for line in lines {
                    writeln!(out, "{:width$}  {line}", "")?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_discovered_surface() {
        let mut log = QueryLog::new();

        let mut verbose = Identifier::named(["-v", "--verbose", "say more"]).unwrap();
        verbose.set_optional();
        log.record(&verbose, false);

        log.record(&Identifier::named(["-c", "--count", "how many"]).unwrap(), true);

        let input = Identifier::build(["<input>", "the input file"], Some(0)).unwrap();
        log.record(&input, false);

        let text = render("demo", "A demonstration.", &log);

        assert!(text.starts_with("Usage: demo [options] <input>\n"));
        assert!(text.contains("A demonstration."));
        assert!(text.contains("<input>"));
        assert!(text.contains("the input file"));
        assert!(text.contains("-c|--count=<value>"));
        assert!(text.contains("-v|--verbose"));
        assert!(!text.contains("-v|--verbose=<value>"));
        assert!(text.contains("-h|--help"));

        // required options are listed before optional ones
        let count = text.find("-c|--count").unwrap();
        let verbose = text.find("-v|--verbose").unwrap();
        assert!(count < verbose);
    }

    #[test]
    fn variadic_marker_in_usage_line() {
        let mut log = QueryLog::new();
        let mut rest = Identifier::variadic();
        rest.set_optional();
        log.record(&rest, false);

        let text = render("demo", "", &log);
        assert!(text.starts_with("Usage: demo [options] [...]\n"));
        assert!(text.contains("..."));
    }
}
