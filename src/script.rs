//! Batch queries: one `<type> <key>` pair per line.
//!
//! The key is everything after the last run of whitespace, so type
//! expressions may contain spaces. Blank lines and lines starting with `//`
//! are skipped.

use crate::context::Context;
use crate::query::render_outcome;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lookup {
    /// Parse and resolve the type for every query.
    #[default]
    Type,
    /// Resolve once, then answer from the cached metadata.
    Metadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptLine {
    /// `found offset: N` or `type has no member named '<key>'`.
    Outcome(String),
    /// The query could not be answered at all. `line` is set for queries
    /// that came from a script.
    Failure {
        line: Option<usize>,
        message: String,
    },
}

/// Split a script line into its type expression and key.
pub fn split_query(line: &str) -> Option<(&str, &str)> {
    let (ty, key) = line.trim().rsplit_once(char::is_whitespace)?;
    let ty = ty.trim_end();

    if ty.is_empty() {
        None
    } else {
        Some((ty, key))
    }
}

pub fn run_query(ctx: &mut Context, ty: &str, key: &str, lookup: Lookup) -> Result<String, String> {
    let outcome = match lookup {
        Lookup::Type => ctx.member_offset(ty, key),
        Lookup::Metadata => ctx
            .resolve(ty)
            .and_then(|tok| ctx.member_offset_of_metadata(tok, key)),
    };

    outcome
        .map(|outcome| render_outcome(&outcome))
        .map_err(|err| err.to_string())
}

/// Answer a single query. A missing member is an `Outcome`; only a type that
/// cannot be parsed or resolved is a `Failure`.
pub fn query_line(
    ctx: &mut Context,
    ty: &str,
    key: &str,
    lookup: Lookup,
    line: Option<usize>,
) -> ScriptLine {
    match run_query(ctx, ty, key, lookup) {
        Ok(outcome) => ScriptLine::Outcome(outcome),
        Err(message) => ScriptLine::Failure { line, message },
    }
}

pub fn describe_line(ctx: &mut Context, ty: &str) -> ScriptLine {
    match ctx.describe(ty) {
        Ok(text) => ScriptLine::Outcome(text.trim_end().to_string()),
        Err(err) => ScriptLine::Failure {
            line: None,
            message: err.to_string(),
        },
    }
}

/// Write outcomes to `out` and failures to `err`. Returns `true` when every
/// query was answered, which is what decides the exit status.
pub fn report(lines: &[ScriptLine], out: &mut impl Write, err: &mut impl Write) -> io::Result<bool> {
    let mut answered = true;

    for line in lines {
        match line {
            ScriptLine::Outcome(text) => writeln!(out, "{text}")?,
            ScriptLine::Failure {
                line: Some(line),
                message,
            } => {
                answered = false;
                writeln!(err, "ERROR: line {line}: {message}")?;
            }
            ScriptLine::Failure {
                line: None,
                message,
            } => {
                answered = false;
                writeln!(err, "ERROR: {message}")?;
            }
        }
    }

    Ok(answered)
}

pub fn run_script(ctx: &mut Context, source: &str, lookup: Lookup) -> Vec<ScriptLine> {
    let mut lines = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let Some((ty, key)) = split_query(trimmed) else {
            lines.push(ScriptLine::Failure {
                line: Some(line),
                message: format!("expected '<type> <key>', found \"{trimmed}\""),
            });
            continue;
        };

        lines.push(query_line(ctx, ty, key, lookup, Some(line)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_the_last_whitespace() {
        assert_eq!(
            split_query("(Int, Bool,  Float) 2"),
            Some(("(Int, Bool,  Float)", "2"))
        );
        assert_eq!(split_query("  B<Float>\tc  "), Some(("B<Float>", "c")));
        assert_eq!(split_query("Int"), None);
    }

    #[test]
    fn unresolvable_lines_do_not_stop_the_script() {
        let mut ctx = Context::new();
        let script = "\
// comment
Missing a

(Int, Bool) 1
Int
";

        let lines = run_script(&mut ctx, script, Lookup::Type);

        assert_eq!(
            lines,
            vec![
                ScriptLine::Failure {
                    line: Some(2),
                    message: "cannot find type 'Missing'".to_string(),
                },
                ScriptLine::Outcome("found offset: 8".to_string()),
                ScriptLine::Failure {
                    line: Some(5),
                    message: "expected '<type> <key>', found \"Int\"".to_string(),
                },
            ]
        );
    }

    fn report_to_strings(lines: &[ScriptLine]) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let answered = report(lines, &mut out, &mut err).unwrap();

        (
            answered,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn missing_members_do_not_fail_the_run() {
        let mut ctx = Context::new();
        let lines = run_script(&mut ctx, "(Int, Bool) 5\n(Int, Bool) x\n", Lookup::Type);

        let (answered, out, err) = report_to_strings(&lines);

        assert!(answered);
        assert_eq!(
            out,
            "type has no member named '5'\ntype has no member named 'x'\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn unresolvable_types_fail_the_run() {
        let mut ctx = Context::new();
        let lines = vec![
            query_line(&mut ctx, "(Int, Bool)", "1", Lookup::Type, None),
            query_line(&mut ctx, "Nope", "a", Lookup::Type, None),
        ];

        let (answered, out, err) = report_to_strings(&lines);

        assert!(!answered);
        assert_eq!(out, "found offset: 8\n");
        assert_eq!(err, "ERROR: cannot find type 'Nope'\n");
    }

    #[test]
    fn script_failures_carry_their_line_number() {
        let mut ctx = Context::new();
        let lines = run_script(&mut ctx, "// header\nInt<Bool> 0\n", Lookup::Metadata);

        let (answered, _, err) = report_to_strings(&lines);

        assert!(!answered);
        assert_eq!(
            err,
            "ERROR: line 2: type 'Int' does not take generic arguments\n"
        );
    }

    #[test]
    fn metadata_lookup_gives_the_same_lines() {
        let script = "(Int8, Double, Bool) 1\n(Int8, Double, Bool) 3\n";

        let by_type = run_script(&mut Context::new(), script, Lookup::Type);
        let by_metadata = run_script(&mut Context::new(), script, Lookup::Metadata);

        assert_eq!(by_type, by_metadata);
        assert_eq!(
            by_type[0],
            ScriptLine::Outcome("found offset: 8".to_string())
        );
    }

    #[test]
    fn describe_is_one_outcome() {
        let mut ctx = Context::new();

        let (answered, out, _) = report_to_strings(&[describe_line(&mut ctx, "(Bool, Int16)")]);

        assert!(answered);
        assert_eq!(
            out,
            "(Bool, Int16): size 4, align 2, stride 4\n  0: Bool at offset 0 (size 1, align 1)\n  1: Int16 at offset 2 (size 2, align 2)\n"
        );

        let (answered, _, err) = report_to_strings(&[describe_line(&mut ctx, "(Bool,")]);

        assert!(!answered);
        assert_eq!(err, "ERROR: unexpected end of type expression\n");
    }
}
