use insta::assert_snapshot;
use remote_layout::context::Context;
use remote_layout::error::{Error, ParseError, QueryError, ResolveError};
use remote_layout::query::FoundOffset;
use remote_layout::script::{run_script, Lookup, ScriptLine};
use std::fs;

fn context_with_fixtures() -> Context {
    let decls = fs::read_to_string("tests/fixtures/member_offsets.ron").unwrap();

    let mut context = Context::new();
    context.load_declarations(&decls).unwrap();
    context
}

fn run_fixture_script(lookup: Lookup) -> String {
    let queries = fs::read_to_string("tests/fixtures/member_offsets.queries").unwrap();

    let mut context = context_with_fixtures();
    let lines = run_script(&mut context, &queries, lookup);

    lines
        .into_iter()
        .map(|line| match line {
            ScriptLine::Outcome(text) => text,
            ScriptLine::Failure { line, message } => {
                panic!("query on line {line:?} failed: {message}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn fixture_queries() {
    let output = run_fixture_script(Lookup::Type);

    assert_snapshot!(output, @r"
    found offset: 0
    found offset: 8
    found offset: 12
    found offset: 16
    found offset: 18
    type has no member named '5'
    found offset: 0
    found offset: 8
    found offset: 12
    found offset: 16
    found offset: 18
    type has no member named 'f'
    found offset: 0
    found offset: 8
    found offset: 12
    found offset: 16
    found offset: 18
    type has no member named 'f'
    ");
}

#[test]
fn metadata_lookup_agrees_with_type_lookup() {
    assert_eq!(
        run_fixture_script(Lookup::Type),
        run_fixture_script(Lookup::Metadata)
    );
}

#[test]
fn tuple_indices() {
    let mut context = Context::new();
    let tuple = "(Int, Bool, Float, Bool, Int16)";

    for (index, expected) in [0, 8, 12, 16, 18].into_iter().enumerate() {
        let outcome = context.member_offset(tuple, &index.to_string()).unwrap();
        assert_eq!(outcome, Ok(FoundOffset(expected)));
    }

    for key in ["5", "a", "-1", ""] {
        assert_eq!(
            context.member_offset(tuple, key).unwrap(),
            Err(QueryError::MemberNotFound(key.to_string()))
        );
    }
}

#[test]
fn struct_lookup_is_by_exact_name() {
    let mut context = context_with_fixtures();

    assert_eq!(context.member_offset("A", "c").unwrap(), Ok(FoundOffset(12)));
    assert_eq!(
        context.member_offset("A", "C").unwrap(),
        Err(QueryError::MemberNotFound("C".to_string()))
    );
    // Structs have no positional members.
    assert_eq!(
        context.member_offset("A", "0").unwrap(),
        Err(QueryError::MemberNotFound("0".to_string()))
    );
}

#[test]
fn primitives_have_no_members() {
    let mut context = Context::new();

    assert_eq!(
        context.member_offset("Int", "0").unwrap(),
        Err(QueryError::MemberNotFound("0".to_string()))
    );
}

#[test]
fn repeated_queries_are_idempotent() {
    let mut context = context_with_fixtures();

    let first = context.member_offset("B<Float>", "e").unwrap();
    let cached = context.type_tokens.len();
    let second = context.member_offset("B<Float>", "e").unwrap();

    assert_eq!(first, second);
    assert_eq!(context.type_tokens.len(), cached);
}

#[test]
fn metadata_token_outlives_the_type_expression() {
    let mut context = context_with_fixtures();

    let tok = context.resolve("B<Float>").unwrap();

    assert_eq!(
        context.member_offset_of_metadata(tok, "d").unwrap(),
        Ok(FoundOffset(16))
    );
    assert_eq!(context.resolve("B< Float >").unwrap(), tok);
}

#[test]
fn resolution_failures_are_errors_not_outcomes() {
    let mut context = context_with_fixtures();

    let err = context.member_offset("B<Float, Int>", "a").unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::GenericArity {
            expected: 1,
            found: 2,
            ..
        })
    ));

    let err = context.member_offset("(Int,", "0").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn describe_lists_every_member() {
    let mut context = context_with_fixtures();

    let text = context.describe("B<Float>").unwrap();

    assert_snapshot!(text.trim_end(), @r"
    B<Float>: size 24, align 8, stride 24
      a: Int at offset 0 (size 8, align 8)
      b: Bool at offset 8 (size 1, align 1)
      c: Float at offset 12 (size 4, align 4)
      d: Bool at offset 16 (size 1, align 1)
      e: Int16 at offset 18 (size 2, align 2)
    ");
}

#[test]
fn deeply_nested_queries_are_rejected() {
    let mut context = Context::new();
    let ty = format!("{}Int{}", "(".repeat(50_000), ")".repeat(50_000));

    assert!(matches!(
        context.member_offset(&ty, "0"),
        Err(Error::Parse(ParseError::NestingTooDeep { .. }))
    ));

    let decls = r#"(
        structs: [
            (name: "G", generic_params: ["T"], fields: [(name: "x", ty: "G<(T, T)>")]),
        ],
    )"#;
    context.load_declarations(decls).unwrap();

    assert!(matches!(
        context.member_offset("G<Int>", "x"),
        Err(Error::Resolve(ResolveError::NameTooLong(_)))
    ));

    // Failed resolutions leave the context usable.
    assert_eq!(
        context.member_offset("(Int8, Int)", "1").unwrap(),
        Ok(FoundOffset(8))
    );
}
