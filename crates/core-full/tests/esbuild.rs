// Tests for esbuild stderr parsing
use modkit_core_full::toolchain::esbuild::parse_messages;
use modkit_core_full::toolchain::CompilerMessage;

const STDERR: &str = r#"✘ [ERROR] Could not resolve "left-pad"

    src/functions/hello/index.ts:1:20:
      1 │ import leftPad from "left-pad";
        ╵                     ~~~~~~~~~~

  You can mark the path "left-pad" as external to exclude it from the bundle.

▲ [WARNING] Comparison with -0 using the "===" operator will also match 0 [equals-negative-zero]

    src/index.ts:4:6:
      4 │ if (x === -0) {}
        ╵       ~~~

✘ [ERROR] Unexpected end of file

1 warning and 2 errors
"#;

#[test]
fn test_parse_messages_with_locations() {
    let (errors, warnings) = parse_messages(STDERR);

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0],
        CompilerMessage::new(r#"Could not resolve "left-pad""#).at(
            "src/functions/hello/index.ts",
            1,
            20
        )
    );
    assert_eq!(errors[1], CompilerMessage::new("Unexpected end of file"));

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].file.as_deref(), Some("src/index.ts"));
    assert_eq!(warnings[0].line, Some(4));
}

#[test]
fn test_compiler_message_display() {
    let located = CompilerMessage::new("boom").at("src/index.ts", 3, 7);
    assert_eq!(located.to_string(), "src/index.ts:3:7: boom");
    assert_eq!(CompilerMessage::new("boom").to_string(), "boom");
}

#[test]
fn test_parse_empty_stderr() {
    let (errors, warnings) = parse_messages("");
    assert!(errors.is_empty());
    assert!(warnings.is_empty());
}
