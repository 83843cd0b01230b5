//! Fatal errors: lexing, parsing and runtime failures

mod common;

use common::{run_capture, runtime_error, interpreter_with_input};
use flowlang::diagnostic::DiagnosticRenderer;
use flowlang::interpreter::RuntimeError;
use flowlang::FlowError;

// =============================================================================
// LEX ERRORS
// =============================================================================

#[test]
fn test_unrecognized_character() {
    match run_capture("let x = 1\nlet y = x % 2") {
        Err(FlowError::Lex(e)) => {
            assert_eq!(e.character, '%');
            assert_eq!(e.span.start, 20);
        }
        other => panic!("expected a lex error, got {:?}", other),
    }
}

#[test]
fn test_lex_error_prevents_any_output() {
    assert!(matches!(run_capture("print 1 print 2 @"), Err(FlowError::Lex(_))));
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(run_capture("print \"open"), Err(FlowError::Lex(_))));
}

// =============================================================================
// PARSE ERRORS
// =============================================================================

#[test]
fn test_unmatched_paren() {
    match run_capture("print (1 + 2") {
        Err(FlowError::Parse(e)) => {
            assert!(e.is_end_of_input());
            assert_eq!(e.to_string(), "expected RPAREN, found end of input");
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_unexpected_token() {
    match run_capture("let 5 = x") {
        Err(FlowError::Parse(e)) => {
            assert_eq!(e.to_string(), "expected IDENT, found NUMBER `5`");
            assert_eq!(e.span.start, 4);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_block() {
    assert!(matches!(run_capture("if 1 print 2"), Err(FlowError::Parse(_))));
    assert!(matches!(run_capture("while 1 { print 2"), Err(FlowError::Parse(_))));
}

#[test]
fn test_lone_bang_is_rejected() {
    assert!(matches!(run_capture("print 1 ! 2"), Err(FlowError::Parse(_))));
}

#[test]
fn test_lone_equals_ends_expression() {
    assert!(matches!(run_capture("print a = 1"), Err(FlowError::Parse(_))));
}

#[test]
fn test_parse_error_prevents_any_output() {
    let (mut interpreter, output) = interpreter_with_input("");
    assert!(interpreter.run("print 1 print (").is_err());
    assert_eq!(output.contents(), "");
}

// =============================================================================
// RUNTIME ERRORS
// =============================================================================

#[test]
fn test_runtime_error_keeps_earlier_output() {
    let (mut interpreter, output) = interpreter_with_input("");
    let result = interpreter.run("print \"before\" nothing_here() print \"after\"");
    assert_eq!(
        result,
        Err(FlowError::Runtime(RuntimeError::undefined_function("nothing_here")))
    );
    assert_eq!(output.contents(), "before\n");
}

#[test]
fn test_error_messages() {
    assert_eq!(
        runtime_error("ghost()").to_string(),
        "Undefined function: ghost"
    );
    assert_eq!(
        runtime_error("print \"a\" - \"b\"").to_string(),
        "Unknown operator: str - str"
    );
    assert_eq!(runtime_error("print 1 / 0").to_string(), "Division by zero");
}

#[test]
fn test_flow_error_display_names_stage() {
    let error = run_capture("ghost()").unwrap_err();
    assert_eq!(error.to_string(), "Runtime error: Undefined function: ghost");
    let error = run_capture("print )").unwrap_err();
    assert!(error.to_string().starts_with("Parse error: "));
    let error = run_capture("$").unwrap_err();
    assert!(error.to_string().starts_with("Lex error: "));
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

#[test]
fn test_parse_diagnostic_points_at_token() {
    let source = "let a = 1\nlet = 2\n";
    let error = run_capture(source).unwrap_err();
    let rendered = DiagnosticRenderer::new(source, "demo.flow", false).render(&error.to_diagnostic());
    assert!(rendered.starts_with("error[E0101]: expected IDENT, found OP `=`"));
    assert!(rendered.contains("demo.flow:2:5"));
    assert!(rendered.contains("2 | let = 2"));
    assert!(rendered.contains("help: expected IDENT here"));
}

#[test]
fn test_lex_diagnostic_points_at_character() {
    let source = "print 1 ; print 2";
    let error = run_capture(source).unwrap_err();
    let rendered = DiagnosticRenderer::new(source, "semi.flow", false).render(&error.to_diagnostic());
    assert!(rendered.starts_with("error[E0001]: unrecognized character ';'"));
    assert!(rendered.contains("semi.flow:1:9"));
    assert!(rendered.contains("^ no token starts here"));
}

#[test]
fn test_runtime_diagnostic_has_help() {
    let error = run_capture("ghost()").unwrap_err();
    let rendered = DiagnosticRenderer::new("ghost()", "ghost.flow", false).render(&error.to_diagnostic());
    assert!(rendered.starts_with("error[E0202]: Undefined function: ghost"));
    assert!(rendered.contains("help: declare it with `func ghost(...) { ... }`"));
}
