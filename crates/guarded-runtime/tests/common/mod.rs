//! Shared test utilities
//!
//! Helpers that run GuardedUSB programs against in-memory input and output.

#![allow(dead_code)]

use guarded_runtime::{Diagnostic, Guarded, RuntimeConfig, RuntimeResult};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Run `source` with prompts disabled, feeding it `input`
///
/// Returns the run result together with everything written to output,
/// including output produced before a runtime fault.
pub fn run_with_input(source: &str, input: &str) -> (RuntimeResult<()>, String) {
    let runtime = Guarded::with_config(RuntimeConfig::quiet());
    let mut output: Vec<u8> = Vec::new();
    let result = runtime.run(source, &mut input.as_bytes(), &mut output);
    let text = String::from_utf8(output).expect("program output is UTF-8");
    (result, text)
}

/// Assert that source code runs successfully and prints `expected`
///
/// # Example
/// ```
/// assert_output("|[ println 1 + 2 ]|", "3\n");
/// ```
pub fn assert_output(source: &str, expected: &str) {
    assert_output_with_input(source, "", expected);
}

/// Like `assert_output`, reading from `input`
pub fn assert_output_with_input(source: &str, input: &str, expected: &str) {
    let (result, output) = run_with_input(source, input);
    if let Err(diags) = result {
        panic!("Expected success, got errors: {:?}", diags);
    }
    assert_eq!(output, expected);
}

/// Run `source` and return its single fatal diagnostic
pub fn run_error(source: &str) -> Diagnostic {
    run_error_with_input(source, "")
}

/// Like `run_error`, reading from `input`
pub fn run_error_with_input(source: &str, input: &str) -> Diagnostic {
    match run_with_input(source, input).0 {
        Err(mut diags) => {
            assert_eq!(diags.len(), 1, "Expected one diagnostic, got {:?}", diags);
            diags.remove(0)
        }
        Ok(()) => panic!("Expected an error, got success"),
    }
}

/// Assert that source code fails with the rendered message `expected`
///
/// # Example
/// ```
/// assert_error("|[ print 1 / 0 ]|", "Error: line 1 division by 0");
/// ```
pub fn assert_error(source: &str, expected: &str) {
    assert_eq!(run_error(source).to_string(), expected);
}

/// Assert that source code produces an error with a specific code
pub fn assert_error_code(source: &str, expected_code: &str) {
    let diag = run_error(source);
    assert_eq!(
        diag.code, expected_code,
        "Expected error code {}, got {} ({})",
        expected_code, diag.code, diag
    );
}

/// Lex, parse and check without running
pub fn check_only(source: &str) -> RuntimeResult<()> {
    Guarded::new().check(source).map(|_| ())
}
