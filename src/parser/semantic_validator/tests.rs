//! Tests for the semantic validation system

use super::*;
use crate::parser::{codes, parse_script};

// ============================================================================
// Helper Functions
// ============================================================================

fn context() -> ValidationContext {
    ValidationContext::new(vec![
        GlobalBinding::new("Cauldron", &["dump"]),
        GlobalBinding::new("math", &["floor", "ceil", "abs"]),
    ])
}

/// Parse source and validate, returning errors
fn validate(source: &str) -> Vec<ValidationError> {
    let script = parse_script(source).expect("Parse should succeed");
    validate_script(&script, &context())
}

/// Check if errors contain a specific rule
fn has_rule(errors: &[ValidationError], rule_id: &str) -> bool {
    errors.iter().any(|e| e.rule_id == rule_id)
}

/// Get errors for a specific rule
fn for_rule<'a>(errors: &'a [ValidationError], rule_id: &str) -> Vec<&'a ValidationError> {
    errors.iter().filter(|e| e.rule_id == rule_id).collect()
}

// ============================================================================
// Undefined Variable Tests
// ============================================================================

#[test]
fn test_undefined_variable_simple() {
    let errors = validate("let y = x + 1\nCauldron.dump(y)");

    let undef_errors = for_rule(&errors, "undefined-variable");
    assert_eq!(undef_errors.len(), 1);
    assert!(undef_errors[0].message.contains("'x'"));
    assert_eq!(undef_errors[0].code, codes::UNDEFINED_VARIABLE);
    assert!(undef_errors[0].is_error());
}

#[test]
fn test_undefined_variable_ok_when_declared() {
    let source = r#"
let x = 5
let y = x + 1
Cauldron.dump(y)
"#;

    let errors = validate(source);
    assert!(!has_rule(&errors, "undefined-variable"));
}

#[test]
fn test_undefined_variable_globals_ok() {
    let errors = validate("Cauldron.dump(math.floor(1.5))");
    assert!(for_rule(&errors, "undefined-variable").is_empty());
}

#[test]
fn test_undefined_variable_self_reference() {
    let errors = validate("let x = x + 1");
    assert!(has_rule(&errors, "undefined-variable"));
}

#[test]
fn test_undefined_variable_block_scoped() {
    let source = r#"
if (true) {
    let inner = 1
}
Cauldron.dump(inner)
"#;

    let errors = validate(source);
    assert_eq!(for_rule(&errors, "undefined-variable").len(), 1);
}

#[test]
fn test_undefined_variable_for_loop_binding() {
    let source = r#"
let items = [1, 2, 3]
for (let item of items) {
    Cauldron.dump(item * 2)
}
"#;

    let errors = validate(source);
    assert!(for_rule(&errors, "undefined-variable").is_empty());
}

#[test]
fn test_undefined_variable_try_catch() {
    let source = r#"
try {
    throw "boom"
} catch (err) {
    Cauldron.dump(err)
}
"#;

    let errors = validate(source);
    assert!(for_rule(&errors, "undefined-variable").is_empty());
}

#[test]
fn test_undefined_variable_assignment() {
    let errors = validate("total = 3");
    let undef_errors = for_rule(&errors, "undefined-variable");
    assert_eq!(undef_errors.len(), 1);
    assert!(undef_errors[0].message.contains("undeclared"));
}

#[test]
fn test_undefined_variables_reported_in_source_order() {
    let errors = validate("Cauldron.dump(a)\nCauldron.dump(b)\nCauldron.dump(c)");
    let names: Vec<_> = for_rule(&errors, "undefined-variable")
        .iter()
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        names,
        vec![
            "Undefined variable 'a'",
            "Undefined variable 'b'",
            "Undefined variable 'c'"
        ]
    );
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn test_unknown_record() {
    let errors = validate("let p = new Point { x: 1 }\nCauldron.dump(p)");
    let unknown = for_rule(&errors, "unknown-record");
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].code, codes::UNKNOWN_RECORD);
}

#[test]
fn test_record_construction_before_declaration_ok() {
    let source = r#"
Cauldron.dump(new Point { x: 1, y: 2 })
record Point { x, y }
"#;

    let errors = validate(source);
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
}

#[test]
fn test_unknown_field() {
    let source = r#"
record Point { x, y }
Cauldron.dump(new Point { x: 1, z: 3 })
"#;

    let errors = validate(source);
    let unknown = for_rule(&errors, "unknown-field");
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("'z'"));
    assert_eq!(unknown[0].code, codes::UNKNOWN_FIELD);
}

#[test]
fn test_duplicate_record_and_field() {
    let source = r#"
record Point { x, x }
record Point { y }
"#;

    let errors = validate(source);
    let duplicates = for_rule(&errors, "record-declaration");
    assert_eq!(duplicates.len(), 2);
    assert!(duplicates
        .iter()
        .all(|e| e.code == codes::DUPLICATE_DECLARATION));
}

// ============================================================================
// Loop Control Tests
// ============================================================================

#[test]
fn test_break_outside_loop() {
    let errors = validate("break");
    assert_eq!(for_rule(&errors, "loop-control").len(), 1);
}

#[test]
fn test_continue_inside_nested_if_ok() {
    let source = r#"
for (let i of list.range(3)) {
    if (i == 1) {
        continue
    }
    Cauldron.dump(i)
}
"#;

    let script = parse_script(source).unwrap();
    let ctx = ValidationContext::new(vec![
        GlobalBinding::new("Cauldron", &["dump"]),
        GlobalBinding::new("list", &["range"]),
    ]);
    let errors = validate_script(&script, &ctx);
    assert!(errors.is_empty(), "unexpected: {:?}", errors);
}

// ============================================================================
// Assignment Tests
// ============================================================================

#[test]
fn test_const_reassignment() {
    let source = r#"
const limit = 3
limit = 4
"#;

    let errors = validate(source);
    let const_errors = for_rule(&errors, "const-assign");
    assert_eq!(const_errors.len(), 1);
    assert_eq!(const_errors[0].code, codes::CONST_ASSIGNMENT);
}

#[test]
fn test_const_member_mutation_ok() {
    let source = r#"
const point = {x: 1}
point.x = 2
Cauldron.dump(point)
"#;

    let errors = validate(source);
    assert!(!has_rule(&errors, "const-assign"));
}

#[test]
fn test_global_assignment() {
    let errors = validate("Cauldron = 1");
    assert_eq!(for_rule(&errors, "const-assign").len(), 1);
}

// ============================================================================
// Unknown Member Tests
// ============================================================================

#[test]
fn test_unknown_member_on_global() {
    let errors = validate("Cauldron.print(1)");
    let unknown = for_rule(&errors, "unknown-member");
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].message, "'Cauldron' has no member 'print'");
}

#[test]
fn test_unknown_member_ignores_shadowing_local() {
    let source = r#"
let math = {anything: 1}
Cauldron.dump(math.anything)
"#;

    let errors = validate(source);
    assert!(!has_rule(&errors, "unknown-member"));
    assert_eq!(for_rule(&errors, "shadowed-global").len(), 1);
}

// ============================================================================
// Unused Variable Tests
// ============================================================================

#[test]
fn test_unused_variable_simple() {
    let source = r#"
let x = 5
Cauldron.dump(10)
"#;

    let errors = validate(source);
    let unused_errors = for_rule(&errors, "unused-variable");
    assert_eq!(unused_errors.len(), 1);
    assert!(unused_errors[0].message.contains("'x'"));
    assert_eq!(unused_errors[0].severity, Severity::Warning);
}

#[test]
fn test_unused_variable_ok_when_used() {
    let errors = validate("let x = 5\nCauldron.dump(x)");
    assert!(!has_rule(&errors, "unused-variable"));
}

#[test]
fn test_unused_variable_underscore_prefix() {
    let errors = validate("let _unused = 5");
    assert!(for_rule(&errors, "unused-variable").is_empty());
}

#[test]
fn test_unused_variable_assignment_is_not_use() {
    let errors = validate("let x = 5\nx = 6");
    assert_eq!(for_rule(&errors, "unused-variable").len(), 1);
}

#[test]
fn test_unused_shadowed_binding_reported_separately() {
    let source = r#"
let x = 1
if (true) {
    let x = 2
    Cauldron.dump(x)
}
"#;

    let errors = validate(source);
    let unused_errors = for_rule(&errors, "unused-variable");
    assert_eq!(unused_errors.len(), 1);
    assert_eq!(unused_errors[0].span.start_line, 1);
}

// ============================================================================
// Unreachable Code Tests
// ============================================================================

#[test]
fn test_unreachable_after_return() {
    let source = r#"
return 5
Cauldron.dump(10)
"#;

    let errors = validate(source);
    let unreachable = for_rule(&errors, "unreachable-code");
    assert_eq!(unreachable.len(), 1);
    assert_eq!(unreachable[0].severity, Severity::Warning);
}

#[test]
fn test_unreachable_ok_after_conditional_return() {
    let source = r#"
if (true) {
    return 5
}
Cauldron.dump(10)
"#;

    let errors = validate(source);
    assert!(for_rule(&errors, "unreachable-code").is_empty());
}

#[test]
fn test_unreachable_after_both_branches_return() {
    let source = r#"
if (true) {
    return 5
} else {
    throw "no"
}
Cauldron.dump(10)
"#;

    let errors = validate(source);
    assert_eq!(for_rule(&errors, "unreachable-code").len(), 1);
}

// ============================================================================
// Ordering and Conversion
// ============================================================================

#[test]
fn test_rules_report_in_registration_order() {
    let source = r#"
let unused = missing
Cauldron.nope()
"#;

    let errors = validate(source);
    let reported: Vec<_> = errors.iter().map(|e| e.code).collect();
    assert_eq!(
        reported,
        vec![
            codes::UNDEFINED_VARIABLE,
            codes::UNKNOWN_MEMBER,
            codes::UNUSED_VARIABLE
        ]
    );
}

#[test]
fn test_validation_error_into_diagnostic() {
    let errors = validate("let y = x");
    let diagnostic: Diagnostic = errors[0].clone().into();

    assert_eq!(diagnostic.code, "CS0100");
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.span, SourceSpan::new(8, 9));
}

#[test]
fn test_validator_lists_rules() {
    let ids: Vec<_> = Validator::new().rules().map(|(id, _)| id).collect();
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], "record-declaration");
    assert_eq!(ids[9], "shadowed-global");
}
