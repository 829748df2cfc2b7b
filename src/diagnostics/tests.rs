//! Tests for span normalization, counting and grouping

use super::*;

/* ===================== Span Normalization ===================== */

#[test]
fn test_zero_length_span_at_end_retracts_start() {
    let source = "let x = 1";
    let len = source.len();

    let span = normalize_span(SourceSpan::new(len, len), source);

    assert_eq!(span, SourceSpan::new(len - 1, len));
}

#[test]
fn test_zero_length_span_at_start_extends_end() {
    let span = normalize_span(SourceSpan::new(0, 0), "abc");

    assert_eq!(span, SourceSpan::new(0, 1));
}

#[test]
fn test_zero_length_span_in_middle_extends_end() {
    let span = normalize_span(SourceSpan::new(4, 4), "let x = 1");

    assert_eq!(span, SourceSpan::new(4, 5));
}

#[test]
fn test_non_empty_span_is_unchanged() {
    let span = normalize_span(SourceSpan::new(2, 6), "let x = 1");

    assert_eq!(span, SourceSpan::new(2, 6));
}

#[test]
fn test_empty_source_stays_empty() {
    let span = normalize_span(SourceSpan::new(0, 0), "");

    assert_eq!(span, SourceSpan::new(0, 0));
}

#[test]
fn test_out_of_range_span_is_clamped() {
    let source = "abc";

    let span = normalize_span(SourceSpan::new(10, 12), source);

    assert_eq!(span, SourceSpan::new(2, 3));
}

#[test]
fn test_multibyte_character_is_covered_whole() {
    let source = "é";

    let at_start = normalize_span(SourceSpan::new(0, 0), source);
    let at_end = normalize_span(SourceSpan::new(2, 2), source);

    assert_eq!(at_start, SourceSpan::new(0, 2));
    assert_eq!(at_end, SourceSpan::new(0, 2));
}

#[test]
fn test_normalization_is_pure() {
    let source = "x";
    let first = normalize_span(SourceSpan::new(1, 1), source);
    let second = normalize_span(SourceSpan::new(1, 1), source);

    assert_eq!(first, second);
}

/* ===================== Line / Column ===================== */

#[test]
fn test_line_col_counts_characters() {
    let source = "ab\ncd";

    assert_eq!(line_col(source, 0), (0, 0));
    assert_eq!(line_col(source, 2), (0, 2));
    assert_eq!(line_col(source, 3), (1, 0));
    assert_eq!(line_col(source, 4), (1, 1));
}

/* ===================== Counts and Groups ===================== */

fn sample() -> Vec<Diagnostic> {
    vec![
        Diagnostic::warning("CS0200", "unused", SourceSpan::new(4, 5)),
        Diagnostic::error("CS0100", "undefined a", SourceSpan::new(8, 9)),
        Diagnostic::info("CS0300", "shadowed", SourceSpan::new(0, 3)),
        Diagnostic::error("CS0100", "undefined b", SourceSpan::new(10, 10)),
    ]
}

#[test]
fn test_counts_per_severity() {
    let counts = SeverityCounts::tally(&sample());

    assert_eq!(counts.errors, 2);
    assert_eq!(counts.warnings, 1);
    assert_eq!(counts.infos, 1);
    assert_eq!(counts.total(), 4);
    assert_eq!(counts.get(Severity::Error), 2);
}

#[test]
fn test_report_keeps_emission_order() {
    let report = DiagnosticReport::new("let x = a; b", sample());

    let codes: Vec<_> = report.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["CS0200", "CS0100", "CS0300", "CS0100"]);
    assert!(report.has_errors());
}

#[test]
fn test_report_normalizes_ranges() {
    let report = DiagnosticReport::new("let x = a; b", sample());

    assert_eq!(report.ranges[3], SourceSpan::new(10, 11));
    let (_, range) = report.highlights().nth(3).unwrap();
    assert_eq!(range, SourceSpan::new(10, 11));
}

#[test]
fn test_groups_bucket_by_severity() {
    let source = "let x = a;\nb";
    let diagnostics = vec![
        Diagnostic::error("CS0100", "undefined a", SourceSpan::new(8, 9)),
        Diagnostic::error("CS0100", "undefined b", SourceSpan::new(11, 12)),
        Diagnostic::warning("CS0200", "unused x", SourceSpan::new(4, 5)),
    ];

    let groups = DiagnosticReport::new(source, diagnostics).groups();

    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].heading, "Errors");
    assert_eq!(groups[0].entries.len(), 2);
    assert_eq!(groups[0].entries[0].label, "CS0100 undefined a");
    assert_eq!((groups[0].entries[1].line, groups[0].entries[1].column), (2, 1));
    assert_eq!(groups[1].heading, "Warnings");
    assert_eq!(groups[1].entries.len(), 1);
    assert_eq!(groups[2].heading, "Information");
    assert!(groups[2].entries.is_empty());
}

#[test]
fn test_tooltip_format() {
    let d = Diagnostic::error("CS0001", "expected expression", SourceSpan::default());

    assert_eq!(d.tooltip(), "CS0001 expected expression");
    assert_eq!(d.to_string(), "error[CS0001]: expected expression");
}
