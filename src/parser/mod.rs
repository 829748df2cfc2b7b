//! PEST-based parser for cauldron script
//!
//! Produces the AST consumed by the executor, with span information for
//! diagnostics. [`parse_script`] stops at the first syntax error;
//! [`parse_script_recovering`] resumes at the next statement and reports them all.

use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Severity, SourceSpan};
use crate::executor::types::ast::{
    BinaryOp, Expr, ForLoopKind, MemberAccess, RecordDecl, RecordField, Span, Stmt, UnaryOp,
    VarKind,
};

pub mod codes;
pub mod semantic_validator;

#[cfg(test)]
mod tests;

type Pair<'i> = pest::iterators::Pair<'i, Rule>;

/* ===================== Script Definition ===================== */

/// A parsed script: top-level statements plus record declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDef {
    /// Top-level statements, as a block
    pub body: Stmt,
    /// Record declarations in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RecordDecl>,
    /// Span of the entire script
    #[serde(default, skip_serializing_if = "is_default_span")]
    pub span: Span,
}

impl ScriptDef {
    pub fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.name == name)
    }
}

fn is_default_span(span: &Span) -> bool {
    *span == Span::default()
}

/* ===================== PEST Parser ===================== */

#[derive(Parser)]
#[grammar = "parser/script.pest"]
struct ScriptParser;

/* ===================== Error Types ===================== */

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    PestError(String, Option<Span>),
    #[error("{0}")]
    BuildError(String, Option<Span>),
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::PestError(_, span) => *span,
            ParseError::BuildError(_, span) => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::PestError(msg, _) => msg,
            ParseError::BuildError(msg, _) => msg,
        }
    }

    /// Report this error as a `CS0001` diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self
            .span()
            .map(|s| SourceSpan::new(s.start, s.end))
            .unwrap_or_default();
        Diagnostic::new(Severity::Error, codes::SYNTAX_ERROR, self.message(), span)
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let (start, end) = match err.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span((start, end)) => (start, end),
        };
        let ((start_line, start_col), (end_line, end_col)) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => (pos, pos),
            pest::error::LineColLocation::Span(start, end) => (start, end),
        };
        let span = Span::new(
            start,
            end,
            start_line.saturating_sub(1),
            start_col.saturating_sub(1),
            end_line.saturating_sub(1),
            end_col.saturating_sub(1),
        );

        let err = err.renamed_rules(describe_rule);
        ParseError::PestError(
            format!("Syntax error: {}", err.variant.message()),
            Some(span),
        )
    }
}

/// Human readable names for the rules that show up in "expected ..." messages
fn describe_rule(rule: &Rule) -> String {
    let name = match rule {
        Rule::EOI => "end of input",
        Rule::identifier => "identifier",
        Rule::expression => "expression",
        Rule::statement => "statement",
        Rule::record_decl => "record declaration",
        Rule::record_field => "record field",
        Rule::block => "block",
        Rule::string => "string",
        Rule::number => "number",
        Rule::var_kind => "'let' or 'const'",
        Rule::for_kind => "'of' or 'in'",
        Rule::op_nullish => "'??'",
        Rule::op_or => "'||'",
        Rule::op_and => "'&&'",
        Rule::op_eq => "'=='",
        Rule::op_ne => "'!='",
        Rule::op_lte => "'<='",
        Rule::op_gte => "'>='",
        Rule::op_lt => "'<'",
        Rule::op_gt => "'>'",
        Rule::op_add => "'+'",
        Rule::op_sub => "'-'",
        Rule::op_mul => "'*'",
        Rule::op_div => "'/'",
        Rule::op_mod => "'%'",
        Rule::op_not => "'!'",
        Rule::op_neg => "'-'",
        Rule::postfix => "'(', '.' or '['",
        other => return format!("{:?}", other),
    };
    name.to_string()
}

pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Span Helpers ===================== */

/// Convert a PEST pair's span to our Span type
fn pair_to_span(pair: &Pair<'_>, source: &str) -> Span {
    let pest_span = pair.as_span();
    let start = pest_span.start();
    let end = pest_span.end();

    let (start_line, start_col) = crate::diagnostics::line_col(source, start);
    let (end_line, end_col) = crate::diagnostics::line_col(source, end);

    Span::new(start, end, start_line, start_col, end_line, end_col)
}

/* ===================== Public API ===================== */

/// Parse a cauldron script
pub fn parse_script(source: &str) -> ParseResult<ScriptDef> {
    let mut pairs = ScriptParser::parse(Rule::program, source)?;

    // The program rule always produces exactly one pair
    let program = pairs.next().unwrap();
    let program_span = pair_to_span(&program, source);

    let mut statements = Vec::new();
    let mut records = Vec::new();

    for pair in program.into_inner() {
        match pair.as_rule() {
            Rule::record_decl => records.push(build_record_decl(pair, source)?),
            Rule::statement => statements.push(build_statement(pair, source)?),
            Rule::EOI => {}
            _ => {
                return Err(ParseError::BuildError(
                    format!("Unexpected program content: {:?}", pair.as_rule()),
                    Some(pair_to_span(&pair, source)),
                ))
            }
        }
    }

    let body_span = match (statements.first(), statements.last()) {
        (Some(first), Some(last)) => first.span().merge(&last.span()),
        _ => program_span,
    };

    Ok(ScriptDef {
        body: Stmt::Block {
            body: statements,
            span: body_span,
        },
        records,
        span: program_span,
    })
}

/// Most syntax errors reported for one source
pub const MAX_SYNTAX_ERRORS: usize = 100;

/// Parse a cauldron script, collecting every syntax error
///
/// After each failure the failing statement is blanked out (line breaks
/// kept, so later spans are unchanged) and the source is parsed again.
/// Errors come back in the order they were found; an error at the same
/// position as the previous one is reported once.
pub fn parse_script_recovering(source: &str) -> Result<ScriptDef, Vec<ParseError>> {
    let mut errors: Vec<ParseError> = Vec::new();
    let mut text = source.to_string();

    for _ in 0..MAX_SYNTAX_ERRORS {
        let err = match parse_script(&text) {
            Ok(script) if errors.is_empty() => return Ok(script),
            Ok(_) => break,
            Err(err) => err,
        };
        let Some(start) = err.span().map(|span| span.start) else {
            errors.push(err);
            break;
        };

        let repeated = errors
            .last()
            .and_then(ParseError::span)
            .is_some_and(|previous| previous.start == start);
        if !repeated {
            errors.push(err);
        }
        if !blank_statement(&mut text, start) {
            break;
        }
    }

    Err(errors)
}

/// Start of the statement containing byte `pos`
fn statement_start(text: &str, pos: usize) -> usize {
    text[..pos]
        .rfind(['\n', ';', '{', '}'])
        .map_or(0, |i| i + 1)
}

/// Blank out the statement around byte `pos`
///
/// Returns false when only whitespace is left before `pos`.
fn blank_statement(text: &mut String, pos: usize) -> bool {
    let pos = pos.min(text.len());
    let mut end = text[pos..]
        .find(['\n', ';', '}'])
        .map_or(text.len(), |i| pos + i);
    let mut start = statement_start(text, pos);

    // A stray closing brace is a statement of its own
    if end == pos && text[start..end].trim().is_empty() && text[pos..].starts_with('}') {
        start = pos;
        end = pos + 1;
    }

    while text[start..end].trim().is_empty() {
        if start == 0 {
            return false;
        }
        start = statement_start(text, start - 1);
    }

    let blank: String = text[start..end]
        .chars()
        .map(|c| match c {
            '\n' => "\n".to_string(),
            other => " ".repeat(other.len_utf8()),
        })
        .collect();
    text.replace_range(start..end, &blank);
    true
}

/// Parse a source string into its top-level block (testing API)
pub fn parse(source: &str) -> ParseResult<Stmt> {
    parse_script(source).map(|script| script.body)
}

/* ===================== AST Builder ===================== */

fn build_record_decl(pair: Pair<'_>, source: &str) -> ParseResult<RecordDecl> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let name_pair = inner.next().unwrap();
    let name_span = pair_to_span(&name_pair, source);
    let name = name_pair.as_str().to_string();

    let fields = inner
        .map(|field_pair| build_record_field(field_pair, source))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(RecordDecl {
        name,
        name_span,
        fields,
        span,
    })
}

fn build_record_field(pair: Pair<'_>, source: &str) -> ParseResult<RecordField> {
    let mut hidden = false;
    let mut name = None;
    let mut display_name = None;

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::hidden_flag => hidden = true,
            Rule::identifier => {
                name = Some((part.as_str().to_string(), pair_to_span(&part, source)))
            }
            Rule::string => display_name = Some(build_string(part, source)?),
            _ => {}
        }
    }

    // record_field always contains an identifier
    let (name, span) = name.unwrap();
    Ok(RecordField {
        name,
        span,
        display_name,
        hidden,
    })
}

fn build_block(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let statements: Result<Vec<Stmt>, ParseError> = pair
        .into_inner()
        .map(|stmt_pair| build_statement(stmt_pair, source))
        .collect();

    Ok(Stmt::Block {
        body: statements?,
        span,
    })
}

fn build_if_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let test = build_expression(inner.next().unwrap(), source)?;
    let then_s = build_statement(inner.next().unwrap(), source)?;

    let else_s = if let Some(else_clause_pair) = inner.next() {
        let else_inner = else_clause_pair.into_inner().next().unwrap();
        Some(Box::new(build_statement(else_inner, source)?))
    } else {
        None
    };

    Ok(Stmt::If {
        test,
        then_s: Box::new(then_s),
        else_s,
        span,
    })
}

fn build_while_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let test = build_expression(inner.next().unwrap(), source)?;
    let body = build_statement(inner.next().unwrap(), source)?;

    Ok(Stmt::While {
        test,
        body: Box::new(body),
        span,
    })
}

fn build_var_kind(pair: &Pair<'_>, source: &str) -> ParseResult<VarKind> {
    match pair.as_str() {
        "let" => Ok(VarKind::Let),
        "const" => Ok(VarKind::Const),
        other => Err(ParseError::BuildError(
            format!("Expected 'let' or 'const', got: {}", other),
            Some(pair_to_span(pair, source)),
        )),
    }
}

fn build_for_loop_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let var_kind = build_var_kind(&inner.next().unwrap(), source)?;

    let binding_pair = inner.next().unwrap();
    let binding_span = pair_to_span(&binding_pair, source);
    let binding = binding_pair.as_str().to_string();

    let kind_pair = inner.next().unwrap();
    let kind = match kind_pair.as_str() {
        "of" => ForLoopKind::Of,
        "in" => ForLoopKind::In,
        _ => {
            return Err(ParseError::BuildError(
                format!("Expected 'of' or 'in', got: {}", kind_pair.as_str()),
                Some(pair_to_span(&kind_pair, source)),
            ))
        }
    };

    let iterable = build_expression(inner.next().unwrap(), source)?;
    let body = build_statement(inner.next().unwrap(), source)?;

    Ok(Stmt::ForLoop {
        kind,
        var_kind,
        binding,
        binding_span,
        iterable,
        body: Box::new(body),
        span,
    })
}

fn build_declare_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let var_kind = build_var_kind(&inner.next().unwrap(), source)?;

    let name_pair = inner.next().unwrap();
    let name_span = pair_to_span(&name_pair, source);
    let name = name_pair.as_str().to_string();

    let init = match inner.next() {
        Some(expr_pair) => Some(build_expression(expr_pair, source)?),
        None => None,
    };

    if var_kind == VarKind::Const && init.is_none() {
        return Err(ParseError::BuildError(
            format!("Missing initializer in const declaration of '{}'", name),
            Some(span),
        ));
    }

    Ok(Stmt::Declare {
        var_kind,
        name,
        name_span,
        init,
        span,
    })
}

fn build_try_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let body = build_statement(inner.next().unwrap(), source)?;

    let catch_var_pair = inner.next().unwrap();
    let catch_var_span = pair_to_span(&catch_var_pair, source);
    let catch_var = catch_var_pair.as_str().to_string();

    let catch_body = build_statement(inner.next().unwrap(), source)?;

    Ok(Stmt::Try {
        body: Box::new(body),
        catch_var,
        catch_var_span,
        catch_body: Box::new(catch_body),
        span,
    })
}

fn build_assign_stmt(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let var_pair = inner.next().unwrap();
    let var_span = pair_to_span(&var_pair, source);
    let var = var_pair.as_str().to_string();

    let mut path = Vec::new();
    let mut value = None;

    for pair in inner {
        match pair.as_rule() {
            Rule::assign_path_segment => {
                let segment_span = pair_to_span(&pair, source);
                let segment_inner = pair.into_inner().next().unwrap();
                match segment_inner.as_rule() {
                    Rule::identifier => path.push(MemberAccess::Prop {
                        property: segment_inner.as_str().to_string(),
                        span: segment_span,
                    }),
                    _ => path.push(MemberAccess::Index {
                        expr: build_expression(segment_inner, source)?,
                        span: segment_span,
                    }),
                }
            }
            _ => value = Some(build_expression(pair, source)?),
        }
    }

    let value = value.ok_or_else(|| {
        ParseError::BuildError("Assignment is missing a value".to_string(), Some(span))
    })?;

    Ok(Stmt::Assign {
        var,
        var_span,
        path,
        value,
        span,
    })
}

fn build_binary_expr(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let span = pair_to_span(&pair, source);
    let inner_pairs: Vec<_> = pair.into_inner().collect();

    if inner_pairs.is_empty() {
        return Err(ParseError::BuildError(
            "Empty binary expression".to_string(),
            Some(span),
        ));
    }

    let mut left = build_expression(inner_pairs[0].clone(), source)?;

    let mut i = 1;
    while i < inner_pairs.len() {
        let op_rule = inner_pairs[i].as_rule();

        i += 1;
        if i >= inner_pairs.len() {
            return Err(ParseError::BuildError(
                "Missing right operand after operator".to_string(),
                Some(span),
            ));
        }

        let right = build_expression(inner_pairs[i].clone(), source)?;
        let new_span = left.span().merge(&right.span());

        let op = match op_rule {
            Rule::op_and => BinaryOp::And,
            Rule::op_or => BinaryOp::Or,
            Rule::op_nullish => BinaryOp::Nullish,
            Rule::op_eq => BinaryOp::Eq,
            Rule::op_ne => BinaryOp::Ne,
            Rule::op_lt => BinaryOp::Lt,
            Rule::op_lte => BinaryOp::Lte,
            Rule::op_gt => BinaryOp::Gt,
            Rule::op_gte => BinaryOp::Gte,
            Rule::op_add => BinaryOp::Add,
            Rule::op_sub => BinaryOp::Sub,
            Rule::op_mul => BinaryOp::Mul,
            Rule::op_div => BinaryOp::Div,
            Rule::op_mod => BinaryOp::Mod,
            _ => {
                return Err(ParseError::BuildError(
                    format!(
                        "Expected operator rule at index {}, got {:?}",
                        i - 1,
                        op_rule
                    ),
                    Some(span),
                ))
            }
        };

        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: new_span,
        };

        i += 1;
    }

    Ok(left)
}

fn build_statement(pair: Pair<'_>, source: &str) -> ParseResult<Stmt> {
    let span = pair_to_span(&pair, source);

    match pair.as_rule() {
        Rule::statement => {
            let inner = pair.into_inner().next().unwrap();
            build_statement(inner, source)
        }
        Rule::return_stmt => {
            let value = match pair.into_inner().next() {
                Some(expr_pair) => Some(build_expression(expr_pair, source)?),
                None => None,
            };
            Ok(Stmt::Return { value, span })
        }
        Rule::throw_stmt => {
            let expr_pair = pair.into_inner().next().unwrap();
            let value = build_expression(expr_pair, source)?;
            Ok(Stmt::Throw { value, span })
        }
        Rule::if_stmt => build_if_stmt(pair, source),
        Rule::while_stmt => build_while_stmt(pair, source),
        Rule::for_loop_stmt => build_for_loop_stmt(pair, source),
        Rule::try_stmt => build_try_stmt(pair, source),
        Rule::break_stmt => Ok(Stmt::Break { span }),
        Rule::continue_stmt => Ok(Stmt::Continue { span }),
        Rule::block => build_block(pair, source),
        Rule::declare_stmt => build_declare_stmt(pair, source),
        Rule::assign_stmt => build_assign_stmt(pair, source),
        Rule::expr_stmt => {
            let expr_pair = pair.into_inner().next().unwrap();
            let expr = build_expression(expr_pair, source)?;
            Ok(Stmt::Expr { expr, span })
        }
        _ => Err(ParseError::BuildError(
            format!("Unexpected statement rule: {:?}", pair.as_rule()),
            Some(span),
        )),
    }
}

fn build_expression(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let span = pair_to_span(&pair, source);

    match pair.as_rule() {
        Rule::expression | Rule::primary | Rule::literal => {
            let inner = pair.into_inner().next().unwrap();
            build_expression(inner, source)
        }
        Rule::ternary_expr => {
            let mut inner = pair.into_inner();
            let condition = build_expression(inner.next().unwrap(), source)?;

            if let Some(consequent_pair) = inner.next() {
                let consequent = build_expression(consequent_pair, source)?;
                let alternate = build_expression(inner.next().unwrap(), source)?;
                Ok(Expr::Ternary {
                    condition: Box::new(condition),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    span,
                })
            } else {
                Ok(condition)
            }
        }
        Rule::nullish_expr
        | Rule::logical_or_expr
        | Rule::logical_and_expr
        | Rule::equality_expr
        | Rule::comparison_expr
        | Rule::additive_expr
        | Rule::multiplicative_expr => build_binary_expr(pair, source),
        Rule::unary_expr => {
            let mut inner = pair.into_inner();
            let first = inner.next().unwrap();

            let op = match first.as_rule() {
                Rule::op_not => UnaryOp::Not,
                Rule::op_neg => UnaryOp::Neg,
                _ => return build_expression(first, source),
            };
            let operand = build_expression(inner.next().unwrap(), source)?;
            Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
                span,
            })
        }
        Rule::postfix_expr => build_postfix_expr(pair, source),
        Rule::new_expr => build_new_expr(pair, source),
        Rule::identifier => {
            let name = pair.as_str().to_string();
            Ok(Expr::Ident { name, span })
        }
        Rule::number => {
            let num_str = pair.as_str();
            let value = num_str.parse::<f64>().map_err(|e| {
                ParseError::BuildError(
                    format!("Failed to parse number '{}': {}", num_str, e),
                    Some(span),
                )
            })?;
            Ok(Expr::LitNum { v: value, span })
        }
        Rule::boolean => {
            let value = pair.as_str() == "true";
            Ok(Expr::LitBool { v: value, span })
        }
        Rule::string => Ok(Expr::LitStr {
            v: build_string(pair, source)?,
            span,
        }),
        Rule::null_lit => Ok(Expr::LitNull { span }),
        Rule::object_lit => build_object_literal(pair, source),
        Rule::array_lit => build_array_literal(pair, source),
        _ => Err(ParseError::BuildError(
            format!("Unexpected expression rule: {:?}", pair.as_rule()),
            Some(span),
        )),
    }
}

fn build_postfix_expr(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let mut inner = pair.into_inner();
    let mut expr = build_expression(inner.next().unwrap(), source)?;

    for postfix_pair in inner {
        let postfix_span = pair_to_span(&postfix_pair, source);
        let new_span = expr.span().merge(&postfix_span);
        let postfix_inner = postfix_pair.into_inner().next().unwrap();

        expr = match postfix_inner.as_rule() {
            Rule::call_suffix => {
                let args = match postfix_inner.into_inner().next() {
                    Some(arg_list_pair) => build_expression_list(arg_list_pair, source)?,
                    None => vec![],
                };
                Expr::Call {
                    callee: Box::new(expr),
                    args,
                    span: new_span,
                }
            }
            Rule::member_access => {
                let prop_pair = postfix_inner.into_inner().next().unwrap();
                Expr::Member {
                    object: Box::new(expr),
                    property: prop_pair.as_str().to_string(),
                    property_span: pair_to_span(&prop_pair, source),
                    span: new_span,
                }
            }
            Rule::index_access => {
                let index_pair = postfix_inner.into_inner().next().unwrap();
                Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(build_expression(index_pair, source)?),
                    span: new_span,
                }
            }
            other => {
                return Err(ParseError::BuildError(
                    format!("Unexpected postfix rule: {:?}", other),
                    Some(postfix_span),
                ))
            }
        };
    }

    Ok(expr)
}

fn build_new_expr(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let span = pair_to_span(&pair, source);
    let mut inner = pair.into_inner();

    let record_pair = inner.next().unwrap();
    let record_span = pair_to_span(&record_pair, source);
    let record = record_pair.as_str().to_string();

    let mut fields = Vec::new();
    if let Some(list_pair) = inner.next() {
        for init_pair in list_pair.into_inner() {
            let mut init_inner = init_pair.into_inner();
            let field_pair = init_inner.next().unwrap();
            let field_span = pair_to_span(&field_pair, source);
            let value = build_expression(init_inner.next().unwrap(), source)?;
            fields.push((field_pair.as_str().to_string(), field_span, value));
        }
    }

    Ok(Expr::New {
        record,
        record_span,
        fields,
        span,
    })
}

fn build_string(pair: Pair<'_>, source: &str) -> ParseResult<String> {
    let span = pair_to_span(&pair, source);
    let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
    unescape(raw).ok_or_else(|| {
        ParseError::BuildError(format!("Invalid escape in string '{}'", raw), Some(span))
    })
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        out.push(match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        });
    }
    Some(out)
}

fn build_expression_list(pair: Pair<'_>, source: &str) -> ParseResult<Vec<Expr>> {
    pair.into_inner()
        .map(|expr_pair| build_expression(expr_pair, source))
        .collect()
}

fn build_object_literal(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let span = pair_to_span(&pair, source);

    let properties = match pair.into_inner().next() {
        Some(property_list_pair) => property_list_pair
            .into_inner()
            .map(|property_pair| build_property(property_pair, source))
            .collect::<ParseResult<Vec<_>>>()?,
        None => vec![],
    };

    Ok(Expr::LitObj { properties, span })
}

fn build_property(pair: Pair<'_>, source: &str) -> ParseResult<(String, Span, Expr)> {
    let inner = pair.into_inner().next().unwrap();
    let inner_span = pair_to_span(&inner, source);

    match inner.as_rule() {
        Rule::property_pair => {
            let mut inner_pairs = inner.into_inner();
            let key_pair = inner_pairs.next().unwrap();
            let key_span = pair_to_span(&key_pair, source);
            let key = match key_pair.as_rule() {
                Rule::string => build_string(key_pair, source)?,
                _ => key_pair.as_str().to_string(),
            };
            let value = build_expression(inner_pairs.next().unwrap(), source)?;
            Ok((key, key_span, value))
        }
        Rule::property_shorthand => {
            let key = inner.as_str().to_string();
            let value = Expr::Ident {
                name: key.clone(),
                span: inner_span,
            };
            Ok((key, inner_span, value))
        }
        _ => Err(ParseError::BuildError(
            format!("Unexpected property rule: {:?}", inner.as_rule()),
            Some(inner_span),
        )),
    }
}

fn build_array_literal(pair: Pair<'_>, source: &str) -> ParseResult<Expr> {
    let span = pair_to_span(&pair, source);

    let elements = match pair.into_inner().next() {
        Some(element_list_pair) => build_expression_list(element_list_pair, source)?,
        None => vec![],
    };

    Ok(Expr::LitList { elements, span })
}
