//! Arithmetic evaluation of resolved formulas.
//!
//! Resolved formula text is re-tokenized and every numeric literal is bound
//! as an `f64` variable in a Rhai [`Scope`], so the Rhai engine only ever
//! evaluates an expression like `n0 + n1 * ( n2 - n3 )`. Operands that are
//! not plain decimal literals are rejected before Rhai sees them.

use regex::Regex;
use rhai::{Dynamic, Engine, EvalAltResult, ParseErrorType, Scope};
use std::sync::OnceLock;

use super::format::format_number;
use super::resolve::MAX_RESOLVED_TOKENS;
use super::tokenize::{Symbol, Token, has_symbol, join_tokens, tokenize};
use crate::error::{CalculationError, Result};

/// Upper bound on Rhai operations for a single expression.
const MAX_OPERATIONS: u64 = 1_000_000;

/// Deepest parenthesis nesting accepted.
const MAX_NESTING: usize = 64;

/// Rhai parser depth. Rhai counts a level per binary operator in a flat chain
/// and several per parenthesis; this stays above what the token and nesting
/// gates admit in every build profile.
const MAX_EXPR_DEPTH: usize = 4 * MAX_RESOLVED_TOKENS;

fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
    engine
}

/// Evaluates resolved formula text and formats the numeric result.
pub struct Evaluator {
    engine: Engine,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            engine: create_engine(),
        }
    }

    /// Evaluate a resolved token sequence.
    pub fn evaluate_tokens(&self, tokens: &[Token]) -> Result<String> {
        self.evaluate(&join_tokens(tokens))
    }

    /// Evaluate resolved formula text.
    ///
    /// Text without any operator or parenthesis is returned verbatim, which is
    /// how `=other` passes a text value through.
    pub fn evaluate(&self, expression: &str) -> Result<String> {
        if !has_symbol(expression) {
            tracing::debug!("Formula has no operators, returning {:?}", expression);
            return Ok(expression.to_string());
        }

        let (script, mut scope) = bind_operands(expression)?;
        let value = self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, &script)
            .map_err(|e| match *e {
                EvalAltResult::ErrorParsing(ParseErrorType::ExprTooDeep, _)
                | EvalAltResult::ErrorTooManyOperations(_) => {
                    CalculationError::TooComplex(format!("{}: {}", expression, e))
                }
                _ => CalculationError::InvalidFormulaSyntax(format!("{}: {}", expression, e)),
            })?;

        let number = value
            .as_float()
            .or_else(|_| value.as_int().map(|n| n as f64))
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| CalculationError::NotANumber {
                expression: expression.to_string(),
            })?;

        tracing::debug!("Expression {} evaluated to {}", expression, number);
        Ok(format_number(number))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("operand literal regex must compile")
    })
}

/// Rewrite `expression` as a Rhai expression over scope variables.
fn bind_operands(expression: &str) -> Result<(String, Scope<'static>)> {
    let tokens = tokenize(expression);
    if tokens.len() > MAX_RESOLVED_TOKENS {
        return Err(CalculationError::TooComplex(format!(
            "{} tokens, limit is {}",
            tokens.len(),
            MAX_RESOLVED_TOKENS
        )));
    }

    let mut scope = Scope::new();
    let mut parts = Vec::new();
    let mut nesting = 0usize;
    // Consecutive operators parse as nested unary expressions.
    let mut operator_run = 0usize;

    for token in tokens {
        match token {
            Token::Symbol(symbol) => {
                match symbol {
                    Symbol::Open => nesting += 1,
                    Symbol::Close => nesting = nesting.saturating_sub(1),
                    _ => operator_run += 1,
                }
                if nesting > MAX_NESTING || operator_run > MAX_NESTING {
                    return Err(CalculationError::TooComplex(format!(
                        "expression nested deeper than {}",
                        MAX_NESTING
                    )));
                }
                parts.push(symbol.as_char().to_string());
            }
            Token::Operand(text) => {
                operator_run = 0;
                let value = literal_re()
                    .is_match(&text)
                    .then(|| text.parse::<f64>().ok())
                    .flatten()
                    .ok_or_else(|| {
                        CalculationError::InvalidFormulaSyntax(format!(
                            "{:?} is not a number in {}",
                            text, expression
                        ))
                    })?;
                let var = format!("n{}", scope.len());
                scope.push(var.clone(), value);
                parts.push(var);
            }
        }
    }

    Ok((parts.join(" "), scope))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expression: &str) -> Result<String> {
        Evaluator::new().evaluate(expression)
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(eval("1+2*3/4-(5+6)").unwrap(), "-8.5");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("8-3-2").unwrap(), "3");
        assert_eq!(eval("8/4/2").unwrap(), "1");
    }

    #[test]
    fn test_float_division() {
        assert_eq!(eval("7/2").unwrap(), "3.5");
        assert_eq!(eval("1/4").unwrap(), "0.25");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("-5+2").unwrap(), "-3");
        assert_eq!(eval("2*-3").unwrap(), "-6");
        assert_eq!(eval("1--8.5").unwrap(), "9.5");
        assert_eq!(eval("-(1+2)").unwrap(), "-3");
    }

    #[test]
    fn test_whole_results_drop_decimal_point() {
        assert_eq!(eval("1.5+1.5").unwrap(), "3");
        assert_eq!(eval("(2)").unwrap(), "2");
    }

    #[test]
    fn test_text_without_operators_passes_through() {
        assert_eq!(eval("hello").unwrap(), "hello");
        assert_eq!(eval("007").unwrap(), "007");
        assert_eq!(eval("").unwrap(), "");
    }

    #[test]
    fn test_text_operand_is_rejected() {
        assert!(matches!(
            eval("hello+1"),
            Err(CalculationError::InvalidFormulaSyntax(_))
        ));
    }

    #[test]
    fn test_malformed_expression_is_rejected() {
        assert!(eval("1+").is_err());
        assert!(eval("(1+2").is_err());
        assert!(eval("()").is_err());
        assert!(eval("1 2+3").is_err());
    }

    #[test]
    fn test_division_by_zero_is_not_a_number() {
        assert!(eval("1/0").is_err());
        assert!(eval("0/0").is_err());
    }

    #[test]
    fn test_long_operator_chains_evaluate() {
        let sum = vec!["1"; 200].join("+");
        assert_eq!(eval(&sum).unwrap(), "200");

        let mixed = (1..=100).map(|n| n.to_string()).collect::<Vec<_>>().join("-");
        assert_eq!(eval(&mixed).unwrap(), "-5048");
    }

    #[test]
    fn test_nested_parentheses_within_limit() {
        let nested = format!("{}1+1{}", "(".repeat(40), ")".repeat(40));
        assert_eq!(eval(&nested).unwrap(), "2");
    }

    #[test]
    fn test_oversized_expressions_are_too_complex() {
        let sum = vec!["1"; MAX_RESOLVED_TOKENS].join("+");
        assert!(matches!(eval(&sum), Err(CalculationError::TooComplex(_))));

        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert!(matches!(eval(&nested), Err(CalculationError::TooComplex(_))));

        let signs = format!("1{}1", "-".repeat(100));
        assert!(matches!(eval(&signs), Err(CalculationError::TooComplex(_))));
    }

    #[test]
    fn test_evaluate_tokens_concatenates() {
        let tokens = tokenize("2 * ( 3 + 4 )");
        assert_eq!(Evaluator::new().evaluate_tokens(&tokens).unwrap(), "14");
    }
}
