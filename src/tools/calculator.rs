//! Four-function calculator.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::mcp::registry::ToolModule;

/// Arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Deserialize)]
struct CalculatorArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

/// Applies `op` to `a` and `b`.
///
/// # Errors
///
/// Fails on division by zero or a non-finite result.
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64, ToolError> {
    let result = match op {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return Err(ToolError::failed("Division by zero"));
            }
            a / b
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(ToolError::failed("Result is not a finite number"))
    }
}

/// The `calculator` tool.
#[derive(Debug, Default)]
pub struct Calculator;

#[async_trait]
impl ToolModule for Calculator {
    fn description(&self) -> &str {
        "Perform basic arithmetic (add, subtract, multiply, divide) on two numbers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "The operation to perform"
                },
                "a": {
                    "type": "number",
                    "description": "First operand"
                },
                "b": {
                    "type": "number",
                    "description": "Second operand"
                }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let args: CalculatorArgs = serde_json::from_value(arguments)?;
        let result = evaluate(args.operation, args.a, args.b)?;
        Ok(json!({ "result": result }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_each_operation() {
        assert!((evaluate(Operation::Add, 2.0, 3.0).unwrap() - 5.0).abs() < f64::EPSILON);
        assert!((evaluate(Operation::Subtract, 2.0, 3.0).unwrap() + 1.0).abs() < f64::EPSILON);
        assert!((evaluate(Operation::Multiply, 2.0, 3.0).unwrap() - 6.0).abs() < f64::EPSILON);
        assert!((evaluate(Operation::Divide, 3.0, 2.0).unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn division_by_zero_fails() {
        let err = evaluate(Operation::Divide, 1.0, 0.0).unwrap_err();
        assert_eq!(err, ToolError::failed("Division by zero"));
    }

    #[test]
    fn overflow_fails() {
        assert!(evaluate(Operation::Multiply, f64::MAX, 2.0).is_err());
    }

    #[test]
    fn call_parses_arguments() {
        let result = tokio_test::block_on(
            Calculator.call(json!({"operation": "multiply", "a": 6, "b": 7})),
        )
        .unwrap();
        assert_eq!(result, json!({"result": 42.0}));
    }

    #[test]
    fn call_rejects_unknown_operation() {
        let err = tokio_test::block_on(Calculator.call(json!({"operation": "modulo", "a": 1, "b": 2})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
