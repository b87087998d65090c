use serde_json::{Number, Value};

use super::GenerateError;
use crate::analyzer::FieldKind;

/// Largest value a bare integer literal can hold in the target language.
const INT_MAX: i64 = 2_147_483_647;

/// Whole numbers at or beyond these bounds only fit serde_json's `f64`.
const U64_BOUND: f64 = u64::MAX as f64;
const I64_BOUND: f64 = i64::MIN as f64;

/// Render a scalar as a literal in the generated code.
///
/// Strings are quoted as-is. Numbers parsed as floats get an `f` suffix,
/// integers above `INT_MAX` an `L` suffix.
pub fn format_literal(value: &Value, kind: FieldKind) -> Result<String, GenerateError> {
    match (kind, value) {
        (FieldKind::String, Value::String(s)) => Ok(format!("\"{s}\"")),
        (FieldKind::Number, Value::Number(n)) => Ok(number(n)),
        (FieldKind::Boolean, Value::Bool(b)) => Ok(b.to_string()),
        (FieldKind::String | FieldKind::Number | FieldKind::Boolean, other) => {
            Err(GenerateError::LiteralMismatch { kind, value: other.clone() })
        }
        (kind, _) => Err(GenerateError::UnsupportedLiteral { kind }),
    }
}

/// Element of a `contains(..)` list. Null elements are written `null` here
/// on purpose, since the list has no per-item `nullValue()` matcher.
pub fn format_item(value: &Value, kind: FieldKind) -> Result<String, GenerateError> {
    match (kind, value) {
        (FieldKind::Null, Value::Null) => Ok("null".to_string()),
        _ => format_literal(value, kind),
    }
}

fn number(n: &Number) -> String {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        return float(n, f);
    }
    match n.as_i64() {
        Some(i) if i <= INT_MAX => i.to_string(),
        _ => format!("{n}L"),
    }
}

/// The parser stores `-0` and integers outside the 64-bit range as `f64`;
/// those are written back as whole numbers.
fn float(n: &Number, f: f64) -> String {
    if f == 0.0 && f.is_sign_negative() {
        return "0".to_string();
    }
    if f.fract() == 0.0 {
        if f >= U64_BOUND {
            return format!("{f:.0}L");
        }
        if f <= I64_BOUND {
            return format!("{f:.0}");
        }
    }
    format!("{n}f")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(0), "0")]
    #[case(json!(-17), "-17")]
    #[case(json!(2147483647), "2147483647")]
    #[case(json!(2147483648_i64), "2147483648L")]
    #[case(json!(18446744073709551615_u64), "18446744073709551615L")]
    #[case(json!(1.5), "1.5f")]
    #[case(json!(-0.25), "-0.25f")]
    fn numbers(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(format_literal(&value, FieldKind::Number).unwrap(), expected);
    }

    #[rstest]
    #[case("99999999999999999999", "100000000000000000000L")]
    #[case("18446744073709551616", "18446744073709551616L")]
    #[case("1e20", "100000000000000000000L")]
    #[case("-99999999999999999999", "-100000000000000000000")]
    #[case("-0", "0")]
    #[case("2.5e-3", "0.0025f")]
    fn numbers_beyond_64_bits(#[case] text: &str, #[case] expected: &str) {
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(format_literal(&value, FieldKind::Number).unwrap(), expected);
    }

    #[test]
    fn whole_floats_keep_the_float_suffix() {
        let value: Value = serde_json::from_str("1.0").unwrap();
        assert_eq!(format_literal(&value, FieldKind::Number).unwrap(), "1.0f");
    }

    #[test]
    fn strings_are_quoted_verbatim() {
        let value = json!("say \"hi\"");
        assert_eq!(format_literal(&value, FieldKind::String).unwrap(), "\"say \"hi\"\"");
    }

    #[test]
    fn booleans_are_bare() {
        assert_eq!(format_literal(&json!(true), FieldKind::Boolean).unwrap(), "true");
        assert_eq!(format_literal(&json!(false), FieldKind::Boolean).unwrap(), "false");
    }

    #[test]
    fn null_has_no_literal_outside_item_lists() {
        assert!(matches!(
            format_literal(&Value::Null, FieldKind::Null),
            Err(GenerateError::UnsupportedLiteral { kind: FieldKind::Null })
        ));
        assert_eq!(format_item(&Value::Null, FieldKind::Null).unwrap(), "null");
    }

    #[test]
    fn containers_and_mismatches_are_rejected() {
        assert!(matches!(
            format_literal(&json!({}), FieldKind::Object),
            Err(GenerateError::UnsupportedLiteral { .. })
        ));
        assert!(matches!(
            format_literal(&json!("7"), FieldKind::Number),
            Err(GenerateError::LiteralMismatch { kind: FieldKind::Number, .. })
        ));
    }
}
