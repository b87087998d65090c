//! Assertions → test source.
//!
//! Output is a single fluent chain:
//!
//! ```text
//! given()
//!     .header("X-Trace", traceId)
//!     .when()
//!     .get("/users/1")
//!     .then()
//!     .body("name", equalTo("ann"))
//!     .statusCode(200);
//! ```
//!
//! optionally preceded by the static imports it needs and a `//----------`
//! separator line.
pub mod literal;
mod request;

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::analyzer::FieldKind;
use crate::ir::Assertion;
use crate::options::GeneratorOptions;

pub use literal::{format_item, format_literal};

// ------------------------------- Policy ---------------------------------- //

const INDENT: &str = "    ";
const IMPORT_SEPARATOR: &str = "//----------\n";

const IMPORT_GIVEN: &str = "import static io.restassured.RestAssured.given;";
const IMPORT_EQUAL_TO: &str = "import static org.hamcrest.Matchers.equalTo;";
const IMPORT_NULL_VALUE: &str = "import static org.hamcrest.Matchers.nullValue;";
const IMPORT_CONTAINS: &str = "import static org.hamcrest.Matchers.contains;";
const IMPORT_EMPTY: &str = "import static org.hamcrest.Matchers.empty;";

// ------------------------------- Errors ---------------------------------- //

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{} values have no literal form", .kind.name())]
    UnsupportedLiteral { kind: FieldKind },
    #[error("expected a {} literal, got {value}", .kind.name())]
    LiteralMismatch { kind: FieldKind, value: Value },
}

// ------------------------------ Generate --------------------------------- //

pub fn generate(assertions: &[Assertion], options: &GeneratorOptions) -> Result<String, GenerateError> {
    // Every chain starts with `given()`.
    let mut imports = BTreeSet::from([IMPORT_GIVEN]);

    let mut clauses = request::request_clauses(&options.request);
    clauses.push(".then()".to_string());
    for assertion in assertions {
        clauses.push(assertion_clause(assertion, &mut imports)?);
    }
    if let Some(status_code) = options.status_code {
        clauses.push(format!(".statusCode({status_code})"));
    }

    let separator = if options.format { format!("\n{INDENT}") } else { String::new() };

    let mut out = String::new();
    if options.include_dependencies {
        for import in &imports {
            out.push_str(import);
            out.push('\n');
        }
        out.push_str(IMPORT_SEPARATOR);
    }
    out.push_str("given()");
    for clause in &clauses {
        out.push_str(&separator);
        out.push_str(clause);
    }
    out.push(';');

    debug!(assertions = assertions.len(), imports = imports.len(), bytes = out.len(), "generated test");
    Ok(out)
}

fn assertion_clause(assertion: &Assertion, imports: &mut BTreeSet<&'static str>) -> Result<String, GenerateError> {
    let clause = match assertion {
        Assertion::CheckForValue { path, value, value_type } => {
            imports.insert(IMPORT_EQUAL_TO);
            format!(".body(\"{path}\", equalTo({}))", format_literal(value, *value_type)?)
        }
        Assertion::CheckForNull { path } => {
            imports.insert(IMPORT_NULL_VALUE);
            format!(".body(\"{path}\", nullValue())")
        }
        Assertion::CheckArrayItems { path, items } => {
            imports.insert(IMPORT_CONTAINS);
            let rendered = items
                .iter()
                .map(|item| format_item(&item.value, item.value_type))
                .collect::<Result<Vec<_>, _>>()?;
            format!(".body(\"{path}\", contains({}))", rendered.join(", "))
        }
        Assertion::CheckForEmpty { path } => {
            imports.insert(IMPORT_EMPTY);
            format!(".body(\"{path}\", empty())")
        }
    };
    Ok(clause)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ArrayItem;
    use crate::options::{Arg, HttpMethod, RequestSpecification};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compact() -> GeneratorOptions {
        GeneratorOptions { format: false, ..Default::default() }
    }

    fn hello() -> Vec<Assertion> {
        vec![Assertion::CheckForValue {
            path: "Hello, world!".into(),
            value: json!("Hello, world!"),
            value_type: FieldKind::String,
        }]
    }

    const HELLO_TAIL: &str = ".then().body(\"Hello, world!\", equalTo(\"Hello, world!\"));";

    fn with_request(request: RequestSpecification) -> GeneratorOptions {
        GeneratorOptions { request, ..compact() }
    }

    #[test]
    fn value_checks_render_equal_to() {
        let out = generate(&hello(), &compact()).unwrap();
        assert_eq!(out, format!("given().when(){HELLO_TAIL}"));
    }

    #[test]
    fn number_and_boolean_values() {
        let assertions = vec![
            Assertion::CheckForValue { path: "number".into(), value: json!(123), value_type: FieldKind::Number },
            Assertion::CheckForValue { path: "boolean".into(), value: json!(true), value_type: FieldKind::Boolean },
        ];
        assert_eq!(
            generate(&assertions, &compact()).unwrap(),
            "given().when().then().body(\"number\", equalTo(123)).body(\"boolean\", equalTo(true));"
        );
    }

    #[test]
    fn null_checks_render_null_value() {
        let assertions = vec![Assertion::CheckForNull { path: "null".into() }];
        assert_eq!(
            generate(&assertions, &compact()).unwrap(),
            "given().when().then().body(\"null\", nullValue());"
        );
    }

    #[test]
    fn array_items_render_contains() {
        let assertions = vec![Assertion::CheckArrayItems {
            path: "array".into(),
            items: vec![
                ArrayItem { value: json!("Hello, world!"), value_type: FieldKind::String },
                ArrayItem { value: json!(123), value_type: FieldKind::Number },
                ArrayItem { value: Value::Null, value_type: FieldKind::Null },
            ],
        }];
        assert_eq!(
            generate(&assertions, &compact()).unwrap(),
            "given().when().then().body(\"array\", contains(\"Hello, world!\", 123, null));"
        );
    }

    #[test]
    fn empty_checks_render_empty() {
        let assertions = vec![Assertion::CheckForEmpty { path: "list".into() }];
        assert_eq!(
            generate(&assertions, &compact()).unwrap(),
            "given().when().then().body(\"list\", empty());"
        );
    }

    #[test]
    fn headers_keep_their_order() {
        let options = with_request(RequestSpecification {
            headers: vec![("X-Header-1".into(), "value1".into()), ("X-Header-2".into(), "value2".into())],
            ..Default::default()
        });
        assert_eq!(
            generate(&hello(), &options).unwrap(),
            format!("given().header(\"X-Header-1\", \"value1\").header(\"X-Header-2\", \"value2\").when(){HELLO_TAIL}")
        );
    }

    #[test]
    fn request_body_is_quoted_without_escaping() {
        let options = with_request(RequestSpecification {
            body: Some("{\"key\":\"value\"}".into()),
            ..Default::default()
        });
        assert_eq!(
            generate(&hello(), &options).unwrap(),
            format!("given().body(\"{{\"key\":\"value\"}}\").when(){HELLO_TAIL}")
        );
    }

    #[test]
    fn method_url_and_port() {
        let options = with_request(RequestSpecification {
            method: Some(HttpMethod::Get),
            url: Some("/api/endpoint".into()),
            port: Some(Arg::Literal(8080)),
            ..Default::default()
        });
        assert_eq!(
            generate(&hello(), &options).unwrap(),
            format!("given().when().get(\"/api/endpoint\").port(8080){HELLO_TAIL}")
        );
    }

    #[test]
    fn references_are_emitted_verbatim() {
        let options = with_request(RequestSpecification {
            method: Some(HttpMethod::Post),
            url: Some(Arg::reference("endpoint")),
            content_type: Some(Arg::reference("MediaType.APPLICATION_JSON")),
            headers: vec![
                ("X-Header-1".into(), Arg::reference("header1")),
                ("X-Header-2".into(), Arg::reference("header2")),
            ],
            cookies: vec![("cookie".into(), Arg::reference("someCookie"))],
            params: vec![
                ("param1".into(), Arg::reference("firstParameter")),
                ("param2".into(), Arg::reference("secondParameter")),
            ],
            body: Some(Arg::reference("body")),
            ..Default::default()
        });
        let expected = "given()\
            .body(body)\
            .contentType(MediaType.APPLICATION_JSON)\
            .cookie(\"cookie\", someCookie)\
            .header(\"X-Header-1\", header1)\
            .header(\"X-Header-2\", header2)\
            .param(\"param1\", firstParameter)\
            .param(\"param2\", secondParameter)\
            .when()\
            .post(endpoint)";
        assert_eq!(generate(&hello(), &options).unwrap(), format!("{expected}{HELLO_TAIL}"));
    }

    #[test]
    fn formatted_output_indents_each_clause() {
        let options = GeneratorOptions { status_code: Some(200), ..Default::default() };
        assert_eq!(
            generate(&hello(), &options).unwrap(),
            "given()\n    .when()\n    .then()\n    .body(\"Hello, world!\", equalTo(\"Hello, world!\"))\n    .statusCode(200);"
        );
    }

    #[test]
    fn imports_cover_used_matchers_only() {
        let options = GeneratorOptions { include_dependencies: true, ..compact() };
        assert_eq!(
            generate(&hello(), &options).unwrap(),
            format!(
                "import static io.restassured.RestAssured.given;\n\
                 import static org.hamcrest.Matchers.equalTo;\n\
                 //----------\n\
                 given().when(){HELLO_TAIL}"
            )
        );
    }

    #[test]
    fn imports_are_sorted_and_deduplicated() {
        let assertions = vec![
            Assertion::CheckForNull { path: "a".into() },
            Assertion::CheckForEmpty { path: "b".into() },
            Assertion::CheckForNull { path: "c".into() },
            Assertion::CheckArrayItems {
                path: "d".into(),
                items: vec![ArrayItem { value: json!(1), value_type: FieldKind::Number }],
            },
            Assertion::CheckForValue { path: "e".into(), value: json!(false), value_type: FieldKind::Boolean },
        ];
        let options = GeneratorOptions { include_dependencies: true, ..Default::default() };
        let out = generate(&assertions, &options).unwrap();
        let (imports, body) = out.split_once(IMPORT_SEPARATOR).unwrap();
        assert_eq!(imports.lines().collect::<Vec<_>>(), vec![
            IMPORT_GIVEN,
            IMPORT_CONTAINS,
            IMPORT_EMPTY,
            IMPORT_EQUAL_TO,
            IMPORT_NULL_VALUE,
        ]);
        assert!(body.starts_with("given()\n    .when()"));
        assert!(body.ends_with(".body(\"e\", equalTo(false));"));
    }

    #[test]
    fn unformattable_values_fail_the_whole_call() {
        let assertions = vec![
            Assertion::CheckForNull { path: "ok".into() },
            Assertion::CheckForValue { path: "bad".into(), value: json!([1]), value_type: FieldKind::Array },
        ];
        assert!(matches!(
            generate(&assertions, &compact()),
            Err(GenerateError::UnsupportedLiteral { kind: FieldKind::Array })
        ));
    }
}
