use std::fmt::Display;

use crate::options::{Arg, Pair, RequestSpecification};

/// Clauses between `given()` and `.then()`, in emission order.
pub(super) fn request_clauses(request: &RequestSpecification) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(accept) = given(&request.accept) {
        clauses.push(format!(".accept({})", quoted(accept)));
    }
    if let Some(body) = given(&request.body) {
        clauses.push(format!(".body({})", quoted(body)));
    }
    if let Some(content_type) = given(&request.content_type) {
        clauses.push(format!(".contentType({})", quoted(content_type)));
    }

    pair_clauses(&mut clauses, "cookie", &request.cookies);
    pair_clauses(&mut clauses, "header", &request.headers);
    pair_clauses(&mut clauses, "param", &request.params);
    pair_clauses(&mut clauses, "queryParam", &request.query_params);

    clauses.push(".when()".to_string());

    if let (Some(method), Some(url)) = (request.method, given(&request.url)) {
        clauses.push(format!(".{}({})", method.call_name(), quoted(url)));
    }
    if let Some(port) = request.port.as_ref().filter(|port| **port != Arg::Literal(0)) {
        clauses.push(format!(".port({})", bare(port)));
    }

    clauses
}

/// An empty literal counts as unset.
fn given(arg: &Option<Arg<String>>) -> Option<&Arg<String>> {
    arg.as_ref().filter(|arg| !matches!(arg, Arg::Literal(text) if text.is_empty()))
}

fn pair_clauses(clauses: &mut Vec<String>, call: &str, pairs: &[Pair]) {
    for (key, value) in pairs {
        clauses.push(format!(".{call}({}, {})", quoted(key), quoted(value)));
    }
}

fn quoted(arg: &Arg<String>) -> String {
    match arg {
        Arg::Literal(text) => format!("\"{text}\""),
        Arg::Reference(name) => name.clone(),
    }
}

fn bare<T: Display>(arg: &Arg<T>) -> String {
    match arg {
        Arg::Literal(value) => value.to_string(),
        Arg::Reference(name) => name.clone(),
    }
}
