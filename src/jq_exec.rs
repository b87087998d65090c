//! Pick the response body out of a larger capture with a jq filter.
use anyhow::{anyhow, bail, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; the filter must yield exactly one value.
pub fn select_one(filter_src: &str, input: &Value) -> Result<Value> {
    let mut outputs = run_jaq(filter_src, input)?;
    match outputs.len() {
        1 => Ok(outputs.remove(0)),
        0 => bail!("jq filter `{filter_src}` produced no output"),
        n => bail!("jq filter `{filter_src}` produced {n} outputs, expected one"),
    }
}

fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let results = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in results {
        let val = item.map_err(|e| anyhow!("jq runtime error: {e:?}"))?;
        // Val displays as JSON text.
        let value = serde_json::from_str(&val.to_string())
            .context("jq filter produced a value that is not valid JSON")?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_a_nested_body() {
        let capture = json!({"status": 200, "body": {"id": 1, "tags": ["a"]}});
        assert_eq!(select_one(".body", &capture).unwrap(), json!({"id": 1, "tags": ["a"]}));
    }

    #[test]
    fn multiple_outputs_are_rejected() {
        let err = select_one(".[]", &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("produced 2 outputs"));
    }

    #[test]
    fn empty_output_is_rejected() {
        let err = select_one("empty", &json!({})).unwrap_err();
        assert!(err.to_string().contains("no output"));
    }
}
