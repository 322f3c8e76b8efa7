//! jq pre-processing: run a filter over a document and collect each output as
//! a JSON value (e.g. `.components.schemas[]` over an OpenAPI file).
use anyhow::{anyhow, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
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
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut schemas = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| anyhow!("{e:?}"))?;
        // Val: Display -> JSON text
        let text = val.to_string();
        schemas.push(serde_json::from_str::<Value>(&text)?);
    }
    log::debug!("jq `{filter_src}` produced {} document(s)", schemas.len());
    Ok(schemas)
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
    fn selects_embedded_schemas() {
        let doc = json!({"components": {"schemas": {
            "A": {"type": "string"},
            "B": {"type": "number"}
        }}});
        let out = run_jaq(".components.schemas[]", &doc).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.contains(&json!({"type": "string"})));
        assert!(out.contains(&json!({"type": "number"})));
    }

    #[test]
    fn parse_errors_surface() {
        assert!(run_jaq(".[", &json!({})).is_err());
    }
}
