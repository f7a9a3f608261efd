//! Tool argument parsing for the `call` subcommand.

use anyhow::{Result, bail};
use mcpcall_types::ToolArguments;

/// Combine `--args <json>` and repeated `-a key=value` into tool arguments.
///
/// `--args` must be a JSON object. Each `key=value` pair is applied on top;
/// the value is parsed as JSON when it is valid JSON (`8`, `true`, `[1,2]`,
/// `"quoted"`) and taken as a plain string otherwise. Returns `None` when
/// neither was given, so the request carries an empty object.
pub fn build_arguments(json: Option<&str>, pairs: &[String]) -> Result<Option<ToolArguments>> {
    if json.is_none() && pairs.is_empty() {
        return Ok(None);
    }

    let mut arguments = match json {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Object(map) => map,
            other => bail!("--args must be a JSON object, got: {other}"),
        },
        None => ToolArguments::new(),
    };

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got '{pair}'");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("empty key in '{pair}'");
        }
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        arguments.insert(key.to_string(), value);
    }

    Ok(Some(arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn nothing_given_means_no_arguments() {
        assert!(build_arguments(None, &[]).unwrap().is_none());
    }

    #[test]
    fn json_object_is_used() {
        let args = build_arguments(Some(r#"{"min_weight": 8}"#), &[])
            .unwrap()
            .unwrap();
        assert_eq!(args["min_weight"], json!(8));
    }

    #[test]
    fn json_non_object_is_rejected() {
        assert!(build_arguments(Some("[1, 2]"), &[]).is_err());
        assert!(build_arguments(Some("not json"), &[]).is_err());
    }

    #[test]
    fn pair_values_are_typed_when_json() {
        let args = build_arguments(
            None,
            &pairs(&["min_weight=8", "remote=true", "job_title=Data Engineer"]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(args["min_weight"], json!(8));
        assert_eq!(args["remote"], json!(true));
        assert_eq!(args["job_title"], json!("Data Engineer"));
    }

    #[test]
    fn pairs_override_json() {
        let args = build_arguments(Some(r#"{"min_weight": 8, "limit": 5}"#), &pairs(&["min_weight=9"]))
            .unwrap()
            .unwrap();
        assert_eq!(args["min_weight"], json!(9));
        assert_eq!(args["limit"], json!(5));
    }

    #[test]
    fn value_may_contain_equals() {
        let args = build_arguments(None, &pairs(&["query=a=b"])).unwrap().unwrap();
        assert_eq!(args["query"], json!("a=b"));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(build_arguments(None, &pairs(&["no_equals"])).is_err());
        assert!(build_arguments(None, &pairs(&["=8"])).is_err());
    }
}
