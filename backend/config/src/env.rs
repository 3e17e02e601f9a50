//! `${ENV_VAR}` substitution for config values.
//!
//! String leaves may reference environment variables as `${VAR_NAME}`
//! (uppercase names only). References are resolved at load time; a
//! missing or empty variable fails the load with the config path that
//! referenced it.

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for a `${VAR}` reference with no value.
#[derive(Debug, Error)]
#[error("missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references throughout a config value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute using a provided map (used by tests).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute(value, env, "")
}

fn substitute(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_str(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                out.insert(key.clone(), substitute(child, env, &child_path)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_str(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let whole = caps.get(0).unwrap();
        let var_name = &caps[1];
        out.push_str(&s[last..whole.start()]);
        match env.get(var_name).filter(|v| !v.is_empty()) {
            Some(value) => out.push_str(value),
            None => {
                return Err(MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                }
                .into());
            }
        }
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_references_in_nested_values() {
        let value = json!({
            "database": { "path": "${DATA_DIR}/orders.db" },
            "menu": [ { "name": "burger", "price": 5.0 } ]
        });
        let resolved =
            resolve_env_vars_with(&value, &env(&[("DATA_DIR", "/var/lib/platewire")])).unwrap();

        assert_eq!(
            resolved["database"]["path"],
            json!("/var/lib/platewire/orders.db")
        );
        assert_eq!(resolved["menu"][0]["price"], json!(5.0));
    }

    #[test]
    fn missing_variable_reports_the_config_path() {
        let value = json!({ "gateway": { "host": "${BIND_HOST}" } });
        let err = resolve_env_vars_with(&value, &env(&[])).unwrap_err();
        let err = err.downcast::<MissingEnvVarError>().unwrap();

        assert_eq!(err.var_name, "BIND_HOST");
        assert_eq!(err.config_path, "gateway.host");
    }

    #[test]
    fn lowercase_names_are_left_alone() {
        let value = json!("${not_a_var}");
        assert_eq!(resolve_env_vars_with(&value, &env(&[])).unwrap(), value);
    }
}
