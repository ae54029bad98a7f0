//! Breadcrumb rendering for response data
//!
//! API responses are arbitrarily nested structures. For terminal and log
//! display each scalar leaf is rendered on its own line, prefixed with the
//! bracketed path of keys (and array indices) that leads to it:
//!
//! ```text
//! [items][0][domain] => example.com
//! [items][0][uniq_id] => 2UF3GG
//! [item_count] => 1
//! ```

use serde_json::Value;

/// Render a decoded response value as breadcrumb lines.
///
/// Traversal is depth-first in insertion order. Empty containers produce no
/// output; a bare scalar at the root renders without a breadcrumb.
pub fn render_breadcrumbs(value: &Value) -> String {
    let mut out = String::new();

    match value {
        Value::Object(map) => {
            let mut path = Vec::new();
            for (key, child) in map {
                walk(key, child, &mut path, &mut out);
            }
        }
        Value::Array(items) => {
            let mut path = Vec::new();
            for (index, child) in items.iter().enumerate() {
                walk(&index.to_string(), child, &mut path, &mut out);
            }
        }
        scalar => {
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }

    out
}

fn walk(key: &str, value: &Value, path: &mut Vec<String>, out: &mut String) {
    match value {
        Value::Object(map) => {
            path.push(key.to_string());
            for (child_key, child) in map {
                walk(child_key, child, path, out);
            }
            path.pop();
        }
        Value::Array(items) => {
            path.push(key.to_string());
            for (index, child) in items.iter().enumerate() {
                walk(&index.to_string(), child, path, out);
            }
            path.pop();
        }
        scalar => {
            for segment in path.iter() {
                out.push('[');
                out.push_str(segment);
                out.push(']');
            }
            out.push('[');
            out.push_str(key);
            out.push_str("] => ");
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Containers never reach here; walk() recurses into them.
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_object() {
        let data = json!({"domain": "example.com", "uniq_id": "2UF3GG"});
        assert_eq!(
            render_breadcrumbs(&data),
            "[domain] => example.com\n[uniq_id] => 2UF3GG\n"
        );
    }

    #[test]
    fn test_nested_object_breadcrumbs() {
        let data = json!({
            "server": {
                "config": {"cores": 4},
                "active": true,
            }
        });
        assert_eq!(
            render_breadcrumbs(&data),
            "[server][config][cores] => 4\n[server][active] => true\n"
        );
    }

    #[test]
    fn test_array_indices_as_keys() {
        let data = json!({
            "items": [
                {"domain": "a.com"},
                {"domain": "b.com"},
            ],
            "item_count": 2,
        });
        assert_eq!(
            render_breadcrumbs(&data),
            "[items][0][domain] => a.com\n[items][1][domain] => b.com\n[item_count] => 2\n"
        );
    }

    #[test]
    fn test_empty_containers_emit_nothing() {
        assert_eq!(render_breadcrumbs(&json!({})), "");
        assert_eq!(render_breadcrumbs(&json!([])), "");
        assert_eq!(render_breadcrumbs(&json!({"items": [], "meta": {}})), "");
    }

    #[test]
    fn test_root_scalar() {
        assert_eq!(render_breadcrumbs(&json!("ok")), "ok\n");
        assert_eq!(render_breadcrumbs(&json!(42)), "42\n");
    }

    #[test]
    fn test_null_renders_empty() {
        let data = json!({"backup_id": null});
        assert_eq!(render_breadcrumbs(&data), "[backup_id] => \n");
    }

    #[test]
    fn test_root_array() {
        let data = json!(["a", "b"]);
        assert_eq!(render_breadcrumbs(&data), "[0] => a\n[1] => b\n");
    }

    #[test]
    fn test_insertion_order() {
        let data: Value =
            serde_json::from_str(r#"{"zebra": 1, "apple": {"mango": 2, "kiwi": 3}}"#).unwrap();
        assert_eq!(
            render_breadcrumbs(&data),
            "[zebra] => 1\n[apple][mango] => 2\n[apple][kiwi] => 3\n"
        );
    }
}
