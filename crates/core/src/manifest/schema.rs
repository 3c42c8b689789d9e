//! Fixed manifest schema.
//!
//! Both the static configuration block and a dynamically loaded definition go
//! through [`validate_manifest`]; nothing is deserialized into
//! [`ModuleManifest`] before every issue has been ruled out.

use super::model::ModuleManifest;
use crate::config::constants::MANIFEST_KIND;
use serde_json::{Map, Value};
use std::fmt;

pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// One schema violation, located by a JSON-ish path such as `routes[0].method`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Validate a merged manifest value and convert it to the typed model.
///
/// Route methods are upper-cased on success.
pub fn validate_manifest(value: &Value) -> Result<ModuleManifest, Vec<SchemaIssue>> {
    let Some(root) = value.as_object() else {
        return Err(vec![SchemaIssue {
            path: String::new(),
            message: "expected an object".to_string(),
        }]);
    };

    let mut v = Validator::default();
    v.required_string(root, "contractVersion", "");
    v.required_string(root, "name", "");
    v.required_string(root, "version", "");
    match root.get("kind") {
        Some(Value::String(kind)) if kind == MANIFEST_KIND => {}
        None | Some(Value::Null) => {}
        Some(_) => v.issue("kind", format!("expected \"{MANIFEST_KIND}\"")),
    }

    if let Some(items) = v.array(root, "capabilities") {
        for (i, item) in items.iter().enumerate() {
            if !item.as_str().is_some_and(|s| !s.is_empty()) {
                v.issue(format!("capabilities[{i}]"), "expected a non-empty string");
            }
        }
    }

    v.each_object(root, "routes", |v, route, at| {
        match route.get("method") {
            Some(Value::String(method))
                if HTTP_METHODS.contains(&method.to_ascii_uppercase().as_str()) => {}
            Some(_) => v.issue(
                format!("{at}.method"),
                format!("expected one of {}", HTTP_METHODS.join(", ")),
            ),
            None => v.issue(format!("{at}.method"), "is required"),
        }
        v.required_string(route, "path", &at);
        v.optional_string(route, "name", &at);
        v.optional_string(route, "description", &at);
        v.optional_bool(route, "auth", &at);
    });

    v.each_object(root, "views", |v, view, at| {
        v.required_string(view, "path", &at);
        v.optional_string(view, "name", &at);
        v.optional_string(view, "title", &at);
    });

    v.each_object(root, "jobs", |v, job, at| {
        v.required_string(job, "name", &at);
        v.optional_string(job, "schedule", &at);
        v.optional_string(job, "description", &at);
    });

    for key in ["events", "services"] {
        v.each_object(root, key, |v, item, at| {
            v.required_string(item, "name", &at);
            v.optional_string(item, "description", &at);
        });
    }

    for key in ["init", "dispose"] {
        match root.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(hook)) => {
                v.optional_string(hook, "name", key);
                if let Some(timeout) = hook.get("timeoutMs") {
                    if !timeout.is_null() && timeout.as_u64().is_none() {
                        v.issue(format!("{key}.timeoutMs"), "expected a non-negative integer");
                    }
                }
            }
            Some(_) => v.issue(key, "expected an object"),
        }
    }

    if !v.issues.is_empty() {
        return Err(v.issues);
    }

    // Null means absent for every top-level field
    let present: Map<String, Value> = root
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut manifest: ModuleManifest = serde_json::from_value(Value::Object(present)).map_err(|e| {
        vec![SchemaIssue {
            path: String::new(),
            message: e.to_string(),
        }]
    })?;
    for route in &mut manifest.routes {
        route.method = route.method.to_ascii_uppercase();
    }
    Ok(manifest)
}

#[derive(Default)]
struct Validator {
    issues: Vec<SchemaIssue>,
}

impl Validator {
    fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(SchemaIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn required_string(&mut self, obj: &Map<String, Value>, key: &str, at: &str) {
        let path = join_path(at, key);
        match obj.get(key) {
            Some(Value::String(s)) if !s.is_empty() => {}
            Some(Value::String(_)) => self.issue(path, "must not be empty"),
            Some(_) => self.issue(path, "expected a string"),
            None => self.issue(path, "is required"),
        }
    }

    fn optional_string(&mut self, obj: &Map<String, Value>, key: &str, at: &str) {
        if let Some(value) = obj.get(key) {
            if !value.is_null() && !value.is_string() {
                self.issue(join_path(at, key), "expected a string");
            }
        }
    }

    fn optional_bool(&mut self, obj: &Map<String, Value>, key: &str, at: &str) {
        if let Some(value) = obj.get(key) {
            if !value.is_null() && !value.is_boolean() {
                self.issue(join_path(at, key), "expected a boolean");
            }
        }
    }

    /// Absent or null collections are fine; anything else must be an array
    fn array<'a>(&mut self, obj: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(items),
            Some(_) => {
                self.issue(key, "expected an array");
                None
            }
        }
    }

    fn each_object<F>(&mut self, obj: &Map<String, Value>, key: &str, mut check: F)
    where
        F: FnMut(&mut Self, &Map<String, Value>, String),
    {
        let Some(items) = self.array(obj, key) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            let at = format!("{key}[{i}]");
            match item.as_object() {
                Some(entry) => check(self, entry, at),
                None => self.issue(at, "expected an object"),
            }
        }
    }
}

fn join_path(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}
