// Line-oriented layout for generated Python: callers hand over structured
// pieces (argument lists, literal values, branches) and this module decides
// indentation and line breaks.

use serde_json::Value;

const INDENT: &str = "    ";

/// Arguments placed on one continuation line before wrapping.
pub const ARGS_PER_LINE: usize = 3;

pub fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

/// An ordered buffer of indented lines.
#[derive(Debug, Default, Clone)]
pub struct Code {
    lines: Vec<String>,
}

impl Code {
    pub fn new() -> Self {
        Code::default()
    }

    /// Push one line at the given indentation level. Empty text gives a blank line.
    pub fn line(&mut self, level: usize, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", indent(level), text));
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// Push multi-line text, each line shifted by `level`.
    pub fn block(&mut self, level: usize, text: &str) -> &mut Self {
        for line in text.lines() {
            self.line(level, line);
        }
        self
    }

    pub fn append(&mut self, other: Code) -> &mut Self {
        self.lines.extend(other.lines);
        self
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Group arguments into continuation lines of at most `per_line` items,
/// each line ending in a comma except the last.
pub fn wrap_args(args: &[String], per_line: usize) -> Vec<String> {
    let per_line = per_line.max(1);
    let chunks: Vec<&[String]> = args.chunks(per_line).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let joined = chunk.join(", ");
            if i == last {
                joined
            } else {
                format!("{},", joined)
            }
        })
        .collect()
}

/// Emit `prefix(args)` with the arguments on continuation lines.
///
/// ```text
/// result = self.api.fetch_cluster_info(
///     self.organisation_id, self.project_id, self.cluster_id)
/// ```
pub fn call(code: &mut Code, level: usize, prefix: &str, groups: &[Vec<String>], suffix: &str) {
    let groups: Vec<&Vec<String>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if groups.is_empty() {
        code.line(level, format!("{}(){}", prefix, suffix));
        return;
    }

    code.line(level, format!("{}(", prefix));
    let mut lines: Vec<String> = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let mut wrapped = wrap_args(group, ARGS_PER_LINE);
        if i + 1 < groups.len() {
            if let Some(last) = wrapped.last_mut() {
                last.push(',');
            }
        }
        lines.extend(wrapped);
    }
    let last = lines.len() - 1;
    for (i, line) in lines.into_iter().enumerate() {
        if i == last {
            code.line(level + 1, format!("{}){}", line, suffix));
        } else {
            code.line(level + 1, line);
        }
    }
}

/// Python tuple literal body: a single element needs a trailing comma.
pub fn tuple_items(items: &[String]) -> Vec<String> {
    let mut lines = wrap_args(items, ARGS_PER_LINE);
    if items.len() == 1 {
        if let Some(only) = lines.first_mut() {
            only.push(',');
        }
    }
    lines
}

/// Render a JSON value as a Python literal, nested containers indented by
/// one level per depth. The first line carries no indentation.
pub fn python_literal(value: &Value, level: usize) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python_string(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => {
            let inner: Vec<String> = items
                .iter()
                .map(|item| format!("{}{}", indent(level + 1), python_literal(item, level + 1)))
                .collect();
            format!("[\n{}\n{}]", inner.join(",\n"), indent(level))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}{}: {}",
                        indent(level + 1),
                        python_string(k),
                        python_literal(v, level + 1)
                    )
                })
                .collect();
            format!("{{\n{}\n{}}}", inner.join(",\n"), indent(level))
        }
    }
}

/// Double-quoted Python string with JSON escaping, which Python accepts.
pub fn python_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.replace('"', "\\\"")))
}

/// Emit an if/elif/else chain. A `None` condition is the `else` arm.
pub fn branches(code: &mut Code, level: usize, arms: Vec<(Option<String>, Code)>) {
    for (i, (condition, body)) in arms.into_iter().enumerate() {
        match (i, condition) {
            (0, Some(cond)) => code.line(level, format!("if {}:", cond)),
            (_, Some(cond)) => code.line(level, format!("elif {}:", cond)),
            (_, None) => code.line(level, "else:"),
        };
        code.append(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wrap_args() {
        let args = strings(&["a", "b", "c", "d"]);
        assert_eq!(wrap_args(&args, 3), vec!["a, b, c,", "d"]);
        assert!(wrap_args(&[], 3).is_empty());
    }

    #[test]
    fn test_call_layout() {
        let mut code = Code::new();
        call(
            &mut code,
            1,
            "result = self.api.create_cluster",
            &[strings(&["org", "project"]), strings(&["self.expected_res[\"name\"]"])],
            "",
        );
        assert_eq!(
            code.finish(),
            "    result = self.api.create_cluster(\n        org, project,\n        self.expected_res[\"name\"])\n"
        );

        let mut empty = Code::new();
        call(&mut empty, 0, "result = f", &[Vec::new()], "");
        assert_eq!(empty.finish(), "result = f()\n");
    }

    #[test]
    fn test_tuple_items_single() {
        assert_eq!(tuple_items(&strings(&["self.organisation_id"])), vec!["self.organisation_id,"]);
    }

    #[test]
    fn test_python_literal() {
        let value = json!({"id": "abc", "flags": [true, null], "nested": {}, "n": 1.5});
        assert_eq!(
            python_literal(&value, 2),
            "{\n            \"id\": \"abc\",\n            \"flags\": [\n                True,\n                None\n            ],\n            \"nested\": {},\n            \"n\": 1.5\n        }"
        );
    }

    #[test]
    fn test_branches() {
        let mut code = Code::new();
        let mut first = Code::new();
        first.line(1, "a = 1");
        let mut other = Code::new();
        other.line(1, "a = 2");
        branches(&mut code, 0, vec![(Some("x".into()), first), (None, other)]);
        assert_eq!(code.finish(), "if x:\n    a = 1\nelse:\n    a = 2\n");
    }
}
