//! Compiles a route pattern such as `/greet/{{who}}/from/{{where}}` into a
//! matcher plus the ordered list of placeholder names it captures.

use regex::Regex;

/// A compiled route: a regex that matches a request path in full, plus the
/// placeholder names in the order their `(.+)` captures appear.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    matcher: Regex,
    params: Vec<String>,
}

impl CompiledRoute {
    /// Compile `pattern`. Every maximal `{{...}}` span becomes a `(.+)`
    /// capture group; the matcher is anchored to match the whole path.
    pub fn compile(pattern: &str) -> CompiledRoute {
        let placeholder = placeholder_regex();
        let params: Vec<String> = placeholder
            .find_iter(pattern)
            .map(|m| without_braces(m.as_str()))
            .collect();

        let replaced = placeholder.replace_all(pattern, "(.+)");
        let anchored = format!("^{replaced}$");
        let matcher = Regex::new(&anchored)
            .unwrap_or_else(|e| panic!("route pattern '{pattern}' compiled to invalid regex '{anchored}': {e}"));

        debug_assert_eq!(
            matcher.captures_len() - 1,
            params.len(),
            "capture count must equal placeholder count"
        );

        CompiledRoute { matcher, params }
    }

    /// Ordered placeholder names found in the route pattern.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Match `path` in full, returning the captured values in placeholder
    /// order if it matches.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.matcher.captures(path)?;
        Some(
            (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

}

fn placeholder_regex() -> Regex {
    Regex::new(r"\{\{.+?\}\}").expect("static placeholder regex is valid")
}

fn without_braces(s: &str) -> String {
    s.trim_start_matches("{{").trim_end_matches("}}").to_string()
}

/// Extract the ordered list of `{{name}}` placeholder names from an arbitrary
/// template string (used for both route patterns and command templates).
pub fn placeholder_names(template: &str) -> Vec<String> {
    placeholder_regex()
        .find_iter(template)
        .map(|m| without_braces(m.as_str()))
        .collect()
}
