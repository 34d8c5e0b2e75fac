//! Reminder message templates
//!
//! Templates are free text with `{{name}}`, `{{group}}`, `{{date}}` and
//! `{{place}}` placeholders. Whitespace inside the braces is tolerated.

use serde::{Deserialize, Serialize};

/// Placeholders a template may reference.
pub const PLACEHOLDERS: [&str; 4] = ["name", "group", "date", "place"];

/// Values substituted into a template for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateVars {
    pub name: String,
    pub group: String,
    pub date: String,
    pub place: String,
}

impl TemplateVars {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(&self.name),
            "group" => Some(&self.group),
            "date" => Some(&self.date),
            "place" => Some(&self.place),
            _ => None,
        }
    }
}

/// Substitute every known placeholder. Unknown placeholders are left as-is.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.lookup(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder names used in `template` that [`render`] would not fill.
pub fn unknown_placeholders(template: &str) -> Vec<String> {
    let mut unknown = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let key = after[..end].trim();
        if !PLACEHOLDERS.contains(&key) && !unknown.iter().any(|k| k == key) {
            unknown.push(key.to_string());
        }
        rest = &after[end + 2..];
    }
    unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        TemplateVars {
            name: "Ravi".into(),
            group: "Alpha".into(),
            date: "10/11/2026".into(),
            place: "Temple Hall".into(),
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let text = render(
            "Dear {{name}}, your {{group}} chit is due on {{date}} at {{place}}.",
            &vars(),
        );
        assert_eq!(
            text,
            "Dear Ravi, your Alpha chit is due on 10/11/2026 at Temple Hall."
        );
    }

    #[test]
    fn test_render_tolerates_inner_whitespace_and_repeats() {
        assert_eq!(render("{{ name }} / {{name}}", &vars()), "Ravi / Ravi");
    }

    #[test]
    fn test_render_leaves_unknown_and_unclosed() {
        assert_eq!(render("Hi {{who}}", &vars()), "Hi {{who}}");
        assert_eq!(render("Hi {{name", &vars()), "Hi {{name");
    }

    #[test]
    fn test_unknown_placeholders_deduplicated() {
        assert_eq!(
            unknown_placeholders("{{a}} {{name}} {{a}} {{ b }}"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(unknown_placeholders("plain text").is_empty());
    }
}
