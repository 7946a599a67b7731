//! Translation lookup consumed from the host.
//!
//! The core only augments lookups with model-name interpolation variables
//! (see [`Resource::translate`](crate::Resource::translate)); the string store
//! itself belongs to the host.

use std::collections::BTreeMap;

/// Interpolation variables passed to a translation lookup.
pub type Vars = BTreeMap<String, String>;

/// Host translation lookup.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, vars: &Vars) -> String;
}

/// Fallback used when the host supplies no translator.
///
/// Interpolates `%{name}` placeholders into the `default` variable when one is
/// given, otherwise returns the key unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn translate(&self, key: &str, vars: &Vars) -> String {
        match vars.get("default") {
            Some(template) => interpolate(template, vars),
            None => key.to_string(),
        }
    }
}

/// Replaces every `%{name}` in `template` with `vars[name]`. Unknown names are left as is.
pub fn interpolate(template: &str, vars: &Vars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate() {
        let mut vars = Vars::new();
        vars.insert("model_name".into(), "Widget".into());
        assert_eq!(interpolate("New %{model_name}", &vars), "New Widget");
        assert_eq!(interpolate("%{missing} here", &vars), "%{missing} here");
        assert_eq!(interpolate("open %{brace", &vars), "open %{brace");
    }

    #[test]
    fn test_default_translator_falls_back_to_key() {
        assert_eq!(DefaultTranslator.translate("admin.title", &Vars::new()), "admin.title");
    }
}
