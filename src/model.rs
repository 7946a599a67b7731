//! # Models & Naming
//!
//! A resource describes a *model*: the entity type its adapter reads and
//! writes. The core never touches the model itself, it only needs a stable
//! reference to it and the names derived from it.
//!
//! - [`ModelRef`] is that reference.
//! - [`ModelNamespace`] is the lookup table used to infer a model from a
//!   resource name (`"blog_posts"` → `BlogPost`).
//! - [`ModelName`] holds the singular, plural and human forms used for
//!   labels, translations and route keys.

use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Reference to a concrete model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    name: String,
    type_id: Option<TypeId>,
}

impl ModelRef {
    /// A model known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: None,
        }
    }

    /// A model backed by a Rust type.
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: Some(TypeId::of::<T>()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this reference was registered for `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == Some(TypeId::of::<T>())
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The models visible to model inference, keyed by class-style name (`BlogPost`).
#[derive(Debug, Clone, Default)]
pub struct ModelNamespace {
    models: HashMap<String, ModelRef>,
}

impl ModelNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model by name. Re-registering a name replaces it.
    pub fn register(&mut self, model: ModelRef) -> &mut Self {
        self.models.insert(model.name.clone(), model);
        self
    }

    /// Shorthand for registering a Rust type under `name`.
    pub fn register_type<T: 'static>(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(ModelRef::of::<T>(name))
    }

    pub fn lookup(&self, name: &str) -> Option<&ModelRef> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Names derived from a model, computed once per resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    name: String,
    singular: String,
    plural: String,
}

impl ModelName {
    pub fn new(model: &ModelRef) -> Self {
        let singular = model.name().to_snake_case();
        let plural = pluralize(&singular);
        Self {
            name: model.name().to_string(),
            singular,
            plural,
        }
    }

    /// The model's own name, e.g. `BlogPost`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `blog_post`
    pub fn singular(&self) -> &str {
        &self.singular
    }

    /// `blog_posts`
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// `Blog Post`
    pub fn titleize(&self) -> String {
        self.singular.to_title_case()
    }

    /// `blog post`
    pub fn downcase(&self) -> String {
        self.titleize().to_lowercase()
    }

    /// `Blog Posts`
    pub fn plural_titleize(&self) -> String {
        self.plural.to_title_case()
    }

    /// Key under which form parameters for this model are nested.
    pub fn param_key(&self) -> &str {
        &self.singular
    }

    pub fn route_key(&self) -> &str {
        &self.plural
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

const UNCOUNTABLE: &[&str] = &["equipment", "information", "series", "species", "news"];

/// Converts a resource name to the model name inference looks up: `blog_posts` → `BlogPost`.
pub fn classify(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    singularize(last).to_upper_camel_case()
}

/// Singular form of the last word of a snake_case name.
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    let lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
        return format!("{head}{singular}");
    }

    let singular = if let Some(stem) = last.strip_suffix("ies").filter(|s| !s.is_empty()) {
        format!("{stem}y")
    } else if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| last.ends_with(suffix))
    {
        last[..last.len() - 2].to_string()
    } else if last.ends_with("ss") || last.ends_with("us") {
        last.to_string()
    } else if let Some(stem) = last.strip_suffix('s') {
        stem.to_string()
    } else {
        last.to_string()
    };

    format!("{head}{singular}")
}

/// Plural form of the last word of a snake_case name.
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    let lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return format!("{head}{plural}");
    }

    let plural = if let Some(stem) = last.strip_suffix('y').filter(|s| ends_with_consonant(s)) {
        format!("{stem}ies")
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| last.ends_with(suffix))
    {
        format!("{last}es")
    } else {
        format!("{last}s")
    };

    format!("{head}{plural}")
}

fn split_last_word(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    }
}

fn ends_with_consonant(s: &str) -> bool {
    s.chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("widget"), "Widget");
        assert_eq!(classify("widgets"), "Widget");
        assert_eq!(classify("blog_posts"), "BlogPost");
        assert_eq!(classify("categories"), "Category");
        assert_eq!(classify("admin/addresses"), "Address");
        assert_eq!(classify("people"), "Person");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("widget"), "widgets");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("blog_post"), "blog_posts");
        assert_eq!(pluralize("sales_person"), "sales_people");
        assert_eq!(pluralize("news"), "news");
    }

    #[test]
    fn test_model_name_forms() {
        let name = ModelName::new(&ModelRef::named("BlogPost"));
        assert_eq!(name.singular(), "blog_post");
        assert_eq!(name.plural(), "blog_posts");
        assert_eq!(name.titleize(), "Blog Post");
        assert_eq!(name.downcase(), "blog post");
        assert_eq!(name.plural_titleize(), "Blog Posts");
        assert_eq!(name.route_key(), "blog_posts");
    }

    #[test]
    fn test_namespace_lookup() {
        struct Widget;

        let mut ns = ModelNamespace::new();
        ns.register_type::<Widget>("Widget");

        let model = ns.lookup("Widget").expect("registered");
        assert!(model.is::<Widget>());
        assert!(ns.lookup("Gadget").is_none());
    }
}
