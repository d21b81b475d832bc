use minijinja::{Environment, Value};
use serde::Serialize;
use std::sync::OnceLock;

/// Per-request render context built by the pipeline and passed by value into
/// every render call. Carries the site-wide default title until a handler
/// overrides it.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
}

impl PageContext {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    #[must_use]
    pub fn titled(&self, title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

const TEMPLATE_SOURCES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("about.html", include_str!("../../templates/about.html")),
    ("impact.html", include_str!("../../templates/impact.html")),
    ("error.html", include_str!("../../templates/error.html")),
    (
        "volunteers/list.html",
        include_str!("../../templates/volunteers/list.html"),
    ),
    (
        "volunteers/form.html",
        include_str!("../../templates/volunteers/form.html"),
    ),
    (
        "volunteers/show.html",
        include_str!("../../templates/volunteers/show.html"),
    ),
    (
        "tasks/list.html",
        include_str!("../../templates/tasks/list.html"),
    ),
    (
        "tasks/form.html",
        include_str!("../../templates/tasks/form.html"),
    ),
    (
        "tasks/show.html",
        include_str!("../../templates/tasks/show.html"),
    ),
    (
        "projects/list.html",
        include_str!("../../templates/projects/list.html"),
    ),
    (
        "projects/form.html",
        include_str!("../../templates/projects/form.html"),
    ),
    (
        "projects/show.html",
        include_str!("../../templates/projects/show.html"),
    ),
];

/// Object ids arrive in render contexts in their extended-JSON form, a
/// one-entry `{"$oid": hex}` map. Links and form values need the bare hex
/// string, so every id interpolation goes through this filter.
fn oid(value: Value) -> Value {
    match value.get_attr("$oid") {
        Ok(inner) if !inner.is_undefined() => inner,
        _ => value,
    }
}

fn environment() -> &'static Environment<'static> {
    static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();
    ENVIRONMENT.get_or_init(|| {
        let mut env = Environment::new();
        env.add_filter("oid", oid);
        for (name, source) in TEMPLATE_SOURCES {
            // Sources are embedded at compile time; a syntax error here is a
            // build defect, not a runtime condition.
            env.add_template(name, source).expect("embedded template");
        }
        env
    })
}

/// Pure function from template name + serializable data bag to HTML.
pub fn render(name: &str, ctx: Value) -> Result<String, minijinja::Error> {
    environment().get_template(name)?.render(ctx)
}
