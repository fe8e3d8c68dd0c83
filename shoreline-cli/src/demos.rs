//! Built-in demo scene documents, embedded at compile time.

pub const BEACH: &str = include_str!("../demos/beach.toml");
pub const SIMPLE: &str = include_str!("../demos/simple.toml");

/// Name and one-line description of every built-in demo.
pub const CATALOG: &[(&str, &str)] = &[
    (
        "beach",
        "Three beach models with fallbacks, a gradient sky, and interactions",
    ),
    ("simple", "One clickable box that cycles through a palette"),
];

/// Look up a built-in demo document by name.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "beach" => Some(BEACH),
        "simple" => Some(SIMPLE),
        _ => None,
    }
}
