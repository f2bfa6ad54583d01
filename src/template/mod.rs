// src/template/mod.rs
// =============================================================================
// This module renders mustache-style templates.
//
// Only flat substitution is supported: {{ key }} is replaced by the value of
// `key` in a JSON record. There are no loops, conditionals, partials or
// escaping. If you need any of those, this is the wrong tool.
// =============================================================================

mod render;

pub use render::render;
