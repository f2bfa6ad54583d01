// src/page/mod.rs
// =============================================================================
// This module connects a host HTML page to the data source and renderer.
//
// A page marks where repositories should go like this:
//
//   <ul data-github-user="octocat"></ul>
//   <template><li><a href="{{html_url}}">{{name}}</a></li></template>
//
// The container carries the user identifier, its next sibling element holds
// the template. For every container we fetch the user's repositories, render
// the template once per repository and produce the markup to append.
//
// Submodules:
// - mount: finding containers and rendering them
// =============================================================================

mod mount;

pub use mount::{find_mounts, render_mounts, render_repositories, USER_ATTRIBUTE};
