// src/page/mount.rs
// =============================================================================
// Finds mount points in an HTML document and renders them.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// The document is only read. Producing the final page (appending the markup
// to each container) is left to whoever embeds the output.
//
// Rust concepts:
// - Iterators: walking sibling nodes until we hit an element
// - Streams: rendering several mounts concurrently, in document order
// =============================================================================

use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::github::{FetchError, Repository, RepositorySource};
use crate::template::render;

/// Attribute holding the user identifier on a container element
pub const USER_ATTRIBUTE: &str = "data-github-user";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Invalid selector '{0}': {1}")]
    Selector(String, String),

    /// Container #index (document order) has an empty user attribute
    #[error("Container #{0} has an empty data-github-user attribute")]
    EmptyUser(usize),

    #[error("Container for '{0}' has no template element after it")]
    MissingTemplate(String),
}

/// One container and the template found next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub user: String,
    pub template: String,
}

/// Outcome of rendering one mount
#[derive(Debug, Clone, Serialize)]
pub struct MountReport {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MountReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Finds every `[data-github-user]` container in `html`, in document order.
///
/// The template is the inner HTML of the container's next sibling element.
/// A container with a blank user or without a following element is an error.
pub fn find_mounts(html: &str) -> Result<Vec<Mount>, PageError> {
    let document = Html::parse_document(html);

    let query = format!("[{}]", USER_ATTRIBUTE);
    let selector = Selector::parse(&query)
        .map_err(|e| PageError::Selector(query.clone(), format!("{:?}", e)))?;

    let mut mounts = Vec::new();

    for (index, container) in document.select(&selector).enumerate() {
        let user = container
            .value()
            .attr(USER_ATTRIBUTE)
            .unwrap_or_default()
            .trim()
            .to_string();

        if user.is_empty() {
            return Err(PageError::EmptyUser(index));
        }

        // Skip whitespace and comment nodes between the container and the
        // template; the first element sibling is the template
        let template = container
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|element| element.inner_html())
            .ok_or_else(|| PageError::MissingTemplate(user.clone()))?;

        mounts.push(Mount { user, template });
    }

    Ok(mounts)
}

/// Renders `template` once per repository and concatenates the results.
pub fn render_repositories(template: &str, repositories: &[Repository]) -> String {
    repositories
        .iter()
        .map(|repo| render(template, &repo.fields()))
        .collect()
}

/// Fetches and renders every mount, at most `limit` at a time.
///
/// Reports come back in the same order as `mounts`. Mounts for the same user
/// are not de-duplicated; each one goes through the data source on its own.
pub async fn render_mounts(
    source: &RepositorySource,
    mounts: Vec<Mount>,
    limit: usize,
) -> Vec<MountReport> {
    let renders = mounts.into_iter().map(|mount| async move {
        let result: Result<String, FetchError> = source
            .get_repositories(&mount.user)
            .await
            .map(|repos| render_repositories(&mount.template, &repos));

        match result {
            Ok(html) => {
                debug!(user = %mount.user, bytes = html.len(), "Rendered mount");
                MountReport {
                    user: mount.user,
                    html: Some(html),
                    error: None,
                }
            }
            Err(e) => MountReport {
                user: mount.user,
                html: None,
                error: Some(e.to_string()),
            },
        }
    });

    // buffered (not buffer_unordered) keeps document order
    stream::iter(renders).buffered(limit.max(1)).collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemorySessionStore;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_find_single_mount() {
        let html = r#"
            <ul data-github-user="octocat"></ul>
            <template><li>{{name}}</li></template>
        "#;

        let mounts = find_mounts(html).unwrap();
        assert_eq!(
            mounts,
            vec![Mount {
                user: "octocat".to_string(),
                template: "<li>{{name}}</li>".to_string(),
            }]
        );
    }

    #[test]
    fn test_find_mounts_in_document_order() {
        let html = r#"
            <section>
                <div data-github-user="first"></div>
                <!-- template follows -->
                <div hidden><p>{{name}}</p></div>
            </section>
            <section>
                <div data-github-user=" second "></div>
                <div hidden><span>{{ updated_at }}</span></div>
            </section>
        "#;

        let mounts = find_mounts(html).unwrap();
        let users: Vec<_> = mounts.iter().map(|m| m.user.as_str()).collect();
        assert_eq!(users, vec!["first", "second"]);
        assert_eq!(mounts[0].template, "<p>{{name}}</p>");
        assert_eq!(mounts[1].template, "<span>{{ updated_at }}</span>");
    }

    #[test]
    fn test_no_mounts() {
        assert_eq!(find_mounts("<p>nothing here</p>").unwrap(), vec![]);
    }

    #[test]
    fn test_missing_template_is_error() {
        let html = r#"<div><ul data-github-user="octocat"></ul></div>"#;
        assert_eq!(
            find_mounts(html),
            Err(PageError::MissingTemplate("octocat".to_string()))
        );
    }

    #[test]
    fn test_empty_user_is_error() {
        let html = r#"<ul data-github-user=""></ul><div>{{name}}</div>"#;
        assert_eq!(find_mounts(html), Err(PageError::EmptyUser(0)));
    }

    #[test]
    fn test_render_repositories_appends_in_order() {
        let repos: Vec<Repository> = serde_json::from_value(json!([
            {"name": "b", "has_pages": true, "updated_at": "2022-01-01", "homepage": "https://b.dev"},
            {"name": "a", "has_pages": true, "updated_at": "2021-01-01", "homepage": null}
        ]))
        .unwrap();

        assert_eq!(
            render_repositories("<li>{{name}}:{{homepage}}</li>", &repos),
            "<li>b:https://b.dev</li><li>a:</li>"
        );
        assert_eq!(render_repositories("<li>{{name}}</li>", &[]), "");
    }

    #[tokio::test]
    async fn test_render_mounts_reports_each_mount() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "docs", "has_pages": true, "updated_at": "2021-01-01"},
                {"name": "blog", "has_pages": true, "updated_at": "2022-01-01"},
                {"name": "tool", "has_pages": false, "updated_at": "2023-01-01"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        let source = RepositorySource::new(&config, Arc::new(MemorySessionStore::new())).unwrap();

        let mounts = vec![
            Mount {
                user: "octocat".to_string(),
                template: "<li>{{name}}</li>".to_string(),
            },
            Mount {
                user: "ghost".to_string(),
                template: "<li>{{name}}</li>".to_string(),
            },
            Mount {
                user: "octocat".to_string(),
                template: "{{name}},".to_string(),
            },
        ];

        let reports = render_mounts(&source, mounts, 2).await;

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].html.as_deref(), Some("<li>blog</li><li>docs</li>"));
        assert!(reports[0].is_ok());

        assert_eq!(reports[1].user, "ghost");
        assert!(!reports[1].is_ok());
        assert!(reports[1].error.as_deref().unwrap().contains("404"));

        assert_eq!(reports[2].html.as_deref(), Some("blog,docs,"));
    }

    #[test]
    fn test_report_json_skips_empty_fields() {
        let report = MountReport {
            user: "octocat".to_string(),
            html: Some("<li>x</li>".to_string()),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"user": "octocat", "html": "<li>x</li>"})
        );
    }
}
