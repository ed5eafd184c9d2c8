//! Final route table assembly.
//!
//! Orchestrates guard parsing, node derivation, guard attachment, and tree
//! assembly, then emits the route configuration in its fixed order:
//! redirects, the root route with the page tree, the catch-all entry.

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use strato_core::error::StratoError;

use crate::guards::RouteGuard;
use crate::nodes::{derive_route_nodes, RouteNode, SOURCE_ROOT};
use crate::tree::assemble_tree;
use crate::RouteResult;

/// Identifier of the fixed catch-all component
pub const NOT_FOUND_COMPONENT: &str = "NotFoundComponent";

/// A guard file path with its source text, supplied by the caller
#[derive(Debug, Clone)]
pub struct GuardSource {
    pub path: Utf8PathBuf,
    pub contents: String,
}

/// How a redirect matches the requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Full,
    Prefix,
}

/// A path-to-path forwarding entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub from_path: String,
    pub to_path: String,
    pub match_mode: MatchMode,
}

impl RedirectRule {
    /// Build a rule; the empty from-path must match the full URL
    pub fn new(from_path: &str, to_path: &str) -> Self {
        Self {
            from_path: from_path.to_string(),
            to_path: to_path.to_string(),
            match_mode: if from_path.is_empty() {
                MatchMode::Full
            } else {
                MatchMode::Prefix
            },
        }
    }
}

/// One entry of the emitted router configuration
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEntry {
    Redirect(RedirectRule),
    Page(RouteNode),
    NotFound { component: String },
}

/// Descriptor for one generated view component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteComponent {
    pub identifier: String,
    pub source_dir: Utf8PathBuf,
    pub route_params: Vec<String>,
}

/// Output of the route table builder
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    /// Flat list of view-component descriptors, one per page file
    pub components: Vec<RouteComponent>,
    /// Router configuration in emission order
    pub config: Vec<RouteEntry>,
}

/// Build the route table for a project.
///
/// `page_paths` and `guards` come from the caller's source tree scan; the
/// builder itself touches no files. Redirects are emitted in declaration
/// order, ahead of every concrete route.
pub fn build_route_table(
    page_paths: &[Utf8PathBuf],
    guards: &[GuardSource],
    redirects: &IndexMap<String, String>,
) -> RouteResult<RouteTable> {
    // Step 1: parse guards
    let guards = guards
        .iter()
        .map(|g| RouteGuard::parse(&g.path, &g.contents))
        .collect::<RouteResult<Vec<_>>>()?;

    // Step 2: derive route nodes
    let derived = derive_route_nodes(page_paths)?;
    let mut root = derived.root.ok_or_else(|| StratoError::RouteSource {
        file: format!("{}/index.html", SOURCE_ROOT),
        reason: "the root page is missing".to_string(),
    })?;
    let mut nodes = derived.nodes;

    // Step 3: attach guards by directory correspondence
    attach_guard(&mut root, &guards);
    for node in &mut nodes {
        attach_guard(node, &guards);
    }

    // The flat component list covers every page, routed or not
    let mut components: Vec<RouteComponent> = Vec::with_capacity(nodes.len() + 2);
    components.push(component_of(&root));
    components.extend(nodes.iter().map(component_of));

    // Step 4: splice nested routes into their parents
    root.children = assemble_tree(nodes);

    // Step 5: redirects first, then the root tree, then the catch-all
    let mut config = Vec::with_capacity(redirects.len() + 2);
    config.extend(
        redirects
            .iter()
            .map(|(from, to)| RouteEntry::Redirect(RedirectRule::new(from, to))),
    );
    config.push(RouteEntry::Page(root));
    config.push(RouteEntry::NotFound {
        component: NOT_FOUND_COMPONENT.to_string(),
    });

    Ok(RouteTable { components, config })
}

fn attach_guard(node: &mut RouteNode, guards: &[RouteGuard]) {
    node.guard = guards
        .iter()
        .find(|guard| guard.directory() == node.source_dir)
        .cloned();
}

fn component_of(node: &RouteNode) -> RouteComponent {
    RouteComponent {
        identifier: node.component_identifier.clone(),
        source_dir: node.source_dir.clone(),
        route_params: node.route_params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(raw: &[&str]) -> Vec<Utf8PathBuf> {
        raw.iter().map(Utf8PathBuf::from).collect()
    }

    fn root_entry(table: &RouteTable) -> &RouteNode {
        table
            .config
            .iter()
            .find_map(|entry| match entry {
                RouteEntry::Page(node) => Some(node),
                _ => None,
            })
            .expect("route config has a root entry")
    }

    #[test]
    fn test_redirects_precede_routes_and_catch_all() {
        let mut redirects = IndexMap::new();
        redirects.insert("".to_string(), "home".to_string());

        let table = build_route_table(
            &pages(&["src/app/index.html", "src/app/home/index.html"]),
            &[],
            &redirects,
        )
        .unwrap();

        assert!(matches!(
            &table.config[0],
            RouteEntry::Redirect(rule)
                if rule.to_path == "home" && rule.match_mode == MatchMode::Full
        ));
        assert!(matches!(&table.config[1], RouteEntry::Page(_)));
        assert!(matches!(&table.config[2], RouteEntry::NotFound { .. }));
    }

    #[test]
    fn test_non_empty_redirect_uses_prefix_matching() {
        let rule = RedirectRule::new("old-about", "about");
        assert_eq!(rule.match_mode, MatchMode::Prefix);
    }

    #[test]
    fn test_guard_attached_by_directory() {
        let guard = GuardSource {
            path: Utf8PathBuf::from("src/app/users/index.guard.ts"),
            contents: "export class UsersGuard { canActivate() { return true; } }".to_string(),
        };

        let table = build_route_table(
            &pages(&["src/app/index.html", "src/app/users/index.html"]),
            &[guard],
            &IndexMap::new(),
        )
        .unwrap();

        let users = &root_entry(&table).children[0];
        let attached = users.guard.as_ref().unwrap();
        assert_eq!(attached.identifier, "UsersGuard");
        assert!(attached.can_activate);
        assert!(!attached.can_activate_child);
        assert!(!attached.can_deactivate);
    }

    #[test]
    fn test_missing_root_page_is_an_error() {
        let err = build_route_table(
            &pages(&["src/app/about/index.html"]),
            &[],
            &IndexMap::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("src/app/index.html"));
    }

    #[test]
    fn test_components_cover_unrouted_pages() {
        // The orphan's parent does not exist, so it drops out of the tree
        // but still gets a component.
        let table = build_route_table(
            &pages(&[
                "src/app/index.html",
                "src/app/missing/#orphan/index.html",
            ]),
            &[],
            &IndexMap::new(),
        )
        .unwrap();

        assert!(root_entry(&table).children.is_empty());
        assert!(table
            .components
            .iter()
            .any(|c| c.identifier == "MissingOrphanIndexComponent"));
    }

    #[test]
    fn test_guard_parse_failure_stops_generation() {
        let guard = GuardSource {
            path: Utf8PathBuf::from("src/app/index.guard.ts"),
            contents: "export class A {}\nexport class B {}".to_string(),
        };

        let result = build_route_table(
            &pages(&["src/app/index.html"]),
            &[guard],
            &IndexMap::new(),
        );
        assert!(result.is_err());
    }
}
