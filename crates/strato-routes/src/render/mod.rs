//! Source rendering for generated routing artifacts.
//!
//! Serializes a `RouteTable` into the framework's router-module source and
//! each `RouteComponent` into a view-component source file. The ejection
//! command writes these strings into the regenerated project tree.

use crate::assemble::{MatchMode, RouteComponent, RouteEntry, RouteTable};
use crate::guards::RouteGuard;
use crate::nodes::{RouteNode, SOURCE_ROOT};

/// Render the source of one generated view component
pub fn render_component(component: &RouteComponent) -> String {
    let mut source = String::from("import { Component } from '@strato/core';\n");
    if !component.route_params.is_empty() {
        source.push_str("import { RouteParams } from '@strato/router';\n");
    }

    source.push_str("\n@Component({\n  templateUrl: './index.html'\n})\n");
    source.push_str(&format!("export class {} {{\n", component.identifier));
    if !component.route_params.is_empty() {
        source.push_str("  constructor(public params: RouteParams) { }\n");
    }
    source.push_str("}\n");
    source
}

/// Render the router-module source for a route table
pub fn render_routing_module(table: &RouteTable) -> String {
    let mut source = String::from("import { RouteDefinition } from '@strato/router';\n\n");

    for component in &table.components {
        source.push_str(&format!(
            "import {{ {} }} from '{}/index.component';\n",
            component.identifier,
            import_dir(component.source_dir.as_str()),
        ));
    }
    source.push_str("import { NotFoundComponent } from './not-found.component';\n");

    for guard in collect_guards(&table.config) {
        source.push_str(&format!(
            "import {{ {} }} from '{}/index.guard';\n",
            guard.identifier,
            import_dir(guard.directory().as_str()),
        ));
    }

    source.push_str("\nexport const routes: RouteDefinition[] = [\n");
    for entry in &table.config {
        match entry {
            RouteEntry::Redirect(rule) => {
                let path_match = match rule.match_mode {
                    MatchMode::Full => "full",
                    MatchMode::Prefix => "prefix",
                };
                source.push_str(&format!(
                    "  {{ path: '{}', redirectTo: '{}', pathMatch: '{}' }},\n",
                    rule.from_path, rule.to_path, path_match
                ));
            },
            RouteEntry::Page(node) => {
                render_node(node, 1, &mut source);
            },
            RouteEntry::NotFound { component } => {
                source.push_str(&format!("  {{ path: '**', component: {} }},\n", component));
            },
        }
    }
    source.push_str("];\n");
    source
}

fn render_node(node: &RouteNode, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{{ path: '{}', component: {}",
        pad, node.url_path, node.component_identifier
    ));

    if let Some(ref guard) = node.guard {
        if guard.can_activate {
            out.push_str(&format!(", canActivate: [{}]", guard.identifier));
        }
        if guard.can_activate_child {
            out.push_str(&format!(", canActivateChild: [{}]", guard.identifier));
        }
        if guard.can_deactivate {
            out.push_str(&format!(", canDeactivate: [{}]", guard.identifier));
        }
    }

    if node.children.is_empty() {
        out.push_str(" },\n");
    } else {
        out.push_str(", children: [\n");
        for child in &node.children {
            render_node(child, depth + 1, out);
        }
        out.push_str(&format!("{}] }},\n", pad));
    }
}

/// Import specifier for a directory under the source root
fn import_dir(source_dir: &str) -> String {
    match source_dir.strip_prefix(SOURCE_ROOT) {
        Some("") => ".".to_string(),
        Some(rest) => format!(".{}", rest),
        None => format!("./{}", source_dir),
    }
}

fn collect_guards(config: &[RouteEntry]) -> Vec<&RouteGuard> {
    fn walk<'a>(node: &'a RouteNode, out: &mut Vec<&'a RouteGuard>) {
        if let Some(ref guard) = node.guard {
            out.push(guard);
        }
        for child in &node.children {
            walk(child, out);
        }
    }

    let mut guards = Vec::new();
    for entry in config {
        if let RouteEntry::Page(node) = entry {
            walk(node, &mut guards);
        }
    }
    guards
}
