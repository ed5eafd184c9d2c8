//! Route node derivation from page file paths.
//!
//! Each `index.html` under the source root becomes one addressable route.
//! The directory path relative to the source root determines the URL path,
//! the dynamic parameters, and the generated component's identifier.

use camino::{Utf8Path, Utf8PathBuf};
use strato_core::error::StratoError;

use crate::guards::RouteGuard;
use crate::RouteResult;

/// Project-relative root of the application source tree
pub const SOURCE_ROOT: &str = "src/app";

/// Suffix appended to every generated view component identifier
pub const COMPONENT_SUFFIX: &str = "IndexComponent";

/// One addressable page
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    /// URL path with dynamic parameters (`users/:userId`); empty for the root
    pub url_path: String,
    /// Directory segments as they appear on disk, markers included
    pub raw_segments: Vec<String>,
    /// Identifier of the generated view component
    pub component_identifier: String,
    /// Dynamic parameter names in declaration order
    pub route_params: Vec<String>,
    /// Directory holding the page file, markers included
    pub source_dir: Utf8PathBuf,
    /// Guard attached by directory correspondence
    pub guard: Option<RouteGuard>,
    /// Child routes spliced in by tree assembly
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// A `#`-marked segment nests this route under its parent directory's route
    pub fn is_nested(&self) -> bool {
        self.raw_segments.iter().any(|s| s.starts_with('#'))
    }
}

/// Result of deriving nodes from page paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedNodes {
    /// The page whose path reduces to the empty string
    pub root: Option<RouteNode>,
    /// Every other page, in discovery order
    pub nodes: Vec<RouteNode>,
}

/// Derive route nodes from page file paths
pub fn derive_route_nodes(page_paths: &[Utf8PathBuf]) -> RouteResult<DerivedNodes> {
    let mut derived = DerivedNodes::default();

    for path in page_paths {
        let node = derive_node(path)?;
        if node.raw_segments.is_empty() {
            derived.root = Some(node);
        } else {
            derived.nodes.push(node);
        }
    }

    Ok(derived)
}

fn derive_node(path: &Utf8Path) -> RouteResult<RouteNode> {
    if path.file_name() != Some("index.html") {
        return Err(StratoError::RouteSource {
            file: path.to_string(),
            reason: "page files must be named index.html".to_string(),
        });
    }

    let source_dir = path.parent().unwrap_or(Utf8Path::new("")).to_owned();
    let relative = source_dir
        .strip_prefix(SOURCE_ROOT)
        .unwrap_or(&source_dir);

    let raw_segments: Vec<String> = relative
        .components()
        .map(|c| c.as_str().to_string())
        .collect();

    let mut route_params = Vec::new();
    let mut cleaned = Vec::with_capacity(raw_segments.len());
    for segment in &raw_segments {
        if let Some(name) = segment.strip_prefix('_') {
            route_params.push(name.to_string());
            cleaned.push(format!(":{}", name));
        } else if let Some(rest) = segment.strip_prefix('#') {
            cleaned.push(rest.to_string());
        } else {
            cleaned.push(segment.clone());
        }
    }

    Ok(RouteNode {
        url_path: cleaned.join("/"),
        component_identifier: component_identifier(&raw_segments),
        route_params,
        source_dir,
        raw_segments,
        guard: None,
        children: Vec::new(),
    })
}

/// Derive the deterministic component identifier for a page.
///
/// Marker characters are dropped, the remaining segment text is classified
/// into PascalCase, and the fixed suffix is appended. The root page gets the
/// `Root` prefix.
pub fn component_identifier(raw_segments: &[String]) -> String {
    if raw_segments.is_empty() {
        return format!("Root{}", COMPONENT_SUFFIX);
    }

    let mut identifier = String::new();
    for segment in raw_segments {
        let stripped = segment.trim_start_matches(['#', '_']);
        for word in stripped.split(|c: char| !c.is_ascii_alphanumeric()) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                identifier.extend(first.to_uppercase());
                identifier.push_str(chars.as_str());
            }
        }
    }
    identifier.push_str(COMPONENT_SUFFIX);
    identifier
}
