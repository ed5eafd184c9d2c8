//! Route table generation for Strato projects
//!
//! Turns a project's page files (`src/app/**/index.html`) and route guards
//! (`src/app/**/index.guard.ts`) into a flat list of view-component
//! descriptors and a nested router configuration: redirects first, then the
//! root route carrying the page tree, then the catch-all entry.
//!
//! Path conventions: a directory segment prefixed `_` becomes a dynamic
//! `:parameter`, and a segment prefixed `#` nests its route under the parent
//! directory's route instead of the top level.

pub mod assemble;
pub mod guards;
pub mod nodes;
pub mod render;
pub mod tree;

// Re-export main types
pub use assemble::{build_route_table, GuardSource, MatchMode, RedirectRule, RouteComponent, RouteEntry, RouteTable};
pub use guards::RouteGuard;
pub use nodes::{RouteNode, SOURCE_ROOT};
pub use render::{render_component, render_routing_module};

use strato_core::error::StratoError;

/// Result type for route generation
pub type RouteResult<T> = Result<T, StratoError>;
