//! Fixed workspace validation rules behind `strato check`.
//!
//! Rules run in table order and every rule reports all of its violations;
//! the command maps a non-empty result to a failing exit code.

use std::str::FromStr;

use strato_core::types::Version;

use crate::manifest::Manifest;
use crate::toolconfig::ToolConfig;

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the rule that fired
    pub rule: &'static str,
    /// Human-readable description of the problem
    pub message: String,
}

/// A workspace validation rule
pub struct Rule {
    pub name: &'static str,
    check: fn(&Manifest, &ToolConfig) -> Vec<Violation>,
}

/// The fixed rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        name: "package-name",
        check: check_package_name,
    },
    Rule {
        name: "package-version",
        check: check_package_version,
    },
    Rule {
        name: "duplicate-dependency",
        check: check_duplicate_dependencies,
    },
    Rule {
        name: "self-dependency",
        check: check_self_dependency,
    },
    Rule {
        name: "spa-framework-packages",
        check: check_spa_framework_packages,
    },
];

/// Run every rule against the workspace configuration
pub fn check_workspace(manifest: &Manifest, config: &ToolConfig) -> Vec<Violation> {
    RULES
        .iter()
        .flat_map(|rule| (rule.check)(manifest, config))
        .collect()
}

fn check_package_name(manifest: &Manifest, _config: &ToolConfig) -> Vec<Violation> {
    if Manifest::is_valid_name(&manifest.name) {
        Vec::new()
    } else {
        vec![Violation {
            rule: "package-name",
            message: format!("'{}' is not a valid package name", manifest.name),
        }]
    }
}

fn check_package_version(manifest: &Manifest, _config: &ToolConfig) -> Vec<Violation> {
    if Version::from_str(&manifest.version).is_ok() {
        Vec::new()
    } else {
        vec![Violation {
            rule: "package-version",
            message: format!("'{}' is not a valid semantic version", manifest.version),
        }]
    }
}

fn check_duplicate_dependencies(manifest: &Manifest, _config: &ToolConfig) -> Vec<Violation> {
    manifest
        .dependencies
        .keys()
        .filter(|name| manifest.dev_dependencies.contains_key(*name))
        .map(|name| Violation {
            rule: "duplicate-dependency",
            message: format!(
                "'{}' is listed in both dependencies and devDependencies",
                name
            ),
        })
        .collect()
}

fn check_self_dependency(manifest: &Manifest, _config: &ToolConfig) -> Vec<Violation> {
    let sections = [&manifest.dependencies, &manifest.dev_dependencies];
    sections
        .iter()
        .filter(|section| section.contains_key(&manifest.name))
        .map(|_| Violation {
            rule: "self-dependency",
            message: format!("'{}' depends on itself", manifest.name),
        })
        .collect()
}

fn check_spa_framework_packages(manifest: &Manifest, config: &ToolConfig) -> Vec<Violation> {
    if config.is_spa() && !manifest.dependencies.contains_key("@strato/core") {
        vec![Violation {
            rule: "spa-framework-packages",
            message: "SPA projects must depend on @strato/core".to_string(),
        }]
    } else {
        Vec::new()
    }
}
