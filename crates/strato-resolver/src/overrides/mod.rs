//! Fixed override rules pinning framework packages to compatible ranges.
//!
//! The table is ordered; the first rule whose matcher hits a package name
//! assigns that rule's target range regardless of the package's current
//! specifier. Packages matching no rule fall through to a default policy.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use strato_config::DependencyMap;
use strato_core::types::{VersionReq, VersionSpec};
use tracing::info;

/// How a rule matches a package name
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Exact package name
    Exact(&'static str),
    /// Regular expression over the package name
    Pattern(&'static str),
}

/// One entry of the override table
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub matcher: Matcher,
    pub target_range: &'static str,
    pub reason: Option<&'static str>,
}

/// The fixed override table, tried in order; first match wins.
pub const OVERRIDE_RULES: &[OverrideRule] = &[
    OverrideRule {
        matcher: Matcher::Exact("strato-compiler"),
        target_range: "^5.1.0",
        reason: Some("the 5.1 compiler line is the newest the build toolchain supports"),
    },
    OverrideRule {
        matcher: Matcher::Exact("strato-lint"),
        target_range: "^2.4.0",
        reason: None,
    },
    OverrideRule {
        matcher: Matcher::Exact("core-polyfills"),
        target_range: "~0.14.0",
        reason: Some("0.15 drops the legacy browser targets the toolchain still serves"),
    },
    OverrideRule {
        matcher: Matcher::Exact("@strato/router"),
        target_range: "^4.2.0",
        reason: Some("router releases before 4.2 mishandle nested child outlets"),
    },
    OverrideRule {
        matcher: Matcher::Pattern(r"^@strato/"),
        target_range: "^4.0.0",
        reason: None,
    },
    OverrideRule {
        matcher: Matcher::Pattern(r"^@strato-sdk/"),
        target_range: "^4.0.0",
        reason: None,
    },
];

static PATTERNS: Lazy<Vec<Option<Regex>>> = Lazy::new(|| {
    OVERRIDE_RULES
        .iter()
        .map(|rule| match rule.matcher {
            Matcher::Exact(_) => None,
            // The table is static, so a bad pattern is a programmer error
            Matcher::Pattern(pattern) => Some(Regex::new(pattern).unwrap()),
        })
        .collect()
});

/// Resolution target for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeTarget {
    /// The `latest` dist-tag
    Latest,
    /// A version range, with the raw text preserved for output
    Range { raw: String, req: VersionReq },
}

impl UpgradeTarget {
    fn from_range(raw: &str, req: VersionReq) -> Self {
        UpgradeTarget::Range {
            raw: raw.to_string(),
            req,
        }
    }

    /// View as a registry-facing specifier
    pub fn to_spec(&self) -> VersionSpec {
        match self {
            UpgradeTarget::Latest => VersionSpec::Latest,
            UpgradeTarget::Range { req, .. } => VersionSpec::Range(req.clone()),
        }
    }
}

/// Assign a resolution target to every package in a classified-valid map.
///
/// The output holds exactly the input's keys in the input's order, so
/// resolved versions can be re-associated with package names by key lookup.
pub fn apply_override_rules(valid: &DependencyMap) -> IndexMap<String, UpgradeTarget> {
    let mut targets = IndexMap::with_capacity(valid.len());

    for (name, specifier) in valid {
        if let Some(rule) = first_matching_rule(name) {
            if let Some(reason) = rule.reason {
                info!(package = name.as_str(), range = rule.target_range, "{}", reason);
            }
            // Table ranges are static and known to parse
            let req = VersionReq::parse(rule.target_range).unwrap();
            targets.insert(name.clone(), UpgradeTarget::from_range(rule.target_range, req));
            continue;
        }

        let target = match VersionSpec::parse(specifier) {
            Some(VersionSpec::Exact(version)) => {
                let req = VersionReq::caret(&version);
                UpgradeTarget::from_range(&req.to_string(), req)
            },
            Some(VersionSpec::Latest) => UpgradeTarget::Latest,
            Some(VersionSpec::Range(req)) => UpgradeTarget::from_range(specifier, req),
            // classify_entries only feeds us resolvable specifiers
            None => continue,
        };
        targets.insert(name.clone(), target);
    }

    targets
}

fn first_matching_rule(name: &str) -> Option<&'static OverrideRule> {
    OVERRIDE_RULES
        .iter()
        .zip(PATTERNS.iter())
        .find(|(rule, pattern)| match rule.matcher {
            Matcher::Exact(exact) => exact == name,
            Matcher::Pattern(_) => pattern
                .as_ref()
                .map(|regex| regex.is_match(name))
                .unwrap_or(false),
        })
        .map(|(rule, _)| rule)
}
