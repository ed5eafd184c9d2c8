//! Route guard source parsing.
//!
//! A guard file exports exactly one class; its capabilities are detected by
//! scanning the source text for the corresponding method signatures.

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use strato_core::error::StratoError;

use crate::RouteResult;

static EXPORTED_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*export\s+class\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap());
static CAN_ACTIVATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcanActivate\s*\(").unwrap());
static CAN_ACTIVATE_CHILD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcanActivateChild\s*\(").unwrap());
static CAN_DEACTIVATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcanDeactivate\s*\(").unwrap());

/// A parsed route guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    /// Exported class name
    pub identifier: String,
    /// Guard source file, project-relative
    pub source_path: Utf8PathBuf,
    pub can_activate: bool,
    pub can_activate_child: bool,
    pub can_deactivate: bool,
}

impl RouteGuard {
    /// Parse a guard from its source text.
    ///
    /// The generator assumes one guard class per file; zero or several
    /// exported classes abort generation with an error naming the file.
    pub fn parse(path: &Utf8Path, source: &str) -> RouteResult<Self> {
        let mut exports = EXPORTED_CLASS.captures_iter(source);

        let identifier = match (exports.next(), exports.next()) {
            (Some(capture), None) => capture[1].to_string(),
            (None, _) => {
                return Err(StratoError::RouteSource {
                    file: path.to_string(),
                    reason: "no exported class found".to_string(),
                })
            },
            (Some(_), Some(_)) => {
                return Err(StratoError::RouteSource {
                    file: path.to_string(),
                    reason: "more than one exported class found".to_string(),
                })
            },
        };

        Ok(Self {
            identifier,
            source_path: path.to_owned(),
            can_activate: CAN_ACTIVATE.is_match(source),
            can_activate_child: CAN_ACTIVATE_CHILD.is_match(source),
            can_deactivate: CAN_DEACTIVATE.is_match(source),
        })
    }

    /// Directory the guard file lives in
    pub fn directory(&self) -> &Utf8Path {
        self.source_path.parent().unwrap_or(Utf8Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVATE_ONLY: &str = r#"
import { RouteGuard } from '@strato/router';

export class UsersGuard {
  public canActivate(next: RouteSnapshot): boolean {
    return this.session.isAuthenticated();
  }
}
"#;

    #[test]
    fn test_parse_detects_capabilities() {
        let guard =
            RouteGuard::parse(Utf8Path::new("src/app/users/index.guard.ts"), ACTIVATE_ONLY)
                .unwrap();

        assert_eq!(guard.identifier, "UsersGuard");
        assert!(guard.can_activate);
        assert!(!guard.can_activate_child);
        assert!(!guard.can_deactivate);
        assert_eq!(guard.directory(), Utf8Path::new("src/app/users"));
    }

    #[test]
    fn test_parse_all_capabilities() {
        let source = r#"
export class EverythingGuard {
  canActivate() { return true; }
  canActivateChild() { return true; }
  canDeactivate() { return true; }
}
"#;
        let guard = RouteGuard::parse(Utf8Path::new("src/app/index.guard.ts"), source).unwrap();
        assert!(guard.can_activate && guard.can_activate_child && guard.can_deactivate);
    }

    #[test]
    fn test_capability_names_do_not_overlap() {
        let source = r#"
export class ChildOnlyGuard {
  canActivateChild() { return true; }
}
"#;
        let guard = RouteGuard::parse(Utf8Path::new("src/app/index.guard.ts"), source).unwrap();
        assert!(!guard.can_activate);
        assert!(guard.can_activate_child);
    }

    #[test]
    fn test_no_exported_class_is_an_error() {
        let err = RouteGuard::parse(Utf8Path::new("src/app/bad.guard.ts"), "const x = 1;")
            .unwrap_err();
        assert!(err.to_string().contains("src/app/bad.guard.ts"));
    }

    #[test]
    fn test_multiple_exported_classes_is_an_error() {
        let source = "export class A {}\nexport class B {}";
        let err =
            RouteGuard::parse(Utf8Path::new("src/app/two.guard.ts"), source).unwrap_err();
        assert!(err.to_string().contains("more than one exported class"));
    }
}
