use std::str::FromStr;

use pep508_rs::{ExtraName, MarkerEnvironment, Requirement};

use crate::errors::WheelFormatError;
use crate::metadata::HeaderMap;
use crate::names::safe_extra;

/// Dependency view of a dist-info `METADATA` record.
#[derive(Debug, Clone, Default)]
pub struct DistInfo {
    requirements: Vec<Requirement>,
    extras: Vec<DeclaredExtra>,
}

#[derive(Debug, Clone)]
struct DeclaredExtra {
    safe: String,
    /// `None` when neither spelling is a valid PEP 685 name; such an extra
    /// can never be activated by a marker.
    name: Option<ExtraName>,
}

impl DistInfo {
    pub fn parse(metadata: &str) -> Result<Self, WheelFormatError> {
        let headers = HeaderMap::parse(metadata);
        let requirements = headers
            .get_all("Requires-Dist")
            .map(|entry| {
                Requirement::from_str(entry).map_err(|err| WheelFormatError::InvalidMetadata {
                    entry: entry.to_string(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut extras: Vec<DeclaredExtra> = Vec::new();
        for raw in headers.get_all("Provides-Extra") {
            let safe = safe_extra(raw);
            if extras.iter().any(|extra| extra.safe == safe) {
                continue;
            }
            let name = ExtraName::from_str(raw.trim())
                .or_else(|_| ExtraName::from_str(&safe))
                .ok();
            if name.is_none() {
                tracing::debug!(extra = raw, "extra name cannot appear in markers");
            }
            extras.push(DeclaredExtra { safe, name });
        }
        Ok(Self {
            requirements,
            extras,
        })
    }

    /// Declared extras in their legacy (safe) spelling, in declaration order.
    pub fn extras(&self) -> impl Iterator<Item = &str> {
        self.extras.iter().map(|extra| extra.safe.as_str())
    }

    /// Requirements that apply on `env` with no extra active.
    pub fn requires(&self, env: &MarkerEnvironment) -> Vec<&Requirement> {
        self.requirements
            .iter()
            .filter(|req| applies(req, env, &[]))
            .collect()
    }

    /// Requirements `extra` adds on top of [`DistInfo::requires`].
    ///
    /// Unknown extras yield an empty list.
    pub fn requires_extra(&self, env: &MarkerEnvironment, extra: &str) -> Vec<&Requirement> {
        let Some(declared) = self.extras.iter().find(|declared| declared.safe == extra) else {
            return Vec::new();
        };
        let Some(name) = &declared.name else {
            return Vec::new();
        };
        let active = std::slice::from_ref(name);
        self.requirements
            .iter()
            .filter(|req| !applies(req, env, &[]) && applies(req, env, active))
            .collect()
    }
}

fn applies(requirement: &Requirement, env: &MarkerEnvironment, extras: &[ExtraName]) -> bool {
    match &requirement.marker {
        Some(marker) => marker.evaluate(env, extras),
        None => true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pep508_rs::StringVersion;

    pub(crate) fn marker_env() -> MarkerEnvironment {
        MarkerEnvironment {
            implementation_name: "cpython".into(),
            implementation_version: StringVersion::from_str("3.12.0").expect("impl version"),
            os_name: "posix".into(),
            platform_machine: "x86_64".into(),
            platform_python_implementation: "CPython".into(),
            platform_release: "6.0".into(),
            platform_system: "Linux".into(),
            platform_version: "6.0".into(),
            python_full_version: StringVersion::from_str("3.12.0").expect("full version"),
            python_version: StringVersion::from_str("3.12").expect("python version"),
            sys_platform: "linux".into(),
        }
    }

    const METADATA: &str = "Metadata-Version: 2.1
Name: demo
Version: 1.0
Requires-Dist: requests (>=2.0)
Requires-Dist: pywin32 ; sys_platform == \"win32\"
Requires-Dist: tomli ; python_version < \"3.11\"
Requires-Dist: pytest ; extra == 'test'
Requires-Dist: coverage[toml] ; extra == \"test\" and sys_platform == \"linux\"
Requires-Dist: sphinx ; extra == 'docs'
Provides-Extra: test
Provides-Extra: Docs
Provides-Extra: test

Long description.
";

    fn names(reqs: &[&Requirement]) -> Vec<String> {
        reqs.iter().map(|req| req.name.to_string()).collect()
    }

    #[test]
    fn base_requirements_follow_host_markers() {
        let dist = DistInfo::parse(METADATA).expect("parse");
        let env = marker_env();
        assert_eq!(names(&dist.requires(&env)), ["requests"]);
    }

    #[test]
    fn extras_add_only_their_own_requirements() {
        let dist = DistInfo::parse(METADATA).expect("parse");
        let env = marker_env();
        assert_eq!(dist.extras().collect::<Vec<_>>(), ["test", "docs"]);
        assert_eq!(
            names(&dist.requires_extra(&env, "test")),
            ["pytest", "coverage"]
        );
        assert_eq!(names(&dist.requires_extra(&env, "docs")), ["sphinx"]);
        assert!(dist.requires_extra(&env, "missing").is_empty());
    }

    #[test]
    fn extras_outside_pep685_keep_their_safe_spelling() {
        let dist = DistInfo::parse(
            "Name: demo\nRequires-Dist: black ; extra == 'dev_tools'\nProvides-Extra: dev tools\nProvides-Extra: !!\n",
        )
        .expect("parse");
        let env = marker_env();
        assert_eq!(dist.extras().collect::<Vec<_>>(), ["dev_tools", "_"]);
        assert_eq!(names(&dist.requires_extra(&env, "dev_tools")), ["black"]);
        assert!(dist.requires_extra(&env, "_").is_empty());
    }

    #[test]
    fn invalid_requirement_is_a_format_error() {
        let err = DistInfo::parse("Name: demo\nRequires-Dist: ???\n").expect_err("invalid");
        assert!(matches!(err, WheelFormatError::InvalidMetadata { .. }));
    }
}
