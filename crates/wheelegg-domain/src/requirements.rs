use std::collections::{BTreeMap, BTreeSet};

use pep508_rs::{MarkerEnvironment, Requirement, VersionOrUrl};
use serde::Serialize;

use crate::dist_info::DistInfo;

/// Marker-free requirements in the shape `requires.txt` stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EggRequirements {
    pub install_requires: Vec<String>,
    pub extras_require: BTreeMap<String, Vec<String>>,
}

impl EggRequirements {
    /// Evaluate markers against `env`, then drop them.
    pub fn from_dist(dist: &DistInfo, env: &MarkerEnvironment) -> Self {
        let base = dist.requires(env).into_iter().map(raw_requirement);
        let extras = dist.extras().map(|extra| {
            let reqs = dist
                .requires(env)
                .into_iter()
                .chain(dist.requires_extra(env, extra))
                .map(raw_requirement)
                .collect::<Vec<_>>();
            (extra.to_string(), reqs)
        });
        Self::from_parts(base, extras)
    }

    /// Sort each list and remove from every extra what the base already lists.
    pub fn from_parts<B, E>(base: B, extras: E) -> Self
    where
        B: IntoIterator<Item = String>,
        E: IntoIterator<Item = (String, Vec<String>)>,
    {
        let install_requires = base.into_iter().collect::<BTreeSet<_>>();
        let extras_require = extras
            .into_iter()
            .map(|(extra, reqs)| {
                let reqs = reqs
                    .into_iter()
                    .filter(|req| !install_requires.contains(req))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                (extra, reqs)
            })
            .collect();
        Self {
            install_requires: install_requires.into_iter().collect(),
            extras_require,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.install_requires.is_empty() && self.extras_require.is_empty()
    }

    /// Render in `requires.txt` layout: base lines, then one `[extra]` section per extra.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for req in &self.install_requires {
            out.push_str(req);
            out.push('\n');
        }
        for (extra, reqs) in &self.extras_require {
            out.push_str(&format!("\n[{extra}]\n"));
            for req in reqs {
                out.push_str(req);
                out.push('\n');
            }
        }
        out
    }
}

/// `name[extras]specifiers` or `name[extras]@ url`, without the marker.
///
/// Specifiers and extras are sorted and comma-joined with no padding, the way
/// legacy `requires.txt` files spell them.
fn raw_requirement(requirement: &Requirement) -> String {
    let mut raw = requirement.name.to_string();
    if !requirement.extras.is_empty() {
        let mut extras = requirement
            .extras
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        extras.sort();
        raw.push_str(&format!("[{}]", extras.join(",")));
    }
    match &requirement.version_or_url {
        Some(VersionOrUrl::VersionSpecifier(specifiers)) => {
            let mut specs = specifiers.iter().map(ToString::to_string).collect::<Vec<_>>();
            specs.sort();
            raw.push_str(&specs.join(","));
        }
        Some(VersionOrUrl::Url(url)) => raw.push_str(&format!("@ {url}")),
        None => {}
    }
    raw
}
