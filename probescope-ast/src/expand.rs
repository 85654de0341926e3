//! Probe expansion: one concrete probe per attach-point match.
//!
//! A probe whose attach points contain patterns (`kprobe:vfs_*`,
//! `usdt:/bin/app:*`) is turned into one probe per resolved target. Each copy
//! is built from a leaf copy of the template plus deep copies of its predicate
//! and body, so no two probes share a mutable node. The input program is only
//! borrowed and is never changed.

use tracing::{debug, info, warn};

use crate::ast::{AttachPoint, LeafCopy, Probe, Program};
use crate::binding::renumber_bindings;
use crate::types::UsdtProbeEntry;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("Failed to resolve attach point '{attach_point}': {source}")]
    Resolve {
        attach_point: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("No targets matched attach point '{0}'")]
    NoMatches(String),

    #[error("Probe at {0} has no attach points")]
    EmptyProbe(String),
}

pub type Result<T> = std::result::Result<T, ExpandError>;

/// Expansion settings.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    /// Index given to the first produced probe.
    pub starting_index: usize,
    /// Fail instead of skipping a pattern that matches nothing.
    pub fail_on_unmatched: bool,
}

/// One concrete target for a pattern attach point.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachMatch {
    pub func: String,
    /// Replaces the attach point's target (e.g. the resolved binary path).
    pub target: Option<String>,
    pub usdt: Option<UsdtProbeEntry>,
}

impl AttachMatch {
    pub fn func(func: impl Into<String>) -> Self {
        Self {
            func: func.into(),
            target: None,
            usdt: None,
        }
    }

    pub fn usdt(target: impl Into<String>, entry: UsdtProbeEntry) -> Self {
        Self {
            func: entry.name.clone(),
            target: Some(target.into()),
            usdt: Some(entry),
        }
    }
}

/// Supplies the concrete matches of a pattern attach point, e.g. from
/// `available_filter_functions` or a binary's symbol table.
pub trait TargetResolver {
    fn resolve(&mut self, attach_point: &AttachPoint) -> anyhow::Result<Vec<AttachMatch>>;
}

impl<F> TargetResolver for F
where
    F: FnMut(&AttachPoint) -> anyhow::Result<Vec<AttachMatch>>,
{
    fn resolve(&mut self, attach_point: &AttachPoint) -> anyhow::Result<Vec<AttachMatch>> {
        self(attach_point)
    }
}

/// Stamps out concrete probes and hands out probe indices.
#[derive(Debug)]
pub struct Expander {
    options: ExpandOptions,
    next_index: usize,
}

impl Expander {
    pub fn new(options: ExpandOptions) -> Self {
        Self {
            next_index: options.starting_index,
            options,
        }
    }

    /// Index the next produced probe will get.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn expand_program<R: TargetResolver + ?Sized>(
        &mut self,
        program: &Program,
        resolver: &mut R,
    ) -> Result<Program> {
        let mut expanded = program.leaf_copy();
        for probe in &program.probes {
            expanded.probes.extend(self.expand_probe(probe, resolver)?);
        }
        info!(
            "Expanded {} probes into {} concrete probes",
            program.probes.len(),
            expanded.probes.len()
        );
        Ok(expanded)
    }

    pub fn expand_probe<R: TargetResolver + ?Sized>(
        &mut self,
        probe: &Probe,
        resolver: &mut R,
    ) -> Result<Vec<Probe>> {
        if probe.attach_points.is_empty() {
            return Err(ExpandError::EmptyProbe(probe.loc.to_string()));
        }

        if !probe.need_expansion {
            return Ok(vec![self.instantiate(probe, probe.attach_points.clone())]);
        }

        let mut probes = Vec::new();
        for ap in &probe.attach_points {
            let matches = if ap.need_expansion {
                resolver
                    .resolve(ap)
                    .map_err(|source| ExpandError::Resolve {
                        attach_point: ap.name(&ap.func),
                        source,
                    })?
            } else {
                vec![AttachMatch::func(ap.func.clone())]
            };

            if matches.is_empty() {
                if self.options.fail_on_unmatched {
                    return Err(ExpandError::NoMatches(ap.name(&ap.func)));
                }
                warn!("Attach point {} matched no targets, skipping", ap.name(&ap.func));
                continue;
            }

            debug!("Attach point {} matched {} targets", ap.name(&ap.func), matches.len());
            for m in matches {
                let concrete = concrete_attach_point(ap, m);
                probes.push(self.instantiate(probe, vec![concrete]));
            }
        }
        Ok(probes)
    }

    fn instantiate(&mut self, template: &Probe, attach_points: Vec<AttachPoint>) -> Probe {
        let mut probe = template.leaf_copy();
        probe.attach_points = attach_points;
        probe.pred = template.pred.clone();
        probe.stmts = template.stmts.clone();
        renumber_bindings(&mut probe);

        let index = self.next_index;
        self.next_index += 1;
        probe.set_index(index);

        let name = probe.name();
        for ap in &mut probe.attach_points {
            ap.set_index(&name, index);
        }
        debug!("Created probe {} with index {}", name, index);
        probe
    }
}

fn concrete_attach_point(template: &AttachPoint, m: AttachMatch) -> AttachPoint {
    let mut ap = template.leaf_copy();
    ap.func = m.func;
    if let Some(target) = m.target {
        ap.target = target;
    }
    if let Some(usdt) = m.usdt {
        ap.usdt = usdt;
    }
    ap.need_expansion = false;
    ap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Builtin, ExprStatement};
    use crate::location::Location;

    fn loc() -> Location {
        Location::default()
    }

    fn uprobe(target: &str, func: &str) -> AttachPoint {
        let mut ap = AttachPoint::new(format!("uprobe:{}:{}", target, func), loc());
        ap.provider = "uprobe".to_string();
        ap.target = target.to_string();
        ap.func = func.to_string();
        ap.need_expansion = func.contains('*');
        ap
    }

    fn body() -> Vec<crate::ast::Statement> {
        vec![ExprStatement::new(Builtin::new("pid", loc()), loc()).into()]
    }

    #[test]
    fn test_non_expanding_probe_is_copied_whole() {
        let probe = Probe::new(
            vec![uprobe("/bin/sh", "main"), uprobe("/bin/sh", "readline")],
            None,
            body(),
            loc(),
        );
        let mut expander = Expander::new(ExpandOptions {
            starting_index: 3,
            ..Default::default()
        });
        let mut never = |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> {
            anyhow::bail!("resolver must not be called")
        };
        let probes = expander.expand_probe(&probe, &mut never).expect("expand");
        assert_eq!(probes.len(), 1);
        assert_eq!(probes[0].attach_points.len(), 2);
        assert_eq!(probes[0].index(), 3);
        assert_eq!(expander.next_index(), 4);
    }

    #[test]
    fn test_mixed_attach_points() {
        let probe = Probe::new(
            vec![uprobe("/bin/sh", "read*"), uprobe("/bin/sh", "main")],
            None,
            body(),
            loc(),
        );
        let mut resolver = |ap: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> {
            assert_eq!(ap.func, "read*");
            Ok(vec![AttachMatch::func("readline"), AttachMatch::func("read_history")])
        };
        let mut expander = Expander::new(ExpandOptions::default());
        let probes = expander.expand_probe(&probe, &mut resolver).expect("expand");

        let names: Vec<_> = probes.iter().map(Probe::name).collect();
        assert_eq!(
            names,
            vec![
                "uprobe:/bin/sh:readline",
                "uprobe:/bin/sh:read_history",
                "uprobe:/bin/sh:main"
            ]
        );
        let indices: Vec<_> = probes.iter().map(Probe::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(probes.iter().all(|p| p.need_expansion));
        assert!(probes
            .iter()
            .all(|p| p.attach_points.iter().all(|ap| !ap.need_expansion)));
    }

    #[test]
    fn test_attach_point_records_probe_index() {
        let probe = Probe::new(vec![uprobe("/bin/sh", "*line")], None, body(), loc());
        let mut resolver = |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> {
            Ok(vec![AttachMatch::func("readline"), AttachMatch::func("getline")])
        };
        let mut expander = Expander::new(ExpandOptions {
            starting_index: 10,
            ..Default::default()
        });
        let mut probes = expander.expand_probe(&probe, &mut resolver).expect("expand");

        let second = &mut probes[1];
        let name = second.name();
        assert_eq!(second.attach_points[0].index(&name), 11);
    }

    #[test]
    fn test_usdt_match_replaces_target() {
        let mut ap = AttachPoint::new("usdt:*:probe", loc());
        ap.provider = "usdt".to_string();
        ap.target = "*".to_string();
        ap.func = "probe".to_string();
        ap.need_expansion = true;
        let probe = Probe::new(vec![ap], None, body(), loc());

        let entry = UsdtProbeEntry {
            path: "/usr/bin/app".to_string(),
            provider: "app".to_string(),
            name: "probe".to_string(),
            semaphore_offset: 0,
            num_locations: 1,
        };
        let resolved = entry.clone();
        let mut resolver = move |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> {
            Ok(vec![AttachMatch::usdt("/usr/bin/app", resolved.clone())])
        };
        let probes = Expander::new(ExpandOptions::default())
            .expand_probe(&probe, &mut resolver)
            .expect("expand");

        assert_eq!(probes.len(), 1);
        let concrete = &probes[0].attach_points[0];
        assert_eq!(concrete.target, "/usr/bin/app");
        assert_eq!(concrete.usdt, entry);
        assert_eq!(probes[0].name(), "usdt:/usr/bin/app:probe");
    }

    #[test]
    fn test_unmatched_pattern() {
        let probe = Probe::new(vec![uprobe("/bin/sh", "nope*")], None, body(), loc());
        let mut empty = |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> { Ok(Vec::new()) };

        let probes = Expander::new(ExpandOptions::default())
            .expand_probe(&probe, &mut empty)
            .expect("expand");
        assert!(probes.is_empty());

        let err = Expander::new(ExpandOptions {
            fail_on_unmatched: true,
            ..Default::default()
        })
        .expand_probe(&probe, &mut empty)
        .unwrap_err();
        assert!(matches!(err, ExpandError::NoMatches(ref name) if name == "uprobe:/bin/sh:nope*"));
    }

    #[test]
    fn test_resolver_error_is_wrapped() {
        let probe = Probe::new(vec![uprobe("/bin/sh", "x*")], None, body(), loc());
        let mut failing = |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> {
            anyhow::bail!("symbol table unreadable")
        };
        let err = Expander::new(ExpandOptions::default())
            .expand_probe(&probe, &mut failing)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to resolve attach point 'uprobe:/bin/sh:x*': symbol table unreadable"
        );
    }

    #[test]
    fn test_empty_probe_is_rejected() {
        let probe = Probe::new(Vec::new(), None, body(), Location::on_line(2, 1, 4));
        let mut never = |_: &AttachPoint| -> anyhow::Result<Vec<AttachMatch>> { Ok(Vec::new()) };
        let err = Expander::new(ExpandOptions::default())
            .expand_probe(&probe, &mut never)
            .unwrap_err();
        assert!(matches!(err, ExpandError::EmptyProbe(_)));
    }
}
