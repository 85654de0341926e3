use std::collections::BTreeMap;

use crate::ast::expr::Expression;
use crate::ast::stmt::Statement;
use crate::ast::LeafCopy;
use crate::child::Child;
use crate::location::Location;
use crate::types::UsdtProbeEntry;

/// Target a probe instruments, e.g. `kprobe:vfs_read` or `usdt:/bin/app:ns:fn`.
///
/// The attach-point parser fills in the split fields; a pattern such as
/// `kprobe:vfs_*` sets `need_expansion` and is replaced by one concrete attach
/// point per match during expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachPoint {
    pub loc: Location,
    /// Raw, unparsed text, e.g. `kprobe:vfs_read`.
    pub raw_input: String,
    pub provider: String,
    pub target: String,
    pub ns: String,
    pub func: String,
    /// Resolved USDT record, used for argument access on wildcard matches.
    pub usdt: UsdtProbeEntry,
    pub freq: u64,
    /// Watchpoint width in bytes.
    pub len: u64,
    /// Watchpoint mode, e.g. `rw`.
    pub mode: String,
    pub need_expansion: bool,
    pub address: u64,
    pub func_offset: u64,
    index: BTreeMap<String, usize>,
}

impl AttachPoint {
    pub fn new(raw_input: impl Into<String>, loc: Location) -> Self {
        Self {
            loc,
            raw_input: raw_input.into(),
            ..Default::default()
        }
    }

    /// Canonical name with the attach point's own target.
    pub fn name(&self, attach_point: &str) -> String {
        self.name_with_target(&self.target, attach_point)
    }

    /// Canonical name, e.g. `uprobe:/bin/sh:readline` or `kprobe:f+16`.
    pub fn name_with_target(&self, attach_target: &str, attach_point: &str) -> String {
        let mut name = self.provider.clone();
        if !attach_target.is_empty() {
            name.push(':');
            name.push_str(attach_target);
        }
        if !self.ns.is_empty() {
            name.push(':');
            name.push_str(&self.ns);
        }
        if !attach_point.is_empty() {
            name.push(':');
            name.push_str(attach_point);
        }
        if self.freq != 0 {
            name.push_str(&format!(":{}", self.freq));
        }
        if self.address != 0 {
            name.push_str(&format!(":{}", self.address));
        }
        if self.func_offset != 0 {
            name.push_str(&format!("+{}", self.func_offset));
        }
        if self.len != 0 {
            name.push_str(&format!(":{}", self.len));
        }
        if !self.mode.is_empty() {
            name.push(':');
            name.push_str(&self.mode);
        }
        name
    }

    /// Index registered for `name`; the first lookup registers 0.
    pub fn index(&mut self, name: &str) -> usize {
        *self.index.entry(name.to_string()).or_insert(0)
    }

    pub fn set_index(&mut self, name: &str, index: usize) {
        self.index.insert(name.to_string(), index);
    }
}

impl LeafCopy for AttachPoint {
    fn leaf_copy(&self) -> Self {
        self.clone()
    }
}

/// `/ expr /` filter in front of a probe body.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub loc: Location,
    pub expr: Child<Expression>,
}

impl Predicate {
    pub fn new(expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            loc,
            expr: Child::new(expr.into()),
        }
    }
}

impl LeafCopy for Predicate {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            expr: Child::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub loc: Location,
    pub attach_points: Vec<AttachPoint>,
    pub pred: Child<Predicate>,
    pub stmts: Vec<Statement>,
    /// One program has to be built per wildcard match.
    pub need_expansion: bool,
    /// Tracepoint argument structs have to be imported.
    pub need_tp_args_structs: bool,
    index: usize,
}

impl Probe {
    pub fn new(
        attach_points: Vec<AttachPoint>,
        pred: Option<Predicate>,
        stmts: Vec<Statement>,
        loc: Location,
    ) -> Self {
        let need_expansion = attach_points.iter().any(|ap| ap.need_expansion);
        Self {
            loc,
            attach_points,
            pred: pred.map(Child::new).unwrap_or_default(),
            stmts,
            need_expansion,
            need_tp_args_structs: false,
            index: 0,
        }
    }

    /// Comma-separated names of all attach points.
    pub fn name(&self) -> String {
        self.attach_points
            .iter()
            .map(|ap| ap.name(&ap.func))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl LeafCopy for Probe {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            attach_points: Vec::new(),
            pred: Child::empty(),
            stmts: Vec::new(),
            need_expansion: self.need_expansion,
            need_tp_args_structs: self.need_tp_args_structs,
            index: self.index,
        }
    }
}

/// Root of the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub loc: Location,
    /// Raw C definitions preceding the first probe.
    pub c_definitions: String,
    pub probes: Vec<Probe>,
}

impl Program {
    pub fn new(c_definitions: impl Into<String>, probes: Vec<Probe>, loc: Location) -> Self {
        Self {
            loc,
            c_definitions: c_definitions.into(),
            probes,
        }
    }
}

impl LeafCopy for Program {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            c_definitions: self.c_definitions.clone(),
            probes: Vec::new(),
        }
    }
}
