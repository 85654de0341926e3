//! Value types recorded on expressions by the analysis passes.
//!
//! The AST only stores these; it never derives or checks them.

use std::fmt;

/// Kind of value an expression produces once analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    None,
    Integer,
    Pointer,
    Record,
    Array,
    String,
    Buffer,
    Tuple,
    Ustack,
    Kstack,
    StackMode,
    Count,
    Sum,
    Min,
    Max,
    Avg,
    Stats,
    Hist,
    Lhist,
    Usym,
    Ksym,
    Username,
    Inet,
    Timestamp,
    Probe,
}

impl Type {
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::None => "none",
            Type::Integer => "integer",
            Type::Pointer => "pointer",
            Type::Record => "record",
            Type::Array => "array",
            Type::String => "string",
            Type::Buffer => "buffer",
            Type::Tuple => "tuple",
            Type::Ustack => "ustack",
            Type::Kstack => "kstack",
            Type::StackMode => "stack_mode",
            Type::Count => "count",
            Type::Sum => "sum",
            Type::Min => "min",
            Type::Max => "max",
            Type::Avg => "avg",
            Type::Stats => "stats",
            Type::Hist => "hist",
            Type::Lhist => "lhist",
            Type::Usym => "usym",
            Type::Ksym => "ksym",
            Type::Username => "username",
            Type::Inet => "inet",
            Type::Timestamp => "timestamp",
            Type::Probe => "probe",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type together with its storage size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizedType {
    pub ty: Type,
    pub size: usize,
    pub is_signed: bool,
}

impl SizedType {
    pub fn new(ty: Type, size: usize) -> Self {
        Self {
            ty,
            size,
            is_signed: false,
        }
    }

    /// Unresolved type; every expression starts out with this.
    pub fn none() -> Self {
        Self::new(Type::None, 0)
    }

    pub fn integer(bits: usize, is_signed: bool) -> Self {
        Self {
            ty: Type::Integer,
            size: bits / 8,
            is_signed,
        }
    }

    pub fn string(len: usize) -> Self {
        Self::new(Type::String, len)
    }

    pub fn pointer() -> Self {
        Self::new(Type::Pointer, 8)
    }

    pub fn is_none(&self) -> bool {
        self.ty == Type::None
    }

    pub fn is_integer(&self) -> bool {
        self.ty == Type::Integer
    }
}

impl Default for SizedType {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for SizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::None => f.write_str("none"),
            Type::Integer => {
                let prefix = if self.is_signed { "int" } else { "uint" };
                write!(f, "{}{}", prefix, self.size * 8)
            }
            Type::String | Type::Buffer | Type::Array => {
                write!(f, "{}[{}]", self.ty, self.size)
            }
            other => write!(f, "{}", other),
        }
    }
}

/// `$1`, `$2`, ... versus `$#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionalParameterType {
    Positional,
    Count,
}

/// Resolved USDT probe record, filled in when a USDT attach point is matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UsdtProbeEntry {
    pub path: String,
    pub provider: String,
    pub name: String,
    pub semaphore_offset: u64,
    pub num_locations: usize,
}
