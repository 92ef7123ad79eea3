use std::fmt;

/// The plant/area/device an analytics query or simulation is computed
/// against. Every query carries exactly one dimension; mixing dimensions is
/// rejected before a `Scope` is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Plant(String),
    Area(String),
    Device(String),
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Plant(_) => ScopeKind::Plant,
            Self::Area(_) => ScopeKind::Area,
            Self::Device(_) => ScopeKind::Device,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Plant(id) | Self::Area(id) | Self::Device(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Plant,
    Area,
    Device,
}

impl ScopeKind {
    /// Parse the string form stored in the `scope_kind` column.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plant" => Some(Self::Plant),
            "area" => Some(Self::Area),
            "device" => Some(Self::Device),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Area => "area",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
