use store_client::domain::ScopeKind;

/// Error taxonomy of the analytics core.
///
/// Storage faults pass through as `Store` so a failed read can never be
/// mistaken for an empty result; the core performs no retries of its own.
#[derive(thiserror::Error, Debug)]
pub enum AnalyticsError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Plant,
    Area,
    Device,
    TariffProfile,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Area => "area",
            Self::Device => "device",
            Self::TariffProfile => "tariff profile",
        }
    }
}

impl From<ScopeKind> for EntityKind {
    fn from(kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::Plant => Self::Plant,
            ScopeKind::Area => Self::Area,
            ScopeKind::Device => Self::Device,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalyticsError {
    pub fn not_found(kind: impl Into<EntityKind>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }
}
