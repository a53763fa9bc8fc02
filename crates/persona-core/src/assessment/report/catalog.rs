use super::TypeProfile;
use crate::assessment::domain::TypeCode;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::error;

const STANDARD_PROFILES: &str = include_str!("../../../data/profiles.json");

/// Immutable `TypeCode → TypeProfile` table.
#[derive(Debug, Clone, Default)]
pub struct ReportCatalog {
    profiles: HashMap<TypeCode, TypeProfile>,
}

impl ReportCatalog {
    /// The embedded sixteen-profile table, parsed on first use.
    ///
    /// A table that fails to parse degrades to an empty catalog so resolution
    /// falls through to the generic template instead of failing.
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<ReportCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::from_json(STANDARD_PROFILES).unwrap_or_else(|err| {
                error!(%err, "embedded profile catalog is unreadable; using generic templates");
                Self::default()
            })
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let profiles = serde_json::from_str(raw)?;
        Ok(Self { profiles })
    }

    pub fn lookup(&self, code: TypeCode) -> Option<&TypeProfile> {
        self.profiles.get(&code)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
