use super::catalog::ReportCatalog;
use super::generator::{GenerationError, GenerationRequest, ReportGenerator};
use super::template::generic_profile;
use super::Report;
use crate::assessment::cognitive::derive_stack;
use crate::assessment::domain::{TraitScores, TypeCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Which path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Generated,
    Catalog,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub report: Report,
    pub source: ReportSource,
}

/// Chooses between the external generator and the static catalog.
///
/// The generator gets exactly one attempt per resolution; there are no
/// retries; any failure is answered from the catalog immediately.
#[derive(Debug, Clone)]
pub struct ReportResolver {
    generator: Option<Arc<dyn ReportGenerator>>,
    catalog: Arc<ReportCatalog>,
}

impl ReportResolver {
    /// Catalog-only resolver.
    pub fn offline() -> Self {
        Self {
            generator: None,
            catalog: Arc::new(ReportCatalog::standard().clone()),
        }
    }

    pub fn with_generator(generator: Arc<dyn ReportGenerator>) -> Self {
        Self {
            generator: Some(generator),
            ..Self::offline()
        }
    }

    pub fn with_catalog(mut self, catalog: ReportCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Resolves a report, falling back to the catalog when generation fails.
    pub async fn resolve(&self, scores: TraitScores, code: TypeCode) -> Resolution {
        let resolution = match self.generate(scores, code).await {
            Ok(report) => Resolution {
                report,
                source: ReportSource::Generated,
            },
            Err(GenerationError::Disabled) => self.resolve_static(code),
            Err(err) => {
                warn!(%code, error = %err, "report generation failed; falling back to catalog");
                self.resolve_static(code)
            }
        };
        info!(%code, source = ?resolution.source, "report resolved");
        resolution
    }

    /// Single generator attempt; `Disabled` when none is configured.
    pub async fn generate(
        &self,
        scores: TraitScores,
        code: TypeCode,
    ) -> Result<Report, GenerationError> {
        let generator = self.generator.as_ref().ok_or(GenerationError::Disabled)?;
        let request = GenerationRequest::new(scores, code);
        let generated = generator.generate(&request).await?;
        Ok(generated.into_report(code, &derive_stack(code)))
    }

    /// Synchronous, total lookup: catalog entry or generic template.
    pub fn resolve_static(&self, code: TypeCode) -> Resolution {
        let stack = derive_stack(code);
        match self.catalog.lookup(code) {
            Some(profile) => Resolution {
                report: Report::assemble(code, profile.clone(), &stack),
                source: ReportSource::Catalog,
            },
            None => Resolution {
                report: Report::assemble(code, generic_profile(code), &stack),
                source: ReportSource::Template,
            },
        }
    }
}

impl Default for ReportResolver {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_path_uses_catalog_for_known_codes() {
        let resolver = ReportResolver::offline();
        for code in TypeCode::all() {
            let resolution = resolver.resolve_static(code);
            assert_eq!(resolution.source, ReportSource::Catalog);
            assert_eq!(resolution.report.type_code, code);
            resolution
                .report
                .validate()
                .unwrap_or_else(|err| panic!("{code}: {err}"));
        }
    }

    #[test]
    fn empty_catalog_synthesizes_template() {
        let resolver = ReportResolver::offline().with_catalog(ReportCatalog::default());
        let code: TypeCode = "ISFJ".parse().expect("valid");
        let resolution = resolver.resolve_static(code);
        assert_eq!(resolution.source, ReportSource::Template);
        assert_eq!(resolution.report.profile.type_name, "The Dynamic (ISFJ)");
        assert!(resolution.report.validate().is_ok());
    }

    #[tokio::test]
    async fn offline_resolver_never_reports_generated() {
        let resolver = ReportResolver::offline();
        assert!(!resolver.has_generator());
        let resolution = resolver
            .resolve(TraitScores::neutral(), "INFP".parse().expect("valid"))
            .await;
        assert_eq!(resolution.source, ReportSource::Catalog);
        assert_eq!(resolution.report.type_code.to_string(), "INFP");
    }

    #[tokio::test]
    async fn generate_without_generator_is_disabled() {
        let resolver = ReportResolver::offline();
        let result = resolver
            .generate(TraitScores::neutral(), "ENTP".parse().expect("valid"))
            .await;
        assert!(matches!(result, Err(GenerationError::Disabled)));
    }
}
