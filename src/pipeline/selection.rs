//! Candidate fitting, diagnostics and selection.
//!
//! Every candidate is fitted on the same transformed series, its
//! standardized residuals are run through Ljung–Box and Jarque–Bera, and the
//! adequate candidate (Ljung–Box does not reject) with the lowest
//! per-observation AIC wins. Ties keep the earlier candidate. Jarque–Bera is
//! reported only.
use crate::{
    pipeline::{
        backend::VolatilityBackend,
        errors::{PipelineError, PipelineResult},
    },
    statistical_tests::BoundaryRule,
    volatility::core::ModelShape,
};
use ndarray::ArrayView1;
use tracing::{debug, info};

/// Ljung–Box adequacy check applied to each candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdequacyRule {
    pub lag: usize,
    pub threshold: f64,
    pub boundary: BoundaryRule,
}

impl Default for AdequacyRule {
    fn default() -> Self {
        AdequacyRule { lag: 20, threshold: 0.05, boundary: BoundaryRule::Exclusive }
    }
}

impl AdequacyRule {
    pub fn is_adequate(&self, ljung_box_pvalue: f64) -> bool {
        self.boundary.accepts(ljung_box_pvalue, self.threshold)
    }
}

/// Summary row for one fitted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateReport {
    pub label: String,
    pub shape: ModelShape,
    pub aic: f64,
    pub ljung_box_stat: f64,
    pub ljung_box_pvalue: f64,
    pub jarque_bera_stat: f64,
    pub jarque_bera_pvalue: f64,
    pub adequate: bool,
}

/// Fitted candidates with the index of the winner.
#[derive(Debug)]
pub struct Selection<M> {
    pub selected: usize,
    pub model: M,
    pub reports: Vec<CandidateReport>,
}

impl<M> Selection<M> {
    pub fn selected_report(&self) -> &CandidateReport {
        &self.reports[self.selected]
    }
}

/// Index of the adequate report with the lowest AIC; the earliest wins ties.
pub fn choose_best(reports: &[CandidateReport]) -> Option<usize> {
    reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.adequate)
        .fold(None, |best: Option<(usize, f64)>, (i, r)| match best {
            Some((_, aic)) if aic <= r.aic => best,
            _ => Some((i, r.aic)),
        })
        .map(|(i, _)| i)
}

/// Fit, diagnose and rank `candidates` on `series`.
///
/// # Errors
/// - The first fit or diagnostic failure (all are terminal).
/// - `NoAdequateCandidate` when every candidate fails Ljung–Box.
pub fn select_model<B: VolatilityBackend>(
    backend: &B, series: ArrayView1<f64>, candidates: &[ModelShape], rule: &AdequacyRule,
) -> PipelineResult<Selection<B::Model>> {
    let mut models = Vec::with_capacity(candidates.len());
    let mut reports = Vec::with_capacity(candidates.len());

    for shape in candidates {
        let label = shape.to_string();
        let model = backend.fit_variance_model(series, shape)?;
        let aic = backend.information_criterion(&model)?;
        let resid = backend.standardized_residuals(&model)?;
        let diag = backend.diagnostic_tests(resid.view(), rule.lag)?;
        let adequate = rule.is_adequate(diag.ljung_box_pvalue);
        debug!(
            candidate = %label,
            aic,
            lb_pvalue = diag.ljung_box_pvalue,
            jb_pvalue = diag.jarque_bera_pvalue,
            adequate,
            "candidate diagnosed"
        );
        reports.push(CandidateReport {
            label,
            shape: *shape,
            aic,
            ljung_box_stat: diag.ljung_box_stat,
            ljung_box_pvalue: diag.ljung_box_pvalue,
            jarque_bera_stat: diag.jarque_bera_stat,
            jarque_bera_pvalue: diag.jarque_bera_pvalue,
            adequate,
        });
        models.push(model);
    }

    let selected = choose_best(&reports)
        .ok_or(PipelineError::NoAdequateCandidate { evaluated: reports.len() })?;
    info!(candidate = %reports[selected].label, aic = reports[selected].aic, "selected model");
    let model = models
        .into_iter()
        .nth(selected)
        .ok_or(PipelineError::NoAdequateCandidate { evaluated: reports.len() })?;
    Ok(Selection { selected, model, reports })
}
