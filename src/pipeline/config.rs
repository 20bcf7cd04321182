//! Pipeline configuration.
//!
//! [`PipelineConfig`] collects every tunable of a run. Its `Default` is the
//! reference run: 30-day holdout, skewed-t GARCH(1,1) and GARCH(2,2) with a
//! constant mean plus one ARMA–GARCH(1,1) whose mean order comes from the
//! automatic ARIMA search, Ljung–Box at lag 20 against 0.05.
//!
//! Configuration is JSON; every field is optional and falls back to its
//! default. Candidates look like
//!
//! ```json
//! { "mean": "constant", "variance": { "p": 1, "q": 1 }, "innovation": "SkewedStudentT" }
//! { "mean": { "arma": { "p": 1, "q": 0 } }, "variance": { "p": 1, "q": 1 } }
//! { "mean": "auto", "variance": { "p": 1, "q": 1 } }
//! ```
//!
//! On the command line the same candidate is written `MEAN:P,Q[:DIST]` with
//! `MEAN` one of `constant`, `auto` or `p/q`, and `DIST` one of `norm`,
//! `std`, `sstd` (the `FromStr` impl of [`CandidateSpec`]).
use crate::{
    pipeline::{
        arima_order::ArimaSearch,
        errors::{PipelineError, PipelineResult},
        loader::LoaderOptions,
        selection::AdequacyRule,
        split::DEFAULT_HOLDOUT,
        transform::StationarityOptions,
    },
    statistical_tests::BoundaryRule,
    volatility::core::{ArmaOrder, GarchOptions, GarchOrder, Innovation, ModelShape},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr};

/// Mean equation of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanSpec {
    Constant,
    Arma(ArmaOrder),
    /// ARMA order chosen by the automatic ARIMA search.
    Auto,
}

/// One candidate as configured, before the automatic mean order is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub mean: MeanSpec,
    pub variance: GarchOrder,
    #[serde(default)]
    pub innovation: Innovation,
}

impl CandidateSpec {
    pub fn needs_auto_order(&self) -> bool {
        self.mean == MeanSpec::Auto
    }

    /// Concrete model shape; `auto` supplies the searched ARMA order.
    ///
    /// # Errors
    /// `InvalidConfig` for an `Auto` mean without a searched order.
    pub fn resolve(&self, auto: Option<ArmaOrder>) -> PipelineResult<ModelShape> {
        let mean = match self.mean {
            MeanSpec::Constant => ArmaOrder::new(0, 0),
            MeanSpec::Arma(order) => order,
            MeanSpec::Auto => auto.ok_or_else(|| PipelineError::InvalidConfig {
                reason: "automatic mean order requested but not searched".to_string(),
            })?,
        };
        Ok(ModelShape::new(mean, self.variance, self.innovation))
    }
}

impl std::fmt::Display for CandidateSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mean {
            MeanSpec::Constant => f.write_str("constant")?,
            MeanSpec::Auto => f.write_str("auto")?,
            MeanSpec::Arma(order) => write!(f, "{}/{}", order.p, order.q)?,
        }
        write!(f, ":{},{}:{}", self.variance.p, self.variance.q, self.innovation.label())
    }
}

impl FromStr for CandidateSpec {
    type Err = PipelineError;

    /// Parse `MEAN:P,Q[:DIST]`, e.g. `constant:1,1`, `auto:1,1:sstd`,
    /// `1/0:2,1:std`. The distribution defaults to the skewed Student-t.
    fn from_str(s: &str) -> PipelineResult<Self> {
        let bad = |why: &str| PipelineError::InvalidConfig {
            reason: format!("candidate '{s}': {why}"),
        };
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(bad("expected MEAN:P,Q[:DIST]"));
        }

        let mean = match parts[0] {
            "constant" => MeanSpec::Constant,
            "auto" => MeanSpec::Auto,
            other => {
                let (p, q) = parse_pair(other, '/')
                    .ok_or_else(|| bad("mean must be constant, auto or p/q"))?;
                MeanSpec::Arma(ArmaOrder::new(p, q))
            }
        };
        let (p, q) = parse_pair(parts[1], ',').ok_or_else(|| bad("variance order must be P,Q"))?;
        let variance = GarchOrder::new(p, q).map_err(|e| bad(&e.to_string()))?;
        let innovation = match parts.get(2).copied() {
            None | Some("sstd") => Innovation::SkewedStudentT,
            Some("std") => Innovation::StudentT,
            Some("norm") => Innovation::Normal,
            Some(_) => return Err(bad("distribution must be norm, std or sstd")),
        };
        Ok(CandidateSpec { mean, variance, innovation })
    }
}

fn parse_pair(text: &str, sep: char) -> Option<(usize, usize)> {
    let (a, b) = text.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn invalid(err: impl std::fmt::Display) -> PipelineError {
    PipelineError::InvalidConfig { reason: err.to_string() }
}

pub fn default_candidates() -> Vec<CandidateSpec> {
    let sstd = Innovation::SkewedStudentT;
    vec![
        CandidateSpec {
            mean: MeanSpec::Constant,
            variance: GarchOrder { p: 1, q: 1 },
            innovation: sstd,
        },
        CandidateSpec {
            mean: MeanSpec::Constant,
            variance: GarchOrder { p: 2, q: 2 },
            innovation: sstd,
        },
        CandidateSpec { mean: MeanSpec::Auto, variance: GarchOrder { p: 1, q: 1 }, innovation: sstd },
    ]
}

/// Everything a run needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trailing observations held out for evaluation; also the forecast
    /// horizon.
    pub holdout: usize,
    /// Candidates in tie-breaking order.
    pub candidates: Vec<CandidateSpec>,
    pub ljung_box_lag: usize,
    pub adequacy_threshold: f64,
    pub boundary_rule: BoundaryRule,
    pub stationarity: StationarityOptions,
    pub arima_search: ArimaSearch,
    pub garch: GarchOptions,
    pub loader: LoaderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            holdout: DEFAULT_HOLDOUT,
            candidates: default_candidates(),
            ljung_box_lag: 20,
            adequacy_threshold: 0.05,
            boundary_rule: BoundaryRule::Exclusive,
            stationarity: StationarityOptions::default(),
            arima_search: ArimaSearch::default(),
            garch: GarchOptions::default(),
            loader: LoaderOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file.
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `InvalidConfig` for malformed JSON
    /// or values failing [`PipelineConfig::validate`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// # Errors
    /// As [`PipelineConfig::from_json_file`], minus `Io`.
    pub fn from_json_str(text: &str) -> PipelineResult<Self> {
        let config: PipelineConfig = serde_json::from_str(text).map_err(invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; deserialized orders bypass their constructors so
    /// they are re-checked here.
    ///
    /// # Errors
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.holdout == 0 {
            return Err(invalid("holdout must be at least 1"));
        }
        if self.candidates.is_empty() {
            return Err(invalid("at least one candidate is required"));
        }
        for cand in &self.candidates {
            GarchOrder::new(cand.variance.p, cand.variance.q)
                .map_err(|e| invalid(format!("candidate {cand}: {e}")))?;
        }
        if self.ljung_box_lag == 0 {
            return Err(invalid("ljung_box_lag must be at least 1"));
        }
        if !(self.adequacy_threshold > 0.0 && self.adequacy_threshold < 1.0) {
            return Err(invalid(format!(
                "adequacy_threshold = {} must lie in (0, 1)",
                self.adequacy_threshold
            )));
        }
        self.stationarity.validate()?;
        self.garch.validate().map_err(invalid)?;
        self.loader.validate()
    }

    pub fn adequacy_rule(&self) -> AdequacyRule {
        AdequacyRule {
            lag: self.ljung_box_lag,
            threshold: self.adequacy_threshold,
            boundary: self.boundary_rule,
        }
    }

    /// ARIMA search that shares this configuration's stationarity rule.
    pub fn arima_search(&self) -> ArimaSearch {
        ArimaSearch { stationarity: self.stationarity, ..self.arima_search }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Defaults, JSON loading with partial input, candidate strings and
    // validation of deserialized values.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The default configuration is the reference run and validates.
    //
    // Given
    // -----
    // - `PipelineConfig::default()`.
    //
    // Expect
    // ------
    // - Holdout 30, lag 20, threshold 0.05, three candidates with the
    //   automatic one last.
    fn default_config_is_reference_run() {
        // Arrange
        let cfg = PipelineConfig::default();

        // Act / Assert
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.holdout, 30);
        assert_eq!(cfg.ljung_box_lag, 20);
        assert_eq!(cfg.adequacy_threshold, 0.05);
        assert_eq!(cfg.candidates.len(), 3);
        assert!(cfg.candidates[2].needs_auto_order());
        assert_eq!(cfg.candidates[1].to_string(), "constant:2,2:sstd");
    }

    #[test]
    // Purpose
    // -------
    // Partial JSON keeps defaults for missing fields and reads candidates in
    // all three mean forms.
    //
    // Given
    // -----
    // - holdout 10, inclusive boundary and three candidates.
    //
    // Expect
    // ------
    // - Parsed values and the untouched Ljung–Box lag.
    fn partial_json_overrides_defaults() {
        // Arrange
        let text = r#"{
            "holdout": 10,
            "boundary_rule": "Inclusive",
            "candidates": [
                { "mean": "constant", "variance": { "p": 1, "q": 1 } },
                { "mean": { "arma": { "p": 1, "q": 0 } }, "variance": { "p": 1, "q": 1 },
                  "innovation": "Normal" },
                { "mean": "auto", "variance": { "p": 2, "q": 1 } }
            ]
        }"#;

        // Act
        let cfg = PipelineConfig::from_json_str(text).expect("valid config");

        // Assert
        assert_eq!(cfg.holdout, 10);
        assert_eq!(cfg.ljung_box_lag, 20);
        assert_eq!(cfg.boundary_rule, BoundaryRule::Inclusive);
        assert_eq!(cfg.candidates[0].innovation, Innovation::SkewedStudentT);
        assert_eq!(cfg.candidates[1].mean, MeanSpec::Arma(ArmaOrder::new(1, 0)));
        assert_eq!(cfg.candidates[1].innovation, Innovation::Normal);
        assert_eq!(cfg.candidates[2].mean, MeanSpec::Auto);
    }

    #[test]
    // Purpose
    // -------
    // Values that bypass constructors through JSON are caught.
    //
    // Given
    // -----
    // - GARCH(0, 0), a threshold of 1.5, holdout 0 and a mistyped holdout.
    //
    // Expect
    // ------
    // - `InvalidConfig` in each case.
    fn invalid_json_values_are_rejected() {
        for text in [
            r#"{ "candidates": [ { "mean": "constant", "variance": { "p": 0, "q": 0 } } ] }"#,
            r#"{ "adequacy_threshold": 1.5 }"#,
            r#"{ "holdout": 0 }"#,
            r#"{ "holdout": "many" }"#,
        ] {
            let out = PipelineConfig::from_json_str(text);
            assert!(matches!(out, Err(PipelineError::InvalidConfig { .. })), "accepted {text}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Command-line candidate strings parse and print back.
    //
    // Given
    // -----
    // - `constant:1,1`, `auto:1,1:std`, `2/1:1,2:norm`, and malformed input.
    //
    // Expect
    // ------
    // - Parsed specs whose display matches the canonical form; errors for
    //   the malformed ones.
    fn candidate_strings_parse() {
        // Act
        let a: CandidateSpec = "constant:1,1".parse().expect("valid");
        let b: CandidateSpec = "auto:1,1:std".parse().expect("valid");
        let c: CandidateSpec = "2/1:1,2:norm".parse().expect("valid");

        // Assert
        assert_eq!(a.to_string(), "constant:1,1:sstd");
        assert_eq!(b.innovation, Innovation::StudentT);
        assert_eq!(c.mean, MeanSpec::Arma(ArmaOrder::new(2, 1)));
        assert_eq!(c.to_string(), "2/1:1,2:norm");
        for bad in ["garch", "constant:0,0", "x/1:1,1", "constant:1,1:cauchy"] {
            assert!(bad.parse::<CandidateSpec>().is_err(), "accepted {bad}");
        }
    }

    #[test]
    // Purpose
    // -------
    // An automatic mean resolves only once its order is known.
    //
    // Given
    // -----
    // - `auto:1,1` resolved without and with ARMA(1, 2).
    //
    // Expect
    // ------
    // - `InvalidConfig`, then shape `ARMA(1,2)-GARCH(1,1)-sstd`.
    fn auto_mean_resolution() {
        // Arrange
        let spec: CandidateSpec = "auto:1,1".parse().expect("valid");

        // Act / Assert
        assert!(matches!(spec.resolve(None), Err(PipelineError::InvalidConfig { .. })));
        let shape = spec.resolve(Some(ArmaOrder::new(1, 2))).expect("resolved");
        assert_eq!(shape.to_string(), "ARMA(1,2)-GARCH(1,1)-sstd");
    }
}
