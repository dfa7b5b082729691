//! Proportional rescaling of externally computed recommendations
//!
//! A recommendation (for example "invest 6,000 a month") arrives from an
//! outside advisor computed against some baseline income. When the user
//! overrides the baseline, the recommendation is scaled by the same ratio
//! instead of asking the advisor again.
//!
//! The advisor sits behind [`RecommendationSource`], so the arithmetic here
//! never depends on how the value was produced.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{ensure_amount, ensure_finite, Error, Result};

/// Ratio used when the original baseline is zero or negative
pub const DEFAULT_RECOMMENDATION_RATIO: f64 = 0.2;

/// A recommendation scaled to a new baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rescaled {
    pub ratio: f64,
    pub rescaled_recommendation: f64,
    /// True when the original baseline could not supply a ratio
    pub used_default_ratio: bool,
}

/// Scale `original_recommendation` from `original_baseline` to `new_baseline`
///
/// Never returns a negative recommendation for a non-positive new baseline.
pub fn rescale(
    original_baseline: f64,
    original_recommendation: f64,
    new_baseline: f64,
    default_ratio: f64,
) -> Result<Rescaled> {
    let original_baseline = ensure_finite("original baseline", original_baseline)?;
    let original_recommendation =
        ensure_amount("original recommendation", original_recommendation)?;
    let new_baseline = ensure_finite("new baseline", new_baseline)?;
    let default_ratio = ensure_amount("default ratio", default_ratio)?;

    let used_default_ratio = original_baseline <= 0.0;
    let ratio = if used_default_ratio {
        default_ratio
    } else {
        original_recommendation / original_baseline
    };
    let rescaled_recommendation = if new_baseline > 0.0 {
        new_baseline * ratio
    } else {
        0.0
    };

    Ok(Rescaled {
        ratio,
        rescaled_recommendation,
        used_default_ratio,
    })
}

/// Supplies the opaque upstream recommendation value
pub trait RecommendationSource {
    /// The recommended amount computed against the original baseline
    fn recommendation(&self) -> Result<f64>;
}

/// A recommendation already known as a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRecommendation(pub f64);

impl RecommendationSource for FixedRecommendation {
    fn recommendation(&self) -> Result<f64> {
        ensure_amount("recommendation", self.0)
    }
}

/// A recommendation embedded in advisor prose, e.g. "Invest ₹6,000 monthly"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecommendation(pub String);

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d[\d,]*(?:\.\d+)?").expect("valid regex"))
}

/// First number in `text`, ignoring currency symbols and thousands separators
///
/// A leading minus sign is kept so negative advice can be rejected.
pub fn extract_amount(text: &str) -> Option<f64> {
    amount_pattern()
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

impl RecommendationSource for TextRecommendation {
    fn recommendation(&self) -> Result<f64> {
        let amount = extract_amount(&self.0).ok_or_else(|| {
            Error::InvalidNumericInput(format!("No amount found in recommendation {:?}", self.0))
        })?;
        ensure_amount("recommendation", amount)
    }
}

/// Rescales recommendations from any source with a configured fallback ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalRescaler {
    pub default_ratio: f64,
}

impl Default for ProportionalRescaler {
    fn default() -> Self {
        Self {
            default_ratio: DEFAULT_RECOMMENDATION_RATIO,
        }
    }
}

impl ProportionalRescaler {
    pub fn new(default_ratio: f64) -> Self {
        Self { default_ratio }
    }

    pub fn rescale_from<S: RecommendationSource + ?Sized>(
        &self,
        source: &S,
        original_baseline: f64,
        new_baseline: f64,
    ) -> Result<Rescaled> {
        let recommendation = source.recommendation()?;
        rescale(original_baseline, recommendation, new_baseline, self.default_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_preserved() {
        let result = rescale(30_000.0, 6_000.0, 45_000.0, DEFAULT_RECOMMENDATION_RATIO).unwrap();
        assert_eq!(result.ratio, 0.2);
        assert_eq!(result.rescaled_recommendation, 9_000.0);
        assert!(!result.used_default_ratio);
    }

    #[test]
    fn test_zero_baseline_uses_default_ratio() {
        let result = rescale(0.0, 6_000.0, 45_000.0, DEFAULT_RECOMMENDATION_RATIO).unwrap();
        assert_eq!(result.ratio, 0.2);
        assert!(result.used_default_ratio);
        assert_eq!(result.rescaled_recommendation, 9_000.0);
    }

    #[test]
    fn test_non_positive_new_baseline_gives_zero() {
        let zero = rescale(30_000.0, 6_000.0, 0.0, DEFAULT_RECOMMENDATION_RATIO).unwrap();
        assert_eq!(zero.rescaled_recommendation, 0.0);
        let negative = rescale(30_000.0, 6_000.0, -500.0, DEFAULT_RECOMMENDATION_RATIO).unwrap();
        assert_eq!(negative.rescaled_recommendation, 0.0);
    }

    #[test]
    fn test_rescale_is_idempotent() {
        let first = rescale(30_000.0, 6_000.0, 45_000.0, 0.2).unwrap();
        let second = rescale(30_000.0, 6_000.0, 45_000.0, 0.2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            rescale(30_000.0, -1.0, 45_000.0, 0.2),
            Err(Error::InvalidNumericInput(_))
        ));
        assert!(rescale(f64::NAN, 6_000.0, 45_000.0, 0.2).is_err());
        assert!(rescale(0.0, 6_000.0, 45_000.0, -0.1).is_err());
    }

    #[test]
    fn test_extract_amount() {
        assert_eq!(extract_amount("Invest ₹6,000 monthly"), Some(6_000.0));
        assert_eq!(extract_amount("Put 1,250.50 into a fund"), Some(1_250.5));
        assert_eq!(extract_amount("about 300 then 400"), Some(300.0));
        assert_eq!(extract_amount("nothing to see"), None);
        assert_eq!(extract_amount("Reduce by -6,000"), Some(-6_000.0));
    }

    #[test]
    fn test_negative_text_recommendation_is_rejected() {
        let negative = TextRecommendation("Invest -6,000 monthly".into());
        assert!(matches!(
            negative.recommendation(),
            Err(Error::InvalidNumericInput(_))
        ));
        assert!(ProportionalRescaler::default()
            .rescale_from(&negative, 30_000.0, 45_000.0)
            .is_err());
    }

    #[test]
    fn test_rescale_from_sources() {
        let rescaler = ProportionalRescaler::default();

        let fixed = rescaler
            .rescale_from(&FixedRecommendation(6_000.0), 30_000.0, 45_000.0)
            .unwrap();
        assert_eq!(fixed.rescaled_recommendation, 9_000.0);

        let text = TextRecommendation("Invest ₹6,000 monthly in index funds".into());
        let from_text = rescaler.rescale_from(&text, 30_000.0, 45_000.0).unwrap();
        assert_eq!(from_text, fixed);

        let empty = TextRecommendation("Keep saving".into());
        assert!(matches!(
            rescaler.rescale_from(&empty, 30_000.0, 45_000.0),
            Err(Error::InvalidNumericInput(_))
        ));
    }

    #[test]
    fn test_trait_object_source() {
        let sources: Vec<Box<dyn RecommendationSource>> = vec![
            Box::new(FixedRecommendation(3_000.0)),
            Box::new(TextRecommendation("Save 3000".into())),
        ];
        let rescaler = ProportionalRescaler::new(0.1);
        for source in &sources {
            let result = rescaler.rescale_from(source.as_ref(), 10_000.0, 20_000.0).unwrap();
            assert_eq!(result.rescaled_recommendation, 6_000.0);
        }
    }
}
