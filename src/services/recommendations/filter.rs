use crate::{
    error::{AppError, AppResult},
    models::CandidateRecommendation,
};

/// Admits candidates whose match score meets a minimum, inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFilter {
    threshold: f64,
}

impl ThresholdFilter {
    pub fn new(threshold: f64) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::InvalidInput(format!(
                "threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// NaN scores never pass
    pub fn admit(&self, candidate: &CandidateRecommendation) -> bool {
        candidate.match_score >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let filter = ThresholdFilter::new(0.3).unwrap();
        assert!(filter.admit(&CandidateRecommendation::new("A", "X", 0.3)));
        assert!(filter.admit(&CandidateRecommendation::new("A", "X", 0.5)));
        assert!(!filter.admit(&CandidateRecommendation::new("A", "X", 0.2)));
    }

    #[test]
    fn test_zero_threshold_admits_missing_scores() {
        let filter = ThresholdFilter::new(0.0).unwrap();
        assert!(filter.admit(&CandidateRecommendation::new("A", "X", 0.0)));
    }

    #[test]
    fn test_nan_score_rejected() {
        let filter = ThresholdFilter::new(0.0).unwrap();
        assert!(!filter.admit(&CandidateRecommendation::new("A", "X", f64::NAN)));
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(ThresholdFilter::new(-0.1).is_err());
        assert!(ThresholdFilter::new(1.01).is_err());
        assert!(ThresholdFilter::new(f64::NAN).is_err());
        assert!(ThresholdFilter::new(1.0).is_ok());
    }
}
