//! Score value object

use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// A user's rating of an audiotrack, keyed by (audiotrack, author).
///
/// The value is private so the only ways to obtain or change it are
/// [`Score::new`] and [`Score::set_value`], both of which reject anything
/// outside `MIN_VALUE..=MAX_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score {
    pub audiotrack_id: Uuid,
    pub author_id: Uuid,
    value: i32,
}

impl Score {
    pub const MIN_VALUE: i32 = 0;
    pub const MAX_VALUE: i32 = 5;

    pub fn new(audiotrack_id: Uuid, author_id: Uuid, value: i32) -> DomainResult<Self> {
        Ok(Self {
            audiotrack_id,
            author_id,
            value: Self::check(value)?,
        })
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Replace the value. On error `self` is left untouched.
    pub fn set_value(&mut self, value: i32) -> DomainResult<()> {
        self.value = Self::check(value)?;
        Ok(())
    }

    fn check(value: i32) -> DomainResult<i32> {
        if (Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            Ok(value)
        } else {
            Err(DomainError::InvalidScoreValue(value))
        }
    }
}

/// Arithmetic mean of the score values, `0.0` for an empty slice.
pub fn mean_score(scores: &[Score]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: i64 = scores.iter().map(|s| i64::from(s.value)).sum();
    total as f64 / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn accepts_every_value_in_range() {
        let (track, author) = ids();
        for v in 0..=5 {
            let score = Score::new(track, author, v).unwrap();
            assert_eq!(score.value(), v);
        }
    }

    #[test]
    fn rejects_values_outside_range() {
        let (track, author) = ids();
        for v in [-1, 6, i32::MIN, i32::MAX, 100] {
            match Score::new(track, author, v) {
                Err(DomainError::InvalidScoreValue(rejected)) => assert_eq!(rejected, v),
                other => panic!("expected InvalidScoreValue({v}), got {other:?}"),
            }
        }
    }

    #[test]
    fn failed_assignment_keeps_previous_value() {
        let (track, author) = ids();
        let mut score = Score::new(track, author, 3).unwrap();

        let err = score.set_value(6).unwrap_err();
        assert!(matches!(err, DomainError::InvalidScoreValue(6)));
        assert_eq!(score.value(), 3);

        score.set_value(0).unwrap();
        assert_eq!(score.value(), 0);
    }

    #[test]
    fn equality_is_structural() {
        let (track, author) = ids();
        let a = Score::new(track, author, 4).unwrap();
        let b = Score::new(track, author, 4).unwrap();
        let c = Score::new(track, author, 2).unwrap();
        let d = Score::new(track, Uuid::new_v4(), 4).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn mean_of_scores() {
        let track = Uuid::new_v4();
        let scores: Vec<Score> = [5, 4, 3]
            .into_iter()
            .map(|v| Score::new(track, Uuid::new_v4(), v).unwrap())
            .collect();
        assert!((mean_score(&scores) - 4.0).abs() < f64::EPSILON);
        assert_eq!(mean_score(&[]), 0.0);
    }
}
