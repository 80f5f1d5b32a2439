//! Error types for curve construction and queries.

/// Errors produced while building or querying a track curve.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CurveError {
    /// A query was issued before the curve finished a successful build.
    #[error("Curve not instantiated yet")]
    NotReady,

    /// A build was attempted with fewer than two control points.
    #[error("Curve needs at least 2 points, got {count}")]
    InsufficientPoints { count: usize },

    /// The requested interpolation family has no evaluator.
    #[error("No evaluator for curve type (case sensitive): {name}")]
    UnsupportedCurveType { name: String },
}

impl CurveError {
    /// Whether the error is a configuration error that should suspend the owning curve.
    ///
    /// `NotReady` and `InsufficientPoints` resolve themselves once more points arrive.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedCurveType { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unsupported_type_is_fatal() {
        assert!(!CurveError::NotReady.is_fatal());
        assert!(!CurveError::InsufficientPoints { count: 1 }.is_fatal());
        assert!(CurveError::UnsupportedCurveType {
            name: "Nurbs".into()
        }
        .is_fatal());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = CurveError::InsufficientPoints { count: 1 };
        assert_eq!(err.to_string(), "Curve needs at least 2 points, got 1");
    }
}
