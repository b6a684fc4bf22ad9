use crate::error::{AppError, AppResult};

pub const SERVING_UNIT: &str = "serving";

/// How many definition-servings a logged `quantity`/`unit` represents.
///
/// When the unit matches the definition's serving unit, the quantity is in
/// the same measure as `serving_size` and is divided by it. The generic
/// "serving" unit counts whole definitions. Anything else is not convertible
/// here and is rejected before any write.
pub fn portions(quantity: f64, unit: &str, serving_size: f64, serving_unit: &str) -> AppResult<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::validation("quantity must be positive"));
    }
    if unit.eq_ignore_ascii_case(serving_unit) {
        if serving_size <= 0.0 {
            return Err(AppError::validation("serving size must be positive"));
        }
        return Ok(quantity / serving_size);
    }
    if unit.eq_ignore_ascii_case(SERVING_UNIT) {
        return Ok(quantity);
    }
    Err(AppError::validation(format!(
        "unknown unit \"{unit}\" for serving unit \"{serving_unit}\""
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serving_unit_scales_by_serving_size() {
        // A meal defined as 2 servings, logged as 3 servings, is 1.5x.
        assert_eq!(portions(3.0, "serving", 2.0, "serving").unwrap(), 1.5);
    }

    #[test]
    fn matching_unit_divides_by_serving_size() {
        assert_eq!(portions(150.0, "g", 100.0, "g").unwrap(), 1.5);
    }

    #[test]
    fn generic_serving_counts_whole_definitions() {
        assert_eq!(portions(2.0, "serving", 250.0, "g").unwrap(), 2.0);
    }

    #[test]
    fn unit_comparison_is_case_insensitive() {
        assert_eq!(portions(50.0, "G", 100.0, "g").unwrap(), 0.5);
    }

    #[test]
    fn zero_serving_size_is_invalid() {
        let err = portions(1.0, "g", 0.0, "g").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unknown_unit_is_invalid() {
        let err = portions(1.0, "cup", 100.0, "g").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn non_positive_quantity_is_invalid() {
        assert!(portions(0.0, "g", 100.0, "g").is_err());
        assert!(portions(-1.0, "g", 100.0, "g").is_err());
    }
}
