/// Division rounding toward negative infinity. `divisor` must be positive,
/// in which case the euclidean quotient is the floor.
pub fn floor_division(dividend: i64, divisor: i64) -> i64 {
    debug_assert!(divisor > 0, "divisor must be positive");
    dividend.div_euclid(divisor)
}
