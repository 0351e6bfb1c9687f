/// Assert that two floating point numbers are equal within the given
/// tolerance. An optional fourth argument is printed when the assertion fails.
#[cfg(test)]
macro_rules! assert_float_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {{
        // Bind once so the expressions are evaluated once.
        let a = $a;
        let b = $b;
        let eps = $eps;
        let error = (a - b).abs();
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}. {:?}",
            a,
            b,
            error,
            eps,
            $debug
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a, $b, $eps, "")
    };
}

#[cfg(test)]
macro_rules! assert_f32_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {
        $crate::macros::assert_float_eq!($a as f32, $b as f32, $eps as f32, $debug)
    };
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a as f32, $b as f32, $eps as f32)
    };
    ($a:expr, $b:expr) => {
        $crate::macros::assert_float_eq!($a as f32, $b as f32, f32::EPSILON)
    };
}

#[cfg(test)]
macro_rules! assert_f64_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, $eps as f64, $debug)
    };
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, $eps as f64)
    };
    ($a:expr, $b:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, f64::EPSILON)
    };
}

#[cfg(test)]
pub(crate) use assert_f32_eq;
#[cfg(test)]
pub(crate) use assert_f64_eq;
#[cfg(test)]
pub(crate) use assert_float_eq;
