/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, evaluates it, and logs how long it took at the given level
/// (default `Debug`).
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Wrap a value into `[0, range)`. Unlike the `%` operator, this always
/// returns a non-negative result, so it can be used to wrap coordinates on
/// wrapping map axes.
pub fn wrap(value: i32, range: i32) -> i32 {
    value.rem_euclid(range)
}
