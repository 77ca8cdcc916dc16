/// Logs a step heading, evaluates the expression and logs how long it took.
#[macro_export]
macro_rules! unit {
    ($name:expr, $($tail:tt)*) => {
        {
            log::info!("* {}", $name);
            let now = std::time::Instant::now();
            let value = $($tail)*;
            log::info!("Done `{}` ({} ms)", $name, now.elapsed().as_millis());
            value
        }
    };
}
