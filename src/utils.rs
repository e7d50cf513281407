/// Evaluates the expression and logs how long it took at debug level.
#[macro_export]
macro_rules! timed {
  ($name:expr, $($tail:tt)*) => {
    {
      let now = std::time::Instant::now();
      let value = $($tail)*;
      log::debug!("{} ({} ms)", $name, now.elapsed().as_millis());
      value
    }
  };
}
