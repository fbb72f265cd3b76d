use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out `signature-<unix-millis>.png` names.
///
/// Stamps are strictly increasing within one namer: if the clock hasn't moved (or went backwards) since the last
/// name, the stamp is bumped past it. Two saves in the same millisecond thus never share a file.
pub struct FileNamer {
    last: AtomicI64,
    clock: fn() -> i64,
}
impl Default for FileNamer {
    fn default() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }
}
impl FileNamer {
    pub const PREFIX: &'static str = "signature-";
    pub const EXTENSION: &'static str = "png";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Use a custom millisecond clock.
    #[must_use]
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self {
            last: AtomicI64::new(i64::MIN),
            clock,
        }
    }
    /// Next unique millisecond stamp.
    pub fn next_stamp(&self) -> i64 {
        let now = (self.clock)();
        let bump = |last: i64| now.max(last.saturating_add(1));
        // Closure never returns None, so both arms hold the previous value.
        let previous = match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(bump(last)))
        {
            Ok(previous) | Err(previous) => previous,
        };
        bump(previous)
    }
    /// Next unique file name.
    pub fn next_name(&self) -> String {
        format!("{}{}.{}", Self::PREFIX, self.next_stamp(), Self::EXTENSION)
    }
}
