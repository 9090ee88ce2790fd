//! Monotonic progress reporting.

/// Forwards percentages to a callback, dropping anything that is not an increase.
///
/// Values above 100 are clamped, so the callback sees a strictly increasing
/// sequence ending at most at 100.
///
/// # Example
///
/// ```
/// use toy_slicer::Progress;
///
/// let mut seen = Vec::new();
/// let mut progress = Progress::new(|p| seen.push(p));
/// for p in [5, 20, 20, 10, 80, 250] {
///     progress.report(p);
/// }
/// drop(progress);
/// assert_eq!(seen, [5, 20, 80, 100]);
/// ```
pub struct Progress<F: FnMut(u8)> {
    callback: F,
    last: Option<u8>,
}

impl<F: FnMut(u8)> Progress<F> {
    /// Wrap a callback.
    pub const fn new(callback: F) -> Self {
        Self {
            callback,
            last: None,
        }
    }

    /// Report a percentage.
    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if let Some(last) = self.last {
            if percent <= last {
                return;
            }
        }
        self.last = Some(percent);
        (self.callback)(percent);
    }

    /// Last value forwarded.
    pub const fn last(&self) -> Option<u8> {
        self.last
    }
}

/// Percentage for step `done` of `total` mapped into `from..=to`.
pub(crate) fn scaled(from: u8, to: u8, done: usize, total: usize) -> u8 {
    if total == 0 {
        return to;
    }
    let span = usize::from(to.saturating_sub(from));
    let step = span * done.min(total) / total;
    from.saturating_add(u8::try_from(step).unwrap_or(u8::MAX)).min(to)
}
