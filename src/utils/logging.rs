use glam::Vec3;
use log::{log_enabled, Level};
use std::time::Instant;

/// Scoped timer for the per-step solver phases; only arms itself when trace
/// logging is on.
pub struct PhaseTimer<'a> {
    label: &'a str,
    start: Option<Instant>,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        let start = log_enabled!(Level::Trace).then(Instant::now);
        Self { label, start }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            log::trace!("{} took {} µs", self.label, start.elapsed().as_micros());
        }
    }
}

/// Logs a warning when a vector has gone non-finite. Numeric degeneracies are
/// allowed to propagate (that is the solver's contract); this only makes them
/// visible.
pub fn warn_on_nonfinite(label: &str, v: Vec3) {
    if !v.is_finite() {
        log::warn!("non-finite vector in {label}: {v:?}");
    }
}
