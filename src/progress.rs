// src/progress.rs
/// Progress reporting for the kingdom scan.
/// Frontends implement this to surface status to users; the scan also logs
/// through `tracing`, so a sink may ignore everything.
pub trait Progress {
    /// Called at the start with the number of kingdoms to visit.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One kingdom finished (its quota is known).
    fn item_done(&mut self, _kingdom: u32) {}

    /// One kingdom failed; the scan moves on.
    fn item_failed(&mut self, _kingdom: u32, _error: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
