//! Per-thread verbosity for the no-argument evaluation APIs.
//!
//! Callers that have an explicit verbose flag should pass it to
//! [`Evaluator::evaluate`](crate::Evaluator::evaluate) directly.
//! This only exists for [`Constraint::result`](crate::Constraint::result)
//! and [`Constraints::result`](crate::Constraints::result), which can't take one.
use std::cell::Cell;

thread_local! {
    static VERBOSE: Cell<bool> = Cell::new(false);
}

/// Check if the current thread is inside a verbose scope
#[inline]
pub fn is_verbose() -> bool {
    VERBOSE.with(Cell::get)
}

/// Run the closure with verbose logging set to the specified value,
/// restoring the previous value afterwards even if it panics.
pub fn scoped<T, F: FnOnce() -> T>(verbose: bool, func: F) -> T {
    let previous = VERBOSE.with(|cell| cell.replace(verbose));
    defer!(VERBOSE.with(|cell| cell.set(previous)));
    func()
}
