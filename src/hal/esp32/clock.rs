//! Boot-relative millisecond time for the control loop and HTTP handlers.

use crate::traits::Clock;

/// Milliseconds since boot, read from `esp_timer_get_time()`.
///
/// Zero-sized and `Copy`: the main loop and every HTTP handler hold their
/// own copy and see the same timeline, so sample deadlines, banner expiry,
/// and the remote-poll stale check all agree.
///
/// ```ignore
/// let clock = Esp32Clock::new();
/// loop {
///     controller.lock()?.tick(clock.now_ms());
///     std::thread::sleep(Duration::from_millis(10));
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    /// Returns the boot-relative clock.
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for Esp32Clock {
    fn now_ms(&self) -> u64 {
        // SAFETY: reads the high-resolution timer, which is running before main
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        // The counter is signed but never negative after boot
        micros.max(0).unsigned_abs() / 1000
    }
}
