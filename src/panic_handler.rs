use std::panic;

/// Install pretty backtraces and make sure panics reach the log file.
///
/// Panics on thumbnail threads only end that thread; the cache observes the
/// closed channel and falls back to placeholders.
pub fn initialize_panic_handler() {
    better_panic::install();

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let thread = std::thread::current();
        log::error!(
            "panic on thread {}: {panic_info}",
            thread.name().unwrap_or("<unnamed>")
        );
        default_hook(panic_info);
    }));
}
