//! Tracing construction-path transitions.
//!
//! Demonstrates:
//! - Registering a process-wide trace callback
//! - The three event kinds: constructed, construction_failed, bypass_rejected
//! - Clearing the callback
//!
//! Events are also mirrored to the `log` facade (debug level for
//! constructions, warn for failures and rejections); hook up any logger
//! implementation to see them there too.
//!
//! Run with: `cargo run --example tracing`

use singleton_slot::{clear_trace_callback, set_trace_callback, Slot, TryLazy};

struct Telemetry;

fn main() {
    println!("=== singleton-slot: Tracing ===\n");

    // -------------------------------------------------------------------------
    // 1. Register a callback
    // -------------------------------------------------------------------------
    println!("1. Registering the trace callback...");
    set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 2. A successful construction emits one event
    // -------------------------------------------------------------------------
    println!("\n2. Constructing a singleton...");

    static TELEMETRY: Slot<Telemetry> = Slot::new();
    TELEMETRY.get_or_init(|| Telemetry);
    // The fast path is silent.
    TELEMETRY.get_or_init(|| Telemetry);

    // -------------------------------------------------------------------------
    // 3. Failures and retries
    // -------------------------------------------------------------------------
    println!("\n3. Failing construction, then retrying...");

    static FLAKY: TryLazy<u32, &'static str> = TryLazy::new(|| Err("backend offline"));
    let _ = FLAKY.get_instance();
    let _ = FLAKY.get_instance();

    // -------------------------------------------------------------------------
    // 4. Bypass attempts are rejected and traced
    // -------------------------------------------------------------------------
    println!("\n4. Attempting a second construction...");

    match TELEMETRY.try_init(Telemetry) {
        Ok(_) => println!("   unexpected: bypass succeeded"),
        Err(err) => println!("   rejected: {err}"),
    }

    // -------------------------------------------------------------------------
    // 5. Clearing the callback stops tracing
    // -------------------------------------------------------------------------
    println!("\n5. Clearing the callback...");
    clear_trace_callback();

    static QUIET: Slot<u8> = Slot::new();
    QUIET.get_or_init(|| 0);
    println!("   constructed another singleton; no trace above this line");

    println!("\n=== Done ===");
}
