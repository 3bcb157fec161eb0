//! Basic usage example for singleton-slot.
//!
//! Demonstrates:
//! - Declaring a global singleton with `define_singleton!`
//! - First-call construction and shared identity
//! - Observing the lifecycle with `is_initialized()` and `state()`
//! - Using a raw `Slot` directly
//!
//! Run with: `cargo run --example basic_usage`

use singleton_slot::{define_singleton, Slot};

// Custom struct to demonstrate a realistic global
#[derive(Debug)]
struct AppConfig {
    name: String,
    worker_threads: usize,
    debug_mode: bool,
}

define_singleton!(config: AppConfig = AppConfig {
    name: "MyApp".to_string(),
    worker_threads: 4,
    debug_mode: true,
});

fn main() {
    println!("=== singleton-slot: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Nothing is constructed until the first call
    // -------------------------------------------------------------------------
    println!("1. Before first access...");
    println!("   initialized: {}", config::is_initialized());
    println!("   state:       {}", config::state());

    // -------------------------------------------------------------------------
    // 2. First call constructs, later calls share
    // -------------------------------------------------------------------------
    println!("\n2. Calling get_instance()...");

    let app_config = config::get_instance();
    println!("   name:    {}", app_config.name);
    println!("   workers: {}", app_config.worker_threads);
    println!("   debug:   {}", app_config.debug_mode);

    let again = config::get_instance();
    println!(
        "   same instance on second access: {}",
        std::ptr::eq(app_config, again)
    );

    // -------------------------------------------------------------------------
    // 3. A raw slot, for when the macro is too much ceremony
    // -------------------------------------------------------------------------
    println!("\n3. Using a raw Slot directly...");

    static MESSAGE: Slot<String> = Slot::new();
    let message = MESSAGE.get_or_init(|| "hello from a slot".to_string());
    println!("   value: {message}");
    println!("   state: {}", MESSAGE.state());

    println!("\n=== Done ===");
}
