//! Walkthrough of the three construction strategies.
//!
//! Demonstrates:
//! - `Eager`: built during const evaluation, before main
//! - `Lazy`: double-checked construction on first access, with retryable
//!   failure via `TryLazy`
//! - `Holder`: first-use construction arbitrated by `std::sync::OnceLock`
//! - Treating all of them uniformly through the `Singleton` trait
//!
//! Run with: `cargo run --example construction_strategies`

use singleton_slot::{Eager, Holder, Lazy, Singleton, TryLazy};
use std::sync::atomic::{AtomicUsize, Ordering};

static EXPENSIVE_RUNS: AtomicUsize = AtomicUsize::new(0);

static LIMITS: Eager<[u32; 3]> = Eager::new([8, 64, 512]);

static CACHE: Lazy<Vec<u64>> = Lazy::new(|| {
    EXPENSIVE_RUNS.fetch_add(1, Ordering::SeqCst);
    (0..8).map(|n| n * n).collect()
});

static SESSION: Holder<String> = Holder::new(|| "session-7f3a".to_string());

static PORT: TryLazy<u16, std::num::ParseIntError> = TryLazy::new(|| "8080".parse());

fn describe<S: Singleton>(name: &str, source: &S) {
    println!(
        "   {:<8} initialized before access: {}",
        name,
        source.is_initialized()
    );
}

fn main() {
    println!("=== singleton-slot: Construction Strategies ===\n");

    // -------------------------------------------------------------------------
    // 1. Who is constructed before main?
    // -------------------------------------------------------------------------
    println!("1. Initialization status at startup...");
    describe("eager", &LIMITS);
    describe("lazy", &CACHE);
    describe("holder", &SESSION);

    // -------------------------------------------------------------------------
    // 2. Eager: the value simply exists
    // -------------------------------------------------------------------------
    println!("\n2. Eager access (no branch, no lock)...");
    println!("   limits: {:?}", LIMITS.get_instance());

    // -------------------------------------------------------------------------
    // 3. Lazy: constructed exactly once, on demand
    // -------------------------------------------------------------------------
    println!("\n3. Lazy access...");
    println!("   first call:  {:?}", CACHE.get_instance());
    println!("   second call: {:?}", CACHE.get_instance());
    println!(
        "   constructor runs: {}",
        EXPENSIVE_RUNS.load(Ordering::SeqCst)
    );

    // -------------------------------------------------------------------------
    // 4. Holder: std arbitrates the first use
    // -------------------------------------------------------------------------
    println!("\n4. Holder access...");
    println!("   session: {}", SESSION.get_instance());

    // -------------------------------------------------------------------------
    // 5. Fallible construction returns Result and can be retried
    // -------------------------------------------------------------------------
    println!("\n5. Fallible construction...");
    match PORT.get_instance() {
        Ok(port) => println!("   port: {port}"),
        Err(err) => println!("   construction failed: {err}"),
    }

    println!("\n=== Done ===");
}
