//! Build script for the flood monitor firmware
//!
//! Handles:
//! - Linker search path for the memory layout
//! - defmt linker script for embedded builds

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host test builds do not link for the target
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    // memory.x is generated by embassy-stm32 ("memory-x" feature); keep the
    // manifest directory searchable for a board-specific override.
    println!("cargo:rerun-if-changed=memory.x");
    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
