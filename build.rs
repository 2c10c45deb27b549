//! Build script - for the embedded build, copies the linker script into the
//! output directory and links the C USB host stack shim.
//!
//! Host builds (`cargo test --lib`) skip both steps.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=HIDHOST_LIB_DIR");

    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to OUT_DIR
    fs::copy("memory.x", out_dir.join("memory.x")).unwrap();

    // Tell cargo to look for linker scripts in OUT_DIR
    println!("cargo:rustc-link-search={}", out_dir.display());

    // The vendor host stack is built separately as libhidhost.a
    if let Some(dir) = env::var_os("HIDHOST_LIB_DIR") {
        println!("cargo:rustc-link-search={}", PathBuf::from(dir).display());
    }
    println!("cargo:rustc-link-lib=static=hidhost");
}
