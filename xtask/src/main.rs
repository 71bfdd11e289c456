//! Custom cargo commands for the search box crate.
//!
//! Usage:
//!   cargo xtask test        - Run all tests
//!   cargo xtask check       - Quick check (check + test + clippy, native and wasm)
//!   cargo xtask build-wasm  - Build the browser package with wasm-pack
//!   cargo xtask bench       - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("test") => test()?,
        Some("check") => check()?,
        Some("build-wasm") => build_wasm()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  test        Run all Rust tests
  check       Quick check (cargo check + test + clippy, including the wasm feature)
  build-wasm  Build pkg/ with wasm-pack, then run wasm-opt if available
  bench       Run benchmarks
"#
    );
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/4] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/4] cargo check (wasm32, --features wasm)...");
    run_cargo(&[
        "check",
        "--target",
        "wasm32-unknown-unknown",
        "--features",
        "console-panic",
    ])?;

    println!("[3/4] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[4/4] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Build the browser package. wasm-opt is run separately (see Cargo.toml).
fn build_wasm() -> Result<()> {
    let root = project_root()?;

    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "pkg",
            "--",
            "--features",
            "console-panic",
        ])
        .current_dir(&root)
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("wasm-pack build failed");
    }

    let wasm = root.join("pkg/sorex_searchbox_bg.wasm");
    match Command::new("wasm-opt")
        .arg("-Oz")
        .arg(&wasm)
        .arg("-o")
        .arg(&wasm)
        .status()
    {
        Ok(status) if status.success() => println!("✓ wasm-opt applied"),
        Ok(_) => bail!("wasm-opt failed on {}", wasm.display()),
        Err(_) => println!("  (wasm-opt not found, skipping)"),
    }

    println!("✓ Package written to {}", root.join("pkg").display());
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}
