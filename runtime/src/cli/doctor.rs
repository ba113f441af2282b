//! Environment readiness check.

use crate::cli::output::Styled;
use crate::renderer::chromium::{find_chromium, CHROMIUM_PATH_ENV};
use anyhow::Result;

/// Check that a Chromium binary can be found.
pub async fn run() -> Result<()> {
    let s = Styled::new();

    println!("{}", s.bold("Skimmer Doctor"));
    println!("==============");
    println!();

    // OS and architecture
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium_path = find_chromium(None);
    match &chromium_path {
        Some(path) => println!("{} Chromium found: {}", s.ok_sym(), path.display()),
        None => println!(
            "{} Chromium NOT found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}.",
            s.warn_sym()
        ),
    }

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}
