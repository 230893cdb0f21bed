//! Launcher for cmconv.
//!
//! Any command-line argument selects the headless CLI; a bare launch opens the
//! desktop window.

use anyhow::{Result, anyhow};

#[tokio::main]
async fn main() -> Result<()> {
    if cmconv_cli::should_run_cli_mode() {
        cmconv_cli::run().await.map_err(|e| anyhow!(e))?;
    } else {
        cmconv_gui::run().map_err(|e| anyhow!("GUI error: {e}"))?;
    }

    Ok(())
}
