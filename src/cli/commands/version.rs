//! Version command implementation

use crate::cli::{EXIT_CLEAN, Output};
use anyhow::Result;
use std::process::ExitCode;

pub async fn execute(output: &Output) -> Result<ExitCode> {
    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION);
    output.key_value("Repository:", env!("CARGO_PKG_REPOSITORY"));
    output.key_value("Default marker:", crate::guard::DEFAULT_MARKER);
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );

    Ok(ExitCode::from(EXIT_CLEAN))
}
