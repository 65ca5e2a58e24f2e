mod app;
mod pen;
mod pointer;
mod studio;

use std::path::PathBuf;

use inkflow_engine::logging::{init_logging, LoggingConfig};

use crate::studio::Studio;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let snapshot = std::env::var_os("INKFLOW_SNAPSHOT").map(PathBuf::from);
    let pen = std::env::var_os("INKFLOW_NO_PEN").is_none().then(Default::default);

    Studio::new()
        .title("Inkflow Studio")
        .size(1024.0, 768.0)
        .pen(pen)
        .snapshot(snapshot)
        .run()
}
