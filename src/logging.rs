//! Diagnostic logging on stderr.
//!
//! Level defaults to `warn`, raised by `-v` (info) and `-vv` (debug).
//! `RUST_LOG` always wins when set.

use env_logger::{Builder, Env};

pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // A second init (e.g. from tests) is harmless.
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
