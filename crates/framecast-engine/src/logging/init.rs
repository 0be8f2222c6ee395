use std::sync::Once;

/// Logger setup.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"framecast_engine=debug,wgpu_core=warn"`. When unset, `RUST_LOG` is read,
/// then the built-in default (info, with wgpu internals at warn) applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// wgpu backends log every resource creation at info.
const QUIET_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

/// Installs the `env_logger` backend for the process.
///
/// Only the first call has an effect. If another logger is already installed
/// this is a no-op.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        if builder(&config, env.as_deref()).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

fn builder(config: &LoggingConfig, rust_log: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match config.env_filter.as_deref().or(rust_log) {
        Some(filter) => {
            builder.parse_filters(filter);
        }
        None => {
            builder.filter_level(log::LevelFilter::Info);
            for module in QUIET_MODULES {
                builder.filter_module(module, log::LevelFilter::Warn);
            }
        }
    }

    builder.write_style(config.write_style);
    builder
}
