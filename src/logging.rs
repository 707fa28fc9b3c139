//! Process-wide logger setup on top of `env_logger`.
//!
//! Front ends call [`init`] once at startup; library code only uses the `log`
//! macros.

use std::io::Write;
use std::sync::Once;

use crate::config::{LogFormat, LoggingConfig};

static INIT: Once = Once::new();

/// Install the global logger once, from `cfg`.
///
/// `RUST_LOG` takes precedence over `cfg.level`.  Output goes to stderr so
/// the interactive prompt on stdout stays readable.  Later calls are no-ops.
pub fn init(cfg: &LoggingConfig) {
    INIT.call_once(|| {
        let format = cfg.format;
        let mut builder = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(cfg.level.as_str()),
        );

        builder.format(move |buf, record| {
            let ts = buf.timestamp_millis();
            match format {
                LogFormat::Json => {
                    let obj = serde_json::json!({
                        "ts": ts.to_string(),
                        "level": record.level().to_string(),
                        "target": record.target(),
                        "msg": record.args().to_string(),
                    });
                    writeln!(buf, "{}", obj)
                }
                LogFormat::Text => {
                    writeln!(buf, "{} {:<5} {} {}", ts, record.level(), record.target(), record.args())
                }
            }
        });
        builder.target(env_logger::Target::Stderr);

        // A logger installed by the host application (or a test harness) wins.
        if let Err(e) = builder.try_init() {
            log::debug!("logger already installed: {}", e);
        }
    });
}
