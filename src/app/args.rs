use clap::{Parser, ValueEnum};
use console_trace::SinkConfig;
use std::io::IsTerminal;

#[derive(Parser, Debug, Clone)]
#[command(name = "console-trace")]
#[command(about = "Console logging and progress reporting for a simulated transfer")]
pub struct AppArgs {
    #[arg(short, long, help = "Show debug output prefixed with elapsed time and source")]
    pub verbose: bool,

    #[arg(short, long, help = "Hide informational output")]
    pub quiet: bool,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, help = "Color output by severity")]
    pub color: ColorChoice,

    #[arg(long, default_value_t = 1000, help = "Progress refresh interval in milliseconds")]
    pub poll_interval_ms: u64,

    #[arg(long, default_value_t = 64, help = "Size of the simulated transfer in MB")]
    pub size_mb: u64,

    #[arg(long, default_value_t = 3500, help = "Duration of the simulated transfer in milliseconds")]
    pub duration_ms: u64,

    #[arg(long, help = "Make the simulated transfer fail half way")]
    pub fail: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stdout is a terminal and NO_COLOR is unset.
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig::new(self.verbose, self.quiet, self.color.enabled())
    }
}
