use clap::Parser;
use vintage_sweep::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "hide-sold-out-vintage")]
#[command(
    author,
    version,
    about = "Hide sold-out vintage products from the store catalog"
)]
pub struct Cli {
    /// What to scan: `product_id=<digits>`, or `<start> <end>` page numbers.
    /// Scans the configured default page range when omitted.
    #[clap(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Configuration file path
    #[clap(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Directory for the JSON report (overrides the configuration file)
    #[clap(short, long)]
    pub output_dir: Option<String>,

    /// Delay before every request in milliseconds (overrides the configuration file)
    #[clap(long)]
    pub delay_ms: Option<u64>,

    /// Record product errors and keep going instead of stopping the run
    #[clap(long, default_value_t = false)]
    pub keep_going: bool,

    /// Generate the configuration file if it doesn't exist
    #[clap(long, default_value_t = false)]
    pub init: bool,

    /// Enable verbose output with request-level detail
    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}
