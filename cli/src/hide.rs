use crate::cli::Cli;
use crate::error::{CliError, Result, ResultExt};
use crate::progress::ProgressTracker;
use crate::ui;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use vintage_sweep::config::ensure_config_file_exists;
use vintage_sweep::{
    ErrorPolicy, OutcomeTally, ProductId, StoreApi, StoreClient, StoreConfig, Sweep, Target,
};

const PRODUCT_ID_PREFIX: &str = "product_id=";

/// Turn positional arguments into a scan target.
///
/// `default_pages` is used when no arguments are given.
pub fn parse_target(args: &[String], default_pages: (u32, u32)) -> Result<Target> {
    match args {
        [] => Ok(Target::pages(default_pages.0, default_pages.1)),
        [single] => {
            let digits = single.strip_prefix(PRODUCT_ID_PREFIX).ok_or_else(|| {
                CliError::Usage(format!("unrecognised target `{single}`"))
            })?;
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(CliError::Usage(format!(
                    "product id must be digits, got `{digits}`"
                )));
            }
            Ok(Target::Product(ProductId::new(digits)))
        }
        [start, end] => {
            let start = parse_page(start)?;
            let end = parse_page(end)?;
            Ok(Target::pages(start, end))
        }
        _ => Err(CliError::Usage(format!(
            "expected at most two arguments, got {}",
            args.len()
        ))),
    }
}

fn parse_page(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(0) => Err(CliError::Usage("page numbers start at 1".to_string())),
        Ok(page) => Ok(page),
        Err(_) => Err(CliError::Usage(format!("`{raw}` is not a page number"))),
    }
}

fn describe(target: &Target) -> String {
    match target {
        Target::Pages { start, end } => format!("pages {start} to {end}"),
        Target::Product(id) => format!("product {id}"),
    }
}

pub fn execute(args: Cli) -> Result<()> {
    let config_path = Path::new(&args.config);

    if args.init {
        ui::section_header("Sweep Configuration Setup");
        if ensure_config_file_exists(config_path)? {
            ui::success_message(&format!("Created {}", config_path.display()));
            ui::info_message("Fill in url_base and api_domain before running a sweep");
        } else {
            ui::warning_message(&format!(
                "{} already exists, leaving it untouched",
                config_path.display()
            ));
        }
        return Ok(());
    }

    let mut progress = ProgressTracker::new("Hide Sold-Out Vintage Products").with_steps(vec![
        "Loading configuration".to_string(),
        "Scanning catalog".to_string(),
        "Writing report".to_string(),
    ]);

    progress.start_step();
    let mut config = StoreConfig::load_from_file(config_path).with_context(|| {
        format!("Failed to load configuration from {}", config_path.display())
    })?;
    if let Some(delay_ms) = args.delay_ms {
        config = config.with_delay_millis(delay_ms);
    }
    if let Some(output_dir) = &args.output_dir {
        config = config.with_output_dir(output_dir.clone());
    }
    let target = parse_target(&args.targets, config.default_pages())?;
    progress.complete_step();

    let policy = if args.keep_going {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::Abort
    };

    ui::info_message(&format!("Store: {}", config.api_domain));
    ui::info_message(&format!("Target: {}", describe(&target)));
    ui::info_message(&format!("starting at {}", Local::now()));

    let client = StoreClient::new(config.clone())?;
    let rt = Runtime::new().with_context(|| "Failed to create async runtime")?;

    let (tally, report_path) = sweep_and_report(
        &rt,
        &client,
        &target,
        policy,
        &config.output_dir(),
        &mut progress,
    )?;
    ui::success_message(&format!("Report written to {}", report_path.display()));

    ui::section_header("Summary");
    for (key, count) in tally.counts() {
        ui::count_line(key, count);
    }

    progress.complete();
    Ok(())
}

/// Scan `target` and write the report under `output_dir`.
///
/// A scan that ends in an error writes no report.
fn sweep_and_report<C: StoreApi>(
    rt: &Runtime,
    api: &C,
    target: &Target,
    policy: ErrorPolicy,
    output_dir: &str,
    progress: &mut ProgressTracker,
) -> Result<(OutcomeTally, PathBuf)> {
    progress.start_step();
    let mut tally = OutcomeTally::new();
    if let Err(err) = rt.block_on(run(api, target, policy, &mut tally)) {
        progress.fail_step(&err.to_string());
        return Err(err.into());
    }
    progress.complete_step();

    let finished_at = Local::now();
    ui::info_message(&format!("finished at {finished_at}"));

    progress.start_step();
    let report_path = tally
        .write_report(output_dir, finished_at)
        .with_context(|| "Failed to write report")?;
    progress.complete_step();

    Ok((tally, report_path))
}

async fn run<C: StoreApi>(
    api: &C,
    target: &Target,
    policy: ErrorPolicy,
    tally: &mut OutcomeTally,
) -> vintage_sweep::Result<()> {
    Sweep::new(api)
        .with_error_policy(policy)
        .run(target, tally)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use vintage_sweep::testing::{product, sold_out_vintage, MockStoreApi};
    use vintage_sweep::Outcome;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_uses_default_range() {
        assert_eq!(parse_target(&[], (1, 100)).unwrap(), Target::pages(1, 100));
    }

    #[test]
    fn test_product_id_argument() {
        assert_eq!(
            parse_target(&args(&["product_id=632910392"]), (1, 100)).unwrap(),
            Target::Product(ProductId::new("632910392"))
        );
        assert!(parse_target(&args(&["product_id="]), (1, 100)).is_err());
        assert!(parse_target(&args(&["product_id=12ab"]), (1, 100)).is_err());
    }

    #[test]
    fn test_page_range_arguments() {
        assert_eq!(
            parse_target(&args(&["5", "12"]), (1, 100)).unwrap(),
            Target::pages(5, 12)
        );
        assert!(parse_target(&args(&["0", "3"]), (1, 100)).is_err());
        assert!(parse_target(&args(&["one", "3"]), (1, 100)).is_err());
    }

    #[test]
    fn test_unrecognised_arguments_are_rejected() {
        assert!(matches!(
            parse_target(&args(&["7"]), (1, 100)),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_target(&args(&["1", "2", "3"]), (1, 100)),
            Err(CliError::Usage(_))
        ));
    }

    fn tracker() -> ProgressTracker {
        ProgressTracker::new("test").with_steps(vec![
            "Scanning catalog".to_string(),
            "Writing report".to_string(),
        ])
    }

    fn report_files(dir: &Path) -> Vec<PathBuf> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_aborted_run_writes_no_report() {
        let broken = product("9", &["vintage"], vec![], Some("2020-01-01"));
        let api = MockStoreApi::new().with_page(1, vec![broken, sold_out_vintage("10")]);
        let rt = Runtime::new().unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("data");

        let err = sweep_and_report(
            &rt,
            &api,
            &Target::pages(1, 1),
            ErrorPolicy::Abort,
            &out.to_string_lossy(),
            &mut tracker(),
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Sweep(_)));
        assert!(err.user_message().contains('9'));
        assert!(api.unpublished().is_empty());
        assert!(report_files(&out).is_empty());
    }

    #[test]
    fn test_finished_run_writes_one_report() {
        let broken = product("9", &["vintage"], vec![], Some("2020-01-01"));
        let api = MockStoreApi::new().with_page(1, vec![broken, sold_out_vintage("10")]);
        let rt = Runtime::new().unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("data");

        let (tally, path) = sweep_and_report(
            &rt,
            &api,
            &Target::pages(1, 1),
            ErrorPolicy::Continue,
            &out.to_string_lossy(),
            &mut tracker(),
        )
        .unwrap();

        assert_eq!(tally.ids(Outcome::Errors), &[ProductId::new("9")]);
        assert_eq!(tally.ids(Outcome::SuccessfullyHidProduct), &[ProductId::new("10")]);
        assert_eq!(report_files(&out), vec![path.clone()]);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report["errors"], serde_json::json!([9]));
        assert_eq!(report["successfully_hid_product"], serde_json::json!([10]));
    }

    #[test]
    fn test_init_writes_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config").join("secrets.toml");
        let cli = Cli {
            targets: vec![],
            config: config_path.to_string_lossy().to_string(),
            output_dir: None,
            delay_ms: None,
            keep_going: false,
            init: true,
            verbose: false,
        };

        execute(cli).unwrap();
        assert!(StoreConfig::load_from_file(&config_path).is_ok());
    }

    #[test]
    fn test_missing_config_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli {
            targets: vec![],
            config: dir.path().join("missing.toml").to_string_lossy().to_string(),
            output_dir: None,
            delay_ms: None,
            keep_going: false,
            init: false,
            verbose: false,
        };

        let err = execute(cli).unwrap_err();
        assert!(err.user_message().contains("Failed to load configuration"));
    }
}
