use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use testloc_core::discovery::{
    BoundedDiscoveryRunner, LocationLookup, NamedTestsDiscovery, TestCaseFactory, TestCaseReporter,
};
use testloc_core::resolver::TestCaseResolver;
use testloc_core::types::TestCase;
use testloc_core::{DiscoverySettings, LocatorResult};
use testloc_utils::{debug, info, init_logging, LogLevel, LoggingConfig};

/// Find the source file and line of every gtest test case in a test executable.
#[derive(Parser, Debug)]
#[command(name = "testloc")]
#[command(version)]
#[command(about = "Find the source file and line of every gtest test case in a test executable", long_about = None)]
struct Cli
{
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List every test of an executable together with its source location
    Discover
    {
        /// Test executable
        executable: PathBuf,
        #[command(flatten)]
        options: DiscoveryArgs,
    },
    /// Locate the given tests without running the executable
    Resolve
    {
        /// Test executable
        executable: PathBuf,
        /// Fully qualified test names, e.g. `Suite.Case` or `Inst/Suite.Case/0`
        #[arg(required = true)]
        names: Vec<String>,
        #[command(flatten)]
        options: DiscoveryArgs,
    },
}

#[derive(Args, Debug)]
struct DiscoveryArgs
{
    /// Discovery deadline in seconds, 0 waits forever
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// Do not read debug info; report tests without locations
    #[arg(long, default_value_t = false)]
    no_symbols: bool,
    /// Resolve all locations after listing instead of while listing
    #[arg(long, default_value_t = false)]
    legacy: bool,
    /// `;`-separated glob patterns of additional debug-info files, `$(ExecutableDir)` and `$(Executable)` expand
    #[arg(long, default_value = "")]
    additional_debug_info: String,
    /// Only resolve tests matching this glob, or `/regex/`
    #[arg(long, default_value = "*")]
    filter: String,
    /// Only use symbols from modules matching this glob
    #[arg(long, default_value = "")]
    module_filter: String,
}

impl DiscoveryArgs
{
    fn settings(&self) -> DiscoverySettings
    {
        DiscoverySettings {
            discovery_timeout: self.timeout,
            parse_symbol_information: !self.no_symbols,
            use_new_test_execution_framework: !self.legacy,
            additional_debug_info: self.additional_debug_info.clone(),
            test_name_filter: self.filter.clone(),
            module_filter: self.module_filter.clone(),
        }
    }
}

fn main()
{
    let cli = Cli::parse();

    let config = match LoggingConfig::from_env() {
        Ok(config) => config.with_level(LogLevel::from_verbosity(cli.verbose)),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };
    let _guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>>
{
    match cli.command {
        Commands::Discover { executable, options } => {
            let settings = validated(&executable, options.settings())?;
            info!("Discovering tests of {}", executable.display());

            let printed = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&printed);
            let reporter: TestCaseReporter = Arc::new(move |test_case: &TestCase| {
                println!("{test_case}");
                counter.fetch_add(1, Ordering::Relaxed);
            });

            let rt = tokio::runtime::Runtime::new()?;
            let test_cases = rt.block_on(TestCaseFactory::new(&executable, settings).discover(reporter));

            let located = test_cases.iter().filter(|test_case| test_case.has_source_location()).count();
            debug!(reported = printed.load(Ordering::Relaxed), "Discovery finished");
            eprintln!("{} tests, {located} located", test_cases.len());
            Ok(())
        }
        Commands::Resolve {
            executable,
            names,
            options,
        } => {
            let settings = validated(&executable, options.settings())?;
            let lookup = LocationLookup::from_settings(&executable, &settings, TestCaseResolver::default())?;
            let strategy = Box::new(NamedTestsDiscovery::new(names, lookup));
            let reporter: TestCaseReporter = Arc::new(|test_case: &TestCase| println!("{test_case}"));

            let rt = tokio::runtime::Runtime::new()?;
            let test_cases = rt.block_on(BoundedDiscoveryRunner::from_settings(&settings).run(strategy, reporter));
            debug!(resolved = test_cases.len(), "Resolution finished");
            Ok(())
        }
    }
}

/// Reject settings that would only fail later, inside discovery.
fn validated(executable: &Path, settings: DiscoverySettings) -> LocatorResult<DiscoverySettings>
{
    if !executable.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No such executable: {}", executable.display()),
        )
        .into());
    }
    settings.name_filter()?;
    settings.module_filter()?;
    Ok(settings)
}
