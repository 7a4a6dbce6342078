//! ztpack - recipe-driven build and packaging CLI

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ztpack_cli::cmd;
use ztpack_cli::{Cli, Commands};
use ztpack_core::PipelineError;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    let store = cli.store;

    let result = match cli.command {
        Commands::Create {
            recipe,
            source_dir,
            test_project,
            skip_test,
            settings,
            options,
        } => cmd::create::create(
            &recipe,
            source_dir.as_deref(),
            test_project.as_deref(),
            skip_test,
            &settings,
            &options,
            store.as_deref(),
            verbose,
        ),
        Commands::Build {
            recipe,
            source_dir,
            settings,
            options,
        } => cmd::build::build(
            &recipe,
            source_dir.as_deref(),
            &settings,
            &options,
            store.as_deref(),
            verbose,
        ),
        Commands::Package {
            recipe,
            source_dir,
            settings,
            options,
        } => cmd::package::package(
            &recipe,
            source_dir.as_deref(),
            &settings,
            &options,
            store.as_deref(),
            verbose,
        ),
        Commands::Test {
            package_dir,
            test_project,
            settings,
        } => cmd::test::test(&package_dir, test_project.as_deref(), &settings, verbose),
        Commands::Check { recipe } => cmd::check::check(&recipe),
        Commands::Info { package_dir } => cmd::info::info(&package_dir),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        // A failed external tool's exit status is propagated unmodified.
        let code = err
            .downcast_ref::<PipelineError>()
            .map_or(1, PipelineError::exit_code);
        std::process::exit(code);
    }
}
