// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! enrol - seed accounts into a Supabase project
//!
//! Reads a seed file of accounts, creates each identity through the GoTrue
//! admin API and writes the matching profile (and optional student) rows
//! through PostgREST. One line is printed per account, then a summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info};

use enrol_config::{
	load_from_sources, standard_sources, CliOverrides, EnvSource, LoadOptions, LogFormat,
	LoggingConfigLayer,
};
use enrol_identity_gotrue::GoTrueClient;
use enrol_provisioning::{load_seed_file, BatchSummary, ProvisionOptions, Provisioner};
use enrol_store_postgrest::PostgrestClient;

mod logging;
mod report;

use logging::init_tracing;

/// enrol - account provisioner
#[derive(Parser, Debug)]
#[command(name = "enrol", version, about, long_about = None)]
struct Args {
	/// Path to configuration file (default: ./enrol.toml if present)
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Log level or filter directive (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create every account in a seed file
	Provision(ProvisionArgs),

	/// Parse and validate a seed file without contacting the backend
	Validate {
		/// Seed file (.toml or .json)
		seed: PathBuf,
	},

	/// Show version information
	Version,
}

#[derive(ClapArgs, Debug)]
struct ProvisionArgs {
	/// Seed file (.toml or .json)
	seed: PathBuf,

	/// Also write a students row for every student account
	#[arg(long)]
	student_records: bool,

	/// Print what would be created and exit without any network call
	#[arg(long)]
	dry_run: bool,

	/// Exit with status 2 if any account failed
	#[arg(long)]
	strict: bool,

	/// Backend project URL (overrides config and environment)
	#[arg(long)]
	backend_url: Option<String>,

	/// Profiles table name
	#[arg(long)]
	profiles_table: Option<String>,

	/// Students table name
	#[arg(long)]
	students_table: Option<String>,
}

impl Args {
	fn log_format(&self) -> Option<LogFormat> {
		self.json_logs.then_some(LogFormat::Json)
	}

	fn cli_overrides(&self, provision: &ProvisionArgs) -> CliOverrides {
		CliOverrides {
			backend_url: provision.backend_url.clone(),
			profiles_table: provision.profiles_table.clone(),
			students_table: provision.students_table.clone(),
			student_records: provision.student_records.then_some(true),
			log_level: self.log_level.clone(),
			log_format: self.log_format(),
		}
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let args = Args::parse();
	let dotenv_path = dotenvy::dotenv().ok();

	match &args.command {
		Command::Version => {
			println!("enrol {}", env!("CARGO_PKG_VERSION"));
			Ok(ExitCode::SUCCESS)
		}
		Command::Validate { seed } => {
			init_tracing(
				&LoggingConfigLayer {
					level: args.log_level.clone(),
					format: args.log_format(),
				}
				.finalize(),
			);
			let specs = load_seed(seed)?;
			println!("{}: {} account(s) valid", seed.display(), specs.len());
			Ok(ExitCode::SUCCESS)
		}
		Command::Provision(provision) => {
			run_provision(&args, provision, dotenv_path, EnvSource::process()).await
		}
	}
}

fn load_seed(path: &Path) -> Result<Vec<enrol_provisioning::AccountSpec>> {
	load_seed_file(path).with_context(|| format!("failed to load seed file {}", path.display()))
}

async fn run_provision(
	args: &Args,
	provision: &ProvisionArgs,
	dotenv_path: Option<PathBuf>,
	env: EnvSource,
) -> Result<ExitCode> {
	let options = LoadOptions {
		config_file: args.config.clone(),
		cli: args.cli_overrides(provision),
	};
	let config = load_from_sources(standard_sources(options, env))
		.context("failed to load configuration")?;

	init_tracing(&config.logging);

	if let Some(path) = &dotenv_path {
		debug!(path = %path.display(), "loaded .env file");
	}
	info!(
		backend_url = %config.backend.url,
		service_role_key = %config.backend.service_role_key,
		"using backend"
	);

	let specs = load_seed(&provision.seed)?;
	let options = ProvisionOptions {
		profiles_table: config.provisioning.profiles_table.clone(),
		students_table: config.provisioning.students_table.clone(),
		student_records: config.provisioning.student_records,
	};

	if provision.dry_run {
		for spec in &specs {
			println!("{}", report::plan_line(spec, &options));
		}
		println!("dry run: {} account(s), nothing sent", specs.len());
		return Ok(ExitCode::SUCCESS);
	}

	let http_client = enrol_common_http::new_client_with_timeout(config.http.timeout)
		.context("failed to build HTTP client")?;
	let identity = GoTrueClient::new(
		config.backend.url.clone(),
		config.backend.service_role_key.clone(),
	)
	.context("failed to build identity client")?
	.with_http_client(http_client.clone())
	.with_timeout(config.http.timeout);
	let store = PostgrestClient::new(
		config.backend.url.clone(),
		config.backend.service_role_key.clone(),
	)
	.context("failed to build data store client")?
	.with_http_client(http_client)
	.with_timeout(config.http.timeout);

	let provisioner = Provisioner::new(Arc::new(identity), Arc::new(store), options);
	let results = provisioner.provision(&specs).await;

	for result in &results {
		println!("{}", report::result_line(result));
	}
	let summary = BatchSummary::from_results(&results);
	println!("{}", report::summary_line(&summary));

	Ok(ExitCode::from(report::exit_status(
		&summary,
		provision.strict,
	)))
}
