mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use forumsync_core::RunSummary;
use forumsync_engine::{
    DiscourseSource, GitPublishSink, LocalDirSink, MarkdownRenderer, Pipeline, PublishSink,
};
use log::LevelFilter;
use sync_logging::{sync_error, sync_info, sync_warn, LogDestination};

/// Import tagged forum threads into a static-site content repository.
#[derive(Debug, Parser)]
#[command(name = "forumsync", version)]
struct Cli {
    /// RON configuration file; environment variables override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write documents into DIR instead of committing them to the repository.
    #[arg(long, value_name = "DIR")]
    dry_run: Option<PathBuf>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level, including git commands and request URLs.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match cli.log_file.as_deref() {
        Some(path) => LogDestination::TerminalAndFile(path),
        None => LogDestination::Terminal,
    };
    sync_logging::initialize(level, destination);

    match run(&cli) {
        Ok(summary) => {
            if summary.written > 0 {
                sync_info!("Imported {} thread(s)", summary.written);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            sync_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunSummary> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            sync_warn!("Ignoring .env file: {err}");
        }
    }

    let config = config::load(cli.config.as_deref())?;
    config.validate(cli.dry_run.is_none())?;
    if config.forum.api_key.is_none() {
        sync_warn!("DISCOURSE_API_KEY is not set; querying the forum anonymously");
    }

    let mut sink: Box<dyn PublishSink> = match &cli.dry_run {
        Some(dir) => {
            sync_info!("Dry run: documents go to {dir:?}, nothing is committed");
            Box::new(LocalDirSink::new(dir.clone()))
        }
        None => Box::new(GitPublishSink::new(config.git_target())),
    };
    let renderer = MarkdownRenderer::new(&config.forum.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async {
        let source = DiscourseSource::new(
            &config.forum.base_url,
            &config.credentials(),
            config.fetch_settings(),
        )
        .context("failed to set up the forum client")?;

        let summary = Pipeline::new(&source, &renderer, sink.as_mut(), config.allow_list())
            .run()
            .await?;
        Ok::<_, anyhow::Error>(summary)
    })
}
