use std::path::PathBuf;

use anyhow::Context as _;
use clap::{command, Arg, ArgMatches};
use log::info;

use context::Context;
use readme::FsStore;
use remote::HttpFetcher;

mod collector;
mod context;
mod error;
mod frontmatter;
mod metadata;
mod readme;
mod remote;
mod renderer;
mod sync;

fn cli() -> clap::Command {
    command!().arg(
        Arg::new("readme")
            .help("README file containing the blog post section")
            .value_parser(clap::value_parser!(PathBuf)),
    )
}

// settings not given on the command line keep their defaults
fn context_from_matches(matches: &ArgMatches) -> Context {
    let mut ctx = Context::default();
    if let Some(readme) = matches.get_one::<PathBuf>("readme") {
        ctx.readme_path = readme.clone();
    }
    ctx
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ctx = context_from_matches(&cli().get_matches());

    info!("Starting README update...");
    let fetcher = HttpFetcher::new(&ctx)?;
    sync::run(&ctx, &fetcher, &FsStore)
        .with_context(|| format!("failed to update {}", ctx.readme_path.display()))?;

    info!("README update completed successfully!");
    Ok(())
}
