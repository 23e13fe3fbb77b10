use std::path::PathBuf;

use clap::Parser;

use mdblog::build::build_site;
use mdblog::config::Config;
use mdblog::render::MarkdownRenderer;

/// Generates the blog: reads the Markdown articles, renders every post
/// page, the index, and the RSS feed, and replaces the output directory.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The project directory; `blog.yaml` is looked up here or in the
    /// nearest ancestor.
    #[arg(default_value = ".")]
    project_directory: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_directory(&args.project_directory)?;
    build_site(&config, &MarkdownRenderer)?;
    Ok(())
}
