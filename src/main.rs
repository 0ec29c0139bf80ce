use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use mdgen::Config;
use mdgen::site;

#[derive(Parser)]
#[command(name = "mdgen")]
#[command(about = "Generate a static HTML site from Markdown")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the whole site (the default)
    Build(BuildArgs),

    /// Convert a single Markdown file to an HTML fragment
    Render {
        /// Input Markdown file
        input: PathBuf,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Default)]
struct BuildArgs {
    /// Site config file
    #[arg(short, long, default_value = "mdgen.toml")]
    config: PathBuf,

    /// Prefix for root-relative links, e.g. /my-repo
    #[arg(long)]
    base_path: Option<String>,

    /// Directory of Markdown pages
    #[arg(long)]
    content: Option<PathBuf>,

    /// Destination directory (cleared before building)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory of files copied verbatim
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Page template with {{ Title }} and {{ Content }} placeholders
    #[arg(long)]
    template: Option<PathBuf>,
}

impl BuildArgs {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        debug!("Loaded config {:?}", config);

        if let Some(base_path) = self.base_path {
            config.base_path = base_path;
        }
        if let Some(content) = self.content {
            config.content_dir = content;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = static_dir;
        }
        if let Some(template) = self.template {
            config.template = template;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Render { input, output }) => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("Error reading {}", input.display()))?;
            let html = mdgen::markdown_to_html(&markdown)
                .with_context(|| format!("Error converting {}", input.display()))?;

            match output {
                Some(output) => {
                    fs::write(&output, html)
                        .with_context(|| format!("Error writing {}", output.display()))?;
                    println!("Created {}", output.display());
                }
                None => println!("{html}"),
            }
        }
        Some(Command::Build(args)) => build(args)?,
        None => build(BuildArgs {
            config: PathBuf::from("mdgen.toml"),
            ..BuildArgs::default()
        })?,
    }

    Ok(())
}

fn build(args: BuildArgs) -> Result<()> {
    let config = args.into_config()?;
    let summary = site::build_site(&config)
        .with_context(|| format!("Error building site into {}", config.output_dir.display()))?;

    println!(
        "Generated {} pages and copied {} static files into {}",
        summary.pages,
        summary.static_files,
        config.output_dir.display()
    );
    Ok(())
}
