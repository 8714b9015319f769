//! tartan - terminal editor and CLI for woven tartan designs
//!
//! Usage:
//!   tartan [edit] [NAME]                 Open the editor
//!   tartan new NAME                      Save a blank design
//!   tartan list                          List saved designs
//!   tartan show NAME [--json]            Describe a design
//!   tartan render NAME -o FILE           Export a preview (png or svg)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cli;
mod config;
mod logging;

use cli::render::ImageFormat;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tartan", version, about = "Design woven tartans in the terminal")]
struct Cli {
    /// Config file (defaults to <config_dir>/tartan/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding saved designs
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the editor, optionally on a saved design
    Edit { name: Option<String> },

    /// Save a blank design
    New {
        name: String,
        /// Replace an existing design
        #[arg(short, long)]
        force: bool,
    },

    /// List saved designs
    List,

    /// Describe a saved design
    Show {
        name: String,
        /// Print the raw settings instead
        #[arg(long)]
        json: bool,
    },

    /// Export a preview image
    Render {
        name: String,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Output format (inferred from the file extension if omitted)
        #[arg(short, long, value_enum)]
        format: Option<ImageFormat>,
        /// Draw guide lines
        #[arg(long)]
        guides: bool,
        /// Pixel scale for png output
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let command = args.command.unwrap_or(Command::Edit { name: None });

    if matches!(command, Command::Edit { .. }) {
        logging::init_file();
    } else {
        logging::init_stderr();
    }

    match run(command, args.config, args.base_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: Option<PathBuf>, base_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = Config::resolve(config.as_deref())?;
    if base_dir.is_some() {
        config.design_dir = base_dir;
    }
    let store = cli::common::open_store(&config);

    match command {
        Command::Edit { name } => cli::edit::cmd_edit(&store, &config, name.as_deref()),
        Command::New { name, force } => cli::new::cmd_new(&store, &config, &name, force),
        Command::List => cli::list::cmd_list(&store),
        Command::Show { name, json } => cli::show::cmd_show(&store, &name, json),
        Command::Render {
            name,
            output,
            format,
            guides,
            scale,
        } => cli::render::cmd_render(&store, &name, &output, format, guides, scale),
    }
}
