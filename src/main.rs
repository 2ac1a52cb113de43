//! hlsop CLI
//!
//! Usage:
//!   hlsop [OPTIONS] <MODEL>
//!
//! Options:
//!   -a, --assets <DIR>       Template asset directory
//!   -o, --output-dir <DIR>   Override the model's output directory
//!       --cflags <FLAGS>     Compile flags (skips toolchain introspection)
//!       --lflags <FLAGS>     Link flags (skips toolchain introspection)
//!   -h, --help               Print help

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;

use hlsop::{write_project, Model, WriterConfig};

#[derive(Parser)]
#[command(name = "hlsop")]
#[command(about = "Write a compilable operator project from a layer graph description")]
struct Cli {
    /// Model description file (TOML format)
    model: PathBuf,

    /// Template asset directory
    #[arg(short, long, default_value = "templates")]
    assets: PathBuf,

    /// Override the output directory of the model
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Compile flags for the build script
    #[arg(long, requires = "lflags")]
    cflags: Option<String>,

    /// Link flags for the build script
    #[arg(long, requires = "cflags")]
    lflags: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut model = match Model::from_file(&cli.model) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error loading model '{}': {}", cli.model.display(), e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.output_dir {
        model.config.output_dir = dir;
    }

    let mut config = WriterConfig::new().with_assets_dir(cli.assets);
    if let (Some(cflags), Some(lflags)) = (&cli.cflags, &cli.lflags) {
        config = config.with_flags(cflags, lflags);
    }

    match write_project(&model, &config) {
        Ok(project) => {
            info!("project written to {}", project.root.display());
            println!("{}", project.operator_source.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e.format());
            std::process::exit(1);
        }
    }
}
