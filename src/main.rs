use clap::{Parser, Subcommand};
use placeholder_gen::config::{self, GeneratorConfig};
use placeholder_gen::jobs::RenderJob;
use placeholder_gen::rendering::{RasterRenderer, find_font_path};
use placeholder_gen::{output, pipeline};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "placeholders")]
#[command(about = "Generate placeholder images in many sizes")]
#[command(long_about = "\
Generate placeholder images in many sizes

Every size is the background image stretched to WIDTHxHEIGHT with the
dimensions drawn on top in a color derived from the filename. Images land in
images/ under the output root, and index.html lists them with their mirror
URLs.

Output root layout:

  ./
  ├── placeholders.toml     # Optional config (sizes, formats, fonts)
  ├── background.png        # Stretched into every image
  ├── images/               # Must exist; receives {w}x{h}.{ext}
  └── index.html            # Rewritten on every successful run

Run 'placeholders gen-config' to generate a documented placeholders.toml.")]
#[command(version)]
struct Cli {
    /// Output root (contains images/ and receives index.html)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: placeholders.toml in the output root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every image and write the index page
    Generate {
        /// Only print the header, index, and summary lines
        #[arg(long)]
        quiet: bool,
    },
    /// Show the sizes and formats that would be generated, without rendering
    Plan {
        /// Print every job as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print a stock placeholders.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { quiet } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            if find_font_path(&config.font_paths(&cli.root)).is_none() {
                output::print_missing_font_warning();
            }

            let renderer = RasterRenderer::new();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_event(&event, !quiet) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::generate(&config, &cli.root, &renderer, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_summary(&result?);
        }
        Command::Plan { json } => {
            let config = load(&cli.root, cli.config.as_deref())?;
            let space = config.size_space();
            if json {
                let builder = config.job_builder(&cli.root);
                let jobs: Vec<RenderJob> = builder.jobs(&space).collect();
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                output::print_plan(&space, &config.formats, &cli.root);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the explicit `--config` file, or `placeholders.toml` from the root.
fn load(root: &Path, explicit: Option<&Path>) -> Result<GeneratorConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(root),
    }
}
