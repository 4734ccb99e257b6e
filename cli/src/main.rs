use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use grpc_gen::model_to_json;
use grpc_gen_compiler::{
    compile_source, generate_file, validate_input,
    config::DEFAULT_OUTPUT_SUBDIR,
    error::GenError,
    GenConfig, ProtocConfig,
};

mod logging;

use logging::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "grpc-gen")]
#[command(about = "Generate proto3 services and messages from annotated Go sources", long_about = None)]
struct Cli {
    /// Also log declarations that were skipped
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write `<dir>/pb/<name>.go.proto` for each input, run protoc on it and
    /// comment out the extracted messages
    Generate {
        /// Input `.go` files, processed one after another
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Subdirectory next to each input that receives the document
        #[arg(long, default_value = DEFAULT_OUTPUT_SUBDIR)]
        out_dir_name: String,

        /// Schema compiler executable
        #[arg(long, default_value = "protoc")]
        protoc: PathBuf,

        /// Plugin options passed as `--go_out=<GO_OUT>:<dir>`
        #[arg(long, default_value = "plugins=grpc")]
        go_out: String,

        /// Do not run the schema compiler
        #[arg(long)]
        no_protoc: bool,

        /// Leave the Go sources untouched
        #[arg(long)]
        no_rewrite: bool,

        /// Continue with the remaining inputs after a failure
        #[arg(long)]
        keep_going: bool,
    },

    /// Print the proto document for a `.go` file without side effects
    Render {
        /// Input `.go` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the extracted schema model as JSON
    Model {
        /// Input `.go` file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn run(command: Commands) -> Result<(), GenError> {
    match command {
        Commands::Generate { inputs, out_dir_name, protoc, go_out, no_protoc, no_rewrite, keep_going } => {
            let config = GenConfig {
                output_subdir: out_dir_name,
                protoc:        (!no_protoc).then_some(ProtocConfig { program: protoc, go_out }),
                rewrite:       !no_rewrite,
            };

            let mut first_error = None;
            for input in &inputs {
                match generate_file(input, &config) {
                    Ok(out_path) => println!("Generated {} → {}", input.display(), out_path.display()),
                    Err(err) if !keep_going => return Err(err),
                    // The first failure is returned to `main`; later ones are only logged.
                    Err(err) if first_error.is_some() => error!(input = %input.display(), "{}", err),
                    Err(err) => first_error = Some(err),
                }
            }
            first_error.map_or(Ok(()), Err)
        }

        Commands::Render { input, output } => {
            validate_input(&input)?;
            let text = fs::read_to_string(&input)?;
            let (_model, document) = compile_source(&text)?;
            if let Some(out_path) = output {
                fs::write(&out_path, &document)?;
                println!("Proto document written to {}", out_path.display());
            } else {
                print!("{}", document);
            }
            Ok(())
        }

        Commands::Model { input } => {
            validate_input(&input)?;
            let text = fs::read_to_string(&input)?;
            println!("{}", model_to_json(&text)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LogConfig { verbose: cli.verbose, quiet: cli.quiet });

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Compiler diagnostics are printed exactly as received.
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
