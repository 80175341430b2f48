//! Command-line entry point: one subcommand per suite, exit status 0
//! iff the run recorded no errors and no failures.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use aes_harness::model::RunSummary;
use aes_harness::source::DirSource;
use aes_harness::suites::{cavp, file, nist};
use aes_harness::tools::Tools;

#[derive(Parser)]
#[clap(name = "aes-harness", about = "Validate external AES tools against published test vectors")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the CAVP `.rsp` vector suite
    Cavp(CavpArgs),
    /// Run the SP800-38A known-answer suite
    Nist(NistArgs),
    /// Run the file round-trip suite
    File(FileArgs),
}

#[derive(Args)]
struct ToolArgs {
    /// Extra directories to search for the tool executables
    #[clap(long, short = 'p', value_name = "PATH")]
    path: Vec<PathBuf>,

    /// Run the tools under Intel SDE
    #[clap(long, short = 'e')]
    sde: bool,
}

impl ToolArgs {
    fn tools(&self) -> Tools {
        Tools::new(self.path.clone()).with_sde(self.sde)
    }
}

#[derive(Args)]
struct CavpArgs {
    /// Directory holding the unpacked KAT_AES vector files
    #[clap(long, short = 'a', value_name = "PATH")]
    vectors: PathBuf,

    /// Use the "boxes" interface of the block tools
    #[clap(long, short = 'b')]
    boxes: bool,

    #[clap(flatten)]
    tools: ToolArgs,
}

#[derive(Args)]
struct NistArgs {
    /// Use the "boxes" interface of the block tools
    #[clap(long, short = 'b')]
    boxes: bool,

    #[clap(flatten)]
    tools: ToolArgs,
}

#[derive(Args)]
struct FileArgs {
    /// Test suite directory path
    #[clap(long, short = 's', value_name = "PATH", default_value = "file")]
    suite: PathBuf,

    /// Overwrite the expected ciphertext files with the tool's output
    #[clap(long, short = 'f')]
    force: bool,

    #[clap(flatten)]
    tools: ToolArgs,
}

fn try_main() -> anyhow::Result<RunSummary> {
    let cli = Cli::parse();
    let summary = match cli.command {
        Commands::Cavp(args) => {
            let tools = args.tools.tools().with_boxes(args.boxes);
            cavp::Runner::new(&tools).run(&DirSource::new(args.vectors))?
        }
        Commands::Nist(args) => {
            let tools = args.tools.tools().with_boxes(args.boxes);
            nist::run(&tools)
        }
        Commands::File(args) => {
            let tools = args.tools.tools();
            file::run(&tools, &args.suite, args.force)?
        }
    };
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::init();

    match try_main() {
        Ok(summary) if summary.all_passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
