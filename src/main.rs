use anyhow::Result;
use smartsort::cli;

fn main() -> Result<()> {
    let args = cli::parse();
    cli::run(args)
}
