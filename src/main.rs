use anyhow::Result;

fn main() -> Result<()> {
    errblast::cli::run()
}
