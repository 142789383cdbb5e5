use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("sentinel version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
