pub fn run() -> anyhow::Result<()> {
    println!("glyphic {}", env!("CARGO_PKG_VERSION"));
    println!("Symbol expansion and prediction engine for AAC boards");
    Ok(())
}
