use clap::Parser;

use glyph_slicer::{sheet_to_glyphs, Args, ConvertTool};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    sheet_to_glyphs(&args, &mut ConvertTool::new())?;

    println!("Ok.");
    Ok(())
}
