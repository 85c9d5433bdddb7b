use std::{fs, process};

use anyhow::{bail, Context, Result};

use pageturn::script::FlipScript;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const COMPILE_USAGE: &str = "pageturn compile <script.json> <frames.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("compile") => {
            let script_path = args.next().context(COMPILE_USAGE)?;
            let output_path = args.next().context(COMPILE_USAGE)?;
            compile(&script_path, &output_path)
        }
        _ => bail!("pageturn — page-flip geometry engine\n\nUsage:\n  {COMPILE_USAGE}"),
    }
}

fn compile(script_path: &str, output_path: &str) -> Result<()> {
    let script_json =
        fs::read_to_string(script_path).with_context(|| format!("Failed to read {script_path}"))?;
    let script: FlipScript = serde_json::from_str(&script_json)
        .with_context(|| format!("Failed to parse {script_path}"))?;

    let frames = script.run();

    let output_json = serde_json::to_string_pretty(&frames)?;
    fs::write(output_path, &output_json)
        .with_context(|| format!("Failed to write {output_path}"))?;

    eprintln!(
        "Produced {} frames from {} -> {}",
        frames.len(),
        script_path,
        output_path,
    );

    Ok(())
}
