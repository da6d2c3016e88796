use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use textimage::RenderSpec;

#[derive(Parser, Debug)]
#[command(name = "textimage")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the render description (YAML)
    #[arg(short, long, default_value = "textimage.yaml")]
    spec: PathBuf,

    /// Directory for the output file (defaults to the system temp directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Validate the description and exit without rendering
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    // A subscriber may already be installed when embedded; keep going without ours
    if let Err(e) = textimage::logging::init_subscriber() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let args = Args::parse();

    let spec = RenderSpec::from_file(&args.spec)
        .with_context(|| format!("Failed to load render description '{}'", args.spec.display()))?;

    tracing::info!(
        spec_file = %args.spec.display(),
        width = spec.full_width,
        height = spec.full_height,
        lines = spec.lines.len(),
        format = %spec.format,
        "Render description loaded"
    );

    if args.check {
        spec.validate().context("Render description is invalid")?;
        println!("{}: ok", args.spec.display());
        return Ok(());
    }

    let rendered = match &args.output_dir {
        Some(dir) => textimage::render_in(&spec, dir),
        None => textimage::render(&spec),
    }
    .context("Render failed")?;

    println!("{}\t{}", rendered.file_path.display(), rendered.format);
    Ok(())
}
