use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image::RgbaImage;
use layertext::{
    BackgroundRemover, Editor, EditorOpts, FontRegistry, PrecomputedCutout, Resample, TextSet,
};

#[derive(Parser, Debug)]
#[command(name = "layertext", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place text behind the subject of an image and write the composite as PNG.
    Compose(ComposeArgs),
    /// Write the grayscale background / colored subject image as PNG.
    Grayscale(GrayscaleArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo (PNG or JPEG).
    #[arg(long)]
    image: PathBuf,

    /// Subject cutout produced by a background-removal tool.
    #[arg(long)]
    subject: PathBuf,

    /// Text set JSON (array of annotations).
    #[arg(long)]
    texts: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Register a font file as FAMILY=PATH (repeatable).
    #[arg(long = "font", value_name = "FAMILY=PATH")]
    fonts: Vec<String>,

    /// Also write the grayscale/colored-subject image here.
    #[arg(long)]
    grayscale: Option<PathBuf>,

    /// Longest accepted side after normalization (0 keeps the upload size).
    #[arg(long)]
    max_side: Option<u32>,

    /// Rotation filter: bicubic, bilinear or nearest.
    #[arg(long)]
    resample: Option<Resample>,

    /// Draw shadows with the text opacity.
    #[arg(long)]
    shadow_follows_opacity: bool,
}

#[derive(Parser, Debug)]
struct GrayscaleArgs {
    /// Input photo (PNG or JPEG).
    #[arg(long)]
    image: PathBuf,

    /// Subject cutout produced by a background-removal tool.
    #[arg(long)]
    subject: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Longest accepted side after normalization (0 keeps the upload size).
    #[arg(long)]
    max_side: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Grayscale(args) => cmd_grayscale(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut opts = EditorOpts::from_env();
    if let Some(n) = args.max_side {
        opts.max_side = n;
    }
    let mut compositor = opts.compositor;
    if let Some(r) = args.resample {
        compositor = compositor.with_resample(r);
    }
    if args.shadow_follows_opacity {
        compositor = compositor.with_shadow_follows_opacity(true);
    }
    let opts = opts.with_compositor(compositor);

    let fonts = load_fonts(&args.fonts)?;
    let texts = TextSet::from_path(&args.texts)?;
    let remover = load_cutout(&args.subject)?;
    let upload = read_upload(&args.image)?;

    let mut editor = Editor::new(opts).with_fonts(fonts);
    let out = editor.process(&upload, &remover, &texts)?;
    for w in &out.warnings {
        eprintln!("warning: {w}");
    }

    write_png(&args.out, &out.composite)?;
    if let Some(path) = &args.grayscale {
        write_png(path, &out.grayscale_subject)?;
    }
    Ok(())
}

fn cmd_grayscale(args: GrayscaleArgs) -> anyhow::Result<()> {
    let mut opts = EditorOpts::from_env();
    if let Some(n) = args.max_side {
        opts.max_side = n;
    }

    let remover = load_cutout(&args.subject)?;
    let upload = read_upload(&args.image)?;

    let mut editor = Editor::new(opts);
    let out = editor.process(&upload, &remover, &TextSet::new())?;
    write_png(&args.out, &out.grayscale_subject)
}

fn load_fonts(specs: &[String]) -> anyhow::Result<FontRegistry> {
    let mut fonts = FontRegistry::new();
    for spec in specs {
        let (family, path) = spec
            .split_once('=')
            .with_context(|| format!("font '{spec}' must look like FAMILY=PATH"))?;
        fonts
            .register_file(family, path)
            .with_context(|| format!("register font '{family}'"))?;
    }
    Ok(fonts)
}

fn load_cutout(path: &Path) -> anyhow::Result<impl BackgroundRemover> {
    PrecomputedCutout::from_path(path)
        .with_context(|| format!("load subject cutout '{}'", path.display()))
}

fn read_upload(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))
}

fn write_png(path: &Path, image: &RgbaImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = layertext::encode_png(image)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
