use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stitchwork", version)]
struct Cli {
    /// JSON config file (defaults are used when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one side of a design over a base garment image as PNG.
    Render(RenderArgs),
    /// Print line labels and display totals for a cart summary.
    CartTotals(CartTotalsArgs),
    /// Print the customization request body for a pair of designs (images left empty).
    Payload(PayloadArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Design document JSON for the side.
    #[arg(long)]
    design: PathBuf,

    /// Base garment image (PNG, JPEG, WebP or SVG).
    #[arg(long)]
    base: PathBuf,

    /// Side being rendered.
    #[arg(long, default_value = "front")]
    side: stitchwork::Side,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font directory; overrides `font_dir` from the config.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CartTotalsArgs {
    /// Cart summary JSON, bare or wrapped in `{"data": ...}`.
    #[arg(long)]
    summary: PathBuf,

    /// Currency icon; falls back to the summary's icon, then `$`.
    #[arg(long)]
    currency_icon: Option<String>,
}

#[derive(Parser, Debug)]
struct PayloadArgs {
    /// Product details JSON, bare or wrapped in `{"product": ...}`.
    #[arg(long)]
    product: PathBuf,

    /// `{"front": <design>, "back": <design>}` JSON.
    #[arg(long)]
    designs: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => stitchwork::StorefrontConfig::load(path)?,
        None => stitchwork::StorefrontConfig::default(),
    }
    .with_env_overrides();

    match cli.cmd {
        Command::Render(args) => cmd_render(args, &config),
        Command::CartTotals(args) => cmd_cart_totals(args),
        Command::Payload(args) => cmd_payload(args, &config),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env("STITCHWORK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse '{}'", path.display()))
}

fn cmd_render(args: RenderArgs, config: &stitchwork::StorefrontConfig) -> anyhow::Result<()> {
    let doc: stitchwork::DesignDocument = read_json(&args.design)?;
    let base_bytes = std::fs::read(&args.base)
        .with_context(|| format!("read base image '{}'", args.base.display()))?;
    let base = stitchwork::decode_image(&base_bytes)?;
    let uploaded = doc
        .uploaded_image
        .as_deref()
        .map(stitchwork::decode_data_url)
        .transpose()?;

    let mut fonts = stitchwork::FontBook::new();
    if let Some(dir) = args.fonts.as_ref().or(config.font_dir.as_ref()) {
        let n = fonts.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), fonts = n, "loaded fonts");
    }

    let scene = stitchwork::SideScene::compose(args.side, &doc, base, uploaded, &config.raster)?;
    let mut rasterizer = stitchwork::CpuRasterizer::new(fonts);
    let image = stitchwork::Rasterizer::rasterize(&mut rasterizer, &scene)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, image.to_png()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        image.width,
        image.height
    );
    Ok(())
}

fn cmd_cart_totals(args: CartTotalsArgs) -> anyhow::Result<()> {
    let value: serde_json::Value = read_json(&args.summary)?;
    let value = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    let summary: stitchwork::CartSummary =
        serde_json::from_value(value).context("decode cart summary")?;

    let icon = args
        .currency_icon
        .as_deref()
        .unwrap_or_else(|| stitchwork::currency_icon(None, Some(&summary)));
    for item in &summary.cart_items {
        let name = item.product.as_ref().map_or("item", |p| p.name.as_str());
        println!(
            "{}\tx{}\t{}",
            name,
            item.quantity,
            stitchwork::line_label(item, icon)
        );
    }

    let totals = stitchwork::CartTotals::derive(&summary);
    if totals.free_item.is_some() {
        println!(
            "gift\t-{}",
            stitchwork::format_money(icon, totals.free_item_original_price)
        );
    }
    println!(
        "total\t{}",
        stitchwork::format_money(icon, totals.displayed_total)
    );
    Ok(())
}

fn cmd_payload(args: PayloadArgs, config: &stitchwork::StorefrontConfig) -> anyhow::Result<()> {
    let value: serde_json::Value = read_json(&args.product)?;
    let product: stitchwork::ProductDetails = match value {
        serde_json::Value::Object(map) if map.contains_key("product") => {
            serde_json::from_value::<stitchwork::ProductEnvelope>(serde_json::Value::Object(map))
                .context("decode product envelope")?
                .product
        }
        other => serde_json::from_value(other).context("decode product")?,
    };
    let designs: stitchwork::SideMap<stitchwork::DesignDocument> = read_json(&args.designs)?;

    let selection = stitchwork::SideSelection::from_flags(
        designs.front.is_customized(),
        designs.back.is_customized(),
    )
    .ok_or(stitchwork::StitchError::NoCustomizationProvided)?;
    let quote = stitchwork::PriceQuote::resolve(
        product.customization.as_ref(),
        &config.pricing,
        selection,
    );
    let payload = stitchwork::CustomizationPayload::build(
        product.id,
        &designs,
        selection,
        &quote,
        &stitchwork::SideMap::default(),
        0,
    )?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
