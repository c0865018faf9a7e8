// What you SEE:
// • `scanview scan`: the camera preview (or a test pattern) with the viewfinder on top:
//   darkened edges, green corner brackets, a laser sweeping every 3.5s, a caption.
//   ESC quits.
// • `scanview encode`: builds a barcode from request fields and writes it as a PNG
//   (or shows it in a window with --show).

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use scanview::camera::FrameSource;
use scanview::config::{OverlayStyle, parse_argb};
use scanview::draw::Drawer;
use scanview::encode::{self, EncodeRequest, RequestFields};
use scanview::{Error, LaserTicker, OverlayAssets, PreviewGeometry, Viewfinder};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "scanview", version, about = "Barcode viewfinder and encoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Live preview with the viewfinder overlay
    Scan(ScanArgs),
    /// Turn a request into a barcode image
    Encode(EncodeArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    #[arg(long, default_value_t = 0, help = "Camera index (needs the `camera` feature)")]
    camera: u32,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 480)]
    height: u32,
    #[arg(long, help = "Directory with corner_*.png / laser.png sprites")]
    assets: Option<PathBuf>,
    #[arg(long, help = "Status caption under the viewfinder")]
    caption: Option<String>,
    #[arg(long, value_parser = parse_argb, help = "Mask color, #AARRGGBB")]
    mask_color: Option<u32>,
    #[arg(long, value_parser = parse_argb, help = "Laser and corner color, #AARRGGBB")]
    accent_color: Option<u32>,
    #[arg(long, help = "Laser sweep period in milliseconds")]
    period_ms: Option<u64>,
    #[arg(long, default_value_t = 1, help = "Caption font scale")]
    text_scale: i32,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[arg(long, default_value = "generate", help = "generate | encode-from-app | share | scan-share")]
    action: String,
    #[arg(long)]
    format: Option<String>,
    #[arg(long = "type", default_value = encode::TYPE_TEXT)]
    content_type: String,
    #[arg(long)]
    data: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, default_value_t = 300)]
    size: u32,
    #[arg(long, short, default_value = "barcode.png")]
    output: PathBuf,
    #[arg(long, help = "Show the barcode in a window instead of writing a file")]
    show: bool,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => scan(args),
        Commands::Encode(args) => encode(args),
    }
}

fn style_from(args: &ScanArgs) -> OverlayStyle {
    let mut style = OverlayStyle { text_scale: args.text_scale.max(1), ..OverlayStyle::default() };
    if let Some(c) = &args.caption {
        style.caption = c.clone();
    }
    if let Some(c) = args.mask_color {
        style.mask_color = c;
    }
    if let Some(c) = args.accent_color {
        style.laser_color = c;
        style.corner_color = c;
    }
    if let Some(ms) = args.period_ms {
        style.laser_period = Duration::from_millis(ms);
    }
    style
}

#[cfg(feature = "camera")]
fn open_source(args: &ScanArgs) -> Result<Box<dyn FrameSource>, Error> {
    let cam = scanview::camera::CameraCapture::new(args.camera, args.width, args.height)?;
    Ok(Box::new(cam))
}

#[cfg(not(feature = "camera"))]
fn open_source(args: &ScanArgs) -> Result<Box<dyn FrameSource>, Error> {
    use scanview::camera::TestPattern;

    warn!("built without the `camera` feature, showing a test pattern");
    let fields = RequestFields::new()
        .with(encode::TYPE, encode::TYPE_TEXT)
        .with(encode::DATA, "scanview");
    let mut pattern = TestPattern::new(args.width, args.height);
    let side = args.width.min(args.height) / 2;
    if let Some(qr) = EncodeRequest::build(encode::RequestKind::Generate, &fields, side)
        .and_then(|r| r.rasterize())
    {
        pattern = pattern.with_center(qr.to_frame_buffer());
    }
    Ok(Box::new(pattern))
}

fn scan(args: ScanArgs) -> Result<(), Error> {
    let style = style_from(&args);
    let assets = match &args.assets {
        Some(dir) => OverlayAssets::load_dir(dir, &style)?,
        None => OverlayAssets::from_style(&style),
    };

    let mut source = open_source(&args)?;
    let (pw, ph) = source.resolution();
    let mut drawer = Drawer::new("scanview", pw as usize, ph as usize)?;

    // The window is sized to the preview, so screen and preview coincide.
    let mut geometry = PreviewGeometry::new();
    geometry.configure((pw, ph), (pw, ph));

    let mut ticker = LaserTicker::new(style.laser_period);
    info!("preview {pw}x{ph}, laser sweep every {:?}", ticker.period());
    let mut viewfinder = Viewfinder::new(assets, style);

    let mut last_frame_time = Instant::now();
    let mut last_fps_time = last_frame_time;
    let mut frames_this_second: u32 = 0;

    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let phase = ticker.advance(now - last_frame_time);
        last_frame_time = now;

        let mut screen = source.next_frame()?;
        viewfinder.draw(&mut screen, &geometry, phase);
        drawer.present(&screen)?;

        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            info!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }
    Ok(())
}

fn encode(args: EncodeArgs) -> Result<(), Error> {
    let mut fields = RequestFields::new().with(encode::TYPE, &args.content_type);
    for (key, value) in [
        (encode::FORMAT, &args.format),
        (encode::DATA, &args.data),
        (encode::SUBJECT, &args.subject),
        (encode::TITLE, &args.title),
    ] {
        if let Some(v) = value {
            fields.insert(key, v);
        }
    }

    let Some(request) = EncodeRequest::from_action(&args.action, &fields, args.size) else {
        warn!("request carries nothing to encode");
        return Ok(());
    };
    if let Some(text) = request.display_text() {
        info!("contents: {text}");
    }
    let Some(raster) = request.rasterize() else {
        warn!("cannot draw {} for this request", request.format());
        return Ok(());
    };

    if args.show {
        let fb = raster.to_frame_buffer();
        let mut drawer = Drawer::new("scanview encode", fb.width, fb.height)?;
        while drawer.is_open() && !drawer.esc_pressed() {
            drawer.present(&fb)?;
        }
        return Ok(());
    }

    raster.to_gray_image().save(&args.output)?;
    info!("wrote {}x{} {} to {}", raster.width(), raster.height(), request.format(), args.output.display());
    Ok(())
}
