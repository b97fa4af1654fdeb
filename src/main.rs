use clap::Parser;
use std::path::PathBuf;

use segdigit::{
    Channel, ConsoleSink, DebugConfig, DebugDirSink, FrameLoop, FrameProcessor, ImageSequence,
    ProcessorConfig, SharedThresholds, ThresholdRanges,
};

#[derive(Parser)]
#[command(name = "segdigit")]
#[command(about = "Isolate a coloured region in each frame and read the digit it shows")]
struct Cli {
    /// Frame images, processed in order
    #[arg(value_name = "FRAME", required = true)]
    frames: Vec<PathBuf>,

    /// Hue range as MIN:MAX (0-179)
    #[arg(long, value_name = "MIN:MAX", value_parser = parse_range, default_value = "0:0")]
    hue: (i32, i32),

    /// Saturation range as MIN:MAX (0-254)
    #[arg(long, value_name = "MIN:MAX", value_parser = parse_range, default_value = "0:0")]
    sat: (i32, i32),

    /// Value range as MIN:MAX (0-254)
    #[arg(long, value_name = "MIN:MAX", value_parser = parse_range, default_value = "0:0")]
    val: (i32, i32),

    /// Processing width
    #[arg(long, default_value_t = 290, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Processing height
    #[arg(long, default_value_t = 272, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Median filter kernel size
    #[arg(long, default_value_t = 5)]
    median: u32,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Resize saved debug images to WxH
    #[arg(long, value_name = "WxH", value_parser = parse_size, requires = "debug_out")]
    preview: Option<(u32, u32)>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_range(s: &str) -> Result<(i32, i32), String> {
    let (low, high) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{}'", s))?;
    let low = low.trim().parse::<i32>().map_err(|e| format!("bad MIN '{}': {}", low, e))?;
    let high = high.trim().parse::<i32>().map_err(|e| format!("bad MAX '{}': {}", high, e))?;
    Ok((low, high))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height '{}': {}", h, e))?;
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Route through the range controller so out-of-domain or inverted
    // inputs are clamped the same way interactive updates are.
    let mut ranges = ThresholdRanges::new();
    for (channel, (low, high)) in [
        (Channel::Hue, args.hue),
        (Channel::Saturation, args.sat),
        (Channel::Value, args.val),
    ] {
        ranges.set_range(channel, low, high);
    }

    if args.verbose {
        println!("Thresholds: {}", ranges);
        println!("Frames: {}\n", args.frames.len());
    }

    let config = ProcessorConfig::new()
        .with_frame_size(args.width, args.height)
        .with_median_kernel(args.median)
        .with_verbose(args.verbose);

    let source = ImageSequence::new(args.frames);
    let mut frame_loop = FrameLoop::new(
        source,
        FrameProcessor::new(config),
        SharedThresholds::new(ranges),
    )
    .add_sink(Box::new(ConsoleSink {
        verbose: args.verbose,
    }));

    if let Some(debug_dir) = args.debug_out {
        let mut debug = DebugConfig::new(debug_dir)?;
        if let Some((w, h)) = args.preview {
            debug = debug.with_preview_size(w, h);
        }
        frame_loop = frame_loop.add_sink(Box::new(DebugDirSink::new(debug, args.verbose)));
    }

    let summary = frame_loop.run()?;

    println!(
        "\n{} frames processed, {} recognized, {} unavailable",
        summary.processed, summary.recognized, summary.skipped
    );

    Ok(())
}
