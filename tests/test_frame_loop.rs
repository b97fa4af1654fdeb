//! Integration tests for the frame loop, frame sources and sinks.

mod common;

use common::*;
use image::RgbImage;
use segdigit::pipeline::DEBUG_STAGES;
use segdigit::{
    Cycle, DebugConfig, DebugDirSink, DisplaySink, FrameAnalysis, FrameLoop, FrameSource,
    FrameUnavailable, ImageSequence, SharedThresholds,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Replays a scripted list of acquisition outcomes
struct ScriptedSource {
    script: Vec<Result<RgbImage, FrameUnavailable>>,
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameUnavailable> {
        if self.script.is_empty() {
            return Ok(None);
        }
        self.script.remove(0).map(Some)
    }
}

/// Records what it was shown
#[derive(Clone, Default)]
struct RecordingSink {
    seen: Rc<RefCell<Vec<(usize, Recognition)>>>,
}

impl DisplaySink for RecordingSink {
    fn present(&mut self, frame_index: usize, analysis: &FrameAnalysis) -> anyhow::Result<()> {
        self.seen.borrow_mut().push((frame_index, analysis.recognition()));
        Ok(())
    }
}

const SEVEN: [usize; 7] = [0, 1, 2, 5, 8, 11, 14];

#[test]
fn test_unavailable_frame_is_skipped() -> anyhow::Result<()> {
    let frame = digit_frame(&SEVEN, 20, 15);
    let source = ScriptedSource {
        script: vec![
            Err(FrameUnavailable::new("device not ready")),
            Ok(frame.clone()),
        ],
    };
    let sink = RecordingSink::default();
    let mut frame_loop = FrameLoop::new(
        source,
        processor_for(frame.width(), frame.height()),
        SharedThresholds::new(target_ranges()),
    )
    .add_sink(Box::new(sink.clone()));

    assert!(matches!(frame_loop.step()?, Cycle::Skipped(_)));
    match frame_loop.step()? {
        Cycle::Processed(analysis) => assert_eq!(analysis.recognition(), Recognition::Digit(7)),
        other => panic!("expected a processed frame, got {:?}", other),
    }
    assert!(matches!(frame_loop.step()?, Cycle::Finished));

    assert_eq!(*sink.seen.borrow(), vec![(1, Recognition::Digit(7))]);
    Ok(())
}

#[test]
fn test_run_summary() -> anyhow::Result<()> {
    let frame = digit_frame(&SEVEN, 20, 15);
    let blank = RgbImage::from_pixel(frame.width(), frame.height(), DARK);
    let source = ScriptedSource {
        script: vec![
            Ok(frame.clone()),
            Err(FrameUnavailable::new("disconnected")),
            Ok(blank),
            Ok(frame.clone()),
        ],
    };
    let mut frame_loop = FrameLoop::new(
        source,
        processor_for(frame.width(), frame.height()),
        SharedThresholds::new(target_ranges()),
    );

    let summary = frame_loop.run()?;
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.recognized, 2);
    Ok(())
}

#[test]
fn test_threshold_changes_apply_next_cycle() -> anyhow::Result<()> {
    let frame = digit_frame(&SEVEN, 20, 15);
    let thresholds = SharedThresholds::new(target_ranges());
    let source = ScriptedSource {
        script: vec![Ok(frame.clone()), Ok(frame.clone())],
    };
    let sink = RecordingSink::default();
    let mut frame_loop = FrameLoop::new(
        source,
        processor_for(frame.width(), frame.height()),
        thresholds.clone(),
    )
    .add_sink(Box::new(sink.clone()));

    frame_loop.step()?;
    thresholds.set_low(Channel::Hue, 90);
    frame_loop.step()?;

    assert_eq!(
        *sink.seen.borrow(),
        vec![(1, Recognition::Digit(7)), (2, Recognition::NoMatch)]
    );
    Ok(())
}

#[test]
fn test_image_sequence_reads_files() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let good = dir.path().join("frame.png");
    digit_frame(&SEVEN, 20, 15).save(&good)?;
    let missing = dir.path().join("missing.png");

    let mut source = ImageSequence::new(vec![missing, good]);
    assert_eq!(source.len(), 2);

    let err = source.next_frame().expect_err("missing file should be unavailable");
    assert!(err.to_string().contains("missing.png"));

    let frame = source.next_frame()?.expect("second file decodes");
    assert_eq!(frame.dimensions(), (90, 130));

    assert!(source.next_frame()?.is_none());
    Ok(())
}

#[test]
fn test_debug_dir_must_be_empty() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("stale.txt"), b"x")?;

    let result = DebugConfig::new(dir.path().to_path_buf());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not empty"));
    Ok(())
}

#[test]
fn test_debug_sink_writes_stages() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("debug");
    let config = DebugConfig::new(out.clone())?.with_preview_size(145, 136);

    let frame = digit_frame(&SEVEN, 20, 15);
    let source = ScriptedSource {
        script: vec![Ok(frame.clone())],
    };
    let mut frame_loop = FrameLoop::new(
        source,
        processor_for(frame.width(), frame.height()),
        SharedThresholds::new(target_ranges()),
    )
    .add_sink(Box::new(DebugDirSink::new(config, false)));
    frame_loop.run()?;

    for stage in DEBUG_STAGES {
        let path = out.join(stage).join("0001.png");
        assert!(path.exists(), "missing {}", path.display());
        let saved = image::open(&path)?;
        assert_eq!((saved.width(), saved.height()), (145, 136));
    }
    Ok(())
}

#[test]
fn test_zero_size_processing_does_not_abort_debug_run() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("debug");
    let config = DebugConfig::new(out.clone())?;

    let frame = digit_frame(&SEVEN, 20, 15);
    let source = ScriptedSource {
        script: vec![Ok(frame.clone()), Ok(frame)],
    };
    let mut frame_loop = FrameLoop::new(
        source,
        FrameProcessor::new(ProcessorConfig::new().with_frame_size(0, 0)),
        SharedThresholds::new(target_ranges()),
    )
    .add_sink(Box::new(DebugDirSink::new(config, false)));

    let summary = frame_loop.run()?;
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.recognized, 0);
    assert!(!out.join(DEBUG_STAGES[0]).join("0001.png").exists());
    Ok(())
}
