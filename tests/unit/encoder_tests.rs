/*!
 * Tests for encoder invocation assembly
 */

use std::path::{Path, PathBuf};

use clipsmith::app_config::{EncodingConfig, Position, Style, Transition};
use clipsmith::composition::encoder::{build_encode_job, EncodePlan};
use clipsmith::composition::normalizer::{plan_geometry, NormalizedClip};
use clipsmith::composition::renderer::render_overlays;
use clipsmith::composition::sequencer::{assign_image_durations, build_timeline, Timeline};
use clipsmith::media_probe::MediaItem;
use clipsmith::subtitle_processor::{SubtitleEntry, SubtitleTrack};

fn image_timeline(paths: &[&str], voiceover_secs: f64, transition: Transition) -> Timeline {
    let mut clips: Vec<NormalizedClip> = paths
        .iter()
        .map(|p| NormalizedClip {
            item: MediaItem::image(p),
            geometry: plan_geometry(1000, 1000, 1920, 1080).unwrap(),
            duration_secs: 0.0,
        })
        .collect();
    assign_image_durations(&mut clips, voiceover_secs);
    build_timeline(clips, transition).unwrap()
}

fn filter_of(args: &[String]) -> String {
    let idx = args
        .iter()
        .position(|a| a == "-filter_complex")
        .expect("filter_complex must be present");
    args[idx + 1].clone()
}

/// Test the full invocation for a plain two-image composite
#[test]
fn test_build_encode_job_withTwoImages_shouldAssembleFullInvocation() {
    let timeline = image_timeline(&["a.png", "b.png"], 10.0, Transition::Cut);
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &[],
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 10.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let job = build_encode_job(&plan).unwrap();

    // Each image is looped for its assigned 5 seconds
    let loops = job.args.iter().filter(|a| *a == "-loop").count();
    assert_eq!(loops, 2);
    assert!(job.args.windows(2).any(|w| w[0] == "-t" && w[1] == "5.000"));

    // Composite trimmed to the voiceover
    assert!((job.duration_secs - 10.0).abs() < 1e-9);
    assert_eq!(job.args.last().unwrap(), &job.staging.to_string_lossy().to_string());
    assert!(job.args.windows(2).any(|w| w[0] == "-t" && w[1] == "10.000"));

    // Fixed output parameters
    assert!(job.args.windows(2).any(|w| w[0] == "-r" && w[1] == "24"));
    assert!(job.args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
    assert!(job.args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));
    assert!(job.args.windows(2).any(|w| w[0] == "-crf" && w[1] == "23"));

    let filter = filter_of(&job.args);
    assert!(filter.contains("[0:v]scale=1920:1920,crop=1920:1080:0:420,setsar=1,fps=24[v0]"));
    assert!(filter.contains("concat=n=2:v=1:a=0[base]"));
    assert!(filter.contains("fade=t=out:st=8.000:d=2.000"));
    assert!(filter.contains("[2:a]afade=t=out:st=8.000:d=2.000[aout]"));

    // Staging file lives in the working directory
    assert!(job.staging.starts_with("/tmp/work"));
}

/// Test subtitle overlays: one drawtext per line, active in the cue window
#[test]
fn test_build_encode_job_withOverlays_shouldGateDrawtextByCueWindow() {
    let timeline = image_timeline(&["a.png"], 10.0, Transition::Cut);
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let mut track = SubtitleTrack::new();
    track
        .entries
        .push(SubtitleEntry::new(1, 1000, 2500, "hello".to_string()));
    let overlays = render_overlays(&track, 1920, 1080, Position::BottomCenter, &style);

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &overlays,
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 10.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let filter = filter_of(&build_encode_job(&plan).unwrap().args);
    assert!(filter.contains("drawtext=text='hello'"));
    assert!(filter.contains("enable='between(t,1.000,2.500)'"));
    assert!(filter.contains("fontcolor=white"));
    assert!(filter.contains("borderw=3:bordercolor=black"));
}

/// Test the plate behind boxed-style subtitles
#[test]
fn test_build_encode_job_withBoxedStyle_shouldDrawPlate() {
    let timeline = image_timeline(&["a.png"], 10.0, Transition::Cut);
    let style = Style::Boxed.profile();
    let encoding = EncodingConfig::default();

    let mut track = SubtitleTrack::new();
    track
        .entries
        .push(SubtitleEntry::new(1, 0, 1000, "plated".to_string()));
    let overlays = render_overlays(&track, 1920, 1080, Position::BottomCenter, &style);

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &overlays,
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 10.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let filter = filter_of(&build_encode_job(&plan).unwrap().args);
    assert!(filter.contains("drawbox="));
    assert!(filter.contains("color=black@0.6"));
}

/// Test background music wiring: extra input, duck, fade, sum
#[test]
fn test_build_encode_job_withMusic_shouldDuckAndMix() {
    let timeline = image_timeline(&["a.png"], 30.0, Transition::Cut);
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &[],
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: Some(Path::new("music.mp3")),
        voiceover_secs: 30.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let job = build_encode_job(&plan).unwrap();
    let inputs = job.args.iter().filter(|a| *a == "-i").count();
    assert_eq!(inputs, 3); // image + voiceover + music

    let filter = filter_of(&job.args);
    assert!(filter.contains("[1:a]afade=t=out:st=28.000:d=2.000[voa]"));
    assert!(filter.contains("[2:a]atrim=0:30.000"));
    assert!(filter.contains("volume=0.2"));
    assert!(filter.contains("[voa][bgm]amix=inputs=2:duration=first:dropout_transition=0:normalize=0[aout]"));
}

/// Test chained crossfade offsets over three equal clips
#[test]
fn test_build_encode_job_withCrossfade_shouldChainOffsets() {
    let clips = vec![
        NormalizedClip {
            item: MediaItem::video("a.mp4"),
            geometry: plan_geometry(1920, 1080, 1920, 1080).unwrap(),
            duration_secs: 4.0,
        },
        NormalizedClip {
            item: MediaItem::video("b.mp4"),
            geometry: plan_geometry(1920, 1080, 1920, 1080).unwrap(),
            duration_secs: 4.0,
        },
        NormalizedClip {
            item: MediaItem::video("c.mp4"),
            geometry: plan_geometry(1920, 1080, 1920, 1080).unwrap(),
            duration_secs: 4.0,
        },
    ];
    let timeline = build_timeline(clips, Transition::Crossfade).unwrap();
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &[],
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 11.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let filter = filter_of(&build_encode_job(&plan).unwrap().args);
    assert!(filter.contains("[v0][v1]xfade=transition=fade:duration=0.500:offset=3.500[x1]"));
    assert!(filter.contains("[x1][v2]xfade=transition=fade:duration=0.500:offset=7.000[base]"));
}

/// Test that apostrophes in cue text survive drawtext quoting
#[test]
fn test_build_encode_job_withApostrophe_shouldEscapeDrawtext() {
    let timeline = image_timeline(&["a.png"], 10.0, Transition::Cut);
    let style = Style::Minimal.profile();
    let encoding = EncodingConfig::default();

    let mut track = SubtitleTrack::new();
    track
        .entries
        .push(SubtitleEntry::new(1, 0, 1000, "it's".to_string()));
    let overlays = render_overlays(&track, 1920, 1080, Position::BottomCenter, &style);

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &overlays,
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 10.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let filter = filter_of(&build_encode_job(&plan).unwrap().args);
    assert!(filter.contains(r"drawtext=text='it'\''s'"));
}

/// Test that a timeline shorter than the voiceover bounds the composite
#[test]
fn test_build_encode_job_withShortTimeline_shouldNotExtendVideo() {
    let clips = vec![NormalizedClip {
        item: MediaItem::video("short.mp4"),
        geometry: plan_geometry(1920, 1080, 1920, 1080).unwrap(),
        duration_secs: 6.0,
    }];
    let timeline = build_timeline(clips, Transition::Cut).unwrap();
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &[],
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 30.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let job = build_encode_job(&plan).unwrap();
    assert!((job.duration_secs - 6.0).abs() < 1e-9);
}

/// Test that video inputs are not looped
#[test]
fn test_build_encode_job_withVideoInput_shouldNotLoop() {
    let clips = vec![NormalizedClip {
        item: MediaItem::video("clip.mp4"),
        geometry: plan_geometry(1280, 720, 1920, 1080).unwrap(),
        duration_secs: 5.0,
    }];
    let timeline = build_timeline(clips, Transition::Cut).unwrap();
    let style = Style::Default.profile();
    let encoding = EncodingConfig::default();

    let plan = EncodePlan {
        timeline: &timeline,
        overlays: &[],
        style: &style,
        voiceover: Path::new("vo.mp3"),
        background_music: None,
        voiceover_secs: 10.0,
        target_w: 1920,
        target_h: 1080,
        encoding: &encoding,
        working_dir: Path::new("/tmp/work"),
        output: Path::new("/tmp/out.mp4"),
    };

    let job = build_encode_job(&plan).unwrap();
    assert!(!job.args.iter().any(|a| a == "-loop"));
    assert_eq!(job.output, PathBuf::from("/tmp/out.mp4"));
}
