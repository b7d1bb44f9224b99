mod common;

use ampy::app::logs::{select_board, stream};
use ampy::core::logs::{LineStamper, StreamSummary, INTERRUPT_AND_RESET};
use ampy::core::{Chooser, SerialOpener};
use ampy::{AmpyError, BoardFinder, DiscoveryOptions, LogOptions, LogStreamer};
use chrono::{Local, TimeZone};
use common::{FakeOpener, Script, ESP32_BANNER};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn short_run() -> LogOptions {
    LogOptions {
        timestamps: false,
        reset: false,
        duration: Some(Duration::from_millis(100)),
    }
}

#[test]
fn test_streams_bytes_until_duration() {
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", Script::streaming(b"tick 1\r\ntick 2\r\n"));
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();

    let mut streamer = LogStreamer::new(link, Vec::new(), short_run());
    let summary = streamer.run(&AtomicBool::new(false)).unwrap();

    assert_eq!(summary, StreamSummary { bytes: 16 });
    assert_eq!(streamer.into_sink(), b"tick 1\r\ntick 2\r\n".to_vec());
}

#[test]
fn test_stop_flag_ends_stream_immediately() {
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", Script::streaming(b"never read"));
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();

    let options = LogOptions {
        duration: None,
        ..short_run()
    };
    let mut streamer = LogStreamer::new(link, Vec::new(), options);
    let started = Instant::now();
    let summary = streamer.run(&AtomicBool::new(true)).unwrap();

    assert_eq!(summary.bytes, 0);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_reset_sends_interrupt_and_soft_reset() {
    let mut script = Script::default();
    script
        .replies
        .push((INTERRUPT_AND_RESET.to_vec(), ESP32_BANNER.to_vec()));
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", script);
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();

    let options = LogOptions {
        reset: true,
        ..short_run()
    };
    let mut streamer = LogStreamer::new(link, Vec::new(), options);
    streamer.run(&AtomicBool::new(false)).unwrap();

    assert_eq!(opener.written("/dev/ttyUSB0"), INTERRUPT_AND_RESET.to_vec());
    let output = String::from_utf8(streamer.into_sink()).unwrap();
    assert!(output.contains("MicroPython v1.19.1"));
}

#[test]
fn test_timestamps_prefix_lines() {
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", Script::streaming(b"a\nb\n"));
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();
    let stamper = LineStamper::with_clock(Box::new(|| {
        Local
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .unwrap_or_else(Local::now)
    }));

    let mut streamer = LogStreamer::new(link, Vec::new(), short_run()).with_stamper(stamper);
    let summary = streamer.run(&AtomicBool::new(false)).unwrap();

    assert_eq!(summary.bytes, 4);
    assert_eq!(
        String::from_utf8(streamer.into_sink()).unwrap(),
        "[03:04:05.000] a\n[03:04:05.000] b\n"
    );
}

#[test]
fn test_unplugged_device_reports_disconnect() {
    let mut script = Script::streaming(b"last words\n");
    script.disconnect_when_drained = true;
    let opener = FakeOpener::new().with_usb_port("/dev/ttyACM0", script);
    let link = opener.open("/dev/ttyACM0", 115200, Duration::from_millis(10)).unwrap();

    let options = LogOptions {
        duration: None,
        ..short_run()
    };
    let mut streamer = LogStreamer::new(link, Vec::new(), options);
    let err = streamer.run(&AtomicBool::new(false)).unwrap_err();

    assert!(matches!(err, AmpyError::Disconnected { ref port } if port == "/dev/ttyACM0"));
    assert_eq!(streamer.into_sink(), b"last words\n".to_vec());
}

#[tokio::test]
async fn test_stream_discovered_board() {
    let mut script = Script::board(ESP32_BANNER);
    script.initial = b"hello from main.py\r\n".to_vec();
    let finder = BoardFinder::new(
        FakeOpener::new().with_usb_port("/dev/ttyUSB0", script.clone()),
        DiscoveryOptions {
            probe_timeout: Duration::from_millis(100),
            ..DiscoveryOptions::default()
        },
    );
    let board = finder.detect_board("/dev/ttyUSB0", None).await.unwrap();

    let opener = Arc::new(FakeOpener::new().with_usb_port("/dev/ttyUSB0", script));
    let stop = Arc::new(AtomicBool::new(false));
    let (summary, sink) = stream(Arc::clone(&opener), &board, Vec::new(), short_run(), Arc::clone(&stop))
        .await
        .unwrap();

    assert_eq!(summary.bytes, 20);
    assert_eq!(sink, b"hello from main.py\r\n".to_vec());
    assert!(!stop.load(Ordering::Relaxed));
    assert_eq!(opener.opened(), vec!["/dev/ttyUSB0".to_string()]);
}

#[test]
fn test_unbounded_duration_does_not_overflow() {
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", Script::streaming(b"boot\n"));
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();

    let options = LogOptions {
        duration: Some(Duration::from_secs(u64::MAX)),
        ..short_run()
    };
    let mut streamer = LogStreamer::new(link, Vec::new(), options);
    let summary = streamer.run(&AtomicBool::new(true)).unwrap();

    assert_eq!(summary.bytes, 0);
}

#[tokio::test]
async fn test_stream_after_stop_leaves_board_alone() {
    let mut script = Script::board(ESP32_BANNER);
    script
        .replies
        .push((INTERRUPT_AND_RESET.to_vec(), ESP32_BANNER.to_vec()));
    let finder = BoardFinder::new(
        FakeOpener::new().with_usb_port("/dev/ttyUSB0", script.clone()),
        DiscoveryOptions {
            probe_timeout: Duration::from_millis(100),
            ..DiscoveryOptions::default()
        },
    );
    let board = finder.detect_board("/dev/ttyUSB0", None).await.unwrap();

    let opener = Arc::new(FakeOpener::new().with_usb_port("/dev/ttyUSB0", script));
    let options = LogOptions {
        reset: true,
        ..short_run()
    };
    let stop = Arc::new(AtomicBool::new(true));
    let (summary, sink) = stream(Arc::clone(&opener), &board, Vec::new(), options, stop)
        .await
        .unwrap();

    assert_eq!(summary.bytes, 0);
    assert!(sink.is_empty());
    assert!(opener.opened().is_empty());
    assert!(opener.written("/dev/ttyUSB0").is_empty());
}

#[test]
fn test_reset_skipped_when_stop_already_raised() {
    let opener = FakeOpener::new().with_usb_port("/dev/ttyUSB0", Script::default());
    let link = opener.open("/dev/ttyUSB0", 115200, Duration::from_millis(10)).unwrap();

    let options = LogOptions {
        reset: true,
        ..short_run()
    };
    let mut streamer = LogStreamer::new(link, Vec::new(), options);
    streamer.run(&AtomicBool::new(true)).unwrap();

    assert!(opener.written("/dev/ttyUSB0").is_empty());
}

struct NeverAsked;

impl Chooser for NeverAsked {
    fn choose_one(&self, _prompt: &str, _options: &[String]) -> ampy::Result<usize> {
        panic!("a single board must not prompt");
    }
}

#[tokio::test]
async fn test_select_board_picks_the_only_board() {
    let finder = BoardFinder::new(
        FakeOpener::new()
            .with_usb_port("/dev/ttyACM0", Script::silent())
            .with_usb_port("/dev/ttyUSB0", Script::board(ESP32_BANNER)),
        DiscoveryOptions {
            probe_timeout: Duration::from_millis(100),
            ..DiscoveryOptions::default()
        },
    );

    let board = select_board(&finder, &NeverAsked, None).await.unwrap();
    assert_eq!(board.port, "/dev/ttyUSB0");
    assert_eq!(board.banner.chip, "ESP32");
}
