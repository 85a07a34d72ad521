#![cfg(feature = "wav")]

use hound::{SampleFormat, WavSpec, WavWriter};
use wavedft::wav::{self, WavError};
use wavedft::{analyze, synthesize, DirectDft, FastDft, SampleFormat as Format};

fn write(path: &std::path::Path, bits: u16, channels: u16, rate: u32, samples: &[i32]) {
    let spec = WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn reads_every_supported_width() {
    let tmp = tempfile::tempdir().unwrap();
    for (bits, format, samples) in [
        (8u16, Format::I8, vec![-128, 0, 127, 5]),
        (16, Format::I16, vec![-32768, 0, 32767, 5]),
        (32, Format::I32, vec![i32::MIN, 0, i32::MAX, 5]),
    ] {
        let path = tmp.path().join(format!("w{bits}.wav"));
        write(&path, bits, 1, 8000, &samples);
        let signal = wav::read_signal(&path).unwrap();
        assert_eq!(signal.format, format);
        assert_eq!(signal.sample_rate, 8000);
        assert_eq!(signal.samples, samples);
    }
}

#[test]
fn stereo_is_averaged() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("stereo.wav");
    write(&path, 16, 2, 8000, &[100, 200, -10, -20]);
    let signal = wav::read_signal(&path).unwrap();
    assert_eq!(signal.samples, vec![150, -15]);
    assert_eq!(signal.channels, 1);
}

#[test]
fn rejects_24_bit() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("w24.wav");
    write(&path, 24, 1, 8000, &[1, 2, 3]);
    assert!(matches!(
        wav::read_signal(&path),
        Err(WavError::UnsupportedFormat { bits: 24, .. })
    ));
}

#[test]
fn write_signal_clamps() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("clamped.wav");
    let clamped = wav::write_signal(&path, &[40000, -40000, 100], 8000).unwrap();
    assert_eq!(clamped, 2);
    let signal = wav::read_signal(&path).unwrap();
    assert_eq!(signal.samples, vec![32767, -32768, 100]);
    assert_eq!(signal.format, Format::I16);
}

#[test]
fn concatenate_requires_matching_parameters() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.wav");
    let b = tmp.path().join("b.wav");
    let c = tmp.path().join("c.wav");
    let out = tmp.path().join("out.wav");
    wav::write_pcm16(&a, &[1, 2, 3], 8000, 1).unwrap();
    wav::write_pcm16(&b, &[4, 5], 8000, 1).unwrap();
    wav::write_pcm16(&c, &[6], 16000, 1).unwrap();

    wav::concatenate(&[&a, &b], &out).unwrap();
    assert_eq!(wav::read_signal(&out).unwrap().samples, vec![1, 2, 3, 4, 5]);
    assert_eq!(wav::describe(&out).unwrap(), "8000 Hz, 1 ch, 16-bit int");

    match wav::concatenate(&[&a, &c], &out) {
        Err(WavError::MismatchedParameters { path }) => assert_eq!(path, c),
        other => panic!("unexpected {other:?}"),
    }
    let none: [&std::path::Path; 0] = [];
    assert!(matches!(
        wav::concatenate(&none, &out),
        Err(WavError::Dft(_))
    ));
}

#[test]
fn file_roundtrip_through_both_transforms() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    let samples: Vec<i16> = (0..256).map(|i| ((i * 97) % 2001 - 1000) as i16).collect();
    wav::write_pcm16(&input, &samples, 22050, 1).unwrap();
    let signal = wav::read_signal(&input).unwrap();

    let direct = DirectDft::new();
    let fast = FastDft::new();
    let a = analyze(&signal, &direct).unwrap();
    let b = analyze(&signal, &fast).unwrap();
    assert_eq!(a.frequency, b.frequency);

    let output = tmp.path().join("out.wav");
    let rec = synthesize(&b.spectrum, &fast, true).unwrap();
    assert_eq!(wav::write_signal(&output, &rec.samples, 22050).unwrap(), 0);
    assert_eq!(wav::read_signal(&output).unwrap().samples, signal.samples);
}
