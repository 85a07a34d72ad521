// Direct and fast transforms agree with each other and with the reference
// values of small hand-checked signals.
use wavedft::spectrum::{amplitude_and_frequency, mirror, truncate_to_half};
use wavedft::{dft, fft, is_power_of_two, Complex64, DftError};

fn assert_close(a: &[Complex64], b: &[Complex64]) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let scale = 1.0f64.max(x.norm()).max(y.norm());
        assert!(
            (*x - *y).norm() <= 1e-6 * scale,
            "bin {i}: {x:?} vs {y:?}"
        );
    }
}

fn pseudo_random(n: usize, seed: u64) -> Vec<i16> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 48) as i16
        })
        .collect()
}

#[test]
fn ramp_of_eight() {
    let signal = [1i32, 2, 3, 4, 5, 6, 7, 8];
    let direct = dft::forward(&signal).unwrap();
    let fast = fft::forward_half(&signal).unwrap();
    assert_eq!(direct.len(), 5);
    assert!((direct[0].re - 36.0).abs() < 1e-9);
    assert!(direct[0].im.abs() < 1e-9);
    assert!((direct[2].re + 4.0).abs() < 1e-9 && (direct[2].im - 4.0).abs() < 1e-9);
    assert!((direct[4].re + 4.0).abs() < 1e-9 && direct[4].im.abs() < 1e-9);
    assert_close(&direct, &fast);

    let (_, frequency) = amplitude_and_frequency(&direct, 8, 8).unwrap();
    assert_eq!(frequency, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn fast_matches_direct_on_powers_of_two() {
    for exp in 0..=10 {
        let n = 1usize << exp;
        let signal = pseudo_random(n, exp as u64 + 1);
        assert_close(
            &dft::forward(&signal).unwrap(),
            &fft::forward_half(&signal).unwrap(),
        );
    }
}

#[test]
fn roundtrips_are_exact() {
    for &n in &[2usize, 4, 16, 256, 1024] {
        let signal = pseudo_random(n, 99);
        let expect: Vec<i32> = signal.iter().map(|&s| s as i32).collect();

        let half = dft::forward(&signal).unwrap();
        assert_eq!(dft::inverse(&half, true).unwrap().samples, expect);

        let half = fft::forward_half(&signal).unwrap();
        assert_eq!(fft::inverse_samples(&half, true).unwrap().samples, expect);
    }
}

#[test]
fn direct_handles_even_non_power_of_two() {
    let signal = pseudo_random(12, 5);
    let expect: Vec<i32> = signal.iter().map(|&s| s as i32).collect();
    let half = dft::forward(&signal).unwrap();
    assert_eq!(half.len(), 7);
    assert_eq!(dft::inverse(&half, true).unwrap().samples, expect);
    assert_eq!(
        fft::forward_half(&signal),
        Err(DftError::NotPowerOfTwo { len: 12 })
    );
}

#[test]
fn full_spectrum_inverse_skips_mirroring() {
    let signal = [3i32, -1, 4, -1, 5, -9, 2, 6];
    let full = fft::forward(&signal).unwrap();
    assert_eq!(full.len(), 8);
    assert_eq!(dft::inverse(&full, false).unwrap().samples, signal.to_vec());
    assert_eq!(
        fft::inverse_samples(&full, false).unwrap().samples,
        signal.to_vec()
    );
}

#[test]
fn mirror_truncate_identity() {
    let half: Vec<Complex64> = (0..9)
        .map(|i| Complex64::new(i as f64, if i == 0 || i == 8 { 0.0 } else { -(i as f64) }))
        .collect();
    let full = mirror(&half).unwrap();
    assert_eq!(full.len(), 16);
    assert_eq!(truncate_to_half(full), half);
}

#[test]
fn power_of_two_predicate() {
    for n in [1i64, 2, 4, 8, 1024, 1 << 40] {
        assert!(is_power_of_two(n));
    }
    for n in [0i64, -4, 6, 12, 1023] {
        assert!(!is_power_of_two(n));
    }
}

#[test]
fn invalid_spectra() {
    let nan = [Complex64::new(f64::NAN, 0.0), Complex64::new(1.0, 0.0)];
    assert_eq!(dft::inverse(&nan, true), Err(DftError::InvalidSpectrumType));
    assert_eq!(
        fft::inverse_samples(&nan, false),
        Err(DftError::InvalidSpectrumType)
    );
    let one = [Complex64::new(1.0, 0.0)];
    assert_eq!(
        dft::inverse(&one, true),
        Err(DftError::Shape { min: 2, found: 1 })
    );
    assert_eq!(
        dft::forward::<i32>(&[]),
        Err(DftError::Shape { min: 1, found: 0 })
    );
}
