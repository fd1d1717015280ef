use num_complex::Complex;
use spectral_algebra::ComplexVec;
use spectral_fft::{Fft, FourierDual, SignalOp};

fn assert_close(a: Complex<f64>, b: Complex<f64>, ctx: &str) {
    assert!(
        (a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9,
        "{}: {:?} != {:?}",
        ctx,
        a,
        b
    );
}

fn assert_vecs_close(a: &ComplexVec<f64>, b: &ComplexVec<f64>) {
    assert_eq!(a.len(), b.len());
    for i in 0..a.len() {
        assert_close(a.get(i), b.get(i), &format!("index {}", i));
    }
}

#[test]
fn test_time_scale() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::Scale(Complex::new(
            5.0, 0.0,
        ))]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(2.0 * i as f64, -3.0 * i as f64));
    fourier.v(&mut x.view_mut());

    for i in 0..size {
        assert_close(
            x.get(i),
            Complex::new(10.0 * i as f64, -15.0 * i as f64),
            "scaled spectrum",
        );
    }
}

#[test]
fn test_time_add() {
    let size = 32;
    let mut fourier = FourierDual::<f64>::new(size);

    // A unit impulse at zero transforms into an all-ones spectrum.
    let mut addend = ComplexVec::<f64>::new(size);
    addend.set(0, Complex::new(1.0, 0.0));

    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::AddSignal(addend)]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(i as f64, i as f64));
    fourier.v(&mut x.view_mut());

    for i in 0..size {
        assert_close(
            x.get(i),
            Complex::new(1.0 + i as f64, i as f64),
            "impulse-shifted spectrum",
        );
    }
}

#[test]
fn test_time_shift_and_conjugate() {
    let size = 32;
    let mut fourier = FourierDual::<f64>::new(size);
    let comp = SignalOp::composite(vec![SignalOp::Shift(22), SignalOp::Conjugate]);

    let mut input = ComplexVec::from_fn(size, |i| Complex::new(i as f64, i as f64));
    let mut shifted = input.clone();

    fourier.set_time_func(comp).unwrap();

    let fft = Fft::<f64>::new(size, true).unwrap();

    // Apply the operators in time, then transform.
    fourier.u(&mut shifted.view_mut());
    fft.fft(&mut shifted.view_mut());

    // Transform first, then apply the derived frequency composition.
    fft.fft(&mut input.view_mut());
    fourier.v(&mut input.view_mut());

    assert_vecs_close(&input, &shifted);
}

#[test]
fn test_time_shift_is_modulation() {
    let size = 32;
    let mut fourier = FourierDual::<f64>::new(size);
    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::Shift(22)]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(i as f64, i as f64));
    let mut y = x.clone();

    let fft = Fft::<f64>::new(size, true).unwrap();

    fourier.u(&mut x.view_mut());
    fft.fft(&mut x.view_mut());

    fft.fft(&mut y.view_mut());
    fourier.v(&mut y.view_mut());

    assert_vecs_close(&x, &y);
}

#[test]
fn test_time_mult() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    let multiplicand = ComplexVec::from_fn(size, |_| Complex::new(2.0, 0.0));
    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::MultSignal(
            multiplicand,
        )]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(2.0 * i as f64, -3.0 * i as f64));
    let mut y = x.clone();

    let fft = Fft::<f64>::new(size, true).unwrap();

    fourier.u(&mut x.view_mut());
    fft.fft(&mut x.view_mut());

    fft.fft(&mut y.view_mut());
    fourier.v(&mut y.view_mut());

    assert_vecs_close(&x, &y);
}

#[test]
fn test_freq_scale() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    fourier
        .set_freq_func(SignalOp::composite(vec![SignalOp::Scale(Complex::new(
            5.0, 0.0,
        ))]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(2.0 * i as f64, -3.0 * i as f64));
    fourier.u(&mut x.view_mut());

    for i in 0..size {
        assert_close(
            x.get(i),
            Complex::new(10.0 * i as f64, -15.0 * i as f64),
            "scaled signal",
        );
    }
}

#[test]
fn test_freq_shift() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    fourier
        .set_freq_func(SignalOp::composite(vec![SignalOp::Shift(7)]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(2.0 * i as f64, -3.0 * i as f64));
    let mut y = x.clone();

    let fft = Fft::<f64>::new(size, true).unwrap();

    fourier.u(&mut x.view_mut());
    fft.fft(&mut x.view_mut());

    fft.fft(&mut y.view_mut());
    fourier.v(&mut y.view_mut());

    assert_vecs_close(&x, &y);
}

#[test]
fn test_freq_mult() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    let multiplicand = ComplexVec::from_fn(size, |_| Complex::new(2.0, 0.0));
    fourier
        .set_freq_func(SignalOp::composite(vec![SignalOp::MultSignal(
            multiplicand,
        )]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(2.0 * i as f64, -3.0 * i as f64));
    let mut y = x.clone();

    let fft = Fft::<f64>::new(size, true).unwrap();

    fourier.u(&mut x.view_mut());
    fft.fft(&mut x.view_mut());

    fft.fft(&mut y.view_mut());
    fourier.v(&mut y.view_mut());

    assert_vecs_close(&x, &y);
}

#[test]
fn test_set_funcs_reset_chains() {
    let size = 16;
    let mut fourier = FourierDual::<f64>::new(size);
    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::Scale(Complex::new(
            3.0, 0.0,
        ))]))
        .unwrap();
    // Re-setting replaces, not appends.
    fourier
        .set_time_func(SignalOp::composite(vec![SignalOp::Scale(Complex::new(
            5.0, 0.0,
        ))]))
        .unwrap();

    let mut x = ComplexVec::from_fn(size, |i| Complex::new(i as f64, 0.0));
    fourier.u(&mut x.view_mut());
    for i in 0..size {
        assert_close(x.get(i), Complex::new(5.0 * i as f64, 0.0), "reset chain");
    }
}
