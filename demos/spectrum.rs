//! Spectrum of a two tone signal before and after a FIR lowpass.

use simple_logger::SimpleLogger;

use cortex_cmsis::dsp::complex::cmplx_mag;
use cortex_cmsis::dsp::filtering::Fir;
use cortex_cmsis::dsp::stats;
use cortex_cmsis::dsp::transform::Rfft;
use cortex_cmsis::Result;

const FFT_LEN: usize = 512;
const BLOCK_SIZE: usize = 32;
const LOW_BIN: usize = 20;
const HIGH_BIN: usize = 200;

// Windowed sinc lowpass at a quarter of the sample rate.
const LOWPASS: [f32; 15] = [
    -0.0021, 0.0, 0.0163, 0.0, -0.0679, 0.0, 0.3035, 0.5004, 0.3035, 0.0, -0.0679, 0.0, 0.0163,
    0.0, -0.0021,
];

fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    let signal: Vec<f32> = (0..FFT_LEN)
        .map(|n| {
            let phase = 2.0 * std::f32::consts::PI * n as f32 / FFT_LEN as f32;
            0.5 * (LOW_BIN as f32 * phase).sin() + 0.25 * (HIGH_BIN as f32 * phase).sin()
        })
        .collect();

    let mut rfft = Rfft::new(FFT_LEN, false)?;
    report("input", &mut rfft, &signal)?;

    let mut fir = Fir::new(&LOWPASS, BLOCK_SIZE)?;
    let mut filtered = vec![0.0; FFT_LEN];
    fir.process(&signal, &mut filtered);
    report("lowpass", &mut rfft, &filtered)?;

    Ok(())
}

fn report(name: &str, rfft: &mut Rfft<f32>, signal: &[f32]) -> Result<()> {
    let mut spectrum = vec![0.0; 2 * FFT_LEN];
    rfft.process(signal, &mut spectrum);

    let mut magnitudes = vec![0.0; FFT_LEN];
    cmplx_mag(&spectrum, &mut magnitudes);
    let (peak, bin) = stats::max(&magnitudes[..FFT_LEN / 2])?;

    log::info!("{}: peak {:.1} at bin {}", name, peak, bin);
    log::info!(
        "{}: bin {} {:.2}, bin {} {:.2}",
        name,
        LOW_BIN,
        magnitudes[LOW_BIN],
        HIGH_BIN,
        magnitudes[HIGH_BIN]
    );

    Ok(())
}
