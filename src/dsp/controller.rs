//! PID controller and the Clarke/Park transforms used in motor control.

use super::simd::{qadd, qsub};
use super::{Sample, Q15, Q31};

/// Formats with a PID controller implementation.
pub trait PidSample: Sample {
    /// Derives `[A0, A1, A2]` from the gains.
    fn coefficients(kp: Self, ki: Self, kd: Self) -> [Self; 3];

    /// Computes `y[n]` from the coefficients, `[x[n-1], x[n-2], y[n-1]]`
    /// and `x[n]`.
    fn step(a: &[Self; 3], state: &[Self; 3], x: Self) -> Self;
}

impl PidSample for f32 {
    fn coefficients(kp: f32, ki: f32, kd: f32) -> [f32; 3] {
        [kp + ki + kd, -(kp + 2.0 * kd), kd]
    }

    #[inline]
    fn step(a: &[f32; 3], state: &[f32; 3], x: f32) -> f32 {
        a[0] * x + a[1] * state[0] + a[2] * state[1] + state[2]
    }
}

impl PidSample for Q15 {
    fn coefficients(kp: Q15, ki: Q15, kd: Q15) -> [Q15; 3] {
        [
            kp.saturating_add(ki).saturating_add(kd),
            kd.saturating_add(kd).saturating_add(kp).saturating_neg(),
            kd,
        ]
    }

    #[inline]
    fn step(a: &[Q15; 3], state: &[Q15; 3], x: Q15) -> Q15 {
        let mut acc = a[0] as i64 * x as i64;
        acc += a[1] as i64 * state[0] as i64;
        acc += a[2] as i64 * state[1] as i64;
        acc += (state[2] as i64) << 15;
        (acc >> 15).clamp(Q15::MIN as i64, Q15::MAX as i64) as i16
    }
}

impl PidSample for Q31 {
    fn coefficients(kp: Q31, ki: Q31, kd: Q31) -> [Q31; 3] {
        [
            qadd(qadd(kp, ki), kd),
            qadd(qadd(kd, kd), kp).saturating_neg(),
            kd,
        ]
    }

    #[inline]
    fn step(a: &[Q31; 3], state: &[Q31; 3], x: Q31) -> Q31 {
        let mut acc = a[0] as i64 * x as i64;
        acc = acc.wrapping_add(a[1] as i64 * state[0] as i64);
        acc = acc.wrapping_add(a[2] as i64 * state[1] as i64);
        // The 2.62 sum is truncated to 1.31, the previous output is added
        // without saturation.
        ((acc >> 31) as i32).wrapping_add(state[2])
    }
}

/// Incremental PID controller.
///
/// `y[n] = y[n-1] + A0 x[n] + A1 x[n-1] + A2 x[n-2]` with
/// `A0 = Kp + Ki + Kd`, `A1 = -Kp - 2 Kd` and `A2 = Kd`.
#[derive(Debug, Default, Clone)]
pub struct Pid<T> {
    kp: T,
    ki: T,
    kd: T,
    a: [T; 3],
    state: [T; 3],
}

impl<T: PidSample> Pid<T> {
    /// Creates a controller with cleared state.
    pub fn new(kp: T, ki: T, kd: T) -> Self {
        let a = T::coefficients(kp, ki, kd);
        log::trace!("pid gains {:?} {:?} {:?} -> {:?}", kp, ki, kd, a);
        Self {
            kp,
            ki,
            kd,
            a,
            state: [T::ZERO; 3],
        }
    }

    /// Changes the gains, optionally clearing the state.
    pub fn set_gains(&mut self, kp: T, ki: T, kd: T, reset_state: bool) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        self.a = T::coefficients(kp, ki, kd);
        if reset_state {
            self.reset();
        }
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.state = [T::ZERO; 3];
    }

    /// Gains as `(kp, ki, kd)`.
    pub fn gains(&self) -> (T, T, T) {
        (self.kp, self.ki, self.kd)
    }

    /// Derived coefficients `[A0, A1, A2]`.
    pub fn coefficients(&self) -> [T; 3] {
        self.a
    }

    /// Processes one input sample.
    #[inline]
    pub fn process(&mut self, x: T) -> T {
        let y = T::step(&self.a, &self.state, x);
        self.state = [x, self.state[0], y];
        y
    }
}

/// Formats with motor control transforms.
pub trait MotorControl: Sample {
    /// Clarke transform, `(a, b)` to `(alpha, beta)`.
    fn clarke(a: Self, b: Self) -> (Self, Self);

    /// Inverse Clarke transform, `(alpha, beta)` to `(a, b)`.
    fn inv_clarke(alpha: Self, beta: Self) -> (Self, Self);

    /// Park transform, `(alpha, beta)` to `(d, q)` for the rotor angle given
    /// by its sine and cosine.
    fn park(alpha: Self, beta: Self, sin: Self, cos: Self) -> (Self, Self);

    /// Inverse Park transform, `(d, q)` to `(alpha, beta)`.
    fn inv_park(d: Self, q: Self, sin: Self, cos: Self) -> (Self, Self);
}

impl MotorControl for f32 {
    fn clarke(a: f32, b: f32) -> (f32, f32) {
        (a, 0.577_350_26 * a + 1.154_700_5 * b)
    }

    fn inv_clarke(alpha: f32, beta: f32) -> (f32, f32) {
        (alpha, -0.5 * alpha + 0.866_025_4 * beta)
    }

    fn park(alpha: f32, beta: f32, sin: f32, cos: f32) -> (f32, f32) {
        (alpha * cos + beta * sin, -alpha * sin + beta * cos)
    }

    fn inv_park(d: f32, q: f32, sin: f32, cos: f32) -> (f32, f32) {
        (d * cos - q * sin, d * sin + q * cos)
    }
}

#[inline]
fn mul_shift(x: Q31, y: Q31, shift: u32) -> Q31 {
    ((x as i64 * y as i64) >> shift) as i32
}

impl MotorControl for Q31 {
    fn clarke(a: Q31, b: Q31) -> (Q31, Q31) {
        // 1/sqrt(3) and 2/sqrt(3) in 2.30
        let product1 = mul_shift(a, 0x24F3_4E8B, 30);
        let product2 = mul_shift(b, 0x49E6_9D16, 30);
        (a, qadd(product1, product2))
    }

    fn inv_clarke(alpha: Q31, beta: Q31) -> (Q31, Q31) {
        // 0.5 and sqrt(3)/2 in 1.31
        let product1 = mul_shift(alpha, 0x4000_0000, 31);
        let product2 = mul_shift(beta, 0x6ED9_EBA1, 31);
        (alpha, qsub(product2, product1))
    }

    fn park(alpha: Q31, beta: Q31, sin: Q31, cos: Q31) -> (Q31, Q31) {
        let product1 = mul_shift(alpha, cos, 31);
        let product2 = mul_shift(beta, sin, 31);
        let product3 = mul_shift(alpha, sin, 31);
        let product4 = mul_shift(beta, cos, 31);
        (qadd(product1, product2), qsub(product4, product3))
    }

    fn inv_park(d: Q31, q: Q31, sin: Q31, cos: Q31) -> (Q31, Q31) {
        let product1 = mul_shift(d, cos, 31);
        let product2 = mul_shift(q, sin, 31);
        let product3 = mul_shift(d, sin, 31);
        let product4 = mul_shift(q, cos, 31);
        (qsub(product1, product2), qadd(product4, product3))
    }
}

/// Clarke transform of the phase currents `a` and `b`.
#[inline]
pub fn clarke<T: MotorControl>(a: T, b: T) -> (T, T) {
    T::clarke(a, b)
}

/// Inverse Clarke transform.
#[inline]
pub fn inv_clarke<T: MotorControl>(alpha: T, beta: T) -> (T, T) {
    T::inv_clarke(alpha, beta)
}

/// Park transform.
#[inline]
pub fn park<T: MotorControl>(alpha: T, beta: T, sin: T, cos: T) -> (T, T) {
    T::park(alpha, beta, sin, cos)
}

/// Inverse Park transform.
#[inline]
pub fn inv_park<T: MotorControl>(d: T, q: T, sin: T, cos: T) -> (T, T) {
    T::inv_park(d, q, sin, cos)
}
