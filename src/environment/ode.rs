//! Fixed-step ODE integration
//!
//! States are small `Copy` value types; every intermediate point lives on the
//! stack for the duration of one call.

use std::ops::{Add, Mul};

/// A state vector that can be scaled and summed
pub trait OdeState: Copy + Add<Output = Self> + Mul<f64, Output = Self> {}

impl<T> OdeState for T where T: Copy + Add<Output = T> + Mul<f64, Output = T> {}

/// One explicit Euler step: `state + derivative * h`
pub fn euler<S: OdeState>(state: S, derivative: S, h: f64) -> S {
    state + derivative * h
}

/// Advance `state` by `dt` with the classical 4th-order Runge-Kutta scheme.
///
/// `derivative` evaluates the right-hand side of `ds/dt = f(s)`.
pub fn runge_kutta4<S, F>(state: S, dt: f64, mut derivative: F) -> S
where
    S: OdeState,
    F: FnMut(S) -> S,
{
    let k1 = derivative(state);
    let k2 = derivative(euler(state, k1, dt / 2.0));
    let k3 = derivative(euler(state, k2, dt / 2.0));
    let k4 = derivative(euler(state, k3, dt));

    state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
