//! Generic fixed-step ODE solving, in the shape the teacher's `Rocket`
//! integration imports (`math::ode::{OdeProblem, OdeSolver, RungeKutta4}`)
//! even though that module's body was not present in the retrieval pack.
//! Used here for the translational sub-problem of §4.6 step 5 (position,
//! velocity) with the net acceleration held constant across the four RK4
//! substeps, as the spec allows.
use nalgebra::SVector;

pub trait OdeProblem<const N: usize> {
    fn derivative(&self, t: f64, y: SVector<f64, N>) -> SVector<f64, N>;
}

pub trait OdeSolver {
    fn solve<P: OdeProblem<N>, const N: usize>(
        &self,
        problem: &P,
        t: f64,
        dt: f64,
        y0: SVector<f64, N>,
    ) -> SVector<f64, N>;
}

pub struct RungeKutta4;

impl OdeSolver for RungeKutta4 {
    fn solve<P: OdeProblem<N>, const N: usize>(
        &self,
        problem: &P,
        t: f64,
        dt: f64,
        y0: SVector<f64, N>,
    ) -> SVector<f64, N> {
        let k1 = problem.derivative(t, y0);
        let k2 = problem.derivative(t + dt / 2.0, y0 + k1 * (dt / 2.0));
        let k3 = problem.derivative(t + dt / 2.0, y0 + k2 * (dt / 2.0));
        let k4 = problem.derivative(t + dt, y0 + k3 * dt);

        y0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A 6-state [position; velocity] problem under constant acceleration,
    /// matching the accumulator's translational integration.
    struct ConstantAccel {
        accel: SVector<f64, 3>,
    }

    impl OdeProblem<6> for ConstantAccel {
        fn derivative(&self, _t: f64, y: SVector<f64, 6>) -> SVector<f64, 6> {
            let vel = y.fixed_rows::<3>(3).into_owned();
            let mut d = SVector::<f64, 6>::zeros();
            d.fixed_rows_mut::<3>(0).copy_from(&vel);
            d.fixed_rows_mut::<3>(3).copy_from(&self.accel);
            d
        }
    }

    #[test]
    fn rk4_matches_closed_form_kinematics_under_constant_acceleration() {
        let problem = ConstantAccel {
            accel: SVector::<f64, 3>::new(0.0, -9.80665, 0.0),
        };
        let mut y = SVector::<f64, 6>::zeros();
        y[4] = 10.0; // initial vy

        let dt = 0.01;
        let steps = 100;
        let mut t = 0.0;
        for _ in 0..steps {
            y = RungeKutta4.solve(&problem, t, dt, y);
            t += dt;
        }

        let expected_y = 10.0 * t - 0.5 * 9.80665 * t * t;
        let expected_vy = 10.0 - 9.80665 * t;

        assert_relative_eq!(y[1], expected_y, epsilon = 1e-9);
        assert_relative_eq!(y[4], expected_vy, epsilon = 1e-9);
    }
}
