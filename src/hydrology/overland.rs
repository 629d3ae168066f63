use libm::{fabs, pow, sqrt};

/// Constitutive closure for overland momentum across a shared element edge.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq)]
pub enum SurfaceMode {
    /// Kinematic wave approximation: Manning equation
    Kinematic,
    /// Diffusion wave approximation: Gottardi & Venutelli, 1993
    Diffusion,
}

impl SurfaceMode {
    pub fn from_code(code: i32) -> Result<SurfaceMode, String> {
        match code {
            1 => Ok(SurfaceMode::Kinematic),
            2 => Ok(SurfaceMode::Diffusion),
            _ => Err(format!("Surface overland mode type {} is wrong", code)),
        }
    }

    /// Edge discharge in m^3/min, positive out of the local element. The
    /// factor 60 converts the m/s constitutive relation to model minutes.
    /// Friction wins outright when the total-head gradient cannot beat the
    /// averaged friction slope.
    pub fn edge_flux(self, avg_y: f64, grad: f64, avg_sf: f64, avg_rough: f64, cross_a: f64) -> f64 {
        if fabs(grad) <= avg_sf {
            return 0.0;
        }
        match self {
            SurfaceMode::Kinematic => {
                let alfa = sqrt(fabs(grad) - avg_sf) / avg_rough;
                let beta = pow(avg_y, 2.0 / 3.0);
                if grad > 0.0 {
                    60.0 * alfa * beta * cross_a
                } else {
                    -60.0 * alfa * beta * cross_a
                }
            }
            SurfaceMode::Diffusion => {
                let alfa = pow(avg_y, 2.0 / 3.0) / avg_rough;
                let beta = alfa / sqrt(fabs(grad) - avg_sf);
                60.0 * cross_a * beta * grad
            }
        }
    }
}

impl Default for SurfaceMode {
    fn default() -> SurfaceMode {
        SurfaceMode::Kinematic
    }
}
