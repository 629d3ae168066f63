use libm::{fabs, pow, sqrt};

/// Constitutive closure for channel routing between reaches.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq)]
pub enum ChannelMode {
    Kinematic,
    Diffusion,
}

impl ChannelMode {
    pub fn from_code(code: i32) -> Result<ChannelMode, String> {
        match code {
            1 => Ok(ChannelMode::Kinematic),
            2 => Ok(ChannelMode::Diffusion),
            _ => Err(format!("River routing mode type {} is wrong", code)),
        }
    }

    /// Reach-to-reach discharge in m^3/min, positive downstream. Rectangular
    /// section: wetted perimeter W + 2Y under the kinematic closure.
    pub fn reach_flux(
        self,
        avg_y: f64,
        avg_wid: f64,
        grad: f64,
        avg_sf: f64,
        avg_rough: f64,
        cross_a: f64,
    ) -> f64 {
        if fabs(grad) <= avg_sf {
            return 0.0;
        }
        match self {
            ChannelMode::Kinematic => {
                let alfa =
                    sqrt(fabs(grad) - avg_sf) / (avg_rough * pow(avg_wid + 2.0 * avg_y, 2.0 / 3.0));
                let beta = 5.0 / 3.0;
                if grad > 0.0 {
                    60.0 * alfa * pow(cross_a, beta)
                } else {
                    -60.0 * alfa * pow(cross_a, beta)
                }
            }
            ChannelMode::Diffusion => {
                let alfa = pow(avg_y, 2.0 / 3.0) / avg_rough;
                let beta = alfa / sqrt(fabs(grad) - avg_sf);
                60.0 * cross_a * beta * grad
            }
        }
    }
}

/// Zero-depth-gradient outlet: Manning discharge on the local bed slope.
pub fn zero_depth_gradient_flux(wid: f64, y: f64, bed_grad: f64, rough: f64) -> f64 {
    let g = if bed_grad > 0.0 { bed_grad } else { 0.0 };
    60.0 * wid * pow(y, 5.0 / 3.0) * sqrt(g) / rough
}

/// Critical-depth outlet.
pub fn critical_depth_flux(wid: f64, y: f64) -> f64 {
    let cross_a = wid * y;
    60.0 * cross_a * sqrt(9.81 * y)
}

/*
Broad-crested weir exchange across one river bank. Positive means
river -> element. Four cases depending on which water surface stands above
the controlling bank elevation; submerged heads are clamped at the bank so a
dry weir passes nothing.
 */
pub fn weir_exchange(total_y_riv: f64, ele_yh: f64, bank: f64, cwr: f64, length: f64) -> f64 {
    let coeff = cwr * 60.0 * 2.0 * sqrt(2.0 * 9.81) * length / 3.0;
    if total_y_riv > ele_yh {
        if ele_yh > bank {
            coeff * sqrt(total_y_riv - ele_yh) * (total_y_riv - bank)
        } else {
            let head = if total_y_riv > bank { total_y_riv - bank } else { 0.0 };
            coeff * sqrt(head) * head
        }
    } else {
        if total_y_riv > bank {
            -coeff * sqrt(ele_yh - total_y_riv) * (ele_yh - bank)
        } else {
            let head = if ele_yh > bank { ele_yh - bank } else { 0.0 };
            -coeff * sqrt(head) * head
        }
    }
}

impl Default for ChannelMode {
    fn default() -> ChannelMode {
        ChannelMode::Kinematic
    }
}
