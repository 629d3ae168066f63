use libm::exp;

use crate::hydrology::groundwater::{storage_capacity, storage_slope};
use crate::model::ModelData;

/// Closure for the unsaturated zone. Mode 1 slaves the unsaturated column to
/// the water table through the moisture retention curve; mode 2 carries an
/// explicit unsaturated store with a recharge flux to the aquifer.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq)]
pub enum UnsatMode {
    ShallowGroundwater,
    TwoLayer,
}

impl UnsatMode {
    pub fn from_code(code: i32) -> Result<UnsatMode, String> {
        match code {
            1 => Ok(UnsatMode::ShallowGroundwater),
            2 => Ok(UnsatMode::TwoLayer),
            _ => Err(format!("Unsaturated layer mode type {} is wrong", code)),
        }
    }
}

impl Default for UnsatMode {
    fn default() -> UnsatMode {
        UnsatMode::ShallowGroundwater
    }
}

impl ModelData {
    /*
    Shallow-groundwater balance. Infiltration runs at the tabulated capacity
    whenever there is ponded water (or rainfall beyond capacity) and the
    column can still take it; the saturated derivative is then rescaled by
    the effective moisture capacity G and mirrored into the unsaturated
    block through the retention slope GI.
     */
    pub(crate) fn balance_shallow(&mut self, t: f64, y: &mut [f64], dy: &mut [f64]) {
        let ne = self.num_ele();

        for i in 0..ne {
            let depth = self.ele[i].aquifer_depth();
            let deficit;
            let vic;
            if y[i + 2 * ne] >= depth {
                deficit = 0.0;
                vic = 0.0;
            } else {
                deficit = depth - y[i + 2 * ne];
                vic = self.infiltration_capacity(i, t);
            }
            self.ele_vic[i] = vic;

            /* rainfall and infiltration first */
            let net = self.ele_net_prep[i];
            if y[i + ne] <= deficit {
                if y[i] > 0.0 || net > vic {
                    dy[i] = net - vic;
                    dy[i + 2 * ne] = vic;
                } else {
                    dy[i] = 0.0;
                    dy[i + 2 * ne] = net;
                }
            } else {
                /* more unsaturated storage than the deficit should not
                   happen; accept the store and divert rainfall to the
                   surface */
                dy[i] = net;
                dy[i + 2 * ne] = 0.0;
                if deficit > 0.0 {
                    y[i + ne] = depth - y[i + 2 * ne];
                } else {
                    y[i + 2 * ne] = depth;
                    y[i + ne] = 0.0;
                }
            }

            /* then the lateral fluxes */
            for j in 0..3 {
                dy[i] -= self.flux_surf[i][j] / self.ele[i].area;
            }
            for j in 0..3 {
                dy[i + 2 * ne] -= self.flux_sub[i][j] / self.ele[i].area;
            }
        }

        self.river_balance(t, y, dy);

        for i in 0..ne {
            let depth = self.ele[i].aquifer_depth();
            let deficit = depth - y[i + 2 * ne];
            //the retention curve is only defined for a non-negative deficit;
            //a fully saturated column leaves the minimal capacity offset
            let g = storage_capacity(
                self.ele[i].porosity,
                self.ele[i].alpha,
                self.ele[i].beta,
                deficit.max(0.0),
            );
            let gi = storage_slope(self.ele[i].alpha, self.ele[i].beta, deficit.max(0.0));

            dy[i + 2 * ne] /= g;
            dy[i + ne] = gi * dy[i + 2 * ne];

            //a pumping well, if the element carries one
            if self.ele[i].source > 0 {
                dy[i + 2 * ne] -=
                    self.source_rate(i, t) / (self.ele[i].porosity * self.ele[i].area);
            }

            /* one-sided clamping at the storage bounds */
            if y[i + ne] > deficit && dy[i + ne] > 0.0 {
                dy[i + ne] = 0.0;
            }
            if y[i + ne] < 0.0 && dy[i + ne] < 0.0 {
                dy[i + ne] = 0.0;
            }
            if y[i + 2 * ne] > depth && dy[i + 2 * ne] > 0.0 {
                dy[i + 2 * ne] = 0.0;
            }
            if y[i + 2 * ne] < 0.0 && dy[i + 2 * ne] < 0.0 {
                dy[i + 2 * ne] = 0.0;
            }
        }
    }

    /*
    Explicit two-layer balance. The unsaturated store receives infiltration
    and exchanges a recharge flux with the aquifer; both storage derivatives
    are expressed through the effective porosity.
     */
    pub(crate) fn balance_two_layer(&mut self, t: f64, y: &mut [f64], dy: &mut [f64]) {
        let ne = self.num_ele();

        for i in 0..ne {
            let vic = self.infiltration_capacity(i, t);
            self.ele_vic[i] = vic;

            let depth = self.ele[i].aquifer_depth();
            let deficit = depth - y[i + 2 * ne];

            let net = self.ele_net_prep[i];
            if y[i + ne] < deficit {
                if y[i] > 0.0 || net > vic {
                    dy[i] = net - vic;
                    dy[i + ne] = vic;
                } else {
                    dy[i] = 0.0;
                    dy[i + ne] = net;
                }
            } else {
                dy[i] = net;
                dy[i + ne] = 0.0;
            }

            for j in 0..3 {
                dy[i] -= self.flux_surf[i][j] / self.ele[i].area;
            }
            if y[i] <= 0.0 && dy[i] < 0.0 {
                dy[i] = 0.0;
                dy[i + ne] = net;
            }

            /* recharge towards the aquifer */
            let ph = 1.0 - exp(-self.ele[i].ksat * deficit);
            let mut rech = self.ele[i].ksat * (ph - self.ele[i].alpha * y[i + ne])
                / (1e-7 + self.ele[i].alpha * deficit - ph);
            if y[i + ne] < 0.0 && rech < 0.0 {
                rech = 0.0;
            }
            if y[i + 2 * ne] < 0.0 && rech > 0.0 {
                rech = 0.0;
            }
            self.recharge[i] = rech;

            dy[i + ne] += rech;
            dy[i + ne] /= self.ele[i].porosity;
            if y[i + ne] > deficit && dy[i + ne] > 0.0 {
                dy[i + ne] = 0.0;
            }
            if y[i + ne] < 0.0 && dy[i + ne] < 0.0 {
                dy[i + ne] = 0.0;
            }

            dy[i + 2 * ne] = -rech;
            for j in 0..3 {
                dy[i + 2 * ne] -= self.flux_sub[i][j] / self.ele[i].area;
            }
        }

        self.river_balance(t, y, dy);

        for i in 0..ne {
            let depth = self.ele[i].aquifer_depth();

            if self.ele[i].source > 0 {
                dy[i + 2 * ne] -= self.source_rate(i, t) / self.ele[i].area;
            }
            dy[i + 2 * ne] /= self.ele[i].porosity;

            if y[i + 2 * ne] > depth && dy[i + 2 * ne] > 0.0 {
                dy[i + 2 * ne] = 0.0;
            }
            if y[i + 2 * ne] < 0.0 && dy[i + 2 * ne] < 0.0 {
                dy[i + 2 * ne] = 0.0;
            }
        }
    }

    /*
    Channel water balance: rainfall straight onto the reach (the mean of the
    adjacent elements' series), the six assembled fluxes over the plan area,
    and the bank seepage returned to the saturated store of each neighbour.
     */
    fn river_balance(&mut self, t: f64, _y: &mut [f64], dy: &mut [f64]) {
        let ne = self.num_ele();

        for i in 0..self.num_riv() {
            let left = self.riv[i].left_ele;
            let right = self.riv[i].right_ele;

            let riv_prep = if left > 0 && right > 0 {
                (self.prep_rate(left - 1, t) + self.prep_rate(right - 1, t)) / 2.0
            } else if left > 0 {
                self.prep_rate(left - 1, t)
            } else if right > 0 {
                self.prep_rate(right - 1, t)
            } else {
                0.0
            };

            let wid = self.riv_shape[self.riv[i].shape - 1].width;
            let f = self.flux_riv[i];
            dy[i + 3 * ne] = (riv_prep + f[0] - f[1] - f[2] - f[3] - f[4] - f[5])
                / (self.riv[i].length * wid);

            if left > 0 {
                dy[left - 1 + 2 * ne] += f[4] / self.ele[left - 1].area;
            }
            if right > 0 {
                dy[right - 1 + 2 * ne] += f[5] / self.ele[right - 1].area;
            }
        }
    }
}
