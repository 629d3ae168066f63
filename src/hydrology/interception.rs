use crate::model::ModelData;

// Interception is treated as weakly coupled to the routing and groundwater
// processes: it is deducted from the gross rainfall before each solver
// substep, and evapotranspiration settles the stores afterwards.

impl ModelData {
    /*
    Pre-step interception update over one substep of length `stepsize`
    minutes. For every element: sample the gross rainfall rate and the
    LAI-derived canopy capacity, fill the canopy store (never above
    capacity, never draining it), and leave the net precipitation rate for
    the right-hand side. Touches nothing outside the canopy store and the
    per-element rate arrays, and is independent element to element.
     */
    pub fn update_interception(&mut self, t: f64, stepsize: f64) {
        for i in 0..self.num_ele() {
            let p = self.prep_rate(i, t);
            let is_max = self.si_factor[self.ele[i].lai - 1] * self.lai_value(i, t);

            let to_canopy;
            if self.ele_is[i] >= is_max {
                to_canopy = 0.0;
            } else if self.ele_is[i] + p * stepsize >= is_max {
                to_canopy = (is_max - self.ele_is[i]) / stepsize;
                self.ele_is[i] = is_max;
            } else {
                to_canopy = p;
                self.ele_is[i] += p * stepsize;
            }

            self.ele_prep[i] = p;
            self.ele_is_max[i] = is_max;
            self.ele_2is[i] = to_canopy;
            self.ele_net_prep[i] = p - to_canopy;
            self.ele_tf[i] = self.ele_net_prep[i];
        }
    }
}
