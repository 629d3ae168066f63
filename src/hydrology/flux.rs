use crate::hydrology::channel::{critical_depth_flux, weir_exchange, zero_depth_gradient_flux};
use crate::hydrology::groundwater::{bank_seepage, darcy_edge_flux, macropore_factor};
use crate::mesh::{boundary_edge_distance, point_distance};
use crate::model::ModelData;

// Flux assembly for one right-hand-side evaluation. Every interior edge
// contributes the same magnitude with opposite sign to its two elements
// (each side recomputes the identical symmetric expression), and the river
// bank exchange afterwards overwrites the matching element edge so the
// interface stays balanced.

impl ModelData {
    pub fn assemble_fluxes(&mut self, t: f64, y: &mut [f64]) {
        let ne = self.num_ele();

        for i in 0..ne {
            //Unconfined condition: a temporary solver overshoot above the
            //aquifer column bleeds back onto the surface
            let depth = self.ele[i].aquifer_depth();
            if y[i + 2 * ne] >= depth + 0.1 {
                y[i] += self.ele[i].porosity * (y[i + 2 * ne] - (depth + 0.1));
                y[i + ne] = 0.0;
                y[i + 2 * ne] = depth + 0.1;
            }

            for j in 0..3 {
                let nabr = self.ele[i].nabr[j];
                if nabr > 0 {
                    let nb = (nabr - 1) as usize;

                    /* groundwater interaction, Darcy's law on the total head */
                    let avg_y_sub = (y[i + 2 * ne] + y[nb + 2 * ne]) / 2.0;
                    let dif_y_sub = (y[i + 2 * ne] + self.ele[i].zmin)
                        - (y[nb + 2 * ne] + self.ele[nb].zmin);
                    let distance =
                        point_distance(self.ele[i].x, self.ele[i].y, self.ele[nb].x, self.ele[nb].y);
                    let avg_ksat = (self.ele[i].ksat + self.ele[nb].ksat) / 2.0;
                    let grad_y_sub = dif_y_sub / distance;

                    /* macropore effect: both soils must respond */
                    let soil_i = &self.soil[self.ele[i].soil - 1];
                    let soil_nb = &self.soil[self.ele[nb].soil - 1];
                    let mp_factor = if soil_i.macropore == 1 && soil_nb.macropore == 1 {
                        (macropore_factor(1, y[i + 2 * ne], soil_i.base, soil_i.gama)
                            + macropore_factor(1, y[nb + 2 * ne], soil_nb.base, soil_nb.gama))
                            / 2.0
                    } else {
                        1.0
                    };

                    let mut f_sub = darcy_edge_flux(
                        mp_factor,
                        avg_ksat,
                        grad_y_sub,
                        avg_y_sub,
                        self.ele[i].edge[j],
                    );

                    /* no water, no flux: the donor side must hold something */
                    if y[i + 2 * ne] <= 0.0 && f_sub > 0.0 {
                        f_sub = 0.0;
                    }
                    if y[nb + 2 * ne] <= 0.0 && f_sub < 0.0 {
                        f_sub = 0.0;
                    }
                    self.flux_sub[i][j] = f_sub;

                    /* surface interaction */
                    let avg_y_surf = (y[i] + y[nb]) / 2.0;
                    let dif_y_surf =
                        (y[i] + self.ele[i].zmax) - (y[nb] + self.ele[nb].zmax);
                    let grad_y_surf = dif_y_surf / distance;
                    let avg_sf = (self.ele[i].sf + self.ele[nb].sf) / 2.0;
                    let avg_rough = 0.5 * (self.ele[i].rough + self.ele[nb].rough);
                    let cross_a = avg_y_surf * self.ele[i].edge[j];

                    let mut f_surf = self
                        .surf_mode
                        .edge_flux(avg_y_surf, grad_y_surf, avg_sf, avg_rough, cross_a);
                    if y[i] <= 0.0 && f_surf > 0.0 {
                        f_surf = 0.0;
                    }
                    if y[nb] <= 0.0 && f_surf < 0.0 {
                        f_surf = 0.0;
                    }
                    self.flux_surf[i][j] = f_surf;
                } else {
                    /* boundary edge; no flow (natural) is the default */
                    let bc = self.ele[i].bc;
                    self.flux_surf[i][j] = 0.0;
                    if bc == 0 {
                        self.flux_sub[i][j] = 0.0;
                    } else {
                        let mut f_sub;
                        if bc > 0 {
                            /* Dirichlet: prescribed total head from the series */
                            let head = self.ele_bc_value((bc - 1) as usize, t);
                            let avg_y_sub = (y[i + 2 * ne] + (head - self.ele[i].zmin)) / 2.0;
                            let dif_y_sub = (y[i + 2 * ne] + self.ele[i].zmin) - head;
                            let distance = boundary_edge_distance(&self.ele[i], j);
                            let grad_y_sub = dif_y_sub / distance;
                            f_sub = self.ele[i].ksat * grad_y_sub * avg_y_sub * self.ele[i].edge[j];
                        } else {
                            /* Neumann: the series is the flux itself */
                            f_sub = self.ele_bc_value((-bc - 1) as usize + self.num_1bc, t);
                        }
                        if y[i + 2 * ne] <= 0.0 && f_sub > 0.0 {
                            f_sub = 0.0;
                        }
                        self.flux_sub[i][j] = f_sub;
                    }
                }
            }
        }

        self.assemble_river_fluxes(t, y);
    }

    /*
    Six fluxes per channel segment: accumulated inflow, downstream outflow,
    weir exchange across each bank, and saturated seepage under each bank.
    The segment ordering in the input runs headwater to outlet, so each
    downstream inflow sum is complete before that segment is visited.
     */
    fn assemble_river_fluxes(&mut self, t: f64, y: &mut [f64]) {
        let ne = self.num_ele();
        let nr = self.num_riv();

        for f in self.flux_riv.iter_mut() {
            *f = [0.0; 6];
        }

        for i in 0..nr {
            let stage = y[i + 3 * ne];
            let total_y_riv = stage + self.riv[i].zmin;
            let wid = self.riv_shape[self.riv[i].shape - 1].width;
            let down = self.riv[i].down;

            if down > 0 {
                let dn = (down - 1) as usize;
                let total_down = y[dn + 3 * ne] + self.riv[dn].zmin;
                let wid_down = self.riv_shape[self.riv[dn].shape - 1].width;
                let avg_wid = (wid + wid_down) / 2.0;
                let avg_y_riv = (stage + y[dn + 3 * ne]) / 2.0;
                let avg_rough = (self.riv_mat[self.riv[i].material - 1].rough
                    + self.riv_mat[self.riv[dn].material - 1].rough)
                    / 2.0;
                let distance =
                    point_distance(self.riv[i].x, self.riv[i].y, self.riv[dn].x, self.riv[dn].y);
                let dif_y_riv = (total_y_riv - total_down) / distance;
                let avg_sf = (self.riv_mat[self.riv[i].material - 1].sf
                    + self.riv_mat[self.riv[dn].material - 1].sf)
                    / 2.0;
                let cross_a = avg_y_riv * avg_wid;

                let mut f1 = self
                    .riv_mode
                    .reach_flux(avg_y_riv, avg_wid, dif_y_riv, avg_sf, avg_rough, cross_a);
                if stage <= 0.0 && f1 > 0.0 {
                    f1 = 0.0;
                } else if y[dn + 3 * ne] <= 0.0 && f1 < 0.0 {
                    f1 = 0.0;
                }
                self.flux_riv[i][1] = f1;

                /* accumulate to get the inflow of the down segment */
                self.flux_riv[dn][0] += f1;
            } else {
                let mut f1 = match down {
                    -1 => {
                        /* Dirichlet stage at the outlet */
                        let bc_stage = self.riv_bc_value(self.riv[i].bc - 1, t);
                        let to = self.riv[i].to_node - 1;
                        let total_down = bc_stage
                            + self.node[to].zmin
                            + self.riv_shape[self.riv[i].shape - 1].bed;
                        let distance = point_distance(
                            self.riv[i].x,
                            self.riv[i].y,
                            self.node[to].x,
                            self.node[to].y,
                        );
                        let dif_y_riv = (total_y_riv - total_down) / distance;
                        let mat = &self.riv_mat[self.riv[i].material - 1];
                        self.riv_mode
                            .reach_flux(stage, wid, dif_y_riv, mat.sf, mat.rough, wid * stage)
                    }
                    -2 => {
                        /* Neumann discharge at the outlet */
                        self.riv_bc_value(self.riv[i].bc - 1, t)
                    }
                    -3 => {
                        /* zero-depth-gradient: Manning on the bed slope */
                        let to = self.riv[i].to_node - 1;
                        let distance = point_distance(
                            self.riv[i].x,
                            self.riv[i].y,
                            self.node[to].x,
                            self.node[to].y,
                        );
                        let dif_y_riv = (self.riv[i].zmin
                            - (self.node[to].zmin + self.riv_shape[self.riv[i].shape - 1].bed))
                            / distance;
                        zero_depth_gradient_flux(
                            wid,
                            stage,
                            dif_y_riv,
                            self.riv_mat[self.riv[i].material - 1].rough,
                        )
                    }
                    -4 => critical_depth_flux(wid, stage),
                    _ => 0.0, //rejected at load time
                };

                /* there is no downstream state at an outlet, so only the
                   local source check can apply */
                if stage <= 0.0 && f1 > 0.0 {
                    f1 = 0.0;
                }
                self.flux_riv[i][1] = f1;
                self.q = f1;
            }

            /* interaction between surface flow and the channel */
            if self.riv[i].left_ele > 0 {
                let le = self.riv[i].left_ele - 1;
                let ele_yh = y[le] + self.ele[le].zmax;
                let cwr = self.riv_mat[self.riv[i].material - 1].cwr;
                let bank_ele = if self.riv[i].zmax < self.ele[le].zmax {
                    self.ele[le].zmax
                } else {
                    self.riv[i].zmax
                };
                let mut f2 = weir_exchange(total_y_riv, ele_yh, bank_ele, cwr, self.riv[i].length);
                if stage <= 0.0 && f2 > 0.0 {
                    f2 = 0.0;
                }
                if y[le] <= 0.0 && f2 < 0.0 {
                    f2 = 0.0;
                }
                self.flux_riv[i][2] = f2;

                /* replace the overland flux on the edge facing the channel */
                for j in 0..3 {
                    if self.ele[le].nabr[j] == self.riv[i].right_ele as i32 {
                        self.flux_surf[le][j] = -f2;
                    }
                }
            }

            if self.riv[i].right_ele > 0 {
                let re = self.riv[i].right_ele - 1;
                let ele_yh = y[re] + self.ele[re].zmax;
                let cwr = self.riv_mat[self.riv[i].material - 1].cwr;
                let bank_ele = if self.riv[i].zmax < self.ele[re].zmax {
                    self.ele[re].zmax
                } else {
                    self.riv[i].zmax
                };
                let mut f3 = weir_exchange(total_y_riv, ele_yh, bank_ele, cwr, self.riv[i].length);
                if stage <= 0.0 && f3 > 0.0 {
                    f3 = 0.0;
                }
                if y[re] <= 0.0 && f3 < 0.0 {
                    f3 = 0.0;
                }
                self.flux_riv[i][3] = f3;

                for j in 0..3 {
                    if self.ele[re].nabr[j] == self.riv[i].left_ele as i32 {
                        self.flux_surf[re][j] = -f3;
                        break;
                    }
                }
            }

            /* groundwater interaction under each bank */
            if self.riv[i].left_ele > 0 {
                let le = self.riv[i].left_ele - 1;
                let ele_head = y[le + 2 * ne] + self.ele[le].zmin;
                let distance =
                    point_distance(self.riv[i].x, self.riv[i].y, self.ele[le].x, self.ele[le].y);
                let soil = &self.soil[self.ele[le].soil - 1];
                let mp_factor = macropore_factor(soil.macropore, y[le + 2 * ne], soil.base, soil.gama);
                let mut f4 = bank_seepage(
                    mp_factor,
                    self.riv[i].length,
                    wid,
                    stage,
                    self.ele[le].ksat,
                    total_y_riv,
                    ele_head,
                    distance,
                );
                if stage <= 0.0 && f4 > 0.0 {
                    f4 = 0.0;
                }
                if y[le + 2 * ne] <= 0.0 && f4 < 0.0 {
                    f4 = 0.0;
                }
                self.flux_riv[i][4] = f4;
            }

            if self.riv[i].right_ele > 0 {
                let re = self.riv[i].right_ele - 1;
                let ele_head = y[re + 2 * ne] + self.ele[re].zmin;
                let distance =
                    point_distance(self.riv[i].x, self.riv[i].y, self.ele[re].x, self.ele[re].y);
                let soil = &self.soil[self.ele[re].soil - 1];
                let mp_factor = macropore_factor(soil.macropore, y[re + 2 * ne], soil.base, soil.gama);
                let mut f5 = bank_seepage(
                    mp_factor,
                    self.riv[i].length,
                    wid,
                    stage,
                    self.ele[re].ksat,
                    total_y_riv,
                    ele_head,
                    distance,
                );
                if stage <= 0.0 && f5 > 0.0 {
                    f5 = 0.0;
                }
                if y[re + 2 * ne] <= 0.0 && f5 < 0.0 {
                    f5 = 0.0;
                }
                self.flux_riv[i][5] = f5;
            }
        }
    }
}
