use crate::hydrology::balance::UnsatMode;
use crate::hydrology::channel::ChannelMode;
use crate::hydrology::overland::SurfaceMode;
use crate::mesh::{
    derive_element_geometry, derive_river_geometry, Element, ElementIc, GeomMode, LandCover, Node,
    RiverIc, RiverMaterial, RiverSegment, RiverShape, Soil,
};
use crate::numerical::bdf::OdeSystem;
use crate::timeseries::Timeseries;

/// Forcing tables are tabulated in days; simulation time runs in minutes.
pub const MINUTES_PER_DAY: f64 = 1440.0;

pub fn t_days(t: f64) -> f64 {
    t / MINUTES_PER_DAY
}

// The model owns every topology, parameter and scratch array. Everything is
// sized once after loading and mutated in place from then on; nothing
// allocates inside the solver loop. Cross-references are one-based indices,
// so the element/river "graph" is two integer tables.
#[derive(Default)]
#[derive(Clone)]
pub struct ModelData {
    //Mode selections
    pub unsat_mode: UnsatMode,
    pub surf_mode: SurfaceMode,
    pub riv_mode: ChannelMode,
    pub geom_mode: GeomMode,

    //Topology and parameter tables
    pub ele: Vec<Element>,
    pub node: Vec<Node>,
    pub ele_ic: Vec<ElementIc>,
    pub soil: Vec<Soil>,
    pub land_cover: Vec<LandCover>,
    pub riv: Vec<RiverSegment>,
    pub riv_shape: Vec<RiverShape>,
    pub riv_mat: Vec<RiverMaterial>,
    pub riv_ic: Vec<RiverIc>,
    pub num_res: usize,                 //reservoir records are counted, not modelled

    //Forcing and boundary time series
    pub tsd_inc: Vec<Timeseries>,       //infiltration capacity, per soil Inf index
    pub tsd_lai: Vec<Timeseries>,
    pub si_factor: Vec<f64>,            //IS_max = SIFactor * LAI, per LAI series
    pub tsd_ele_bc: Vec<Timeseries>,    //Num1BC Dirichlet series then Num2BC Neumann
    pub num_1bc: usize,
    pub num_2bc: usize,
    pub tsd_riv: Vec<Timeseries>,       //river boundary series
    pub tsd_prep: Vec<Timeseries>,
    pub tsd_temp: Vec<Timeseries>,
    pub tsd_humidity: Vec<Timeseries>,
    pub tsd_wind_vel: Vec<Timeseries>,
    pub tsd_rn: Vec<Timeseries>,
    pub tsd_g: Vec<Timeseries>,
    pub tsd_pressure: Vec<Timeseries>,
    pub tsd_source: Vec<Timeseries>,

    //Per-evaluation flux scratch
    pub flux_surf: Vec<[f64; 3]>,       //overland flux per edge
    pub flux_sub: Vec<[f64; 3]>,        //subsurface flux per edge
    pub flux_riv: Vec<[f64; 6]>,        //[0] in, [1] out, [2]/[3] bank surface, [4]/[5] bank seepage

    //Per-substep rate and store scratch
    pub ele_prep: Vec<f64>,             //gross precipitation rate
    pub ele_2is: Vec<f64>,              //rate into the canopy store
    pub ele_net_prep: Vec<f64>,         //net precipitation rate
    pub ele_tf: Vec<f64>,               //throughfall rate reaching the ground
    pub ele_vic: Vec<f64>,              //infiltration-capacity rate
    pub recharge: Vec<f64>,             //unsat -> sat recharge rate
    pub ele_is: Vec<f64>,               //interception storage
    pub ele_is_max: Vec<f64>,           //interception storage capacity
    pub ele_etp: Vec<f64>,              //potential ET rate
    pub ele_et: Vec<[f64; 4]>,          //realised ET: canopy, surface, unsat, sat

    pub q: f64,                         //discharge at the outlet, m^3/min
}

impl ModelData {
    pub fn new() -> ModelData {
        ModelData {
            ..Default::default()
        }
    }

    pub fn num_ele(&self) -> usize {
        self.ele.len()
    }

    pub fn num_riv(&self) -> usize {
        self.riv.len()
    }

    pub fn num_node(&self) -> usize {
        self.node.len()
    }

    /// Length of the coupled state vector: three element blocks plus the
    /// river stage block.
    pub fn system_size(&self) -> usize {
        3 * self.num_ele() + self.num_riv()
    }

    /*
    Derives element and river geometry from the node coordinates. Called once
    after loading, before any attribute resolution or state initialisation.
     */
    pub fn derive_geometry(&mut self) {
        let mode = self.geom_mode;
        for ele in self.ele.iter_mut() {
            derive_element_geometry(ele, &self.node, mode);
        }
        for riv in self.riv.iter_mut() {
            derive_river_geometry(riv, &self.node, &self.riv_shape);
        }
    }

    /*
    Copies soil and land-cover class attributes onto each element.
     */
    pub fn resolve_attributes(&mut self) -> Result<(), String> {
        for ele in self.ele.iter_mut() {
            let soil = self
                .soil
                .get(ele.soil.wrapping_sub(1))
                .ok_or_else(|| format!("Element {}: soil class {} is out of range", ele.index, ele.soil))?;
            ele.ksat = soil.ksat;
            ele.porosity = soil.sita_s - soil.sita_r;
            ele.alpha = soil.alpha;
            ele.beta = soil.beta;
            ele.sf = soil.sf;
            ele.rough = soil.rough;

            let lc = self
                .land_cover
                .get(ele.lc.wrapping_sub(1))
                .ok_or_else(|| format!("Element {}: land-cover class {} is out of range", ele.index, ele.lc))?;
            ele.lai_max = lc.lai_max;
            ele.rmin = lc.rmin;
            ele.albedo = lc.albedo;
            ele.veg_frac = lc.veg_frac;
        }
        Ok(())
    }

    /*
    Sizes every flux and rate scratch array. All later work reuses these
    allocations.
     */
    pub fn allocate_scratch(&mut self) {
        let ne = self.num_ele();
        let nr = self.num_riv();
        self.flux_surf = vec![[0.0; 3]; ne];
        self.flux_sub = vec![[0.0; 3]; ne];
        self.flux_riv = vec![[0.0; 6]; nr];
        self.ele_prep = vec![0.0; ne];
        self.ele_2is = vec![0.0; ne];
        self.ele_net_prep = vec![0.0; ne];
        self.ele_tf = vec![0.0; ne];
        self.ele_vic = vec![0.0; ne];
        self.recharge = vec![0.0; ne];
        self.ele_is = vec![0.0; ne];
        self.ele_is_max = vec![0.0; ne];
        self.ele_etp = vec![0.0; ne];
        self.ele_et = vec![[0.0; 4]; ne];
        self.q = 0.0;
    }

    /*
    Structural validation of every cross-reference, so the solver loop can
    index without checks. Out-of-range indices are configuration errors.
     */
    pub fn validate(&self) -> Result<(), String> {
        let ne = self.num_ele() as i32;
        let nr = self.num_riv() as i32;

        for ele in self.ele.iter() {
            for &n in ele.node.iter() {
                if n == 0 || n > self.num_node() {
                    return Err(format!("Element {}: node id {} is out of range", ele.index, n));
                }
            }
            for &nb in ele.nabr.iter() {
                if nb > ne {
                    return Err(format!("Element {}: neighbour {} is out of range", ele.index, nb));
                }
            }
            if ele.bc > self.num_1bc as i32 || -ele.bc > self.num_2bc as i32 {
                return Err(format!("Element {}: boundary code {} has no series", ele.index, ele.bc));
            }
            let checks: [(usize, usize, &str); 8] = [
                (ele.prep, self.tsd_prep.len(), "precipitation"),
                (ele.temp, self.tsd_temp.len(), "temperature"),
                (ele.humidity, self.tsd_humidity.len(), "humidity"),
                (ele.wind_vel, self.tsd_wind_vel.len(), "wind velocity"),
                (ele.rn, self.tsd_rn.len(), "net radiation"),
                (ele.g, self.tsd_g.len(), "ground heat"),
                (ele.pressure, self.tsd_pressure.len(), "pressure"),
                (ele.lai, self.tsd_lai.len(), "LAI"),
            ];
            for &(idx, avail, what) in checks.iter() {
                if idx == 0 || idx > avail {
                    return Err(format!("Element {}: {} series {} is out of range", ele.index, what, idx));
                }
            }
            if ele.source > self.tsd_source.len() {
                return Err(format!("Element {}: source series {} is out of range", ele.index, ele.source));
            }
            if ele.soil == 0 || ele.soil > self.soil.len() {
                return Err(format!("Element {}: soil class {} is out of range", ele.index, ele.soil));
            }
            if ele.lc == 0 || ele.lc > self.land_cover.len() {
                return Err(format!("Element {}: land-cover class {} is out of range", ele.index, ele.lc));
            }
        }

        for soil in self.soil.iter() {
            if soil.inf == 0 || soil.inf > self.tsd_inc.len() {
                return Err(format!("Soil {}: infiltration series {} is out of range", soil.index, soil.inf));
            }
        }

        for riv in self.riv.iter() {
            if riv.down > nr {
                return Err(format!("River {}: downstream segment {} is out of range", riv.index, riv.down));
            }
            if riv.down <= 0 && !(-4..=-1).contains(&riv.down) {
                return Err(format!("River {}: routing boundary condition type {} is wrong", riv.index, riv.down));
            }
            if riv.left_ele as i32 > ne || riv.right_ele as i32 > ne {
                return Err(format!("River {}: bank element is out of range", riv.index));
            }
            if riv.shape == 0 || riv.shape > self.riv_shape.len() {
                return Err(format!("River {}: shape {} is out of range", riv.index, riv.shape));
            }
            if riv.material == 0 || riv.material > self.riv_mat.len() {
                return Err(format!("River {}: material {} is out of range", riv.index, riv.material));
            }
            if riv.down <= 0 && (riv.bc == 0 || riv.bc > self.tsd_riv.len()) {
                //only the Dirichlet and Neumann outlet codes dereference the series
                if riv.down == -1 || riv.down == -2 {
                    return Err(format!("River {}: boundary series {} is out of range", riv.index, riv.bc));
                }
            }
        }
        Ok(())
    }

    /*
    Builds the initial state vector. Mode 0 relaxes every element to a thin
    unsaturated column over a nearly full aquifer; mode 1 reads the element
    and river IC tables; mode 2 restarts from persisted unsat/sat blocks.
     */
    pub fn initialize_state(
        &mut self,
        int_type: i32,
        restart: Option<(Vec<f64>, Vec<f64>)>,
    ) -> Result<Vec<f64>, String> {
        let ne = self.num_ele();
        let nr = self.num_riv();
        let mut y = vec![0.0; 3 * ne + nr];

        match int_type {
            0 => {
                for i in 0..ne {
                    self.ele_is[i] = 0.0;
                    y[i] = 0.0;
                    y[i + ne] = 0.08;
                    y[i + 2 * ne] = self.ele[i].aquifer_depth() - 0.1;
                }
            }
            1 => {
                for i in 0..ne {
                    let ic = self
                        .ele_ic
                        .get(self.ele[i].ic.wrapping_sub(1))
                        .ok_or_else(|| {
                            format!("Element {}: initial condition {} is out of range", self.ele[i].index, self.ele[i].ic)
                        })?;
                    self.ele_is[i] = ic.interception;
                    y[i] = ic.surf;
                    y[i + ne] = ic.unsat;
                    y[i + 2 * ne] = ic.sat;

                    let depth = self.ele[i].aquifer_depth();
                    if y[i + ne] + y[i + 2 * ne] >= depth {
                        y[i + ne] = (depth - y[i + 2 * ne]) * 0.9;
                        if y[i + ne] < 0.0 {
                            y[i + ne] = 0.0;
                        }
                    }
                }
                for i in 0..nr {
                    let ic = self
                        .riv_ic
                        .get(self.riv[i].ic.wrapping_sub(1))
                        .ok_or_else(|| {
                            format!("River {}: initial condition {} is out of range", self.riv[i].index, self.riv[i].ic)
                        })?;
                    y[i + 3 * ne] = ic.value;
                }
            }
            2 => {
                let (unsat, sat) =
                    restart.ok_or_else(|| "Restart initialisation requires a .init file".to_string())?;
                if unsat.len() != ne || sat.len() != ne {
                    return Err(format!(
                        "Restart file holds {}+{} values but the mesh has {} elements",
                        unsat.len(),
                        sat.len(),
                        ne
                    ));
                }
                for i in 0..ne {
                    let mut u = unsat[i];
                    if u <= 0.0 {
                        u = 0.01;
                    }
                    y[i + ne] = u;

                    let mut s = sat[i];
                    if s <= 0.0 {
                        s = 0.01;
                    }
                    let depth = self.ele[i].aquifer_depth();
                    if s >= depth {
                        s = depth - 0.01;
                    }
                    y[i + 2 * ne] = s;

                    self.ele_is[i] = 0.0;
                    y[i] = 0.0;
                }
            }
            _ => return Err(format!("Initialisation type {} is wrong", int_type)),
        }
        Ok(y)
    }

    /*
    Moves every forcing cursor up to the current simulation time. This is the
    only place cursors advance; lookups inside the solver only read them.
     */
    pub fn advance_cursors(&mut self, t: f64) {
        let td = t_days(t);
        let groups: [&mut Vec<Timeseries>; 12] = [
            &mut self.tsd_inc,
            &mut self.tsd_lai,
            &mut self.tsd_ele_bc,
            &mut self.tsd_riv,
            &mut self.tsd_prep,
            &mut self.tsd_temp,
            &mut self.tsd_humidity,
            &mut self.tsd_wind_vel,
            &mut self.tsd_rn,
            &mut self.tsd_g,
            &mut self.tsd_pressure,
            &mut self.tsd_source,
        ];
        for group in groups {
            for series in group.iter_mut() {
                series.advance_cursor(td);
            }
        }
    }

    //Forcing lookups. Indices were validated at load time; simulation time
    //is converted from minutes to the tabulated day axis here.

    pub fn prep_rate(&self, i: usize, t: f64) -> f64 {
        self.tsd_prep[self.ele[i].prep - 1].interp(t_days(t))
    }

    pub fn lai_value(&self, i: usize, t: f64) -> f64 {
        self.tsd_lai[self.ele[i].lai - 1].interp(t_days(t))
    }

    pub fn infiltration_capacity(&self, i: usize, t: f64) -> f64 {
        let soil = &self.soil[self.ele[i].soil - 1];
        self.tsd_inc[soil.inf - 1].interp(t_days(t))
    }

    pub fn source_rate(&self, i: usize, t: f64) -> f64 {
        self.tsd_source[self.ele[i].source - 1].interp(t_days(t))
    }

    pub fn ele_bc_value(&self, series: usize, t: f64) -> f64 {
        self.tsd_ele_bc[series].interp(t_days(t))
    }

    pub fn riv_bc_value(&self, series: usize, t: f64) -> f64 {
        self.tsd_riv[series].interp(t_days(t))
    }
}

impl OdeSystem for ModelData {
    /*
    The coupled right-hand side: assemble every lateral, boundary and river
    flux for the probed state, then compose the storage derivatives under the
    configured unsaturated-zone closure. Pure in (t, y) apart from the owned
    scratch arrays, so the solver may evaluate it as often as it likes.
     */
    fn rhs(&mut self, t: f64, y: &mut [f64], dy: &mut [f64]) {
        self.assemble_fluxes(t, y);
        match self.unsat_mode {
            UnsatMode::ShallowGroundwater => self.balance_shallow(t, y, dy),
            UnsatMode::TwoLayer => self.balance_two_layer(t, y, dy),
        }
    }
}
