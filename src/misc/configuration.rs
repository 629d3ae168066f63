/// Linear solver behind the stiff integrator, as selected in the .para deck.
#[derive(Debug)]
#[derive(Clone)]
pub enum SolverChoice {
    /// Full dense direct solver
    Dense,
    /// Preconditioner-free iterative GMRES solver
    Gmres { gs_type: i32, max_k: usize, delt: f64 },
}

impl Default for SolverChoice {
    fn default() -> SolverChoice {
        SolverChoice::Dense
    }
}

#[derive(Debug)]
#[derive(Clone)]
#[derive(Default)]
pub struct Control {
    pub verbose: bool,
    pub debug: bool,

    pub int_type: i32,          //0: relax; 1: IC tables; 2: restart file

    pub res_out: bool,
    pub flux_out: bool,
    pub q_out: bool,
    pub etis_out: bool,

    pub solver: SolverChoice,

    pub abstol: f64,
    pub reltol: f64,
    pub init_step: f64,         //initial step hint, minutes
    pub max_step: f64,          //maximum internal step, minutes
    pub et_step: f64,           //operator-split substep, minutes

    pub start_time: f64,
    pub end_time: f64,

    pub outtype: i32,
    pub a: f64,                 //geometric output-grid growth factor
    pub b: f64,                 //first output interval

    pub num_steps: usize,
    pub tout: Vec<f64>,         //output times, tout[0] = start_time
}

impl Control {
    pub fn new() -> Control {
        Control {
            ..Default::default()
        }
    }

    /*
    Builds the output time grid T[0] = start, T[k] = T[k-1] + b*a^(k-1),
    with the final entry pinned to the end time. The geometric step count
    truncates the log ratio and adds one, so a ratio landing exactly on an
    integer still gets its closing interval; the uniform case reduces to
    ceil(span / b).
     */
    pub fn build_output_grid(&mut self) {
        let span = self.end_time - self.start_time;
        let n = if self.a != 1.0 {
            let ratio = (1.0 + span * (self.a - 1.0) / self.b).ln() / self.a.ln();
            ratio as usize + 1
        } else {
            (span / self.b).ceil() as usize
        };
        let n = n.max(1);
        self.num_steps = n;

        self.tout = Vec::with_capacity(n + 1);
        self.tout.push(self.start_time);
        for k in 1..=n {
            let prev = self.tout[k - 1];
            self.tout.push(prev + self.b * self.a.powi(k as i32 - 1));
        }
        self.tout[n] = self.end_time;
    }
}
