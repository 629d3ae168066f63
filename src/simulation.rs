use std::io::Write;
use std::time::Instant;

use crate::io::csv_io::DischargeWriter;
use crate::io::input;
use crate::io::output::{self, OutputFiles};
use crate::misc::configuration::{Control, SolverChoice};
use crate::model::ModelData;
use crate::numerical::bdf::{BdfSolver, LinearMode};
use crate::numerical::gmres::GramSchmidt;

/*
The outer driver. Owns the model, the control record and the state vector,
and advances the coupled system from StartTime to EndTime: for every output
interval, fixed ET-sized substeps each run cursor advance, interception,
the implicit solve and the ET adjustment, in that order; the emitted output
reflects the post-ET state.
 */
pub struct Simulation {
    pub model: ModelData,
    pub control: Control,
    pub y: Vec<f64>,
    pub load_secs: f64,
    pub solve_secs: f64,
}

impl Simulation {
    /*
    Loads the input decks sharing `stem`, derives geometry, resolves class
    attributes, validates every cross-reference and builds the initial
    state vector.
     */
    pub fn load(stem: &str) -> Result<Simulation, String> {
        let start = Instant::now();
        let (mut model, control) = input::read_model(stem)?;

        model.derive_geometry();
        model.resolve_attributes()?;
        model.allocate_scratch();
        model.validate()?;

        let restart = if control.int_type == 2 {
            Some(input::read_restart(&format!("{}.init", stem), model.num_ele())?)
        } else {
            None
        };
        let y = model.initialize_state(control.int_type, restart)?;

        Ok(Simulation {
            model,
            control,
            y,
            load_secs: start.elapsed().as_secs_f64(),
            solve_secs: 0.0,
        })
    }

    pub fn run(&mut self, output_stem: &str) -> Result<(), String> {
        println!(
            "\nSolving the coupled ODE system ...  [{}]",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        if self.control.debug {
            output::print_model_data(&self.model);
        }

        let mut outputs = OutputFiles::open(output_stem, &self.control)?;
        outputs.write_headers(&self.model)?;
        let mut q_writer = if self.control.q_out {
            let w = DischargeWriter::create(&format!("{}.q", output_stem)).map_err(String::from)?;
            Some(w)
        } else {
            None
        };

        let linear = match self.control.solver {
            SolverChoice::Dense => LinearMode::Dense,
            SolverChoice::Gmres { gs_type, max_k, delt } => LinearMode::Gmres {
                gs: if gs_type == 1 {
                    GramSchmidt::Modified
                } else {
                    GramSchmidt::Classical
                },
                max_krylov: max_k,
                tolerance: delt,
            },
        };
        let mut solver = BdfSolver::new(
            self.control.reltol,
            self.control.abstol,
            self.control.init_step,
            self.control.max_step,
            linear,
        );

        let solve_start = Instant::now();
        let mut t = self.control.start_time;

        for i in 0..self.control.num_steps {
            if !self.control.verbose {
                print!(
                    "  Running: {:4.1}% ... \r",
                    100.0 * (i + 1) as f64 / self.control.num_steps as f64
                );
                let _ = std::io::stdout().flush();
            }

            /* fixed substeps up to the next output point */
            while t < self.control.tout[i + 1] {
                let next_ptr = if t + self.control.et_step >= self.control.tout[i + 1] {
                    self.control.tout[i + 1]
                } else {
                    t + self.control.et_step
                };
                let stepsize = next_ptr - t;

                self.model.advance_cursors(t);
                self.model.update_interception(t, stepsize);

                //ET rewrote the state outside the solver's knowledge at the
                //end of the previous substep, so the BDF history restarts
                //from the handed vector
                solver.reinit(t, &self.y);
                solver
                    .integrate(&mut self.model, next_ptr, &mut self.y)
                    .map_err(String::from)?;
                t = next_ptr;

                self.model.update_evapotranspiration(t, stepsize, &mut self.y);
            }

            if self.control.verbose {
                output::print_verbose(i, t, &solver.stats);
            }
            outputs.emit(&self.model, &self.y, t)?;
            if let Some(w) = q_writer.as_mut() {
                w.append(t, self.model.q).map_err(String::from)?;
            }
        }
        if !self.control.verbose {
            println!();
        }
        self.solve_secs = solve_start.elapsed().as_secs_f64();

        /* persist the final state so the run can seed the next one */
        output::write_restart_out(&format!("{}.init.out", output_stem), &self.model, &self.y)?;

        output::print_farewell(&self.control, self.load_secs, self.solve_secs);
        Ok(())
    }
}
