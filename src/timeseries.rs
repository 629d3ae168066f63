// Design concepts:
// -----------------
// Forcing tables are ordered (t, value) pairs with strictly increasing times.
// Each series carries a cursor so that the forward-marching simulation can
// look values up in amortised O(1). The cursor is only ever moved by
// advance_cursor(), between outer substeps; interp() treats it as a hint and
// never writes it, because the stiff solver is free to probe time in any
// order inside a step.

#[derive(Default)]
#[derive(Clone)]
pub struct Timeseries {
    pub name: String,          //The name of the timeseries
    pub times: Vec<f64>,       //Tabulated times, strictly increasing
    pub values: Vec<f64>,      //Tabulated values
    pub cursor: usize,         //Forward-only position used to seed lookups
}

impl Timeseries {
    pub fn new() -> Timeseries {
        Timeseries {
            name: "Unnamed timeseries".to_string(),
            ..Default::default()
        }
    }

    pub fn with_name(name: &str) -> Timeseries {
        Timeseries {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /*
    Adds a new point to the end of the series.
     */
    pub fn push(&mut self, t: f64, value: f64) {
        self.times.push(t);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /*
    Resets the cursor to the start of the series.
     */
    pub fn restart_cursor(&mut self) {
        self.cursor = 0;
    }

    /*
    Moves the cursor forward while t lies beyond the next tabulated time.
    Never moves backward, and never past the last usable interval.
     */
    pub fn advance_cursor(&mut self, t: f64) {
        let n = self.times.len();
        while self.cursor + 1 < n && t > self.times[self.cursor + 1] {
            self.cursor += 1;
        }
    }

    /// Piecewise-linear lookup, clamped to the end values outside the
    /// tabulated range. An empty series reads as zero (caller-supplied dummy).
    pub fn interp(&self, t: f64) -> f64 {
        let n = self.times.len();
        if n == 0 {
            return 0.0;
        }
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[n - 1] {
            return self.values[n - 1];
        }

        //Try the cursor window first
        let c = self.cursor;
        if c + 1 < n && t >= self.times[c] && t < self.times[c + 1] {
            return self.blend(c + 1, t);
        }

        //Fall back to a binary scan for the unique k with T[k-1] <= t < T[k]
        let k = self.times.partition_point(|&x| x <= t);
        self.blend(k, t)
    }

    fn blend(&self, k: usize, t: f64) -> f64 {
        let t0 = self.times[k - 1];
        let t1 = self.times[k];
        (self.values[k - 1] * (t1 - t) + self.values[k] * (t - t0)) / (t1 - t0)
    }
}
