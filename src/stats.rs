//! Aggregate statistics over a batch of solve runs.

use itertools::Itertools;

/// Per-run measurements, kept as parallel vectors. They can fall out of step
/// when a run is interrupted mid-way, which the report treats as a warning
/// rather than an error.
#[derive(Default)]
pub struct RunStatistics {
    pub seconds: Vec<f64>,
    pub depths: Vec<usize>,
    pub positions: Vec<u64>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, seconds: f64, depth: usize, positions: u64) {
        self.seconds.push(seconds);
        self.depths.push(depth);
        self.positions.push(positions);
    }

    /// Log the min/Q1/median/Q3/max summary. Skipped silently when no run
    /// finished; skipped with a warning when the vectors disagree.
    pub fn report(&self, scramble_depth: usize) {
        let num_runs = self.depths.len();
        if num_runs == 0 {
            return;
        }
        if num_runs != self.seconds.len() || num_runs != self.positions.len() {
            log::warn!("search statistic received vectors of mismatched sizes");
            log::debug!(
                "sizes: {} seconds, {} depths, {} positions",
                self.seconds.len(),
                num_runs,
                self.positions.len()
            );
            return;
        }

        let seconds: Vec<f64> = self.seconds.iter().copied().sorted_by(f64::total_cmp).collect();
        let depths: Vec<usize> = self.depths.iter().copied().sorted().collect();
        let positions: Vec<u64> = self.positions.iter().copied().sorted().collect();

        let q1 = num_runs / 4;
        let q2 = num_runs / 2;
        let q3 = num_runs * 3 / 4;

        let mut lines = String::new();
        lines.push_str("search statistic\n");
        lines.push_str(&format!("        scramble depth: {scramble_depth}\n"));
        lines.push_str(&format!("        number of runs: {num_runs}\n"));
        lines.push_str(&format!(
            "        {:<8}{:>15}{:>15}{:>15}\n",
            "", "time (s)", "positions", "depths"
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}\n",
            "total",
            seconds.iter().sum::<f64>(),
            positions.iter().sum::<u64>(),
            depths.iter().sum::<usize>()
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}\n",
            "max",
            seconds[num_runs - 1],
            positions[num_runs - 1],
            depths[num_runs - 1]
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}\n",
            "Q3", seconds[q3], positions[q3], depths[q3]
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}\n",
            "median", seconds[q2], positions[q2], depths[q2]
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}\n",
            "Q1", seconds[q1], positions[q1], depths[q1]
        ));
        lines.push_str(&format!(
            "        {:<8}{:>15.2}{:>15}{:>15}",
            "min", seconds[0], positions[0], depths[0]
        ));
        log::info!("{lines}");
    }

}
