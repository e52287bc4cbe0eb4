//! Writes a sample CSV, loads it back and saves a few figures from it.
//!
//! Usage: `generate_sample [output-dir]` (defaults to `samples/`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use figscope::{load_csv, FigureOptions, Plotter, StyleCycle};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in `[-amplitude, amplitude)`.
    fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// `step,time,signal,label` rows: an integer, two floats and a text field.
fn sample_csv(rows: usize, rng: &mut SimpleRng) -> String {
    let mut out = String::from("step,time,signal,label\n");
    for i in 0..rows {
        let t = i as f64 * 0.1;
        let signal = gaussian(t, 5.0, 1.2, 3.0) + 0.5 * t.sin() + rng.noise(0.1);
        let label = if t < 5.0 { "rise" } else { "fall" };
        out.push_str(&format!("{i},{t:.2},{signal:.4},{label}\n"));
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("samples"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let csv_path = out_dir.join("measurements.csv");
    fs::write(&csv_path, sample_csv(100, &mut rng))
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    let table = load_csv(&csv_path).context("Failed to load sample CSV")?;
    println!("{table}");

    let time = table.column_f64("time")?;
    let signal = table.column_f64("signal")?;
    let step = table.column_f64("step")?;

    let mut plotter = Plotter::headless();
    plotter.set_extension(Some("png"));
    plotter.set_output_dir(Some(out_dir.clone()));

    // 0.png: one line with a legend.
    plotter.figure().run(|fig| {
        let axes = fig.gca();
        axes.plot(&time, &signal)?.label("signal");
        axes.set_xlabel("time [s]").set_ylabel("signal").legend();
        Ok::<_, figscope::Error>(())
    })?;

    // 1.png: quick plot of two series.
    let smooth: Vec<f64> = time.iter().map(|t| gaussian(*t, 5.0, 1.2, 3.0)).collect();
    plotter.quick_plot([(&time, &signal), (&time, &smooth)])?;

    // subplots.svg: a 1x2 grid in the monochrome cycle.
    plotter.set_style_cycle(StyleCycle::monochrome());
    plotter.set_extension(Some("svg"));
    let options = FigureOptions::new()
        .name("subplots")
        .figsize(10.0, 4.0)
        .title("Sample measurements");
    plotter.figure_with(options)?.run(|fig| {
        let left = fig.add_subplot(1, 2, 1)?;
        left.plot_fmt(&time, &signal, "--")?.label("signal");
        left.plot(&time, &smooth)?.label("peak");
        left.set_title("signal").legend();

        let right = fig.add_subplot(1, 2, 2)?;
        right.scatter(&step, &signal)?;
        right.set_title("by step");
        Ok::<_, figscope::Error>(())
    })?;

    // helix.png: a 3-D line.
    plotter.set_style_cycle(StyleCycle::default());
    plotter.set_extension(Some("png"));
    let helix = plotter.figure_3d(FigureOptions::new().name("helix"))?;
    helix.run(|axes| {
        let t: Vec<f64> = (0..200).map(|i| i as f64 * 0.1).collect();
        let xs: Vec<f64> = t.iter().map(|t| t.cos()).collect();
        let ys: Vec<f64> = t.iter().map(|t| t.sin()).collect();
        axes.plot(&xs, &ys, &t)?.label("helix");
        axes.set_title("helix").view_init(25.0, -50.0);
        Ok::<_, figscope::Error>(())
    })?;

    println!("Wrote sample figures to {}", out_dir.display());
    Ok(())
}
