//! Writes a synthetic `student-mat.csv` for demos and manual runs.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]` (defaults `data/student-mat.csv`, 395).

use std::path::PathBuf;

use anyhow::{Context, Result};
use grade_lens::data::loader::COLUMNS;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in `lo..=hi`.
    fn between(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_f64() * f64::from(hi - lo + 1)) as u32
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.between(0, options.len() as u32 - 1) as usize]
    }

    /// Ordinal in `lo..=hi` centred on `centre`.
    fn ordinal(&mut self, centre: f64, lo: u32, hi: u32) -> u32 {
        self.gauss(centre, 1.0)
            .round()
            .clamp(f64::from(lo), f64::from(hi)) as u32
    }
}

fn flag(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn grade(value: f64) -> u32 {
    value.round().clamp(0.0, 20.0) as u32
}

/// One synthetic student, fields in header order.
fn student(rng: &mut SimpleRng) -> Vec<String> {
    let medu = rng.between(0, 4);
    let fedu = rng.ordinal(f64::from(medu), 0, 4);
    let studytime = rng.ordinal(2.0, 1, 4);
    let failures = if rng.chance(0.78) { 0 } else { rng.between(1, 3) };
    let goout = rng.ordinal(3.0, 1, 5);
    let dalc = rng.ordinal(1.2 + 0.3 * f64::from(goout - 1), 1, 5);
    let walc = rng.ordinal(f64::from(dalc) + 0.8, 1, 5);
    let absences = (rng.gauss(4.0, 5.0).abs() + f64::from(failures) * 2.0).round() as u32;
    let higher = failures == 0 || rng.chance(0.8);

    let ability = 11.0 - 2.2 * f64::from(failures)
        + 0.5 * (f64::from(medu) - 2.0)
        + 0.6 * (f64::from(studytime) - 2.0)
        - 0.4 * (f64::from(walc) - 2.0)
        - 0.05 * f64::from(absences)
        + if higher { 0.0 } else { -1.5 };
    let g1 = ability + rng.gauss(0.0, 2.5);
    let g2 = g1 + rng.gauss(0.0, 1.2);
    let dropped_out = failures > 0 && rng.chance(0.25);
    let g3 = if dropped_out { 0.0 } else { g2 + rng.gauss(0.3, 1.0) };

    vec![
        rng.pick(&["GP", "GP", "GP", "MS"]).to_string(),
        rng.pick(&["F", "M"]).to_string(),
        (15 + rng.between(0, 4) + failures.min(2)).to_string(),
        rng.pick(&["U", "U", "U", "R"]).to_string(),
        rng.pick(&["GT3", "GT3", "LE3"]).to_string(),
        rng.pick(&["T", "T", "T", "T", "A"]).to_string(),
        medu.to_string(),
        fedu.to_string(),
        rng.pick(&["teacher", "health", "services", "at_home", "other"]).to_string(),
        rng.pick(&["teacher", "health", "services", "at_home", "other"]).to_string(),
        rng.pick(&["home", "reputation", "course", "other"]).to_string(),
        rng.pick(&["mother", "mother", "father", "other"]).to_string(),
        rng.ordinal(1.4, 1, 4).to_string(),
        studytime.to_string(),
        failures.to_string(),
        flag(rng.chance(0.13)),
        flag(rng.chance(0.6)),
        flag(rng.chance(0.45)),
        flag(rng.chance(0.5)),
        flag(rng.chance(0.8)),
        flag(higher),
        flag(rng.chance(0.83)),
        flag(rng.chance(0.33)),
        rng.ordinal(4.0, 1, 5).to_string(),
        rng.ordinal(3.2, 1, 5).to_string(),
        goout.to_string(),
        dalc.to_string(),
        walc.to_string(),
        rng.ordinal(3.5, 1, 5).to_string(),
        absences.to_string(),
        grade(g1).to_string(),
        grade(g2).to_string(),
        grade(g3).to_string(),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map_or_else(|| PathBuf::from("data/student-mat.csv"), PathBuf::from);
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count {n:?}"))?,
        None => 395,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    writer.write_record(COLUMNS)?;

    let mut rng = SimpleRng::new(42);
    for _ in 0..rows {
        writer.write_record(student(&mut rng))?;
    }
    writer.flush()?;

    log::info!("Wrote {} students to {}", rows, output.display());
    println!("Created {}", output.display());
    Ok(())
}
