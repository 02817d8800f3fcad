use chrono::{Datelike, NaiveDate, Weekday};

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
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    // KZT→RUB random walk; weekends are skipped so the series has the
    // gaps a real quote history has.
    let mut rate: f64 = 0.18;

    let output_path = "sample_rates.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["date", "value"])
        .expect("Failed to write header");

    let mut rows = 0usize;
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            rate = (rate + rng.gauss(0.0, 0.0012)).max(0.05);
            writer
                .write_record([day.format("%Y-%m-%d").to_string(), format!("{rate:.6}")])
                .expect("Failed to write row");
            rows += 1;
        }
        day = day.succ_opt().expect("date overflow");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {rows} rates ({start} .. {end}, weekdays only) to {output_path}");
}
