use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};

const FIRST_NAMES: [&str; 16] = [
    "Alice", "Bob", "Chitra", "Daniel", "Esha", "Farhan", "Grace", "Hiro", "Isla", "Jai",
    "Kavya", "Liam", "Meera", "Noah", "Olivia", "Pranav",
];
const GRADES: [i64; 3] = [7, 8, 9];
const CLASSES: [&str; 3] = ["A", "B", "C"];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const QUIZZES: [&str; 5] = ["Algebra", "Geometry", "Fractions", "Grammar", "Science"];

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

    /// Uniform in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

/// Quiz dates spread over the two weeks either side of `today`.
fn quiz_date(rng: &mut SimpleRng, today: NaiveDate) -> NaiveDate {
    let offset = rng.below(29);
    let start = today.checked_sub_days(Days::new(14)).unwrap_or(today);
    start.checked_add_days(Days::new(offset)).unwrap_or(today)
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dataset.csv"));

    let mut rng = SimpleRng::new(42);
    let today = Local::now().date_naive();
    let record_date = today.checked_sub_days(Days::new(3)).unwrap_or(today);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "student_id",
        "name",
        "grade",
        "class",
        "region",
        "homework_submitted",
        "quiz_name",
        "quiz_date",
        "quiz_score",
        "date",
    ])?;

    let mut rows = 0;
    for (i, name) in FIRST_NAMES.iter().enumerate() {
        for attempt in 0..3 {
            let grade = *rng.pick(&GRADES);
            let class_label = *rng.pick(&CLASSES);
            let region = *rng.pick(&REGIONS);
            let submitted = rng.below(4) != 0;
            let quiz = *rng.pick(&QUIZZES);
            let date = quiz_date(&mut rng, today);
            // Future quizzes have no score yet.
            let score = if date <= today {
                (40 + rng.below(61)).to_string()
            } else {
                String::new()
            };

            writer.write_record([
                format!("S{:03}-{attempt}", i + 1),
                name.to_string(),
                grade.to_string(),
                class_label.to_string(),
                region.to_string(),
                if submitted { "True" } else { "False" }.to_string(),
                quiz.to_string(),
                date.format("%Y-%m-%d").to_string(),
                score,
                record_date.format("%Y-%m-%d").to_string(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} student records to {}", output_path.display());
    Ok(())
}
