//! Writes a synthetic `ds_salaries` table for trying the viewer.
//!
//! Usage: `generate_sample [OUTPUT]` where OUTPUT ends in `.csv` (default
//! `ds_salaries.csv`) or `.parquet`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    /// Pick from `(value, weight)` pairs.
    fn weighted<'a, T>(&mut self, choices: &'a [(T, f64)]) -> &'a T {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for (value, weight) in choices {
            if roll < *weight {
                return value;
            }
            roll -= weight;
        }
        &choices[choices.len() - 1].0
    }
}

struct Row {
    work_year: i64,
    experience_level: &'static str,
    employment_type: &'static str,
    job_title: &'static str,
    salary_in_usd: i64,
    employee_residence: &'static str,
    remote_ratio: i64,
    company_location: &'static str,
    company_size: &'static str,
}

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let levels = [("EN", 0.12), ("MI", 0.25), ("SE", 0.58), ("EX", 0.05)];
    let base_salary = |level: &str| match level {
        "EN" => 85_000.0,
        "MI" => 125_000.0,
        "SE" => 165_000.0,
        _ => 205_000.0,
    };
    let employment = [("FT", 0.95), ("PT", 0.02), ("CT", 0.02), ("FL", 0.01)];
    let residences = [("US", 0.8), ("GB", 0.06), ("CA", 0.06), ("DE", 0.04), ("IN", 0.04)];
    let titles = [
        ("Data Scientist", 0.3),
        ("Data Engineer", 0.3),
        ("Data Analyst", 0.2),
        ("Machine Learning Engineer", 0.2),
    ];
    let remote = [(0, 0.45), (50, 0.1), (100, 0.45)];
    let sizes = [("S", 0.1), ("M", 0.7), ("L", 0.2)];
    let years = [(2020, 0.1), (2021, 0.2), (2022, 0.35), (2023, 0.35)];

    (0..n)
        .map(|_| {
            let experience_level = *rng.weighted(&levels);
            let work_year = *rng.weighted(&years);
            let remote_ratio = *rng.weighted(&remote);
            let employee_residence = *rng.weighted(&residences);
            let mean = base_salary(experience_level) * (1.0 + 0.03 * (work_year - 2020) as f64)
                - if remote_ratio == 100 { 4_000.0 } else { 0.0 };
            Row {
                work_year,
                experience_level,
                employment_type: *rng.weighted(&employment),
                job_title: *rng.weighted(&titles),
                salary_in_usd: rng.gauss(mean, 35_000.0).max(20_000.0).round() as i64,
                employee_residence,
                remote_ratio,
                company_location: employee_residence,
                company_size: *rng.weighted(&sizes),
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "work_year",
        "experience_level",
        "employment_type",
        "job_title",
        "salary",
        "salary_currency",
        "salary_in_usd",
        "employee_residence",
        "remote_ratio",
        "company_location",
        "company_size",
    ])?;
    for r in rows {
        writer.write_record([
            r.work_year.to_string(),
            r.experience_level.to_string(),
            r.employment_type.to_string(),
            r.job_title.to_string(),
            r.salary_in_usd.to_string(),
            "USD".to_string(),
            r.salary_in_usd.to_string(),
            r.employee_residence.to_string(),
            r.remote_ratio.to_string(),
            r.company_location.to_string(),
            r.company_size.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("work_year", DataType::Int64, false),
        Field::new("experience_level", DataType::Utf8, false),
        Field::new("employment_type", DataType::Utf8, false),
        Field::new("job_title", DataType::Utf8, false),
        Field::new("salary_in_usd", DataType::Int64, false),
        Field::new("employee_residence", DataType::Utf8, false),
        Field::new("remote_ratio", DataType::Int64, false),
        Field::new("company_location", DataType::Utf8, false),
        Field::new("company_size", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            int(|r| r.work_year),
            text(|r| r.experience_level),
            text(|r| r.employment_type),
            text(|r| r.job_title),
            int(|r| r.salary_in_usd),
            text(|r| r.employee_residence),
            int(|r| r.remote_ratio),
            text(|r| r.company_location),
            text(|r| r.company_size),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "ds_salaries.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(3000, &mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &rows)?,
        Some("parquet") | Some("pq") => write_parquet(path, &rows)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    println!("Wrote {} salary records to {output}", rows.len());
    Ok(())
}
