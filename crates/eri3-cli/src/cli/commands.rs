use std::path::PathBuf;

use anyhow::Context;
use eri3_core::eri3::job::{load_job, EriJob};
use eri3_core::{eri_3center_contracted, EriScratch};
use ndarray::Array3;
use serde_json::json;
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct EvaluateArgs {
    /// Job description path (JSON)
    job: PathBuf,

    /// Print every tensor entry, including exact zeros
    #[arg(long)]
    all: bool,

    /// Emit entries as JSON instead of whitespace-separated columns
    #[arg(long)]
    json: bool,
}

pub(super) fn run_evaluate_command(args: EvaluateArgs) -> anyhow::Result<i32> {
    let job = load_job(&args.job)?;
    debug!(path = %args.job.display(), "loaded job description");
    let tensor = evaluate_job(&job)
        .with_context(|| format!("evaluating job '{}'", args.job.display()))?;

    let entries: Vec<((usize, usize, usize), f64)> = tensor
        .indexed_iter()
        .filter(|(_, value)| args.all || **value != 0.0)
        .map(|(index, value)| (index, *value))
        .collect();

    if args.json {
        let rows: Vec<_> = entries
            .iter()
            .map(|((ia, ib, ic), value)| json!([ia, ib, ic, value]))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for ((ia, ib, ic), value) in &entries {
            println!("{ia:4} {ib:4} {ic:4}  {value:.17e}");
        }
    }
    Ok(0)
}

fn evaluate_job(job: &EriJob) -> anyhow::Result<Array3<f64>> {
    let shell_a = job.shell_a.to_contracted().context("shell_a")?;
    let shell_b = job.shell_b.to_contracted().context("shell_b")?;
    let shell_c = job.shell_c.to_contracted().context("shell_c")?;

    let mut tensor = Array3::<f64>::zeros(job.output_shape());
    let mut scratch = EriScratch::new();
    eri_3center_contracted(
        &shell_a,
        &shell_b,
        &shell_c,
        job.operator,
        tensor.view_mut(),
        job.offsets,
        &mut scratch,
    )?;
    Ok(tensor)
}
