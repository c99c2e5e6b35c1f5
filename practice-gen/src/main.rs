//! Generate practice datasets and save them as TOML files readable by `descent --data`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use common::rand::rngs::SmallRng;
use common::rand::SeedableRng;
use common::toml;

use descent::metrics::Solution;
use descent::practice::{generate, Difficulty};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// How noisy the data is
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: Difficulty,
    /// Number of datasets
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// Output file. With `--count` above one, `-1`, `-2`, ... is appended to the stem.
    /// Printed to stdout if not set.
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Print the optimal `b` of every dataset to stderr
    #[arg(long)]
    answers: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    for i in 0..args.count {
        let dataset = generate(args.difficulty, &mut rng);

        let mut raw = dataset.to_raw();
        raw.meta.insert(
            "difficulty".into(),
            toml::Value::String(args.difficulty.to_string()),
        );
        if let Some(seed) = args.seed {
            raw.meta
                .insert("seed".into(), toml::Value::String(seed.to_string()));
        }

        let label = match &args.out {
            Some(path) => {
                let path = numbered(path, i, args.count);
                raw.write_to_toml_file(&path)
                    .with_context(|| format!("could not save dataset #{}", i + 1))?;
                path.display().to_string()
            }
            None => {
                if i > 0 {
                    println!();
                }
                print!("{}", raw.to_toml_string()?);
                format!("#{}", i + 1)
            }
        };

        if args.answers {
            let solution = Solution::of(&dataset);
            eprintln!(
                "{label}: optimal b = {:.4}, mse = {:.4}",
                solution.b, solution.mse
            );
        }
    }

    Ok(())
}

fn numbered(path: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{}.{}", index + 1, ext.to_string_lossy()),
        None => format!("{stem}-{}", index + 1),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        let path = PathBuf::from("out/set.toml");
        assert_eq!(numbered(&path, 0, 1), path);
        assert_eq!(numbered(&path, 0, 3), PathBuf::from("out/set-1.toml"));
        assert_eq!(numbered(&path, 2, 3), PathBuf::from("out/set-3.toml"));
        assert_eq!(
            numbered(Path::new("set"), 1, 2),
            PathBuf::from("set-2")
        );
    }

    #[test]
    fn args() {
        let args = Args::parse_from(["practice-gen", "-d", "hard", "-n", "3", "--seed", "1"]);
        assert_eq!(args.difficulty, Difficulty::Hard);
        assert_eq!(args.count, 3);
        assert!(args.out.is_none());
    }
}
