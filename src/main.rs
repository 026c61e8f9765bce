use anyhow::{Context, Result};
use bpaf::Bpaf;
use log::*;
use sigtest::{mann_whitney_test, report, t_test, Alternative, Dataset, TestKind, TestRequest};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

/// Significance tests with effect sizes over CSV data
#[derive(Bpaf, Debug, Clone)]
#[bpaf(options, version)]
enum Command {
    /// Student's t-test: one-sample, paired, or Welch's two-sample test
    #[bpaf(command("t-test"))]
    TTest {
        #[bpaf(external(test_args))]
        args: TestArgs,
    },
    /// Wilcoxon rank-sum (Mann-Whitney U) test of two independent groups
    #[bpaf(command("mann-whitney"))]
    MannWhitney {
        #[bpaf(external(test_args))]
        args: TestArgs,
    },
}

#[derive(Bpaf, Debug, Clone)]
struct TestArgs {
    /// A column to test.  Give it twice to compare two columns
    #[bpaf(short, long, argument("COL"))]
    select: Vec<String>,
    /// A column with two levels which splits the selected column into groups
    #[bpaf(long, argument("COL"))]
    by: Option<String>,
    /// A column of non-negative observation weights
    #[bpaf(short, long, argument("COL"))]
    weights: Option<String>,
    /// The value of the mean (or difference) under the null hypothesis
    #[bpaf(long, argument("X"), fallback(0.0))]
    mu: f64,
    /// two-sided, less, or greater
    #[bpaf(long, argument("ALT"), fallback(Alternative::TwoSided))]
    alternative: Alternative,
    /// Test the differences of the two selected columns
    paired: bool,
    /// Print the result as JSON
    json: bool,
    /// A CSV file with a header row (default: stdin)
    #[bpaf(positional("FILE"))]
    file: Option<PathBuf>,
}

impl TestArgs {
    fn request(&self) -> TestRequest {
        let mut req = TestRequest::new(self.select.iter().cloned())
            .alternative(self.alternative)
            .mu(self.mu)
            .paired(self.paired);
        req.by = self.by.clone();
        req.weights = self.weights.clone();
        req
    }
}

fn main() {
    env_logger::init();
    match run(command().run()) {
        Ok(()) => (),
        Err(e) => {
            // Ignore EPIPE
            if let Some(e) = e.downcast_ref::<std::io::Error>() {
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    return;
                }
            }
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn run(cmd: Command) -> Result<()> {
    let (kind, args) = match cmd {
        Command::TTest { args } => (TestKind::TTest, args),
        Command::MannWhitney { args } => (TestKind::RankSum, args),
    };
    let data = match &args.file {
        Some(path) => Dataset::from_path(path)
            .with_context(|| format!("Couldn't read {}", path.display()))?,
        None => Dataset::from_csv(stdin().lock()).context("Couldn't read stdin")?,
    };
    info!("Read {} rows", data.n_rows());

    let req = args.request();
    let result = match kind {
        TestKind::TTest => t_test(&data, &req)?,
        TestKind::RankSum => mann_whitney_test(&data, &req)?,
    };

    let mut stdout = stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &result)?;
        writeln!(stdout)?;
    } else {
        report::write_report(&mut stdout, &result)?;
    }
    Ok(())
}
