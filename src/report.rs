//! Human-readable rendering of a [`TestResult`].

use crate::request::{Alternative, TestKind};
use crate::result::TestResult;
use ansi_term::{Color, Style};
use std::fmt;
use std::io::{self, Write};
use tabwriter::TabWriter;

/// A p-value, coloured by significance.  Always takes 7 characters.
pub struct PrettyP(pub f64);

impl fmt::Display for PrettyP {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = self.0;
        let s = if p.is_nan() {
            "     NA".to_string()
        } else if p < 0.001 {
            " <0.001".to_string()
        } else {
            format!("{:>7.3}", p)
        };
        if p < 0.01 {
            write!(f, "{}{}{}", Color::Red.prefix(), s, Color::Red.suffix())
        } else if p < 0.05 {
            write!(f, "{}{}{}", Color::Yellow.prefix(), s, Color::Yellow.suffix())
        } else {
            f.write_str(&s)
        }
    }
}

/// A number to `digits` decimal places, or a dimmed "NA"
struct Num(f64, usize);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_nan() {
            write!(f, "{}", Style::new().dimmed().paint("NA"))
        } else {
            write!(f, "{:.*}", self.1, self.0)
        }
    }
}

fn hypothesis(res: &TestResult) -> String {
    let rel = match res.alternative {
        Alternative::TwoSided => "!=",
        Alternative::Less => "<",
        Alternative::Greater => ">",
    };
    let lhs = match (res.kind, res.one_sample || res.paired) {
        (TestKind::TTest, true) => "mean",
        (TestKind::TTest, false) => "difference in means",
        (TestKind::RankSum, _) => "location shift",
    };
    format!("true {} {} {}", lhs, rel, res.null_value)
}

pub fn write_report(out: impl Write, res: &TestResult) -> io::Result<()> {
    let mut out = TabWriter::new(out).ansi(true);
    writeln!(out, "# {}", Style::new().bold().paint(res.method.as_str()))?;
    writeln!(out)?;

    match res.kind {
        TestKind::TTest => {
            writeln!(out, "\tgroup\tn\tmean")?;
            for g in &res.groups {
                writeln!(out, "\t{}\t{}\t{}", g.label, g.n, Num(g.mean, 3))?;
            }
        }
        TestKind::RankSum => {
            writeln!(out, "\tgroup\tn\tmean rank")?;
            for g in &res.groups {
                writeln!(out, "\t{}\t{}\t{}", g.label, g.n, Num(g.mean, 2))?;
            }
        }
    }
    writeln!(out)?;

    match res.kind {
        TestKind::TTest => {
            writeln!(
                out,
                "\t{} = {}\tdf = {}\tp = {}\t{} = {}",
                res.statistic_name,
                Num(res.statistic, 3),
                Num(res.df, 2),
                PrettyP(res.p_value),
                res.effect_size.kind,
                Num(res.effect_size.value, 3),
            )?;
        }
        TestKind::RankSum => {
            let df = if res.df.is_nan() {
                String::new()
            } else {
                format!("df = {}", Num(res.df, 0))
            };
            writeln!(
                out,
                "\t{} = {}\tZ = {}\t{}\tp = {}\t{} = {}",
                res.statistic_name,
                Num(res.statistic, 3),
                Num(res.z, 3),
                df,
                PrettyP(res.p_value),
                res.effect_size.kind,
                Num(res.effect_size.value, 3),
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "alternative hypothesis: {}", hypothesis(res))?;
    out.flush()
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = vec![];
        write_report(&mut buf, self).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::engine::{mann_whitney_test, t_test};
    use crate::request::TestRequest;

    fn data() -> Dataset {
        Dataset::new()
            .with_numeric("before", vec![1., 2., 3., 4., 5.])
            .with_numeric("after", vec![6., 7., 8., 9., 10.])
    }

    #[test]
    fn p_value_formatting() {
        assert_eq!(PrettyP(0.5).to_string(), "  0.500");
        assert!(PrettyP(0.0001).to_string().contains(" <0.001"));
        assert!(PrettyP(0.03).to_string().contains("  0.030"));
    }

    #[test]
    fn t_test_report() {
        let res = t_test(&data(), &TestRequest::new(["before", "after"])).unwrap();
        let text = res.to_string();
        assert!(text.contains("Welch Two Sample t-test"));
        assert!(text.contains("Hedges' g"));
        assert!(text.contains("before"));
        assert!(text.contains("difference in means != 0"));
    }

    #[test]
    fn rank_sum_report() {
        let res = mann_whitney_test(&data(), &TestRequest::new(["before", "after"])).unwrap();
        let text = res.to_string();
        assert!(text.contains("Wilcoxon rank sum exact test"));
        assert!(text.contains("mean rank"));
        assert!(text.contains("W = 0.000"));
        assert!(!text.contains("df ="));
    }
}
