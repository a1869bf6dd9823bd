mod common;
mod logic;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use common::scenario::{get_scenario, list_scenarios};
use common::{run_stamp, split_csv};
use logic::reports::{generate_console_report, generate_json_report, generate_markdown_report};
use logic::{LogicTester, ScenarioResult, Simulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "yalda-tester", version)]
#[command(about = "Automated QA for the Yalda 2077 quiz engine - scripted full-session runs")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&split_csv(&args.seeds))?;
    let tester = LogicTester::new(Simulator::try_new()?, args.verbose);

    let results = run_scenarios(&tester, &scenarios, &seeds, args.iterations).await;
    write_reports(&args, &results, start_time.elapsed())?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:14} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Yalda 2077 Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else if let Some(hex) = token.strip_prefix("0x") {
            let value = u64::from_str_radix(hex, 16)
                .with_context(|| format!("invalid hex seed {token}"))?;
            seeds.push(value);
        } else {
            bail!("unrecognized seed {token:?}");
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

async fn run_scenarios(
    tester: &LogicTester,
    scenarios: &[String],
    seeds: &[u64],
    iterations: usize,
) -> Vec<ScenarioResult> {
    let mut all_results = Vec::new();
    for name in scenarios {
        let Some(scenario) = get_scenario(name) else {
            println!("{}", format!("⚠️  Unknown scenario {name}, skipping").yellow());
            continue;
        };
        info!(
            "running {} ({}) over {} seed(s)",
            scenario.name,
            scenario.description,
            seeds.len()
        );
        all_results.extend(tester.run_scenario(&scenario, seeds, iterations).await);
    }
    all_results
}

fn write_reports(args: &Args, results: &[ScenarioResult], total: Duration) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Console => generate_console_report(output_target.writer(), results, total)?,
        ReportFormat::Json => generate_json_report(output_target.writer(), results)?,
        ReportFormat::Markdown => {
            generate_markdown_report(output_target.writer(), results, &run_stamp())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_all_scenarios_keyword() {
        let scenarios = expand_scenarios("smoke,all");
        assert_eq!(scenarios[0], "smoke");
        assert_eq!(scenarios.len(), list_scenarios().len());
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        assert_eq!(expand_scenarios("mercy, smoke"), vec!["mercy", "smoke"]);
    }

    #[test]
    fn parses_decimal_negative_and_hex_seeds() {
        let tokens = vec!["7".to_string(), "-3".to_string(), "0xff".to_string()];
        assert_eq!(parse_seeds(&tokens).unwrap(), vec![7, 3, 255]);
        assert!(parse_seeds(&["seven".to_string()]).is_err());
        assert!(parse_seeds(&[]).is_err());
    }

    #[test]
    fn args_parse_report_format() {
        let args = Args::parse_from(["yalda-tester", "--report", "markdown", "--iterations", "2"]);
        assert_eq!(args.report, ReportFormat::Markdown);
        assert_eq!(args.iterations, 2);
        assert_eq!(args.seeds, "1337");
    }
}
