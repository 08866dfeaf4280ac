use anyhow::{Context, Result};
use clap::{Arg, Command};
use log::LevelFilter;
use std::io::Read;
use std::process;

use otp_sift::message::Message;
use otp_sift::rank::{aggregate, ScanResults};

fn main() {
    let matches = Command::new("otp-sift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan a batch of mail messages for verification codes and links")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("JSON batch of messages, or - for stdin")
                .default_value("-"),
        )
        .arg(
            Arg::new("domain")
                .short('d')
                .long("domain")
                .value_name("DOMAIN")
                .help("Target domain to rank links against")
                .default_value(""),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");
    let domain = matches
        .get_one::<String>("domain")
        .map(String::as_str)
        .unwrap_or("");

    let raw = read_input(input)?;
    let messages: Vec<Message> =
        serde_json::from_str(&raw).context("malformed message batch")?;
    log::debug!("scanning {} messages against {domain:?}", messages.len());

    let results = aggregate(&messages, domain);
    log::info!(
        "found {} codes and {} links",
        results.codes.len(),
        results.links.len()
    );

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

fn print_results(results: &ScanResults) {
    println!("Codes ({}):", results.codes.len());
    if results.codes.is_empty() {
        println!("  (none)");
    }
    for code in &results.codes {
        let when = code
            .timestamp
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| "unknown time".to_string());
        println!("  {}  [{}]  from {}  {}", code.value, code.format, code.from, when);
        if !code.subject.is_empty() {
            println!("      subject: {}", code.subject);
        }
    }

    println!();
    println!("Links ({}):", results.links.len());
    if results.links.is_empty() {
        println!("  (none)");
    }
    for link in &results.links {
        let badge = if link.is_domain_match {
            "  [domain match]"
        } else {
            ""
        };
        println!("  {:.2}  {}{badge}", link.match_score, link.url);
        println!("      {}  from {}", link.hostname, link.from);
    }
}
