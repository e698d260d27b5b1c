use anyhow::Result;
use apk_models_core::config::{RunConfig, RunOptions, SourceKind};
use apk_models_core::report::RunReport;
use apk_models_core::run::run;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "apk_validator",
    version,
    about = "Validates embedded model assets in packaged application archives"
)]
struct Cli {
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Source::Folder,
        help = "'file' for a single archive, 'folder' for every .apk in a folder"
    )]
    source: Source,
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = YesNo::N,
        help = "Compare against an older archive"
    )]
    compare: YesNo,
    #[arg(
        short,
        long = "model-change",
        value_enum,
        default_value_t = YesNo::N,
        help = "Whether a model version change is expected"
    )]
    model_change: YesNo,
    #[arg(short, long, help = "Archive file or folder to validate")]
    pathname: Option<PathBuf>,
    #[arg(short, long = "old-apk", help = "Older archive to compare with")]
    old_apk: Option<PathBuf>,
    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(short, long, help = "Debug logging")]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Source {
    File,
    Folder,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum YesNo {
    Y,
    N,
}

impl YesNo {
    fn yes(self) -> bool {
        self == YesNo::Y
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_text(report: &RunReport) {
    for a in &report.archives {
        println!("ARCHIVE {} {}", a.archive, a.overall);
        let v = &a.validation;
        println!(
            "  VALIDATION {} {}{}",
            v.result,
            v.kind.as_deref().map(|k| format!("{} ", k)).unwrap_or_default(),
            v.message
        );
        if let Some(c) = &a.comparison {
            println!(
                "  COMPARISON {} {}{}",
                c.result,
                c.kind.as_deref().map(|k| format!("{} ", k)).unwrap_or_default(),
                c.message
            );
        }
    }
    println!("OVERALL {}", report.overall);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match RunConfig::new(RunOptions {
        source: match cli.source {
            Source::File => SourceKind::FILE,
            Source::Folder => SourceKind::FOLDER,
        },
        pathname: cli.pathname,
        compare: cli.compare.yes(),
        model_change_expected: cli.model_change.yes(),
        old_archive: cli.old_apk,
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let outcomes = run(&config)?;
    let report = RunReport::from_outcomes(&outcomes);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    if report.overall != "PASS" {
        std::process::exit(1);
    }
    Ok(())
}
