use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use codesweep::cleaner::{clean_files, CleanOptions, CleanReport};
use codesweep::deadcode::find_dead_code;
use codesweep::discovery::{discover_files, DiscoverOptions};
use codesweep::export::{export_to_string, ExportData, ExportFormat};
use codesweep::frameworks::FrameworkRules;
use codesweep::parser::package_json;
use codesweep::resolver::ImportResolver;

#[derive(Parser)]
#[command(name = "codesweep")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Sweep unused imports and dead code from JS/TS projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanArgs {
    /// Directory or file to scan
    #[arg(default_value = ".")]
    target: PathBuf,

    /// Comma separated extensions
    #[arg(long, default_value = "ts,tsx,js,jsx")]
    ext: String,

    /// Comma separated ignore globs
    #[arg(long, default_value = "")]
    ignore: String,

    /// Check that local imports exist in the project (supports path
    /// aliases and workspace packages)
    #[arg(long)]
    check_local: bool,

    /// Worker pool size for per-file analysis
    #[arg(long, default_value_t = 8)]
    jobs: usize,

    /// Write the report in this format instead of the console table
    #[arg(long)]
    format: Option<ExportFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List unused import specifiers without touching any file
    List {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// Remove unused imports and show a summary
    Clean {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// List potentially unused top-level declarations (safe preview)
    #[command(alias = "dead")]
    UnusedCode {
        #[command(flatten)]
        args: ScanArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { args } => run_clean_command(&args, true),
        Commands::Clean { args } => run_clean_command(&args, false),
        Commands::UnusedCode { args } => run_unused_code(&args),
    }
}

/// Shared setup: discover files and build the resolver for the project
/// rooted at the current directory.
fn prepare(args: &ScanArgs) -> anyhow::Result<(PathBuf, Vec<PathBuf>, ImportResolver)> {
    let project_root = std::env::current_dir().context("could not determine working directory")?;
    let extensions = split_list(&args.ext);

    let options = DiscoverOptions {
        extensions: extensions.clone(),
        ignore: split_list(&args.ignore),
    };
    let files = discover_files(&args.target, &options)
        .with_context(|| format!("could not scan {}", args.target.display()))?;

    let resolver = ImportResolver::for_project(&project_root, &extensions);

    let workspace = package_json::detect_workspace(&project_root);
    if !workspace.is_empty() {
        println!(
            "{}",
            format!(
                "Detected {} workspace with {} package(s)\n",
                workspace.kind,
                workspace.packages.len()
            )
            .dimmed()
        );
    }

    Ok((project_root, files, resolver))
}

fn run_clean_command(args: &ScanArgs, dry_run: bool) -> anyhow::Result<()> {
    let (project_root, files, resolver) = prepare(args)?;
    let rules = FrameworkRules::default();
    let options = CleanOptions {
        dry_run,
        check_local_imports: args.check_local,
    };

    let verb = if dry_run { "Scanning" } else { "Cleaning" };
    println!("{}", format!("{} {}...", verb, args.target.display()).blue());

    let reports = clean_files(&files, &resolver, &rules, &options, args.jobs);

    if let Some(format) = args.format {
        let data = ExportData::from_clean_reports(project_root, &reports);
        print!("{}", export_to_string(format, &data)?);
        return Ok(());
    }

    if dry_run {
        print_list_report(&project_root, &reports);
    } else {
        print_clean_summary(&project_root, &reports);
    }
    Ok(())
}

fn print_list_report(project_root: &Path, reports: &[CleanReport]) {
    let changed: Vec<&CleanReport> = reports.iter().filter(|r| r.changed).collect();
    if changed.is_empty() {
        println!("{}", "No unused imports found.".green());
        return;
    }

    println!("{}", "\nUnused Imports Report\n".cyan().bold());

    let rows: Vec<(String, usize, String)> = changed
        .iter()
        .map(|report| {
            let file = relative_display(project_root, &report.file);
            let specifiers: Vec<String> = report
                .removed
                .iter()
                .flat_map(|r| r.specifiers.iter().cloned())
                .collect();
            (file, specifiers.len(), specifiers.join(", "))
        })
        .collect();

    let file_width = rows
        .iter()
        .map(|(file, _, _)| file.len())
        .chain(std::iter::once("File".len()))
        .max()
        .unwrap_or(4)
        .min(60);

    println!(
        "{}",
        format!("{:<width$}  Count  Unused Imports", "File", width = file_width).bold()
    );
    println!("{}", "─".repeat(file_width + 40).dimmed());

    for (file, count, specifiers) in &rows {
        let mut name = file.clone();
        if name.len() > file_width {
            let cut = name.len() - (file_width - 3);
            if name.is_char_boundary(cut) {
                name = format!("...{}", &name[cut..]);
            }
        }
        // Pad before coloring so escape codes stay out of the width math.
        println!(
            "{}  {}  {}",
            format!("{:<width$}", name, width = file_width).yellow(),
            format!("{:<5}", count).cyan(),
            specifiers.dimmed(),
        );
    }

    let total: usize = rows.iter().map(|(_, count, _)| count).sum();
    println!("{}", "─".repeat(file_width + 40).dimmed());
    println!(
        "\n{}",
        format!(
            "Summary: {} file(s) with {} unused import(s)\n",
            rows.len(),
            total
        )
        .bold()
    );
}

fn print_clean_summary(project_root: &Path, reports: &[CleanReport]) {
    let mut files_changed = 0;
    let mut total_removed = 0;

    for report in reports.iter().filter(|r| r.changed) {
        files_changed += 1;
        let specifiers: Vec<String> = report
            .removed
            .iter()
            .flat_map(|r| r.specifiers.iter().cloned())
            .collect();
        total_removed += specifiers.len();
        println!(
            "{}",
            format!(
                "✔ {} removed: {}",
                relative_display(project_root, &report.file),
                specifiers.join(", ")
            )
            .green()
        );
    }

    println!("\n{}", "Clean Summary".bold());
    println!("Files changed: {}", files_changed);
    println!("Total specifiers removed: {}", total_removed);
}

fn run_unused_code(args: &ScanArgs) -> anyhow::Result<()> {
    let (project_root, files, resolver) = prepare(args)?;
    let rules = FrameworkRules::default();

    println!(
        "{}",
        format!("Scanning for unused code in {}...", args.target.display()).blue()
    );

    let report = find_dead_code(&files, &resolver, &rules);

    if let Some(format) = args.format {
        let data = ExportData::from_dead_code(project_root, &report);
        print!("{}", export_to_string(format, &data)?);
        return Ok(());
    }

    if report.items.is_empty() {
        println!("{}", "✔ No unused code candidates found.".green().bold());
        return Ok(());
    }

    println!("{}", "\nUnused Code Candidates\n".cyan().bold());
    for item in &report.items {
        println!(
            "{} {} {} {}",
            relative_display(&project_root, &item.file).yellow(),
            item.name,
            item.kind.to_string().dimmed(),
            if item.exported {
                "exported".magenta().to_string()
            } else {
                String::new()
            }
        );
    }

    println!(
        "\nSummary: {} unused code candidate(s) across {} file(s), {} import link(s).",
        report.items.len(),
        report.files_analyzed,
        report.import_links
    );
    println!(
        "{}",
        "Note: Heuristic detection. Review before removal.".dimmed()
    );
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
