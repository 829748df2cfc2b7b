use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::coordinator::{self, Editor, OutputSurface, SessionState};
use crate::diagnostics::DiagnosticReport;
use crate::executor::Interpreter;
use crate::host::{Script, ScriptHost};
use crate::render::{html, text, Section};

#[derive(Parser)]
#[command(name = "cauldron")]
#[command(about = "Cauldron - an interactive script scratchpad", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a script and list its diagnostics
    Check {
        /// Script file
        file: PathBuf,

        /// Stdlib module to import (repeatable; defaults to config)
        #[arg(short = 'i', long = "import")]
        imports: Vec<String>,
    },

    /// Run a script, streaming its dumped values
    Run {
        /// Script file
        file: PathBuf,

        /// Stdlib module to import (repeatable; defaults to config)
        #[arg(short = 'i', long = "import")]
        imports: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rebuild a script whenever the file changes
    Watch {
        /// Script file
        file: PathBuf,

        /// Stdlib module to import (repeatable; defaults to config)
        #[arg(short = 'i', long = "import")]
        imports: Vec<String>,

    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

/// Run the CLI by parsing process arguments
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli).await
}

/// Run the CLI with provided arguments
pub async fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli).await
}

async fn run_cli_with_args(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();

    // Load config before any command so errors surface first
    let config = Config::builder()
        .config_path(cli.config.as_ref().map(PathBuf::from))
        .build()
        .context("Failed to load configuration")?;
    init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Check { file, imports } => {
            let imports = resolve_imports(imports, &config);
            let source = read_script(&file)?;
            let script = Script::new(source);

            let host = ScriptHost::new(Interpreter::new());
            let diagnostics = host.build(&script, &imports);
            let report = DiagnosticReport::new(script.text(), diagnostics);

            print!("{}", format_report(&file.display().to_string(), &report));
            if report.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Run {
            file,
            imports,
            format,
        } => {
            let imports = resolve_imports(imports, &config);
            let state = run_script(&file, imports, format, &config).await?;
            match state {
                SessionState::Completed => {}
                SessionState::Cancelled => {
                    eprintln!("Run cancelled");
                    std::process::exit(130);
                }
                _ => std::process::exit(1),
            }
        }

        Commands::Watch { file, imports } => {
            let imports = resolve_imports(imports, &config);
            watch_script(&file, imports, &config).await?;
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_imports(imports: Vec<String>, config: &Config) -> Vec<String> {
    if imports.is_empty() {
        config.script.imports.clone()
    } else {
        imports
    }
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))
}

/* ===================== Run ===================== */

async fn run_script(
    path: &Path,
    imports: Vec<String>,
    format: OutputFormat,
    config: &Config,
) -> Result<SessionState> {
    let text = read_script(path)?;
    let mut settings = config.coordinator();
    settings.imports = imports;

    let handle = coordinator::spawn(
        ScriptHost::new(Interpreter::new()),
        FileEditor::new(text),
        TerminalOutput::new(format),
        settings,
    );

    let finished = handle.run_to_end(false);
    tokio::pin!(finished);

    let record = loop {
        tokio::select! {
            record = &mut finished => break record?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                eprintln!("Cancelling run...");
                handle.cancel()?;
            }
        }
    };

    if format == OutputFormat::Html {
        println!("{}", html::render_document(&record.sections));
    }
    handle.shutdown().await?;

    Ok(record.state)
}

/* ===================== Watch ===================== */

async fn watch_script(path: &Path, imports: Vec<String>, config: &Config) -> Result<()> {
    let initial = read_script(path)?;
    let text = Arc::new(Mutex::new(initial));
    let mut settings = config.coordinator();
    settings.imports = imports;

    let editor = FileEditor::shared(Arc::clone(&text), path.display().to_string());
    let handle = coordinator::spawn(
        ScriptHost::new(Interpreter::new()),
        editor,
        TerminalOutput::new(OutputFormat::Text),
        settings,
    );

    let (tx, mut changes) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| {
            let _ = tx.send(result);
        },
        notify::Config::default(),
    )
    .context("Failed to initialize file watcher")?;

    // Editors often save by replacing the file, so watch its directory
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    eprintln!("Watching {} (Ctrl-C to stop)", path.display());
    handle.text_changed()?;

    loop {
        tokio::select! {
            Some(result) = changes.recv() => match result {
                Ok(event) if affects_script(&event, path) => {
                    let current = match tokio::fs::read_to_string(path).await {
                        Ok(current) => current,
                        Err(err) => {
                            tracing::warn!(path = %path.display(), error = %err, "failed to read script");
                            continue;
                        }
                    };
                    *text.lock().unwrap_or_else(PoisonError::into_inner) = current;
                    handle.text_changed()?;
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "file watcher error"),
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    drop(watcher);
    handle.shutdown().await?;
    Ok(())
}

/// Whether a watcher event may have changed the script's contents
fn affects_script(event: &Event, path: &Path) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    if event.paths.is_empty() {
        return true;
    }
    let name = path.file_name();
    event
        .paths
        .iter()
        .any(|changed| changed == path || (name.is_some() && changed.file_name() == name))
}

/* ===================== Terminal surfaces ===================== */

/// Editor backed by a file's contents
///
/// A watching editor prints every diagnostics report it receives.
struct FileEditor {
    text: Arc<Mutex<String>>,
    label: Option<String>,
}

impl FileEditor {
    fn new(text: String) -> Self {
        Self {
            text: Arc::new(Mutex::new(text)),
            label: None,
        }
    }

    fn shared(text: Arc<Mutex<String>>, label: String) -> Self {
        Self {
            text,
            label: Some(label),
        }
    }
}

impl Editor for FileEditor {
    fn current_text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn selection(&self) -> (usize, usize) {
        (0, 0)
    }

    fn report_diagnostics(&mut self, report: &DiagnosticReport) {
        if let Some(label) = &self.label {
            println!("[{}]", chrono::Local::now().format("%H:%M:%S"));
            print!("{}", format_report(label, report));
        }
    }

    fn set_run_enabled(&mut self, _enabled: bool) {}
}

/// Output panel printing to stdout
///
/// Text and JSON stream each section as it arrives; HTML is printed as one
/// document after the run.
struct TerminalOutput {
    format: OutputFormat,
    sections: usize,
}

impl TerminalOutput {
    fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sections: 0,
        }
    }
}

impl OutputSurface for TerminalOutput {
    fn reset(&mut self) {
        self.sections = 0;
    }

    fn append(&mut self, section: &Section) {
        if let Some(rendered) = format_section(self.format, section, self.sections == 0) {
            println!("{}", rendered);
        }
        self.sections += 1;
    }
}

/// Terminal form of one output section, `None` when the format prints later
fn format_section(format: OutputFormat, section: &Section, first: bool) -> Option<String> {
    match format {
        OutputFormat::Text if first => Some(text::render_section(section)),
        OutputFormat::Text => Some(format!("\n{}", text::render_section(section))),
        OutputFormat::Json => serde_json::to_string(section).ok(),
        OutputFormat::Html => None,
    }
}

/// Diagnostics grouped by severity, followed by the counts line
fn format_report(label: &str, report: &DiagnosticReport) -> String {
    let mut out = String::new();
    for group in report.groups() {
        if group.entries.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({})\n", group.heading, group.entries.len()));
        for entry in &group.entries {
            out.push_str(&format!(
                "  {}:{}:{}  {}\n",
                label, entry.line, entry.column, entry.label
            ));
        }
    }
    out.push_str(&format!("{}\n", report.counts));
    out
}
