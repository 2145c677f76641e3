use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task;
use tracing_subscriber::EnvFilter;

use crate::api::{self, PhotoSummary};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::gallery::GalleryEvent;
use crate::output::{self, OutputFormat};
use crate::runner::{Options, Runner, ScrollMode};

fn print_banner() {
    const BANNER: &str = r#"
        _                                 ____
   ____(_)______ ____ ____ _    ___ ____ _/ / /__ ______ __
  / _ \/ / __(_-</ // /  ' \  / _ `/ _ `/ / / -_) __/ // /
 / .__/_/\__/___/\_,_/_/_/_/  \_, /\_,_/_/_/\__/_/  \_, /
/_/                          /___/                 /___/
"#;
    print!("{}", BANNER);
    println!(
        "        v{} - infinite-scrolling photo gallery",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("picsum_gallery={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    id: Option<String>,
    base_url: String,
    timeout: Option<u64>,
    proxy: Option<String>,
    header: Option<String>,
    pages: u32,
    interactive: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    no_color: bool,
}

impl RunConfig {
    fn options(&self) -> Options {
        Options {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout,
            proxy: self.proxy.clone(),
            header: self.header.clone(),
            max_pages: self.pages,
            scroll: if self.interactive {
                ScrollMode::Interactive
            } else {
                ScrollMode::Auto
            },
        }
    }

    fn resolved_output_format(&self) -> Option<(String, OutputFormat)> {
        let path = self.output.as_ref()?;
        let format = self
            .output_format
            .or_else(|| output::infer_format_from_path(path))
            .unwrap_or(OutputFormat::Text);
        Some((path.clone(), format))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let base_url = non_empty(args.base_url)
        .or(non_empty(cfg.base_url))
        .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());
    let base_url = crate::utils::normalize_base_url(&base_url)
        .map_err(|e| format!("invalid base_url '{base_url}': {e}"))?;

    let header = non_empty(args.header).or(non_empty(cfg.header));
    if let Some(raw) = header.as_deref() {
        crate::utils::parse_header(raw).map_err(|e| format!("invalid header '{raw}': {e}"))?;
    }

    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output_format '{raw}'"))?,
        ),
        None => None,
    };

    Ok(RunConfig {
        id: args.id.map(|id| id.trim().to_string()),
        base_url,
        timeout: args.timeout.or(cfg.timeout).filter(|t| *t > 0),
        proxy: non_empty(args.proxy).or(non_empty(cfg.proxy)),
        header,
        pages: args.pages.or(cfg.pages).unwrap_or(3),
        interactive: args.interactive || cfg.interactive.unwrap_or(false),
        output: non_empty(args.output).or(non_empty(cfg.output)),
        output_format,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn spinner() -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg}")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    Ok(pb)
}

fn print_photo(pb: &ProgressBar, photo: &PhotoSummary) {
    pb.println(format!(
        "  {:>6}  {}  {}",
        photo.id.bold().white(),
        photo.author.green(),
        format!("{}x{}", photo.width, photo.height).dimmed(),
    ));
}

async fn render_events(
    pb: ProgressBar,
    mut events: mpsc::UnboundedReceiver<GalleryEvent>,
    interactive: bool,
) {
    while let Some(event) = events.recv().await {
        match event {
            GalleryEvent::LoadStarted { page } => {
                pb.enable_steady_tick(Duration::from_millis(120));
                pb.set_message(format!("Loading more photos... (page {page})"));
            }
            GalleryEvent::PageMerged { page, appended } => {
                pb.disable_steady_tick();
                pb.set_message("");
                for photo in appended.iter() {
                    print_photo(&pb, photo);
                }
                pb.println(format!(
                    "{}",
                    format!(":: page {page} :: {} new photos", appended.len()).dimmed()
                ));
                if interactive {
                    pb.println(format!("{}", ":: press Enter to load more".cyan()));
                }
            }
            GalleryEvent::Exhausted { .. } => {
                pb.disable_steady_tick();
                pb.set_message("");
                pb.println(format!(
                    "{}",
                    "You have reached the end of the list.".dimmed()
                ));
            }
            GalleryEvent::LoadFailed { page } => {
                pb.disable_steady_tick();
                pb.set_message("");
                pb.println(format!(
                    "{}",
                    format!(":: failed to load page {page}").red()
                ));
            }
        }
    }
    pb.finish_and_clear();
}

async fn write_output(path: &str, rendered: &[u8]) -> Result<(), String> {
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())
}

async fn run_detail(run: &RunConfig, runner: &Runner, id: &str) -> Result<(), String> {
    let pb = spinner()?;
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Loading photo {id}..."));
    let photo = runner.detail(id).await;
    pb.finish_and_clear();

    match photo.as_ref() {
        Some(p) => {
            println!("{}", format!("The Beauty of Nature #{}", p.id).bold());
            println!("By: {}", p.author.blue());
            println!();
            println!("{}", output::detail_description(p));
            println!();
            format_kv_line("Image", &p.download_url);
            format_kv_line("Source", &p.url);
        }
        None => println!("Photo not found."),
    }

    if let Some((path, format)) = run.resolved_output_format() {
        write_output(&path, &output::render_detail(format, photo.as_ref())).await?;
    }
    Ok(())
}

async fn run_gallery(run: &RunConfig, runner: &Runner) -> Result<(), String> {
    let pb = spinner()?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let render_handle = task::spawn(render_events(pb, event_rx, run.interactive));

    let result = runner
        .browse(Some(event_tx))
        .await
        .map_err(|e| e.to_string())?;
    let _ = render_handle.await;

    println!();
    println!(
        ":: Completed :: {} photos from {} pages in {}s ::",
        result.photos.len(),
        result.pages_loaded,
        result.elapsed.as_secs()
    );

    if let Some((path, format)) = run.resolved_output_format() {
        let report = output::build_gallery_report(
            &run.base_url,
            &result.photos,
            result.last_page,
            result.exhausted,
        );
        write_output(&path, &output::render_gallery(format, &report)).await?;
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();
    format_kv_line("API", &run.base_url);
    match run.id.as_deref() {
        Some(id) => format_kv_line("Photo", id),
        None => {
            let pages = if run.pages == 0 {
                "all".to_string()
            } else {
                run.pages.to_string()
            };
            format_kv_line("Pages", &pages);
            format_kv_line("Interactive", format_bool(run.interactive));
        }
    }
    if let Some(path) = run.output.as_deref() {
        format_kv_line("Output", path);
    }
    println!();

    let runner = Runner::new(run.options()).map_err(|e| e.to_string())?;
    match run.id.clone() {
        Some(id) => run_detail(&run, &runner, &id).await,
        None => run_gallery(&run, &runner).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    if args.write_config {
        let path = config::default_config_path()
            .ok_or_else(|| "could not determine home directory".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("config written to {}", path.display());
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_apply_without_flags_or_config() {
        let args = CliArgs::parse_from(["picsum-gallery"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.base_url, "https://picsum.photos");
        assert_eq!(run.pages, 3);
        assert_eq!(run.timeout, None);
        assert!(!run.interactive);
        assert!(run.id.is_none());
        assert!(run.resolved_output_format().is_none());
    }

    #[test]
    fn cli_flags_override_config() {
        let args = CliArgs::parse_from([
            "picsum-gallery",
            "--pages",
            "0",
            "--base-url",
            "http://127.0.0.1:9000/",
        ]);
        let cfg = ConfigFile {
            pages: Some(7),
            base_url: Some("https://example.com".to_string()),
            timeout: Some(4),
            ..ConfigFile::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.pages, 0);
        assert_eq!(run.base_url, "http://127.0.0.1:9000");
        assert_eq!(run.timeout, Some(4));
    }

    #[test]
    fn output_format_is_inferred_from_path() {
        let args = CliArgs::parse_from(["picsum-gallery", "-o", "gallery.html"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(
            run.resolved_output_format(),
            Some(("gallery.html".to_string(), OutputFormat::Html))
        );

        let args = CliArgs::parse_from(["picsum-gallery", "-o", "gallery", "--of", "json"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(
            run.resolved_output_format(),
            Some(("gallery".to_string(), OutputFormat::Json))
        );
    }

    #[test]
    fn detail_mode_rejects_bad_ids() {
        let args = CliArgs::parse_from(["picsum-gallery", "--id", "1/2"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());

        let args = CliArgs::parse_from(["picsum-gallery", "--id", " 237 "]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.id.as_deref(), Some("237"));
    }

    #[test]
    fn invalid_config_header_is_rejected() {
        let cfg = ConfigFile {
            header: Some("missing-colon".to_string()),
            ..ConfigFile::default()
        };
        let args = CliArgs::parse_from(["picsum-gallery"]);
        assert!(build_run_config(args, cfg).is_err());
    }

    #[test]
    fn zero_timeout_means_none() {
        let args = CliArgs::parse_from(["picsum-gallery", "--timeout", "0"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.timeout, None);
        assert!(matches!(run.options().scroll, ScrollMode::Auto));
    }
}
