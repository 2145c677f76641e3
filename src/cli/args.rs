use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "picsum-gallery",
    version,
    about = "infinite-scrolling Lorem Picsum gallery client",
    long_about = "picsum-gallery pages through the Lorem Picsum listing 20 photos at a time, drops photos it has already seen, and prints the growing gallery. Pass --id to show a single photo instead.\n\nExamples:\n  picsum-gallery\n  picsum-gallery --pages 0 -o gallery.html\n  picsum-gallery --interactive\n  picsum-gallery --id 237\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the gallery (or photo) to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, xml, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'i',
        long = "id",
        value_name = "ID",
        help_heading = "Gallery",
        help = "Show the detail view of a single photo instead of the gallery."
    )]
    pub id: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "pages",
        value_name = "N",
        help_heading = "Gallery",
        help = "Pages of 20 photos to load (0 = until the listing ends)."
    )]
    pub pages: Option<u32>,

    #[arg(
        short = 'I',
        long = "int",
        visible_alias = "interactive",
        help_heading = "Gallery",
        help = "Wait for Enter before scrolling to the next page."
    )]
    pub interactive: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.picsum-gallery/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "wc",
        visible_alias = "write-config",
        help_heading = "Config",
        help = "Write a default config file to ~/.picsum-gallery/config.yml and exit."
    )]
    pub write_config: bool,

    #[arg(
        short = 'b',
        long = "bu",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Base URL of the photo API."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds (0 = wait forever)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        help_heading = "HTTP",
        help = "Add a header to all requests (format: 'Key: Value')."
    )]
    pub header: Option<String>,
}
