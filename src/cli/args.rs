use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "smart-facts",
    version,
    about = "Smart Facts dashboard builder",
    long_about = "Builds a self-contained Smart Facts dashboard (search, status/type filters, grid and list views, CSV export) from the insight catalogue.\n\nExamples:\n  smart-facts\n  smart-facts -s ~/src/hometap -o site/index.html\n  smart-facts -o exports/ --status live --type dynamic\n  CODEBASE_PATH=./data/insights.json smart-facts -o facts.json\n\nTip: Use --init-config to write ~/.smart-facts/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

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
        help = "Write the dashboard (or export) to a file. A directory receives the dated CSV name."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (html, csv, json). Inferred from the output extension."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 's',
        long = "src",
        visible_alias = "source",
        value_name = "PATH",
        help_heading = "Input",
        help = "Insight source: a .json/.yml file or a codebase directory (overrides CODEBASE_PATH)."
    )]
    pub source: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.smart-facts/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file (if missing) and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'q',
        long = "sq",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive substring match on ID or content (csv/json output)."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'S',
        long = "st",
        visible_alias = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Only export insights with this status (live, review, draft, retired, archived)."
    )]
    pub status: Option<String>,

    #[arg(
        short = 't',
        long = "ty",
        visible_alias = "type",
        value_name = "TYPE",
        help_heading = "Filters",
        help = "Only export static or dynamic insights."
    )]
    pub content_type: Option<String>,
}
