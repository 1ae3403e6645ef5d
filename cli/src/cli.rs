use crate::commands::{
    add::AddCommand, delete::DeleteCommand, edit::EditCommand, import_export::ExportCommand,
    import_export::ImportCommand, list::ListCommand, open::OpenCommand, tags::TagsCommand,
    AppContext, CommandEnum,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tagmarks::error::Result;

#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Show the program version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Optional custom database file path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Optional custom configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Work on this user's collection instead of the configured owner
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    /// Show debug information
    #[arg(short = 'g', long = "debug")]
    pub debug: bool,

    /// Output format: json, yaml, toml, plain (default: colored)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Limit number of results shown
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only show bookmarks carrying all of these tags (when no subcommand is provided)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Search keywords (when no subcommand is provided)
    #[arg(name = "KEYWORD")]
    pub keywords: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new bookmark
    Add {
        /// URL to bookmark
        url: String,

        /// Comma-separated tags
        #[arg(short, long)]
        tag: Vec<String>,

        /// Bookmark title (fetched from the page when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Add without connecting to web
        #[arg(long)]
        offline: bool,
    },

    /// List bookmarks matching keywords and tags
    List {
        /// Case-insensitive substring matched against title and URL
        #[arg(num_args = 0..)]
        keywords: Vec<String>,

        /// Required tag; repeat to require several
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// Show every tag in use with its bookmark count
    Tags,

    /// Change fields of an existing bookmark
    Edit {
        /// Bookmark id or unique id prefix
        id: String,

        /// New URL
        #[arg(long)]
        url: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Replacement tags (comma-separated)
        #[arg(short, long)]
        tag: Option<Vec<String>>,
    },

    /// Delete bookmark(s)
    Delete {
        /// Bookmark ids or unique id prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Import bookmarks from a Netscape bookmark file (browser export)
    Import {
        /// Bookmark file path
        file: PathBuf,
    },

    /// Export bookmarks to a Netscape bookmark file
    Export {
        /// Output file path (default: bookmarks_<date>.html)
        file: Option<PathBuf>,

        /// Only export bookmarks carrying all of these tags
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// Open bookmark(s) in the default browser
    Open {
        /// Bookmark ids or unique id prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

impl Cli {
    /// The command to run; a bare invocation lists with the top-level keywords and tags
    pub fn into_command(self) -> CommandEnum {
        let format = self.format;
        match self.command {
            None => CommandEnum::List(ListCommand {
                query: self.keywords,
                tags: self.tags,
                limit: self.limit,
                format,
            }),
            Some(Commands::List { keywords, tag }) => CommandEnum::List(ListCommand {
                query: keywords,
                tags: tag,
                limit: self.limit,
                format,
            }),
            Some(Commands::Add {
                url,
                tag,
                title,
                offline,
            }) => CommandEnum::Add(AddCommand {
                url,
                tag,
                title,
                offline,
            }),
            Some(Commands::Tags) => CommandEnum::Tags(TagsCommand { format }),
            Some(Commands::Edit {
                id,
                url,
                title,
                tag,
            }) => CommandEnum::Edit(EditCommand { id, url, title, tag }),
            Some(Commands::Delete { ids, force }) => {
                CommandEnum::Delete(DeleteCommand { ids, force })
            }
            Some(Commands::Import { file }) => CommandEnum::Import(ImportCommand { file }),
            Some(Commands::Export { file, tag }) => {
                CommandEnum::Export(ExportCommand { file, tags: tag })
            }
            Some(Commands::Open { ids }) => CommandEnum::Open(OpenCommand { ids }),
        }
    }
}

pub async fn handle_args(cli: Cli, ctx: &AppContext<'_>) -> Result<()> {
    cli.into_command().execute(ctx).await
}
