use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "marksift",
    about = "Sift browser bookmark exports into a categorized, searchable catalog",
    version
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a browser bookmark export (Netscape HTML format)
    Import {
        /// Path to the exported bookmarks file
        file: String,
    },

    /// Classify unprocessed entries in batches via the classification service
    Enrich,

    /// Search the catalog
    Search {
        /// Free-text query over title, description and tags
        query: Option<String>,

        /// Restrict to a category facet ("All", a category name, or "Uncategorized")
        #[arg(long)]
        category: Option<String>,

        /// Print the match count instead of the entries
        #[arg(long)]
        count: bool,
    },

    /// List category facets present in the catalog
    Categories,

    /// Delete an entry by id
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Catalog totals, overall and per category
    Stats,
}
