use clap::{Parser, Subcommand};
use mediavault_common::ObjectId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediavault")]
#[command(author, version, about = "Self-hosted media vault")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a file to the vault
    Ingest {
        /// File to upload
        #[arg(required = true)]
        file: PathBuf,

        /// Explicit name (generated from the naming template if omitted)
        #[arg(long)]
        name: Option<String>,

        /// Content type (derived from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List objects, newest first
    List {
        /// Only names containing this text
        #[arg(long)]
        name: Option<String>,

        /// Only images and videos
        #[arg(long, conflicts_with = "mime")]
        gallery: bool,

        /// Only mime types containing this text
        #[arg(long)]
        mime: Option<String>,

        /// Continue from a cursor returned by a previous page
        #[arg(long)]
        cursor: Option<ObjectId>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Keep fetching pages until the listing is exhausted
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch an object by name, optionally as a thumbnail
    Fetch {
        /// Object name
        #[arg(required = true)]
        name: String,

        /// Thumbnail size in pixels (larger side)
        #[arg(short, long)]
        size: Option<u32>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show an object's details
    Show {
        id: ObjectId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename an object
    Rename { id: ObjectId, new_name: String },

    /// Delete an object and its stored file
    Delete { id: ObjectId },

    /// Generate a free name without ingesting anything
    GenerateName {
        /// Template to resolve (uses the configured one if omitted)
        #[arg(long)]
        template: Option<String>,

        /// Extension to append, e.g. `.png`
        #[arg(long, default_value = "")]
        extension: String,
    },

    /// Check that optional external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
