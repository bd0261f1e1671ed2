mod cli;

use mediavault::config;
use mediavault::library::Upload;
use mediavault::vault::Vault;
use mediavault_common::ObjectId;
use mediavault_db::models::ObjectFilter;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Write;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediavault=trace,mediavault_av=debug,mediavault_db=debug,mediavault_common=debug"
                .to_string()
        } else {
            "mediavault=info,mediavault_av=info,mediavault_db=warn".to_string()
        }
    });

    // Logs go to stderr so `fetch` can stream bytes on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ingest {
            file,
            name,
            mime,
            description,
            tags,
        } => {
            let upload = read_upload(&file, name, mime, description, tags)?;
            ingest(config_path, upload)
        }
        Commands::List {
            name,
            gallery,
            mime,
            cursor,
            limit,
            all,
            json,
        } => {
            let mut filter = ObjectFilter::all();
            if let Some(name) = name {
                filter = filter.with_name(name);
            }
            if gallery {
                filter = filter.gallery();
            }
            if let Some(mime) = mime {
                filter = filter.with_mime(mime);
            }
            list(config_path, &filter, cursor, limit, all, json)
        }
        Commands::Fetch { name, size, output } => {
            fetch(config_path, &name, size, output.as_deref())
        }
        Commands::Show { id, json } => show(config_path, id, json),
        Commands::Rename { id, new_name } => {
            let vault = open_vault(config_path)?;
            let renamed = vault.library.rename(id, &new_name)?;
            println!("Renamed {} to {}", id, renamed.name);
            Ok(())
        }
        Commands::Delete { id } => {
            let vault = open_vault(config_path)?;
            let deleted = vault.library.delete(id)?;
            println!("Deleted {} ({})", deleted.name, deleted.id);
            Ok(())
        }
        Commands::GenerateName {
            template,
            extension,
        } => {
            let config = config::load_config_or_default(config_path)?;
            let vault = Vault::open(&config)?;
            let template = template.unwrap_or(config.naming.template);
            let name = vault.names.generate_unique_name(&template, &extension)?;
            println!("{}", name);
            Ok(())
        }
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediavault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_vault(config_path: Option<&Path>) -> Result<Vault> {
    let config = config::load_config_or_default(config_path)?;
    Ok(Vault::open(&config)?)
}

fn read_upload(
    file: &Path,
    name: Option<String>,
    mime: Option<String>,
    description: String,
    tags: Vec<String>,
) -> Result<Upload> {
    if !file.exists() {
        anyhow::bail!("Input file does not exist: {:?}", file);
    }

    let data = std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Upload {
        file_name,
        mime,
        data,
        name,
        description,
        tags,
    })
}

fn ingest(config_path: Option<&Path>, upload: Upload) -> Result<()> {
    let vault = open_vault(config_path)?;
    let ingested = vault.library.ingest(upload)?;

    println!("{}", ingested.name);
    println!("  id:  {}", ingested.id);
    println!("  url: {}", ingested.url);
    Ok(())
}

fn list(
    config_path: Option<&Path>,
    filter: &ObjectFilter,
    cursor: Option<ObjectId>,
    limit: Option<u32>,
    all: bool,
    json: bool,
) -> Result<()> {
    let vault = open_vault(config_path)?;

    // A fresh listing pins its cursor first so the count and pages agree.
    let (item_count, mut cursor) = match cursor {
        Some(cursor) => (None, Some(cursor)),
        None => {
            let init = vault.listing.init_page(filter)?;
            (Some(init.item_count), init.initial_cursor)
        }
    };

    let mut items = Vec::new();
    let mut next_cursor = None;
    while let Some(current) = cursor.take() {
        let page = vault.listing.get_page(filter, Some(current), limit)?;
        items.extend(page.items);
        next_cursor = page.next_cursor;
        if all {
            cursor = page.next_cursor;
        }
    }

    if json {
        let value = serde_json::json!({
            "itemCount": item_count,
            "items": items,
            "nextCursor": next_cursor,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(count) = item_count {
        println!("{} item(s)", count);
    }

    for object in &items {
        print!("{:>6}  {:<32}  {:<24}", object.id, object.name, object.mime);
        if !object.tags.is_empty() {
            print!("  [{}]", object.tags.join(", "));
        }
        println!();
    }

    if let Some(next) = next_cursor {
        println!("\nMore available: --cursor {}", next);
    }

    Ok(())
}

fn fetch(
    config_path: Option<&Path>,
    name: &str,
    size: Option<u32>,
    output: Option<&Path>,
) -> Result<()> {
    let vault = open_vault(config_path)?;
    let media = vault
        .delivery
        .resolve_media(name, size)
        .map_err(user_facing)?;

    tracing::info!("Delivering {} ({}, {} bytes)", name, media.mime, media.bytes.len());

    match output {
        Some(path) => std::fs::write(path, &media.bytes)
            .with_context(|| format!("Failed to write {:?}", path))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&media.bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Keep user-facing delivery errors and rejected arguments; anything else is
/// logged and reported as an internal error.
fn user_facing(err: mediavault::Error) -> anyhow::Error {
    if err.is_user_visible() || matches!(err, mediavault::Error::InvalidInput(_)) {
        anyhow::Error::new(err)
    } else {
        tracing::error!("Delivery failed: {}", err);
        anyhow::anyhow!("internal error")
    }
}

fn show(config_path: Option<&Path>, id: ObjectId, json: bool) -> Result<()> {
    let vault = open_vault(config_path)?;
    let Some(object) = vault.library.detail(id)? else {
        anyhow::bail!("No object with id {}", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&object)?);
        return Ok(());
    }

    println!("Name: {}", object.name);
    println!("Id: {}", object.id);
    println!("Mime: {} ({})", object.mime, object.family());
    println!("Stored at: {}", object.path);
    println!("Created: {}", object.created_at.to_rfc3339());
    println!("Url: {}", mediavault::library::object_url(&object.name));
    if !object.description.is_empty() {
        println!("Description: {}", object.description);
    }
    if !object.tags.is_empty() {
        println!("Tags: {}", object.tags.join(", "));
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let mut tools = mediavault_av::check_tools();
    if let Some(ffmpeg) = &config.delivery.ffmpeg_path {
        tools.retain(|t| t.name != "ffmpeg");
        tools.insert(0, mediavault_av::check_tool(&ffmpeg.to_string_lossy()));
    }

    let mut all_ok = true;
    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(version) = tool.version_number() {
            print!(" {}", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All tools are available!");
    } else {
        println!("Some tools are missing. Videos will be served without thumbnails.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Database: {}", config.storage.database.display());
    println!("  Storage root: {}", config.storage.root_dir.display());
    println!("  Naming template: {}", config.naming.template);
    println!("  Name attempts: {}", config.naming.max_attempts);
    println!("  Cache capacity: {}", config.delivery.cache_capacity);
    println!("  Max thumbnail size: {}", config.delivery.max_thumbnail_size);
    println!(
        "  Page size: {} (max {})",
        config.listing.default_limit, config.listing.max_limit
    );

    Ok(())
}
