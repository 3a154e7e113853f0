use std::fs;
use std::path::PathBuf;

use clap::Parser;
use docdelta_diff::{DeleteAnchor, DiffOptions, MarkerStyle, diff_documents, format_markdown_report};
use docdelta_ir::parse_html;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "doc-diff")]
#[command(about = "Compare two HTML documents and print a change report")]
struct Cli {
    original: PathBuf,
    modified: PathBuf,

    /// Print the full diff result as JSON instead of a markdown report.
    #[arg(long)]
    json: bool,

    /// Skip the single-document `<ins>`/`<del>` rendering.
    #[arg(long)]
    no_inline_view: bool,

    /// Anchor end-of-document delete placeholders before the last token.
    #[arg(long)]
    legacy_delete_anchor: bool,

    #[arg(long, default_value = "span")]
    marker_tag: String,

    /// Write `original.html` and `modified.html` with highlights into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let original_text = fs::read_to_string(&cli.original)?;
    let modified_text = fs::read_to_string(&cli.modified)?;

    let mut original = parse_html(&original_text);
    original.metadata.source_name = Some(cli.original.display().to_string());
    let mut modified = parse_html(&modified_text);
    modified.metadata.source_name = Some(cli.modified.display().to_string());

    let delete_anchor = if cli.legacy_delete_anchor {
        DeleteAnchor::ClampToLastToken
    } else {
        DeleteAnchor::EndOfDocument
    };
    let options = DiffOptions::default()
        .with_delete_anchor(delete_anchor)
        .with_inline_view(!cli.no_inline_view)
        .with_markers(MarkerStyle {
            tag: cli.marker_tag.clone(),
            ..MarkerStyle::default()
        });

    let result = diff_documents(original, modified, &options)?;

    if let Some(dir) = &cli.out_dir {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("original.html"), &result.highlighted_original)?;
        fs::write(dir.join("modified.html"), &result.highlighted_modified)?;
        info!(dir = %dir.display(), "wrote highlighted documents");
    }

    if cli.json {
        println!("{}", result.to_json_pretty()?);
    } else {
        println!(
            "{}",
            format_markdown_report(
                &result,
                &cli.original.display().to_string(),
                &cli.modified.display().to_string(),
            )
        );
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter),
        )
        .init();
}
