//! Render implementor listings from generated fragments
//!
//! Run with: cargo run --example render_implementors <DOC_DIR | FRAGMENT.js>...
//!
//! Examples:
//!   cargo run --example render_implementors target/doc/implementors
//!   cargo run --example render_implementors target/doc/implementors/core/borrow/trait.Borrow.js
//!
//! Fragments are loaded concurrently and buffered; the renderer is installed
//! halfway through to show both buffered and live delivery.

use std::path::PathBuf;
use std::sync::Arc;

use implementors_rs::implementors::LibraryMapping;
use implementors_rs::registry::{ImplementorRegistry, RenderError};
use implementors_rs::FragmentLoader;

/// Drop markup and decode the few entities rustdoc emits
fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn render(mapping: LibraryMapping) -> Result<(), RenderError> {
    for (library, records) in mapping.iter() {
        println!("{}", library);
        for record in records {
            let text = record
                .html_str()
                .map(plain_text)
                .unwrap_or_else(|| "<binary>".to_string());
            let marker = if record.is_synthetic { " (auto)" } else { "" };
            println!("  {}{}", text, marker);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("implementors_rs=info".parse()?),
        )
        .init();

    let args: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if args.is_empty() {
        eprintln!("usage: render_implementors <DOC_DIR | FRAGMENT.js>...");
        std::process::exit(2);
    }

    let mut paths = Vec::new();
    for arg in args {
        if arg.is_dir() {
            paths.extend(FragmentLoader::discover(&arg).await?);
        } else {
            paths.push(arg);
        }
    }

    let registry = Arc::new(ImplementorRegistry::new());
    let loader = FragmentLoader::new(Arc::clone(&registry));

    let split = paths.len() / 2;
    let (early, late) = paths.split_at(split);

    let buffered = loader.load_all(early).await?;
    println!("Buffered {} fragments before the renderer was ready\n", buffered);

    registry.install(render)?;
    loader.load_all(late).await?;

    let stats = registry.stats();
    println!(
        "\nDelivered {} of {} fragments ({} buffered)",
        stats.delivered, stats.submitted, stats.buffered
    );

    Ok(())
}
