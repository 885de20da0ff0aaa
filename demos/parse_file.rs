use clap::Parser as _;
use page_harvest::{HarvestConfig, Parser, TableObjects};
use std::error::Error;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTML file to parse
    #[arg(short, long)]
    file: PathBuf,

    /// Path to JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Word to look for in the page's paragraphs
    #[arg(short, long)]
    word: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };

    let html = std::fs::read_to_string(&args.file)?;
    let parser = Parser::with_options(&html, None, &config.parse);
    let page = parser.page();

    println!("Title: {}", page.title);
    println!("  Meta tags: {}", page.meta.len());
    println!("  Images: {}", page.media.images.len());
    println!("  Anchors: {}", page.links.anchors.len());
    println!("  Scripts: {}", page.scripts.len());
    println!("  Tables: {}", page.tables.len());
    println!("  Skipped tags: {}", parser.skipped().len());

    println!("URLs:");
    for url in parser.extract_urls(config.download.remove_duplicates) {
        println!("  {}", url);
    }

    match parser.extract_tables_to_object(None) {
        TableObjects::Single(records) => {
            println!("Table records:");
            for record in records {
                println!("  {}", serde_json::to_string(&record)?);
            }
        }
        TableObjects::Multiple(tables) => {
            for (i, records) in tables.iter().enumerate() {
                println!("Table {} records:", i);
                for record in records {
                    println!("  {}", serde_json::to_string(record)?);
                }
            }
        }
    }

    if let Some(word) = &args.word {
        println!("Sentences containing {:?}:", word);
        for paragraph in parser.find_elements(page_harvest::TagName::P) {
            let body = paragraph.body.unwrap_or_default();
            for sentence in page_harvest::find_sentences_with_word(&body, word) {
                println!("  {}", sentence);
            }
        }
    }

    Ok(())
}
