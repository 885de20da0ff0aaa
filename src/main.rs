use clap::Parser as _;
use page_harvest::page::parse_base_url;
use page_harvest::parsers::text::visible_text;
use page_harvest::{HarvestConfig, Parser, Result, find_sentences_with_word};
use serde_json::{Map, Value, json};

mod args;
use args::{Args, Source, convert_source};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    }
    .with_env_overrides();

    // Command-line flags take precedence over the file
    if args.webdriver {
        config.fetch.use_webdriver = true;
    }
    if args.case_insensitive {
        config.parse.case_insensitive_tags = true;
    }
    if args.raw_whitespace {
        config.parse.normalize_whitespace = false;
    }
    if args.keep_duplicates {
        config.download.remove_duplicates = false;
    }

    let source = convert_source(&args.source);
    ::log::info!("Parsing {:?}", source);

    let payload = match &source {
        Source::Url(url) => page_harvest::fetch::fetch_with_config(url, &config.fetch).await?,
        Source::File(path) => tokio::fs::read_to_string(path).await?,
        Source::Stdin => std::io::read_to_string(std::io::stdin())?,
    };

    let parser = Parser::with_options(&payload, args.title.as_deref(), &config.parse);
    for skipped in parser.skipped() {
        ::log::warn!("Skipped <{}>: {}", skipped.tag, skipped.reason);
    }

    if !args.has_queries() {
        println!("{}", serde_json::to_string_pretty(parser.page())?);
        return Ok(());
    }

    let mut output = Map::new();

    if args.urls {
        output.insert(
            "urls".to_string(),
            json!(parser.extract_urls(!args.keep_duplicates)),
        );
    }

    if args.tables {
        output.insert(
            "tables".to_string(),
            serde_json::to_value(parser.extract_tables_to_object(args.table_index))?,
        );
    }

    if let Some(word) = &args.find {
        let text = visible_text(&parser.page().body);
        output.insert(
            "sentences".to_string(),
            json!(find_sentences_with_word(&text, word)),
        );
    }

    if let Some(tag) = args.kind {
        output.insert(
            "elements".to_string(),
            serde_json::to_value(parser.find_elements(tag))?,
        );
    }

    if let Some(dir) = &args.download {
        let base = match (&args.base, &source) {
            (Some(base), _) => Some(parse_base_url(base)?),
            (None, Source::Url(url)) => Some(parse_base_url(url)?),
            (None, _) => None,
        };
        let report = parser.extract_images(dir, base.as_ref(), &config).await?;
        output.insert("download".to_string(), serde_json::to_value(report)?);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}
