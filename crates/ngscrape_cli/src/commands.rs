use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ngscrape_engine::{
    asset_basename, media_extension, Extractor, GamePage, ReqwestFetcher, ScrapeConfig,
};
use ngscrape_logging::{scrape_info, scrape_warn};
use serde::Serialize;
use tokio::task::JoinSet;

use crate::cli::{Cli, Command};

const DEFAULT_MEDIA_EXTENSION: &str = ".swf";

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = cli.scrape_config();
    match cli.command {
        Command::Show { url, json } => {
            let extractor = build_extractor(config);
            let page = extractor
                .scrape_page(&url)
                .await
                .with_context(|| format!("failed to scrape {url}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&PageJson::from(&page))?);
            } else {
                print_page(&page);
            }
        }
        Command::Download {
            url,
            dir,
            name,
            card,
        } => {
            // Title, game link and card all come from the same page.
            config.cache = true;
            let extractor = build_extractor(config);
            download(&extractor, &url, &dir, name, card).await?;
        }
        Command::Scan {
            start,
            end,
            workers,
            base,
        } => {
            if start > end {
                bail!("scan range is empty: start {start} is after end {end}");
            }
            let extractor = Arc::new(build_extractor(config));
            let found = scan(extractor, &base, split_range(start, end, workers)).await?;
            scrape_info!("Scan of {start}..={end} found {found} described games");
        }
    }
    Ok(())
}

fn build_extractor(config: ScrapeConfig) -> Extractor {
    Extractor::new(config, Arc::new(ReqwestFetcher::default()))
}

#[derive(Debug, Serialize)]
struct PageJson<'a> {
    url: &'a str,
    title: &'a str,
    description: Option<&'a str>,
    card_url: Option<&'a str>,
    media_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_error: Option<String>,
}

impl<'a> From<&'a GamePage> for PageJson<'a> {
    fn from(page: &'a GamePage) -> Self {
        let (media_url, media_error) = match &page.media_url {
            Ok(url) => (url.as_deref(), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            url: &page.url,
            title: &page.title,
            description: page.description.as_deref(),
            card_url: page.card_url.as_deref(),
            media_url,
            media_error,
        }
    }
}

fn print_page(page: &GamePage) {
    const MISSING: &str = "(not found)";
    println!("Title: {}", page.title);
    println!(
        "Description: {}",
        page.description.as_deref().unwrap_or(MISSING)
    );
    println!("Card: {}", page.card_url.as_deref().unwrap_or(MISSING));
    match &page.media_url {
        Ok(url) => println!("Game: {}", url.as_deref().unwrap_or(MISSING)),
        Err(err) => println!("Game: ({err})"),
    }
}

async fn download(
    extractor: &Extractor,
    url: &str,
    dir: &Path,
    name: Option<String>,
    card: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => {
            let title = extractor.scrape_title(url).await?;
            let media_url = extractor
                .scrape_game(url)
                .await?
                .with_context(|| format!("no flash game link found on {url}"))?;
            default_game_filename(&title, url, &media_url)
        }
    };

    let game_path = extractor
        .download_game(url, dir, &name)
        .await
        .with_context(|| format!("failed to download the game on {url}"))?;
    println!("{}", game_path.display());

    if card {
        let card_path = extractor
            .download_card(url, dir, &card_basename(&name))
            .await
            .with_context(|| format!("failed to download the card of {url}"))?;
        println!("{}", card_path.display());
    }
    Ok(())
}

fn default_game_filename(title: &str, page_url: &str, media_url: &str) -> String {
    let extension =
        media_extension(media_url).unwrap_or_else(|| DEFAULT_MEDIA_EXTENSION.to_string());
    format!("{}{extension}", asset_basename(title, page_url))
}

fn card_basename(game_filename: &str) -> String {
    let stem = match game_filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => game_filename,
    };
    format!("{stem}_card")
}

/// Splits `start..=end` into at most `workers` contiguous, non-overlapping
/// ranges; the last one takes the remainder.
fn split_range(start: u64, end: u64, workers: usize) -> Vec<RangeInclusive<u64>> {
    // Saturates for 0..=u64::MAX; the last range still ends at `end`.
    let total = (end - start).saturating_add(1);
    let workers = (workers.max(1) as u64).min(total);
    let chunk = total / workers;
    (0..workers)
        .map(|i| {
            let from = start + i * chunk;
            let to = if i + 1 == workers {
                end
            } else {
                from + chunk - 1
            };
            from..=to
        })
        .collect()
}

async fn scan(
    extractor: Arc<Extractor>,
    base: &str,
    ranges: Vec<RangeInclusive<u64>>,
) -> Result<usize> {
    let base = base.trim_end_matches('/').to_string();
    let mut workers = JoinSet::new();
    for range in ranges {
        let extractor = extractor.clone();
        let base = base.clone();
        workers.spawn(async move {
            let mut found: usize = 0;
            for id in range {
                let url = format!("{base}/{id}");
                match extractor.scrape_page(&url).await {
                    Ok(page) => {
                        if let Some(description) = page.description {
                            println!("{} | Description: {} | URL: {}", page.title, description, url);
                            found += 1;
                        }
                    }
                    Err(err) => scrape_warn!("Skipping {url}: {err}"),
                }
            }
            found
        });
    }

    let mut total = 0;
    while let Some(result) = workers.join_next().await {
        total += result.context("scan worker panicked")?;
    }
    Ok(total)
}
