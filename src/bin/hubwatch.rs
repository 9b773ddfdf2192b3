//! Terminal view of the dashboard: fetch a hub's feeds from a running server,
//! filter them locally and optionally follow the featured launch countdown.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use intel_dashboard::classify::{partition, KeywordTable};
use intel_dashboard::config::keywords::load_keywords_default;
use intel_dashboard::config::AppConfig;
use intel_dashboard::countdown::{parse_target, CountdownTicker};
use intel_dashboard::filter::{priority_label, records_or_empty, FilterState};
use intel_dashboard::hub::{build_view, launch_board_view, LaunchCard, TRENDING_FACET};
use intel_dashboard::ingest::types::{Article, Hub, Launch};

#[derive(Parser)]
#[command(name = "hubwatch")]
#[command(version)]
#[command(about = "Terminal client for the intelligence dashboard")]
struct Cli {
    /// Dashboard server base URL
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sport hub articles
    Sport {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        sport: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Case-insensitive match on title and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Space hub articles plus upcoming launches
    Space {
        #[arg(long)]
        agency: Option<String>,
        #[arg(long)]
        mission: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        /// Follow the featured launch countdown until Ctrl-C
        #[arg(short, long)]
        watch: bool,
    },

    /// Upcoming launches only
    Launches {
        #[arg(short, long)]
        watch: bool,
    },
}

impl Commands {
    fn filters(&self) -> FilterState {
        let mut q = HashMap::new();
        let mut put = |k: &str, v: &Option<String>| {
            if let Some(v) = v {
                q.insert(k.to_string(), v.clone());
            }
        };
        match self {
            Commands::Sport {
                region,
                sport,
                topic,
                priority,
                search,
            } => {
                put("region", region);
                put("sport", sport);
                put("topic", topic);
                put("priority", priority);
                put("search", search);
            }
            Commands::Space {
                agency,
                mission,
                priority,
                search,
                ..
            } => {
                put("agency", agency);
                put("mission", mission);
                put("priority", priority);
                put("search", search);
            }
            Commands::Launches { .. } => {}
        }
        FilterState::from_query(&q)
    }
}

async fn fetch_json(http: &reqwest::Client, url: &str) -> anyhow::Result<Value> {
    let resp = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    Ok(resp.json().await?)
}

/// Any failure or non-list payload degrades to an empty list.
async fn fetch_list<T: serde::de::DeserializeOwned>(http: &reqwest::Client, url: &str) -> Vec<T> {
    match fetch_json(http, url).await {
        Ok(v) => records_or_empty(v),
        Err(e) => {
            eprintln!("warning: {e:#}");
            Vec::new()
        }
    }
}

fn print_articles(hub: Hub, articles: &[Article], filters: &FilterState) {
    let view = build_view(hub, articles, filters);
    println!(
        "== {} hub: {} of {} articles, {} high priority ({}%) ==",
        hub.as_str(),
        view.total,
        view.feed_total,
        view.high_priority,
        view.high_priority_pct
    );
    for a in &view.articles {
        let date = a.date.get(..10).unwrap_or(&a.date);
        println!("[{:<6}] {date:<10}  {}", priority_label(&a.priority), a.title);
    }
    if !view.trending.is_empty() {
        let top: Vec<String> = view
            .trending
            .iter()
            .map(|t| format!("{} ({})", t.value, t.count))
            .collect();
        println!("trending {}: {}", TRENDING_FACET.as_str(), top.join(", "));
    }
}

fn print_card(c: &LaunchCard) {
    println!(
        "  {:<6} {:<40} {:<24} {}",
        c.label,
        c.launch.name,
        c.launch.rocket,
        c.status_label
    );
}

/// Same resolution as the server: `$LAUNCH_KEYWORDS_PATH`, the default file, then the seed.
fn keyword_table() -> anyhow::Result<KeywordTable> {
    let cfg = AppConfig::from_env();
    load_keywords_default(cfg.keywords_path.as_deref())
}

fn print_launches(launches: &[Launch], table: &KeywordTable) {
    let board = launch_board_view(launches, table, chrono::Utc::now());
    println!("== major launches ==");
    board.major.iter().for_each(print_card);
    if !board.constellation.is_empty() {
        println!("== constellation deployments ==");
        board.constellation.iter().for_each(print_card);
    }
}

/// First non-constellation launch.
fn featured<'a>(launches: &'a [Launch], table: &KeywordTable) -> Option<&'a Launch> {
    partition(launches, table).major.first().map(|(l, _)| *l)
}

/// Live countdown for the featured launch; ends on Ctrl-C or once it has passed.
async fn watch_featured(launches: &[Launch], table: &KeywordTable) -> anyhow::Result<()> {
    let Some(featured) = featured(launches, table) else {
        println!("no major launch to follow");
        return Ok(());
    };
    let Some(target) = parse_target(&featured.date) else {
        println!("{}: launch date TBD", featured.name);
        return Ok(());
    };

    let ticker = CountdownTicker::spawn(target, Duration::from_secs(1));
    let mut rx = ticker.subscribe();
    let mut out = std::io::stdout();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let c = *rx.borrow_and_update();
                write!(out, "\r{}  T- {}", featured.name, c.digits())?;
                out.flush()?;
                if c.is_past {
                    break;
                }
            }
        }
    }
    writeln!(out)?;
    ticker.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    intel_dashboard::init_tracing();

    let cli = Cli::parse();
    let base = cli.base.trim_end_matches('/');
    let http = reqwest::Client::new();
    let filters = cli.command.filters();
    let table = keyword_table()?;

    match &cli.command {
        Commands::Sport { .. } => {
            let articles: Vec<Article> =
                fetch_list(&http, &format!("{base}/api/articles-sport")).await;
            print_articles(Hub::Sport, &articles, &filters);
        }
        Commands::Space { watch, .. } => {
            let articles_url = format!("{base}/api/articles-space");
            let launches_url = format!("{base}/api/launches");
            let (articles, launches): (Vec<Article>, Vec<Launch>) = tokio::join!(
                fetch_list(&http, &articles_url),
                fetch_list(&http, &launches_url)
            );
            print_articles(Hub::Space, &articles, &filters);
            print_launches(&launches, &table);
            if *watch {
                watch_featured(&launches, &table).await?;
            }
        }
        Commands::Launches { watch } => {
            let launches: Vec<Launch> = fetch_list(&http, &format!("{base}/api/launches")).await;
            print_launches(&launches, &table);
            if *watch {
                watch_featured(&launches, &table).await?;
            }
        }
    }
    Ok(())
}
