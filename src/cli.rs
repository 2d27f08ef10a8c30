use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use strum::IntoEnumIterator;

use study604_core::{
    entities::*,
    usecases,
    util::{filter, format, lookup::SavedLookup, sort},
    Cache, Client, Store,
};
use study604_rest::RestStore;

use crate::{config::Config, seed};

#[derive(Parser)]
#[command(name = "study604", version, about = "Find a place to study")]
pub struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read rows from a JSON file instead of the hosted store
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List spots
    Spots {
        /// Closest spots first
        #[arg(long, conflicts_with = "popular")]
        near: bool,

        /// Most popular spots first
        #[arg(long)]
        popular: bool,

        /// Maximum number of spots
        #[arg(long)]
        limit: Option<usize>,

        /// Only spots whose name or address contains the text
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,

        #[arg(long)]
        wifi: bool,

        #[arg(long)]
        food: bool,

        /// Good outlet access
        #[arg(long)]
        outlets: bool,
    },

    /// Show the details of a spot
    Spot { id: i64 },

    /// List the reviews of a spot
    Reviews { spot_id: i64 },

    /// List saved spots
    Saved,

    /// Save a spot or remove it from the saved spots
    ToggleSaved { spot_id: i64 },

    /// Rate a spot (1-5 stars per category)
    Review {
        spot_id: i64,
        #[arg(long)]
        atmosphere: u8,
        #[arg(long)]
        wifi: u8,
        #[arg(long)]
        outlets: u8,
        #[arg(long)]
        food: u8,
        #[arg(long)]
        tables: u8,
        #[arg(long, default_value = "")]
        text: String,
    },
}

fn connect(cfg: &Config, seed: Option<&PathBuf>) -> Result<Arc<dyn Store>> {
    if let Some(path) = seed {
        return Ok(Arc::new(seed::load_memory_store(path)?));
    }
    let (Some(url), Some(api_key)) = (&cfg.store.url, &cfg.store.api_key) else {
        return Err(anyhow!(
            "Missing store URL or API key, use --seed to run without a store"
        ));
    };
    log::info!("Connecting to {url}");
    Ok(Arc::new(RestStore::new(url, api_key, cfg.store.timeout)?))
}

pub async fn run(args: Args) -> Result<()> {
    let Args {
        config,
        seed,
        command,
    } = args;
    let cfg = Config::try_load_from_file_or_default(config)?;
    log::debug!("{cfg:?}");
    let store = connect(&cfg, seed.as_ref())?;
    let client = Client::new(store, Cache::new());
    let res = run_command(&client, &cfg, command).await;
    client.cache().clear();
    res
}

async fn run_command(client: &Client<dyn Store>, cfg: &Config, command: Command) -> Result<()> {
    match command {
        Command::Spots {
            near,
            popular,
            limit,
            search,
            wifi,
            food,
            outlets,
        } => {
            let amenities: Vec<_> = [
                (wifi, Amenity::Wifi),
                (food, Amenity::Food),
                (outlets, Amenity::Outlets),
            ]
            .into_iter()
            .filter_map(|(on, amenity)| on.then_some(amenity))
            .collect();
            let spots = client.get_spots().await?;
            let spots = filter::search(&spots, search.as_deref().unwrap_or_default());
            let spots = filter::filter_by_amenities(&spots, &amenities);
            let spots = if near {
                sort::rank_by_nearness(&spots, limit.unwrap_or(cfg.explore.near_limit))
            } else if popular {
                sort::rank_by_popularity(&spots, limit.unwrap_or(cfg.explore.popular_limit))
            } else {
                spots.into_iter().take(limit.unwrap_or(usize::MAX)).collect()
            };
            let saved = client.saved_lookup().await?;
            if spots.is_empty() {
                println!("No spots found");
            }
            for spot in &spots {
                print_spot_line(spot, &saved);
            }
        }
        Command::Spot { id } => {
            let id = SpotId::new(id);
            let spot = client.get_spot(id).await?;
            let state = client.save_state(id).await?;
            let reviewed = client.has_reviewed(id).await?;
            print_spot_details(&spot);
            println!("Saved: {}", state.is_saved());
            println!("Reviewed: {reviewed}");
        }
        Command::Reviews { spot_id } => {
            let reviews = client.get_reviews_for_spot(SpotId::new(spot_id)).await?;
            if reviews.is_empty() {
                println!("No reviews yet");
            }
            for review in reviews.iter() {
                print_review(review);
            }
        }
        Command::Saved => {
            let saved = client.get_saved_spots().await?;
            if saved.is_empty() {
                println!("No saved spots");
            }
            for s in saved.iter() {
                println!(
                    "{:>4}  {}  {}  {}",
                    s.spot_id.get(),
                    s.spot.name,
                    format::format_rating(s.spot.rating),
                    s.spot.address
                );
            }
        }
        Command::ToggleSaved { spot_id } => {
            let spot_id = SpotId::new(spot_id);
            let spot = client.get_spot(spot_id).await?;
            let state = client.toggle_saved(spot_id, spot.snapshot()).await?;
            println!("{}: {state}", spot.name);
        }
        Command::Review {
            spot_id,
            atmosphere,
            wifi,
            outlets,
            food,
            tables,
            text,
        } => {
            let spot_id = SpotId::new(spot_id);
            let ratings = ReviewRatings {
                atmosphere: atmosphere.into(),
                wifi: wifi.into(),
                outlet_access: outlets.into(),
                food_beverage: food.into(),
                table_space: tables.into(),
            };
            // Validate before the spot is fetched
            usecases::validate_ratings(&ratings)?;
            let spot = client.get_spot(spot_id).await?;
            let review = client
                .submit_review(spot_id, spot.name.clone(), ratings, text)
                .await?;
            println!(
                "Rated {} with {} stars",
                review.spot_name,
                format::format_rating(review.stars())
            );
        }
    }
    Ok(())
}

fn print_spot_line(spot: &Spot, saved: &SavedLookup) {
    let marker = if saved.is_saved(spot.id) { '*' } else { ' ' };
    println!(
        "{marker}{:>4}  {:<32}  {}  {:>8}  {}",
        spot.id.get(),
        spot.name,
        format::format_rating(spot.rating),
        format::format_distance(spot.nearness),
        spot.address
    );
}

fn print_spot_details(spot: &Spot) {
    println!("{} ({})", spot.name, spot.id);
    if !spot.tagline.is_empty() {
        println!("{}", spot.tagline);
    }
    println!("{}", spot.address);
    println!(
        "{} stars, {} reviews, {} away",
        format::format_rating(spot.rating),
        spot.review_count,
        format::format_distance(spot.nearness)
    );
    for category in RatingCategory::iter() {
        println!(
            "  {:<16} {}",
            category.label(),
            format::format_rating(spot.category_ratings.get(category))
        );
    }
    let amenities: Vec<_> = [Amenity::Wifi, Amenity::Food, Amenity::Outlets]
        .into_iter()
        .filter(|a| spot.has_amenity(*a))
        .map(|a| a.to_string())
        .collect();
    if !amenities.is_empty() {
        println!("Amenities: {}", amenities.join(", "));
    }
    if !spot.description.is_empty() {
        println!();
        println!("{}", spot.description);
    }
}

fn print_review(review: &Review) {
    println!(
        "{}  {} stars",
        review.timestamp.to_rfc3339(),
        format::format_rating(review.stars())
    );
    for category in RatingCategory::iter() {
        println!(
            "  {:<16} {}",
            category.label(),
            u8::from(review.ratings.get(category))
        );
    }
    if !review.text.is_empty() {
        println!("  {}", review.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_spot_list_options() {
        let args = Args::parse_from(["study604", "--seed", "rows.json", "spots", "--near", "--wifi"]);
        assert_eq!(Some(PathBuf::from("rows.json")), args.seed);
        assert!(matches!(
            args.command,
            Command::Spots {
                near: true,
                popular: false,
                wifi: true,
                ..
            }
        ));
        assert!(Args::try_parse_from(["study604", "spots", "--near", "--popular"]).is_err());
    }

    #[test]
    fn parse_review() {
        let args = Args::parse_from([
            "study604", "review", "7", "--atmosphere", "5", "--wifi", "4", "--outlets", "3",
            "--food", "4", "--tables", "2",
        ]);
        let Command::Review {
            spot_id, text, tables, ..
        } = args.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(7, spot_id);
        assert_eq!(2, tables);
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn reject_incomplete_review() {
        let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/vancouver.json");
        let args = Args::parse_from([
            "study604",
            "--seed",
            demo.to_str().unwrap(),
            "review",
            "1",
            "--atmosphere",
            "0",
            "--wifi",
            "4",
            "--outlets",
            "4",
            "--food",
            "4",
            "--tables",
            "4",
        ]);
        let err = run(args).await.unwrap_err();
        assert_eq!(
            Some(&usecases::Error::Validation(vec![RatingCategory::Atmosphere])),
            err.downcast_ref::<usecases::Error>()
        );
    }

    #[tokio::test]
    async fn run_against_demo_data() {
        let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/vancouver.json");
        let args = Args::parse_from([
            "study604",
            "--config",
            "does-not-exist.toml",
            "--seed",
            demo.to_str().unwrap(),
            "spots",
            "--popular",
        ]);
        run(args).await.unwrap();
    }

    #[tokio::test]
    async fn show_spot_and_reviews_of_demo_data() {
        let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/vancouver.json");
        let demo = demo.to_str().unwrap();
        for command in [["spot", "1"], ["reviews", "1"]] {
            let args = Args::parse_from(["study604", "--seed", demo].into_iter().chain(command));
            run(args).await.unwrap();
        }
    }
}
