use super::short_date;
use crate::cli::MarketplaceCommand;
use crate::client::{ApiClient, HttpTransport};
use crate::tokens::TokenStore;
use crate::types::{Listing, ListingPatch, NewListing};
use anyhow::Result;

fn print_listing(listing: &Listing) {
    println!(
        "{:>5}  {:<28} {:<16} {:>7.2}  {:>4.1}* {:>7}  {}",
        listing.id,
        listing.name,
        listing.author,
        listing.price,
        listing.rating,
        listing.downloads,
        short_date(&listing.created_at)
    );
}

pub async fn run<T: HttpTransport, S: TokenStore>(
    client: &ApiClient<T, S>,
    command: MarketplaceCommand,
) -> Result<()> {
    match command {
        MarketplaceCommand::List => {
            let listings = client.marketplace().listings().await?;
            if listings.is_empty() {
                println!("The marketplace is empty.");
                return Ok(());
            }
            println!(
                "{:>5}  {:<28} {:<16} {:>7}  {:>5} {:>7}  created",
                "id", "name", "author", "price", "rate", "dls"
            );
            for listing in &listings {
                print_listing(listing);
            }
        }
        MarketplaceCommand::Get { id } => {
            let listing = client.marketplace().listing(id).await?;
            println!("{} (#{}) by {}", listing.name, listing.id, listing.author);
            if let Some(description) = &listing.description {
                println!("  {description}");
            }
            println!(
                "  price: {:.2}  rating: {:.1}  downloads: {}",
                listing.price, listing.rating, listing.downloads
            );
            if !listing.capabilities.is_empty() {
                println!("  capabilities: {}", listing.capabilities.join(", "));
            }
        }
        MarketplaceCommand::Create {
            name,
            author,
            description,
            price,
            capabilities,
        } => {
            let created = client
                .marketplace()
                .create(&NewListing {
                    name,
                    description,
                    price,
                    author,
                    capabilities: (!capabilities.is_empty()).then_some(capabilities),
                })
                .await?;
            println!("Published listing {} (#{}).", created.name, created.id);
        }
        MarketplaceCommand::Update {
            id,
            name,
            description,
            price,
            capabilities,
        } => {
            let updated = client
                .marketplace()
                .update(
                    id,
                    &ListingPatch {
                        name,
                        description,
                        price,
                        capabilities: (!capabilities.is_empty()).then_some(capabilities),
                    },
                )
                .await?;
            println!("Updated listing {} (#{}).", updated.name, updated.id);
        }
        MarketplaceCommand::Delete { id } => {
            client.marketplace().delete(id).await?;
            println!("Deleted listing #{id}.");
        }
        MarketplaceCommand::Install { id } => {
            let outcome = client.marketplace().install(id).await?;
            println!("{}", outcome.message);
        }
    }
    Ok(())
}
