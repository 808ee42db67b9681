//! Subcommand arguments and handlers.

use anyhow::{Context as _, Result};
use clap::Args;

use bookrights_core::{
    BookId, DistributionWindow, FieldKind, Identity, Keypair, PricingTier, PublicInfo,
};
use bookrights_fhe::X25519StaticSecret;
use bookrights_registry::{DecryptionRequest, GrantOutcome, Registration};

use crate::session::GlobalArgs;

/// Arguments for the register subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub publisher: String,
    #[arg(long)]
    pub genre: String,
    /// basic, standard, or premium (or 0-2).
    #[arg(long)]
    pub pricing_tier: PricingTier,
    /// open, limited, or exclusive (or 0-2).
    #[arg(long)]
    pub distribution_window: DistributionWindow,
}

/// Arguments for the info subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[arg(long)]
    pub book_id: u64,
}

/// Arguments for the grant subcommand.
#[derive(Args, Debug)]
pub struct GrantArgs {
    #[arg(long)]
    pub book_id: u64,
    /// Hex identity to grant access to.
    #[arg(long)]
    pub accessor: Identity,
}

/// Arguments for the decrypt subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[arg(long)]
    pub book_id: u64,
    /// pricing-tier or distribution-window.
    #[arg(long)]
    pub field: FieldKind,
}

pub async fn register(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let keypair = global.keypair()?;
    let session = global.open()?;
    let caller = keypair.identity();

    println!("Registering book: \"{}\"", args.title);
    println!("Author: {}", args.author);
    println!("Publisher: {}", args.publisher);
    println!("Genre: {}", args.genre);
    println!("Pricing Tier: {}", args.pricing_tier);
    println!(
        "Distribution Window: {} - {}",
        args.distribution_window.label(),
        args.distribution_window.duration()
    );

    let batch = session
        .coprocessor
        .input(session.registry.contract(), caller)
        .add8(args.pricing_tier.to_u8())
        .add8(args.distribution_window.to_u8())
        .encrypt()?;

    let registration = Registration {
        title: args.title,
        author: args.author,
        publisher: args.publisher,
        genre: args.genre,
        pricing_tier: batch.input(0).context("missing pricing tier input")?,
        distribution_window: batch.input(1).context("missing distribution window input")?,
    };

    let id = session.registry.register(&caller, registration).await?;
    println!("\nBook registered as {id}");
    println!("Total books in registry: {}", session.registry.count().await?);
    Ok(())
}

pub async fn info(global: &GlobalArgs, args: InfoArgs) -> Result<()> {
    let session = global.open()?;
    let id = BookId(args.book_id);

    if !session.registry.exists(id).await? {
        println!("Book {id} does not exist");
        return Ok(());
    }

    let info = session.registry.public_info(id).await?;
    print_info(&info);

    let accessors = session.registry.accessors(id).await?;
    println!("Accessors: {}", accessors.len());
    for accessor in accessors {
        println!("  {accessor}");
    }

    println!("\nPricing tier and distribution window are encrypted.");
    println!("Use `bookrights decrypt` with an authorized key to read them.");
    Ok(())
}

fn print_info(info: &PublicInfo) {
    println!("Book {}", info.id);
    println!("Title: {}", info.title);
    println!("Author: {}", info.author);
    println!("Publisher: {}", info.publisher);
    println!("Genre: {}", info.genre);
    println!("Owner: {}", info.owner);
    println!("Registered: {} (unix seconds)", info.timestamp);
}

pub async fn total(global: &GlobalArgs) -> Result<()> {
    let session = global.open()?;
    let total = session.registry.count().await?;
    println!("Total books registered: {total}");

    if total > 0 {
        println!("Use `bookrights info --book-id <ID>` to view book details");
    }
    Ok(())
}

pub async fn grant(global: &GlobalArgs, args: GrantArgs) -> Result<()> {
    let keypair = global.keypair()?;
    let session = global.open()?;
    let id = BookId(args.book_id);

    println!("Granting access to book {id} for {}", args.accessor);
    match session
        .registry
        .grant_access(id, &args.accessor, &keypair.identity())
        .await?
    {
        GrantOutcome::Granted => println!("Access granted"),
        GrantOutcome::AlreadyGranted => println!("Access was already granted"),
    }
    Ok(())
}

pub async fn decrypt(global: &GlobalArgs, args: DecryptArgs) -> Result<()> {
    let keypair = global.keypair()?;
    let session = global.open()?;
    let id = BookId(args.book_id);

    let handle = session.registry.encrypted_field(args.field, id).await?;
    let reply_secret = X25519StaticSecret::derive_from_seed(&keypair.seed());
    let request = DecryptionRequest::sign(
        &keypair,
        session.registry.contract(),
        id,
        args.field,
        handle,
        reply_secret.public_key(),
    );

    let reply = session
        .decryption
        .user_decrypt(&session.registry, &request)
        .await?;
    let value = request.open_reply(&reply, &reply_secret)?;

    println!("{}", describe(args.field, value));
    Ok(())
}

/// Render a decrypted scalar through its vocabulary.
pub fn describe(field: FieldKind, value: u8) -> String {
    let label = match field {
        FieldKind::PricingTier => PricingTier::from_u8(value).map(|t| t.to_string()),
        FieldKind::DistributionWindow => DistributionWindow::from_u8(value)
            .map(|w| format!("{} - {}", w.label(), w.duration())),
    };
    match label {
        Some(label) => format!("{field}: {label}"),
        None => format!("{field}: {value} (unknown)"),
    }
}

pub fn identity(global: &GlobalArgs) -> Result<()> {
    let keypair = match global.key {
        Some(_) => global.keypair()?,
        None => {
            let keypair = Keypair::generate();
            println!("Seed: {}", hex::encode(keypair.seed()));
            keypair
        }
    };

    let reply = X25519StaticSecret::derive_from_seed(&keypair.seed());
    println!("Identity: {}", keypair.identity());
    println!("Reply key: 0x{}", reply.public_key().to_hex());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_values() {
        assert_eq!(
            describe(FieldKind::PricingTier, 2),
            "pricing-tier: Premium - $9.99"
        );
        assert_eq!(
            describe(FieldKind::DistributionWindow, 1),
            "distribution-window: Limited - 3 months"
        );
    }

    #[test]
    fn test_describe_out_of_vocabulary() {
        assert_eq!(describe(FieldKind::PricingTier, 7), "pricing-tier: 7 (unknown)");
    }
}
