//! # bookrights CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

use bookrights_cli::commands;
use bookrights_cli::session::GlobalArgs;

/// Book rights registry: register titles with confidential licensing terms
/// and control who may read them.
#[derive(Parser, Debug)]
#[command(name = "bookrights", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Register a book with encrypted pricing tier and distribution window.
    Register(commands::RegisterArgs),
    /// Show the public metadata of a book.
    Info(commands::InfoArgs),
    /// Show how many books are registered.
    Total,
    /// Allow another identity to decrypt a book's terms.
    Grant(commands::GrantArgs),
    /// Decrypt one of a book's terms.
    Decrypt(commands::DecryptArgs),
    /// Show the identity behind --key, or generate a new one.
    Identity,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Register(args) => commands::register(&cli.global, args).await,
        Commands::Info(args) => commands::info(&cli.global, args).await,
        Commands::Total => commands::total(&cli.global).await,
        Commands::Grant(args) => commands::grant(&cli.global, args).await,
        Commands::Decrypt(args) => commands::decrypt(&cli.global, args).await,
        Commands::Identity => commands::identity(&cli.global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from([
            "bookrights",
            "--db",
            "test.db",
            "register",
            "--title",
            "Digital Publishing in the Blockchain Era",
            "--author",
            "Sarah Chen",
            "--publisher",
            "TechPress Publishing",
            "--genre",
            "Technology",
            "--pricing-tier",
            "premium",
            "--distribution-window",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.global.db, std::path::PathBuf::from("test.db"));
        match cli.command {
            Commands::Register(args) => {
                assert_eq!(args.pricing_tier, bookrights_core::PricingTier::Premium);
                assert_eq!(
                    args.distribution_window,
                    bookrights_core::DistributionWindow::Exclusive
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_decrypt_field() {
        let cli = Cli::try_parse_from([
            "bookrights",
            "decrypt",
            "--book-id",
            "0",
            "--field",
            "distribution-window",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Decrypt(commands::DecryptArgs {
                book_id: 0,
                field: bookrights_core::FieldKind::DistributionWindow,
            })
        ));
    }
}
