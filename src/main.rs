//! Bridge Route Aggregator CLI
//!
//! Loads configuration, wires the services and answers one query.

use bridge_aggregator::{AggregatorBuilder, Amount, ChainId, RouteRequest};
use clap::Parser;

/// Cross-chain bridge route aggregator
#[derive(Parser, Debug)]
#[command(name = "bridge-aggregator", version, about)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
	/// Fetch ranked routes for a transfer
	Routes {
		#[arg(long)]
		from: ChainId,
		#[arg(long)]
		to: ChainId,
		/// Amount in the token's smallest unit
		#[arg(long)]
		amount: Amount,
		#[arg(long)]
		token: Option<String>,
		/// Slippage tolerance in percent
		#[arg(long)]
		slippage: Option<f64>,
		/// Pre-validate and re-validate against the compatibility registries
		#[arg(long)]
		validated: bool,
	},
	/// Health check every configured adapter
	Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();
	let bridge = AggregatorBuilder::from_config()?.start().await?;

	match cli.command {
		Commands::Routes {
			from,
			to,
			amount,
			token,
			slippage,
			validated,
		} => {
			let mut request = RouteRequest::new(from, to, amount);
			if let Some(token) = token {
				request = request.with_token(token);
			}
			if let Some(slippage) = slippage {
				request = request.with_slippage(slippage);
			}

			let output = if validated {
				serde_json::to_string_pretty(&bridge.get_compatible_routes(&request, None).await)?
			} else {
				serde_json::to_string_pretty(&bridge.get_routes(&request, None).await)?
			};
			println!("{}", output);
		},
		Commands::Health => {
			let health = bridge.aggregator.health_check_all().await;
			println!("{}", serde_json::to_string_pretty(&health)?);
		},
	}

	Ok(())
}
