use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fxnow::{Advice, AppState, Currency, Error, Sources};

#[derive(Parser, Debug)]
#[command(name = "fxnow", about = "Currency conversion with an exchange-timing recommendation")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the live KRW-per-unit rate table.
	Rates,
	/// Convert an amount between two currencies.
	Convert { from: Currency, to: Currency, amount: f64 },
	/// Convert and print the full timing recommendation.
	Advise { from: Currency, to: Currency, amount: f64 },
	/// Print the bank's official rate for a currency on a date.
	Official { currency: Currency, date: NaiveDate },
	/// Keep refreshing hourly, logging each cycle.
	Watch { from: Currency, to: Currency },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	env_logger::init();
	let cli = Cli::parse();
	let sources = Sources::from_env()?;

	match cli.command {
		Command::Rates => {
			let table = fxnow::fetch_current_rates(&sources).await;
			for (currency, rate) in table.iter() {
				println!("{} {currency} = {rate:.2} KRW", currency.symbol());
			}
		}
		Command::Convert { from, to, amount } => {
			let table = fxnow::fetch_current_rates(&sources).await;
			let conversion = fxnow::convert(amount, from, to, &table);
			println!("{amount} {from} = {} {to}", conversion.amount);
			if let Some(rate) = conversion.rate {
				println!("{rate}");
			}
		}
		Command::Advise { from, to, amount } => {
			let mut state = AppState::new(from, to);
			state.refresh(&sources).await;
			let conversion = state.convert(amount);
			println!("{amount} {from} = {} {to}", conversion.amount);
			if let Some(rate) = conversion.rate {
				println!("{rate}");
			}
			match state.advise(amount) {
				Advice::Signal(signal) => {
					println!("{signal}");
					for (horizon, delta) in signal.deltas {
						println!("vs {}: {delta}", horizon.label());
					}
				}
				Advice::HistoryPending => return Err(Error::HistoryUnavailable),
				advice => println!("{advice}"),
			}
		}
		Command::Official { currency, date } => {
			let rate = sources.proxy.official_rate(&sources.client, currency, date).await?;
			println!("official {currency} on {date}: {rate:.2} KRW");
		}
		Command::Watch { from, to } => {
			let mut state = AppState::new(from, to);
			state.run(&sources).await;
		}
	}

	Ok(())
}
