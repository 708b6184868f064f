use clap::{Parser, Subcommand};
use payident::lookup::{BankDirectory, StaticBankDirectory};
use payident::reference::{creditor_id_length, CountryCode};
use payident::sample::{generate_samples, SampleConfig};
use payident::{batch, card, creditor_id, iban, logging};
use rand::Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "payident")]
#[command(about = "SEPA and payment card identifier toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Iban(IbanCommand),
    #[command(subcommand)]
    Creditor(CreditorCommand),
    #[command(subcommand)]
    Card(CardCommand),
    Sample(SampleArgs),
    Batch(BatchArgs),
    Repair(RepairArgs),
}

#[derive(Subcommand)]
enum IbanCommand {
    /// Check an IBAN's structure, country length and check digits.
    Validate { iban: String },
    /// Derive the check digits for a country and national account part.
    Generate {
        country: CountryCode,
        bban: String,
    },
    /// Fixed-offset split into bank code and account number (DE layout).
    Split {
        iban: String,
        /// CSV reference dataset (bank_code,bic,name) for BIC lookups.
        #[arg(long)]
        directory: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CreditorCommand {
    /// Check a SEPA creditor identifier.
    Validate { creditor_id: String },
    /// Build a creditor identifier from its parts.
    Generate {
        country: CountryCode,
        business_area: String,
        national_id: String,
    },
    /// Show the identifier's fields.
    Decompose { creditor_id: String },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Luhn-check a card number.
    Validate { number: String },
    /// Name the card scheme for a number.
    Classify { number: String },
    /// Mask a card number for display.
    Mask { number: String },
    /// Check an expiry date such as 09/26 or 09/2026.
    Expiry { expiry: String },
}

#[derive(Parser)]
struct SampleArgs {
    #[arg(long, default_value_t = 10)]
    ibans: usize,
    #[arg(long, default_value_t = 10)]
    creditor_ids: usize,
    #[arg(long, default_value_t = 10)]
    cards: usize,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct BatchArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct RepairArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("payident")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Iban(command) => run_iban(command),
        Command::Creditor(command) => run_creditor(command),
        Command::Card(command) => run_card(command),
        Command::Sample(args) => run_sample(args),
        Command::Batch(args) => run_batch(args),
        Command::Repair(args) => run_repair(args),
    }
}

fn run_iban(command: IbanCommand) -> Result<(), String> {
    match command {
        IbanCommand::Validate { iban } => match iban::check(&iban) {
            Ok(()) => {
                emit_info_line(&format!("IBAN {} is valid", iban));
                Ok(())
            }
            Err(err) => Err(format!("IBAN {} is invalid: {}", iban, err)),
        },
        IbanCommand::Generate { country, bban } => {
            let value =
                iban::generate(country.as_str(), &bban).map_err(|err| err.to_string())?;
            emit_info_line(&value);
            Ok(())
        }
        IbanCommand::Split { iban, directory } => {
            let parts = iban::split(&iban)
                .ok_or_else(|| "IBAN is too short for a fixed-offset split".to_string())?;
            emit_info_line(&format!("bank code: {}", parts.bank_code));
            emit_info_line(&format!("account number: {}", parts.account_number));
            if let Some(path) = directory {
                let directory = StaticBankDirectory::from_csv_path(&path)?;
                match directory.resolve_bic_by_bank_code(&parts.bank_code) {
                    Some(bic) => {
                        emit_info_line(&format!("BIC: {}", bic));
                        if let Some(name) = directory.resolve_bank_name_by_bic(&bic) {
                            emit_info_line(&format!("bank: {}", name));
                        }
                    }
                    None => emit_info_line("BIC: not in reference dataset"),
                }
            }
            Ok(())
        }
    }
}

fn run_creditor(command: CreditorCommand) -> Result<(), String> {
    match command {
        CreditorCommand::Validate { creditor_id } => {
            if creditor_id::validate(&creditor_id) {
                emit_info_line(&format!("creditor identifier {} is valid", creditor_id));
                Ok(())
            } else {
                Err(format!("creditor identifier {} is invalid", creditor_id))
            }
        }
        CreditorCommand::Generate {
            country,
            business_area,
            national_id,
        } => {
            let value = creditor_id::generate(country.as_str(), &business_area, &national_id)
                .map_err(|err| err.to_string())?;
            emit_info_line(&value);
            Ok(())
        }
        CreditorCommand::Decompose { creditor_id } => {
            let parts = creditor_id::decompose(&creditor_id)
                .ok_or_else(|| "creditor identifier is too short to decompose".to_string())?;
            emit_info_line(&format!("country: {}", parts.country));
            emit_info_line(&format!("check digits: {}", parts.check_digits));
            emit_info_line(&format!("business area: {}", parts.business_area));
            emit_info_line(&format!("national id: {}", parts.national_id));
            let total = parts.country.len()
                + parts.check_digits.len()
                + parts.business_area.len()
                + parts.national_id.len();
            if let Some(expected) = creditor_id_length(&parts.country) {
                if total != expected {
                    emit_info_line(&format!(
                        "note: {} creditor identifiers are {} characters, this one has {}",
                        parts.country, expected, total
                    ));
                }
            }
            Ok(())
        }
    }
}

fn run_card(command: CardCommand) -> Result<(), String> {
    match command {
        CardCommand::Validate { number } => {
            if card::is_valid_number(&number) {
                emit_info_line(&format!(
                    "card number {} is valid ({})",
                    card::format_masked(&number),
                    card::classify(&number)
                ));
                Ok(())
            } else {
                Err(format!(
                    "card number {} is invalid",
                    card::format_masked(&number)
                ))
            }
        }
        CardCommand::Classify { number } => {
            emit_info_line(card::classify(&number).name());
            Ok(())
        }
        CardCommand::Mask { number } => {
            emit_info_line(&card::format_masked(&number));
            Ok(())
        }
        CardCommand::Expiry { expiry } => {
            let (month, year) = card::parse_expiry(&expiry)
                .ok_or_else(|| format!("could not parse expiry date: {}", expiry))?;
            if card::expiry_valid(month, year) {
                emit_info_line(&format!("{:02}/{} has not expired", month, year));
                Ok(())
            } else {
                Err(format!("{:02}/{} is expired", month, year))
            }
        }
    }
}

fn run_sample(args: SampleArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(random_seed);
    let config = SampleConfig {
        ibans: args.ibans,
        creditor_ids: args.creditor_ids,
        cards: args.cards,
    };
    let set = generate_samples(&config, seed)?;
    log::info!(
        "generated {} IBANs, {} creditor ids, {} card numbers (seed {})",
        set.ibans.len(),
        set.creditor_ids.len(),
        set.cards.len(),
        seed
    );
    for value in set.ibans.iter().chain(&set.creditor_ids).chain(&set.cards) {
        println!("{value}");
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let summary = batch::validate_csv(&args.input, args.output.as_deref())?;
    emit_info_line(&format!(
        "Batch: records={} valid={} invalid={} unknown_kind={}",
        summary.total, summary.valid, summary.invalid, summary.unknown_kind
    ));
    if summary.invalid > 0 {
        return Err(format!("{} record(s) failed validation", summary.invalid));
    }
    Ok(())
}

fn run_repair(args: RepairArgs) -> Result<(), String> {
    let summary = batch::repair_csv(&args.input, &args.output)?;
    emit_info_line(&format!(
        "Repair: records={} repaired={} ibans={} creditor_ids={}",
        summary.total_records,
        summary.repaired_records,
        summary.ibans_repaired,
        summary.creditor_ids_repaired
    ));
    Ok(())
}

fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
