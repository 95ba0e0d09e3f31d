use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atm::atm::Atm;
use atm::notice::{Notice, NoticeDelays, NoticeKind};
use atm::session::{Action, View};
use atm::store::{FileStore, KeyValueStore, MemoryStore};

/// Interactive ATM over a JSON key-value store.
#[derive(Parser)]
#[command(name = "atm", version, about)]
struct Cli {
    /// Directory holding the persisted account data
    #[arg(long, value_name = "DIR", default_value = ".atm")]
    store_dir: PathBuf,

    /// Keep accounts in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Milliseconds transient messages stay visible
    #[arg(long, default_value_t = 3000)]
    message_delay_ms: u64,

    /// Milliseconds the post-operation balance confirmation stays visible
    #[arg(long, default_value_t = 4000)]
    confirm_delay_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let delays = NoticeDelays {
        message: Duration::from_millis(cli.message_delay_ms),
        confirm: Duration::from_millis(cli.confirm_delay_ms),
    };
    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::new(cli.store_dir))
    };

    let mut atm = match Atm::with_delays(store, delays) {
        Ok(atm) => atm,
        Err(error) => {
            eprintln!("Cannot start: {error}");
            std::process::exit(1);
        }
    };

    if let Err(error) = run(&mut atm) {
        eprintln!("Terminal error: {error}");
        std::process::exit(1);
    }
}

fn run(atm: &mut Atm<Box<dyn KeyValueStore>>) -> io::Result<()> {
    println!("ATM ready.");
    // Stands in for the amount field of the balance form; prefilled when the
    // view opens in show mode.
    let mut amount_field = String::new();
    loop {
        match atm.session().view() {
            View::Login => {
                println!();
                println!("Enter your PIN, 'new' to open an account, or 'quit'.");
                let Some(input) = prompt("PIN")? else { return Ok(()) };
                match input.as_str() {
                    "quit" => return Ok(()),
                    "new" => atm.open_new_account(),
                    "" => println!("A PIN is required."),
                    pin => {
                        if let Err(error) = atm.login(pin) {
                            show(&Notice::error(&error, atm.delays().message));
                        }
                    }
                }
            }
            View::NewAccount => {
                println!();
                println!("-- New account (blank PIN cancels) --");
                let Some(pin) = prompt("Choose a PIN")? else { return Ok(()) };
                if pin.is_empty() {
                    atm.cancel();
                    continue;
                }
                let Some(name) = prompt("Name")? else { return Ok(()) };
                if name.is_empty() {
                    println!("A name is required.");
                    continue;
                }
                let Some(balance) = prompt("Starting balance (blank for 0.00)")? else {
                    return Ok(());
                };
                if let Err(error) = atm.create_account(&pin, &name, &balance) {
                    show(&Notice::error(&error, atm.delays().message));
                }
            }
            View::AccountMenu => {
                let name = atm
                    .active_account()
                    .map_or(String::new(), |account| account.name().to_string());
                println!();
                println!("-- {name} --");
                println!("[1] Balance  [2] Deposit  [3] Withdraw  [4] Change PIN  [5] Log out");
                let Some(choice) = prompt("Option")? else { return Ok(()) };
                let opened = match choice.as_str() {
                    "1" => atm.open_balance(Action::Show),
                    "2" => atm.open_balance(Action::Deposit),
                    "3" => atm.open_balance(Action::Withdraw),
                    "4" => atm.open_change_pin().map(|()| None),
                    "5" => {
                        atm.logout();
                        continue;
                    }
                    _ => {
                        println!("Unknown option.");
                        continue;
                    }
                };
                match opened {
                    Ok(prefill) => amount_field = prefill.unwrap_or_default(),
                    Err(error) => show(&Notice::error(&error, atm.delays().message)),
                }
            }
            View::Balance => match atm.session().action() {
                Action::Show => {
                    println!();
                    println!("Balance: {amount_field}");
                    let Some(_) = prompt("Press Enter to go back")? else {
                        return Ok(());
                    };
                    if let Err(error) = atm.submit_balance(&amount_field) {
                        show(&Notice::error(&error, atm.delays().message));
                    }
                }
                Action::Deposit | Action::Withdraw => {
                    let verb = if atm.session().action() == Action::Withdraw {
                        "Withdraw"
                    } else {
                        "Deposit"
                    };
                    println!();
                    println!("-- {verb} (blank cancels) --");
                    let Some(amount) = prompt("Amount")? else { return Ok(()) };
                    if amount.is_empty() {
                        atm.cancel();
                        continue;
                    }
                    match atm.submit_balance(&amount) {
                        Ok(Some(notice)) => show(&notice),
                        Ok(None) => {}
                        Err(error) => show(&Notice::error(&error, atm.delays().message)),
                    }
                }
                Action::None => atm.cancel(),
            },
            View::ChangePin => {
                println!();
                println!("-- Change PIN (blank current PIN cancels) --");
                let Some(current) = prompt("Current PIN")? else { return Ok(()) };
                if current.is_empty() {
                    atm.cancel();
                    continue;
                }
                let Some(new_pin) = prompt("New PIN")? else { return Ok(()) };
                let Some(confirm) = prompt("Confirm new PIN")? else { return Ok(()) };
                if new_pin.is_empty() || confirm.is_empty() {
                    println!("All fields are required.");
                    continue;
                }
                match atm.change_pin(&current, &new_pin, &confirm) {
                    Ok(notice) => show(&notice),
                    Err(error) => show(&Notice::error(&error, atm.delays().message)),
                }
            }
        }
    }
}

fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn show(notice: &Notice) {
    match notice.kind {
        NoticeKind::Error => println!("  !! {}", notice.text),
        NoticeKind::Success => println!("  :: {}", notice.text),
    }
}
