//! Beeconnect CLI - one command per wallet action
//!
//!   beeconnect demo                → initialize, connect, run all four samples, disconnect
//!   beeconnect repl                → interactive: connect, sign, sign-tx, sign-typed, send-tx, disconnect
//!   beeconnect status              → effective configuration
//!
//! Runs against the in-process loopback provider. The approved account is set with
//! `--account <caip10>` (default `eip155:1001:0x…01`).
//!
//! Configuration (read from the environment, seeded from ./.env):
//!   BEECONNECT_PROJECT_ID, BEECONNECT_CHAIN, BEECONNECT_TEST_ACCOUNT
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, Context};
use beeconnect::logging::init_logging;
use beeconnect::{
    AppConfig, ConnectOutcome, DisconnectOutcome, MemoryProvider, Method, PairingDisplay,
    RequestOutcome, SessionController, TerminalDisplay, TracingDisplay,
};
use serde_json::{json, Value};
use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use tracing::debug;

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);
    init_logging();

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("beeconnect {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("demo") => cmd_demo(&opts),
        Some("repl") => cmd_repl(&opts),
        Some("status") => cmd_status(&opts),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || io::stdout().is_terminal());
    match result {
        Ok(Value::Null) => {}
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    account: Option<String>,
    topic: Option<String>,
    no_uri: bool,
    quiet_display: bool,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        if let Err(e) = AppConfig::load_dotenv(".env") {
            eprintln!("warning: {}", e);
        }

        let mut opts = ParsedArgs::default();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--no-uri" => opts.no_uri = true,
                "--quiet-display" => opts.quiet_display = true,
                "--account" | "-a" => {
                    if i + 1 < args.len() {
                        opts.account = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--topic" | "-t" => {
                    if i + 1 < args.len() {
                        opts.topic = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') && opts.command.is_none() => opts.command = Some(arg.clone()),
                _ => debug!(arg = %arg, "ignoring argument"),
            }
            i += 1;
        }

        opts
    }
}

fn print_usage() {
    println!(
        r#"beeconnect - wallet session lifecycle

USAGE:
    beeconnect <command> [options]

COMMANDS:
    demo      Initialize, connect, send the four sample requests, disconnect
    repl      Interactive session (one command per wallet action)
    status    Show effective configuration

OPTIONS:
    -a, --account <caip10>   Account the loopback wallet approves with
    -t, --topic <topic>      Session topic the loopback wallet assigns
        --no-uri             Loopback provider offers no pairing uri
        --quiet-display      Log the pairing uri instead of printing it
        --json               Compact JSON output
        --pretty             Pretty JSON output
    -h, --help               Show this help
    -V, --version            Show version

ENVIRONMENT:
    BEECONNECT_PROJECT_ID    Provider project id
    BEECONNECT_CHAIN         Chain id (default eip155:1001)
    BEECONNECT_TEST_ACCOUNT  Recipient used by the sample transactions
    BEECONNECT_LOG_JSON=1    JSON log lines on stderr
"#
    );
}

fn build_controller(opts: &ParsedArgs) -> SessionController {
    let config = AppConfig::from_env();
    let mut provider = MemoryProvider::new();
    if let Some(account) = &opts.account {
        provider = provider.with_account(account.clone());
    }
    if let Some(topic) = &opts.topic {
        provider = provider.with_topic(topic.clone());
    }
    if opts.no_uri {
        provider = provider.with_uri(None);
    }
    let display: Arc<dyn PairingDisplay> = if opts.quiet_display {
        Arc::new(TracingDisplay)
    } else {
        Arc::new(TerminalDisplay::from_config(&config))
    };
    SessionController::new(config, Arc::new(provider), display)
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")
}

fn cmd_status(_opts: &ParsedArgs) -> anyhow::Result<Value> {
    let config = AppConfig::from_env();
    Ok(json!({
        "project_id_set": !config.project_id.is_empty(),
        "chain": config.default_chain,
        "test_recipient": config.test_recipient,
        "recommended_wallets": config.recommended_wallet_ids,
        "exclude_other_wallets": config.exclude_other_wallets,
    }))
}

fn cmd_demo(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let controller = build_controller(opts);
    runtime()?.block_on(async {
        let client = controller.initialize().await.context("Initialize failed")?;
        let mut steps = vec![json!({"step": "initialize", "client": client.id()})];

        match controller.connect().await.context("Connect failed")? {
            ConnectOutcome::Connected(account) => steps.push(json!({"step": "connect", "account": account.address})),
            ConnectOutcome::NoPairingOffered => {
                steps.push(json!({"step": "connect", "outcome": "no pairing offered"}));
                return Ok(json!({"steps": steps, "status": controller.status()}));
            }
        }

        for method in Method::ALL {
            let outcome = controller.run_sample(method).await.with_context(|| format!("{} failed", method))?;
            steps.push(json!({"step": method.as_str(), "response": outcome_json(outcome)}));
        }

        match controller.disconnect().await.context("Disconnect failed")? {
            DisconnectOutcome::Disconnected { topic } => steps.push(json!({"step": "disconnect", "topic": topic})),
            DisconnectOutcome::NoSession => steps.push(json!({"step": "disconnect", "outcome": "no session"})),
        }

        Ok::<Value, anyhow::Error>(json!({"steps": steps, "status": controller.status()}))
    })
}

fn outcome_json(outcome: RequestOutcome) -> Value {
    match outcome {
        RequestOutcome::Response(response) => response,
        RequestOutcome::Skipped => json!("skipped"),
    }
}

fn cmd_repl(opts: &ParsedArgs) -> anyhow::Result<Value> {
    println!("Beeconnect REPL - type 'help' or 'quit'\n");

    let controller = build_controller(opts);
    let rt = runtime()?;
    if let Err(e) = rt.block_on(controller.initialize()) {
        println!("initialize failed: {}", e);
    }

    loop {
        print!("beeconnect> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let reply = match input {
            "quit" | "exit" | "q" => break,
            "help" | "?" => {
                println!("Commands:");
                println!("  init        - Initialize the client (after a disconnect)");
                println!("  connect     - Pair with the wallet");
                println!("  disconnect  - End the session");
                println!("  sign        - Personal sign \"Hello World!\"");
                println!("  sign-tx     - Sign a sample transaction");
                println!("  sign-typed  - Sign sample typed data");
                println!("  send-tx     - Send a sample transaction");
                println!("  status      - Show client, session and account");
                println!("  quit        - Exit");
                continue;
            }
            "status" => Ok(json!(controller.status())),
            "init" => rt.block_on(controller.initialize()).map(|c| json!({"client": c.id()})),
            "connect" => rt.block_on(controller.connect()).map(|outcome| match outcome {
                ConnectOutcome::Connected(account) => json!({"account": account.address}),
                ConnectOutcome::NoPairingOffered => json!({"outcome": "no pairing offered"}),
            }),
            "disconnect" => rt.block_on(controller.disconnect()).map(|outcome| match outcome {
                DisconnectOutcome::Disconnected { topic } => json!({"disconnected": topic}),
                DisconnectOutcome::NoSession => json!({"outcome": "no session"}),
            }),
            other => match Method::from_str(other) {
                Some(method) => rt.block_on(controller.run_sample(method)).map(|o| json!({"response": outcome_json(o)})),
                None => {
                    println!("Unknown command: {} (type 'help')", other);
                    continue;
                }
            },
        };

        match reply {
            Ok(value) => println!("{}", render(&value, true)),
            Err(e) => println!("error: {}", e),
        }
    }

    if let Err(e) = rt.block_on(controller.close()) {
        debug!(error = %e, "close failed");
    }
    Ok(Value::Null)
}
