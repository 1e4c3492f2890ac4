//! Deploy contracts to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional:
//!   DLC_ATTESTORS=dns1,dns2,dns3

use odra::host::{Deployer, NoArgs};
use odra::prelude::*;

use cspr_dlc_contracts::dlc_manager::DlcManager;
use cspr_dlc_contracts::loan_engine::{LoanEngine, LoanEngineInitArgs};
use cspr_dlc_contracts::stablecoin::{DlcStablecoin, DlcStablecoinInitArgs};

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== CSPR-DLC Livenet Deployment ===");
    println!();

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200_000_000_000);
    env.set_gas(payment_amount);

    // Get deployer address
    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    // The protocol wallet confirms funding and finalizes closes. The
    // deployer key doubles as the wallet so a fresh testnet deployment is
    // usable immediately; rotate on the manager for production.
    let protocol_wallet = deployer;

    // ==================== Phase 1: Core Contracts ====================
    println!("=== Phase 1: Deploying Core Contracts ===");
    println!();

    println!("Deploying DlcManager...");
    let mut dlc_manager = DlcManager::deploy(&env, NoArgs);
    let dlc_manager_addr = dlc_manager.address().clone();
    println!("DlcManager deployed at: {:?}", dlc_manager_addr);

    println!("Deploying DlcStablecoin...");
    let mut stablecoin = DlcStablecoin::deploy(
        &env,
        DlcStablecoinInitArgs {
            name: String::from("DLC USD"),
            symbol: String::from("dUSD"),
        },
    );
    let stablecoin_addr = stablecoin.address().clone();
    println!("DlcStablecoin deployed at: {:?}", stablecoin_addr);

    println!("Deploying LoanEngine...");
    let loan_engine = LoanEngine::deploy(
        &env,
        LoanEngineInitArgs {
            dlc_manager: dlc_manager_addr,
            stablecoin: stablecoin_addr,
            protocol_wallet,
        },
    );
    let loan_engine_addr = loan_engine.address().clone();
    println!("LoanEngine deployed at: {:?}", loan_engine_addr);

    println!();

    // ==================== Phase 2: Cross-contract Configuration ====================
    println!("=== Phase 2: Cross-contract Configuration ===");
    println!();

    println!("Authorizing LoanEngine on DlcManager...");
    dlc_manager.whitelist_contract(loan_engine_addr);
    dlc_manager.register_contract(loan_engine_addr);
    println!("Done.");

    println!("Authorizing LoanEngine as stablecoin minter...");
    stablecoin.add_minter(loan_engine_addr);
    println!("Done.");

    // Seed the attestor registry from the environment, if provided
    if let Ok(dns_list) = std::env::var("DLC_ATTESTORS") {
        for dns in dns_list.split(',').filter(|dns| !dns.is_empty()) {
            println!("Registering attestor {dns}...");
            let id = dlc_manager.register_attestor(String::from(dns));
            println!("Registered with id {id}.");
        }
    }

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  DlcManager:     {:?}", dlc_manager_addr);
    println!("  DlcStablecoin:  {:?}", stablecoin_addr);
    println!("  LoanEngine:     {:?}", loan_engine_addr);
    println!("  ProtocolWallet: {:?}", protocol_wallet);
}
