//! reward-runner: headless driver for the reward pool engine.
//!
//! Usage:
//!   reward-runner --seed 12345 --screens 50 --count 3 --db run.db
//!   reward-runner --seed 12345 --party party.json --ipc-mode

use anyhow::Result;
use reward_pool_core::{
    config::EngineConfig,
    enemy::ExistingBuff,
    engine::RewardEngine,
    offers::OfferRequest,
    party::{BattlerSummary, MoveSummary, RewardContext},
    rng::{RewardRng, SessionRng, StreamSlot},
    session::RewardSession,
    store::RewardStore,
    types::{GameMode, MoveCategory, PokemonType, PoolKind, Tier},
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    DrawOffers {
        count: usize,
        #[serde(default)]
        reroll: bool,
    },
    EnemyBuff {
        tier: Tier,
        #[serde(default)]
        existing: Vec<ExistingBuff>,
    },
    EnemyDrops {
        pool: PoolKind,
        count: usize,
        #[serde(default)]
        upgrade_chance: u32,
    },
    DailyStarter,
    Shop {
        base_cost: u32,
    },
    Luck,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let screens = parse_arg(&args, "--screens", 20u32);
    let count = parse_arg(&args, "--count", 3usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let party_path = flag_value(&args, "--party");

    if !ipc_mode {
        println!("Reward Pool Engine: reward-runner");
        println!("  seed:      {seed}");
        println!("  screens:   {screens}");
        println!("  count:     {count}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = EngineConfig::load(data_dir)?;
    let engine = RewardEngine::new(config)?;
    let store = if db == ":memory:" {
        RewardStore::in_memory()?
    } else {
        RewardStore::open(db)?
    };
    store.migrate()?;

    let party = match party_path {
        Some(path) => load_party(path)?,
        None => synthesize_party(seed),
    };
    let run_id = format!("run-{seed}");
    let mut session = RewardSession::new(run_id, seed, engine, store)?;

    if ipc_mode {
        run_ipc_loop(&mut session, &party)?;
    } else {
        run_batch(&mut session, &party, screens, count)?;
        print_summary(&session, &party)?;
    }
    Ok(())
}

fn run_ipc_loop(session: &mut RewardSession, party: &[BattlerSummary]) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut wave = 0u32;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if let IpcCommand::Quit = cmd {
            break;
        }
        if let IpcCommand::DrawOffers { reroll: false, .. } = cmd {
            wave += 1;
        }
        let ctx = RewardContext::new(wave.max(1));

        let reply = match handle_command(session, party, &ctx, cmd) {
            Ok(value) => value,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    session: &mut RewardSession,
    party: &[BattlerSummary],
    ctx: &RewardContext,
    cmd: IpcCommand,
) -> Result<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::DrawOffers { count, reroll } => {
            let request = OfferRequest::new(count);
            let sheet = if reroll {
                session.reroll_offers(party, ctx, &request)?
            } else {
                session.draw_offers(party, ctx, &request)?
            };
            serde_json::json!({ "wave": ctx.wave_index, "offers": sheet })
        }
        IpcCommand::EnemyBuff { tier, existing } => {
            let grant = session.enemy_buff(tier, &existing, party, ctx)?;
            serde_json::json!({ "buff": grant })
        }
        IpcCommand::EnemyDrops {
            pool,
            count,
            upgrade_chance,
        } => {
            let drops = session.enemy_drops(pool, party, ctx, count, upgrade_chance)?;
            serde_json::json!({ "drops": drops })
        }
        IpcCommand::DailyStarter => {
            let daily = ctx.clone().with_mode(GameMode::Daily);
            let grants = session.daily_starter_kit(party, &daily)?;
            serde_json::json!({ "starter_items": grants })
        }
        IpcCommand::Shop { base_cost } => {
            let offers = session.shop(ctx.wave_index, base_cost)?;
            serde_json::json!({ "wave": ctx.wave_index, "shop": offers })
        }
        IpcCommand::Luck => {
            let luck = session.luck(party)?;
            serde_json::json!({
                "luck": luck,
                "grade": reward_pool_core::party::luck_grade(luck),
                "tint": reward_pool_core::party::luck_tint_tier(luck),
            })
        }
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

/// One reward screen per wave, with an opponent drop and a shop visit.
fn run_batch(session: &mut RewardSession, party: &[BattlerSummary], screens: u32, count: usize) -> Result<()> {
    for wave in 1..=screens {
        let ctx = RewardContext::new(wave);
        session.draw_offers(party, &ctx, &OfferRequest::new(count))?;
        let pool = if wave % 2 == 0 { PoolKind::Trainer } else { PoolKind::Wild };
        session.enemy_drops(pool, party, &ctx, 1, 10)?;
        session.shop(wave, 200)?;
    }
    Ok(())
}

fn print_summary(session: &RewardSession, party: &[BattlerSummary]) -> Result<()> {
    let log = session.event_log()?;
    let mut by_tier: BTreeMap<Tier, u32> = BTreeMap::new();
    let mut upgrades = 0u32;
    let mut offers = 0u32;
    for entry in log.iter().filter(|e| e.event_type == "offers_drawn") {
        let payload: serde_json::Value = serde_json::from_str(&entry.payload)?;
        for offer in payload["offers"].as_array().into_iter().flatten() {
            let tier: Tier = serde_json::from_value(offer["tier"].clone())?;
            *by_tier.entry(tier).or_default() += 1;
            upgrades += offer["upgrade_count"].as_u64().unwrap_or(0) as u32;
            offers += 1;
        }
    }

    println!("=== Reward summary ===");
    println!("  Screens:      {}", session.screen_index());
    println!("  Party size:   {}", party.len());
    println!("  Party luck:   {}", session.engine().compute_party_luck(party));
    println!("  Offers:       {offers}");
    for (tier, n) in &by_tier {
        println!("    {:<8} {n}", tier.name());
    }
    println!("  Upgrades:     {upgrades}");
    println!("  RNG draws:    {}", session.rng_draws());
    println!("  Log entries:  {}", log.len());
    Ok(())
}

fn load_party(path: &str) -> Result<Vec<BattlerSummary>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let party: Vec<BattlerSummary> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
    log::info!("Loaded party of {} from {path}", party.len());
    Ok(party)
}

/// A plausible party drawn from its own stream so it never shifts the
/// reward stream.
fn synthesize_party(seed: u64) -> Vec<BattlerSummary> {
    let mut rng = SessionRng::new(seed, StreamSlot::PartySynthesis);
    let size = 3 + rng.next_int(4, "Party size") as usize;
    (0..size as u32)
        .map(|id| {
            let species = 1 + rng.next_int(1000, "Species");
            let level = 5 + rng.next_int(60, "Level");
            let mut member = BattlerSummary::new(id + 1, species, level);
            let primary = PokemonType::STANDARD[rng.next_int(18, "Type") as usize];
            member.types = vec![primary];
            member.hp = member.max_hp - rng.next_int(member.max_hp, "Damage taken");
            member.shiny = rng.next_int(16, "Shiny") == 0;
            member.luck = if member.shiny { 1 + rng.next_int(3, "Variant") } else { 0 };
            member.moves = (0..4)
                .map(|slot| {
                    let move_type = PokemonType::STANDARD[rng.next_int(18, "Move type") as usize];
                    let category = match rng.next_int(3, "Move category") {
                        0 => MoveCategory::Physical,
                        1 => MoveCategory::Special,
                        _ => MoveCategory::Status,
                    };
                    MoveSummary::new(10 * (id + 1) + slot, move_type, category, 15)
                })
                .collect();
            member
        })
        .collect()
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
