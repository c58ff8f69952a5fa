use std::{error::Error, path::PathBuf};

use clap::Parser;
use database::{seed_defaults, DatabaseConfig, MemoryStore, PersistenceGateway, SqliteStore};
use engine::{
    persistence::{
        load_catalog, load_frequent_players, load_last_config, load_presets, load_rules,
    },
    roster::MAX_SUGGESTIONS,
    run_match, start_match, AppConfig, DurabilityLog, SessionState, SetupDraft,
};
use itertools::Itertools;
use strategies::{ConsoleObserver, FirstTargetStrategy, InputStrategy};
use types::{RoleId, Strategy};

#[derive(Parser, Debug)]
struct Params {
    /// Player names in seating order
    #[arg(short, long)]
    player: Vec<String>,

    /// Number of players, defaults to the number of names (at least 8)
    #[arg(short = 'n', long)]
    players: Option<usize>,

    /// Role and count such as `werewolf=2`
    #[arg(short, long, value_parser = parse_role_count)]
    role: Vec<(RoleId, usize)>,

    /// Built-in or stored preset id such as `classic_8`
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    jester: bool,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    database_url: Option<String>,

    /// Let the first eligible target be chosen at every step
    #[arg(long)]
    auto: bool,

    /// Start with the table size and roles of the last match
    #[arg(long = "continue", conflicts_with_all = ["players", "role", "preset", "jester"])]
    resume: bool,
}

fn parse_role_count(s: &str) -> Result<(RoleId, usize), String> {
    let (role, count) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected ROLE=COUNT, got {s:?}"))?;
    let role = role.trim().parse::<RoleId>()?;
    let count = count
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("Invalid count {count:?}: {err}"))?;
    Ok((role, count))
}

async fn open_store(config: &DatabaseConfig) -> Box<dyn PersistenceGateway> {
    match SqliteStore::connect(config).await {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("Falling back to an in-memory store: {err}");
            Box::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let app = AppConfig::load_optional(args.config.as_deref())?;
    let db_config = DatabaseConfig::from_cli_or_env_or_yaml(
        args.database_url.clone(),
        app.database_url.clone(),
    );
    let mut store = open_store(&db_config).await;
    match seed_defaults(store.as_mut()).await {
        Ok(report) if !report.is_empty() => log::info!("Seeded defaults: {report:?}"),
        Ok(_) => {}
        Err(err) => log::warn!("Could not seed defaults: {err}"),
    }

    let catalog = load_catalog(&*store).await.unwrap_or_else(|err| {
        log::warn!("Using built-in roles: {err}");
        Default::default()
    });
    let presets = load_presets(&*store).await.unwrap_or_else(|err| {
        log::warn!("Using built-in presets: {err}");
        types::builtin_presets()
    });
    let rules = if args.config.is_some() {
        app.house_rules
    } else {
        load_rules(&*store).await.unwrap_or_else(|err| {
            log::warn!("Using default house rules: {err}");
            Default::default()
        })
    };
    let mut frequent = load_frequent_players(&*store).await.unwrap_or_default();

    let mut draft = if args.resume {
        let config = load_last_config(&*store)
            .await?
            .ok_or("No previous match to continue")?;
        log::info!("Continuing the configuration saved at {}", config.date);
        SetupDraft::from_saved_config(&config)
    } else {
        let mut draft = SetupDraft::new();
        draft.set_include_jester(args.jester || app.include_jester);
        draft
    };
    if let Some(id) = &args.preset {
        let preset = presets.iter().find(|preset| &preset.id == id).ok_or_else(|| {
            let known = presets.iter().map(|p| &p.id).join(", ");
            format!("Unknown preset {id:?}, known: {known}")
        })?;
        draft.select_preset(preset);
    }
    match args.players {
        Some(count) => draft.set_player_count(count),
        None if args.resume => {}
        None if args.preset.is_none() && args.player.len() > draft.player_count() => {
            draft.set_player_count(args.player.len())
        }
        None => {}
    }
    draft.fill_names(&args.player);
    if args.player.is_empty() {
        let suggestions = frequent.suggestions("", &[] as &[&str], MAX_SUGGESTIONS);
        if !suggestions.is_empty() {
            println!("Frequent players: {}", suggestions.join(", "));
        }
    }
    if !args.role.is_empty() {
        for (role, count) in &args.role {
            draft.update_role_count(*role, *count);
        }
    } else if args.preset.is_none() && !args.resume {
        draft.suggest_balanced();
    }
    println!(
        "{} players, {} roles: {}",
        draft.player_count(),
        draft.total_selected(),
        draft.role_counts()
    );

    let mut state = SessionState::default();
    let mut durability = DurabilityLog::new();
    start_match(
        &mut state,
        &draft,
        rules,
        store.as_mut(),
        &mut durability,
        &mut frequent,
    )
    .await?;

    let mut strategy: Box<dyn Strategy> = if args.auto {
        Box::new(FirstTargetStrategy::default())
    } else {
        Box::new(InputStrategy::default())
    };
    let mut observer = ConsoleObserver::default();
    let report = run_match(
        &mut state,
        &catalog,
        strategy.as_mut(),
        &mut observer,
        store.as_mut(),
        &mut durability,
    )
    .await?;
    log::info!("Match over after {} rounds: {}", report.rounds, report.message);

    if durability.is_degraded() {
        let replayed = durability.retry(store.as_mut()).await;
        log::info!("Replayed {replayed} failed writes");
    }
    if durability.is_degraded() {
        eprintln!("Some writes could not be saved:\n{}", durability.export()?);
    }
    Ok(())
}
