//! Stone Age companion CLI
//!
//! The `stoneage` command fronts the calculators and the reference catalog.
//!
//! ## Commands
//!
//! - `rebirth`: evaluate the five rebirth tiers, optionally saving the form
//! - `entries`: list, show or delete saved calculator entries
//! - `pet`: search pets, show a record, compute growth at a level
//! - `boarding`: which pets each character can ride, and riding images

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, Level};

use stoneage_core::obs::{self, EntrySpan};
use stoneage_core::pet::MAX_PET_LEVEL;
use stoneage_core::{
    calculate_pet_stats, BoardingView, Catalog, CompanionConfig, PetGrowthResult, PetRecord,
    RebirthInputs, Stat, StatInput, TierResult, TIER_COUNT,
};
use stoneage_store::{
    format_timestamp, EntryId, EntryStore, JsonFileStore, SavedEntry, StorageError,
};

#[derive(Parser)]
#[command(name = "stoneage")]
#[command(author = "Stone Age Light Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stone Age companion: rebirth and pet calculators, boarding search", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory holding the pet, boarding and riding datasets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Saved-entry store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the five rebirth tiers
    ///
    /// Starts from level 140 with every point in con (or from a saved entry),
    /// then applies --levels, --stats and --set in that order.
    Rebirth {
        /// Comma-separated levels, first tier first (e.g. 140,140,120)
        #[arg(long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Replace one tier's allocation: TIER=con,wis,dex[,agi] (tiers 1-5)
        #[arg(long = "stats", value_parser = parse_tier_stats)]
        stats: Vec<TierStats>,

        /// Edit one stat like the form does: TIER:STAT=VALUE (e.g. 2:wis=80)
        #[arg(long = "set", value_parser = parse_stat_edit)]
        edits: Vec<StatEdit>,

        /// Start from a saved entry (id or unique id prefix)
        #[arg(long)]
        from: Option<String>,

        /// Save the resulting form under this title
        #[arg(long)]
        save: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage saved calculator entries
    Entries {
        #[command(subcommand)]
        action: EntriesAction,
    },

    /// Pet catalog and growth calculator
    Pet {
        #[command(subcommand)]
        action: PetAction,
    },

    /// Character boarding lists
    #[command(args_conflicts_with_subcommands = true)]
    Boarding {
        #[command(subcommand)]
        action: Option<BoardingAction>,

        /// Only show this character
        #[arg(short, long)]
        character: Option<String>,

        /// Filter by character or pet name (initial consonants allowed)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum EntriesAction {
    /// List saved entries, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a saved entry with its computed tiers
    Show {
        /// Entry id or unique id prefix
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete a saved entry
    Delete {
        /// Entry id or unique id prefix
        id: String,
    },
}

#[derive(Subcommand)]
enum PetAction {
    /// Search pets by name, grade or source
    Search {
        /// Search text; consonant-only queries match initials (ㅎㅂㅌ)
        #[arg(default_value = "")]
        query: String,

        /// Maximum results (default from configuration)
        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Pet attributes at a given level
    Growth {
        /// Pet name
        name: String,

        /// Target level (1-140)
        #[arg(short, long, default_value_t = MAX_PET_LEVEL)]
        level: u32,

        #[arg(long)]
        json: bool,
    },

    /// Full record of one pet
    Show {
        /// Pet name
        name: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BoardingAction {
    /// Image of a character riding a pet
    Image {
        /// Pet name as shown in the boarding list
        pet: String,

        /// Character name
        #[arg(short, long)]
        character: String,
    },
}

/// `--stats` argument: one tier's full allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TierStats {
    tier: usize,
    stats: StatInput,
}

/// `--set` argument: a single form edit.
#[derive(Debug, Clone, PartialEq)]
struct StatEdit {
    tier: usize,
    stat: Stat,
    raw: String,
}

fn parse_tier(raw: &str) -> Result<usize, String> {
    let n: usize = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid tier '{}'", raw))?;
    if (1..=TIER_COUNT).contains(&n) {
        Ok(n - 1)
    } else {
        Err(format!("tier must be 1-{}, got {}", TIER_COUNT, n))
    }
}

fn parse_tier_stats(raw: &str) -> Result<TierStats, String> {
    let (tier, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TIER=con,wis,dex[,agi], got '{}'", raw))?;
    let tier = parse_tier(tier)?;

    let values: Vec<u32> = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid stat value '{}'", v))
        })
        .collect::<Result<_, _>>()?;

    let stats = match values.as_slice() {
        [con, wis, dex] => StatInput::new(*con, *wis, *dex, 0),
        [con, wis, dex, agi] => StatInput::new(*con, *wis, *dex, *agi),
        _ => return Err(format!("expected 3 or 4 values, got {}", values.len())),
    };
    Ok(TierStats { tier, stats })
}

fn parse_stat_edit(raw: &str) -> Result<StatEdit, String> {
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TIER:STAT=VALUE, got '{}'", raw))?;
    let (tier, stat) = target
        .split_once(':')
        .ok_or_else(|| format!("expected TIER:STAT=VALUE, got '{}'", raw))?;
    Ok(StatEdit {
        tier: parse_tier(tier)?,
        stat: stat.parse().map_err(|e| format!("{}", e))?,
        raw: value.to_string(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CompanionConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(store) = cli.store.clone() {
        config.store_path = store;
    }

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    stoneage_core::init_tracing(cli.json_logs || config.log_json, level);
    debug!(
        data_dir = %config.data_dir.display(),
        store = %config.store_path.display(),
        "stoneage starting"
    );

    match cli.command {
        Commands::Rebirth {
            levels,
            stats,
            edits,
            from,
            save,
            json,
        } => {
            let store = open_store(&config)?;
            cmd_rebirth(
                &store,
                &RebirthArgs {
                    levels,
                    stats,
                    edits,
                    from,
                    save,
                },
                json,
            )
        }
        Commands::Entries { action } => {
            let store = open_store(&config)?;
            match action {
                EntriesAction::List { json } => cmd_entries_list(&store, json),
                EntriesAction::Show { id, json } => cmd_entries_show(&store, &id, json),
                EntriesAction::Delete { id } => cmd_entries_delete(&store, &id),
            }
        }
        Commands::Pet { action } => {
            let catalog = load_catalog(&config)?;
            match action {
                PetAction::Search { query, limit, json } => {
                    cmd_pet_search(&catalog, &query, limit.unwrap_or(config.search_limit), json)
                }
                PetAction::Growth { name, level, json } => {
                    cmd_pet_growth(&catalog, &name, level, json)
                }
                PetAction::Show { name, json } => cmd_pet_show(&catalog, &name, json),
            }
        }
        Commands::Boarding {
            action,
            character,
            query,
            json,
        } => {
            let catalog = load_catalog(&config)?;
            match action {
                Some(BoardingAction::Image { pet, character }) => {
                    cmd_boarding_image(&catalog, &pet, &character)
                }
                None => cmd_boarding(&catalog, character.as_deref(), &query, json),
            }
        }
    }
}

fn open_store(config: &CompanionConfig) -> Result<JsonFileStore> {
    JsonFileStore::open(&config.store_path).with_context(|| {
        format!(
            "Failed to open entry store at {}",
            config.store_path.display()
        )
    })
}

fn load_catalog(config: &CompanionConfig) -> Result<Catalog> {
    Catalog::load(&config.data_dir).with_context(|| {
        format!(
            "Failed to load datasets from {} (set --data-dir or STONEAGE_DATA_DIR)",
            config.data_dir.display()
        )
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ========== Rebirth ==========

/// Everything `rebirth` needs besides the output format.
#[derive(Debug, Default)]
struct RebirthArgs {
    levels: Vec<String>,
    stats: Vec<TierStats>,
    edits: Vec<StatEdit>,
    from: Option<String>,
    save: Option<String>,
}

#[derive(Serialize)]
struct RebirthOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<&'a SavedEntry>,
    inputs: &'a RebirthInputs,
    results: &'a [TierResult],
}

/// Build the calculator form from a starting point plus command-line edits.
fn build_inputs(start: RebirthInputs, args: &RebirthArgs) -> Result<RebirthInputs> {
    if args.levels.len() > TIER_COUNT {
        bail!(
            "--levels takes at most {} values, got {}",
            TIER_COUNT,
            args.levels.len()
        );
    }

    let mut inputs = start;
    for (tier, raw) in args.levels.iter().enumerate() {
        inputs.set_level_text(tier, raw)?;
    }
    for TierStats { tier, stats } in &args.stats {
        inputs.stats[*tier] = *stats;
    }
    for edit in &args.edits {
        inputs.set_stat_text(edit.tier, edit.stat, &edit.raw)?;
    }
    Ok(inputs)
}

/// Find a saved entry by full id, falling back to a unique id prefix.
fn resolve_entry(store: &dyn EntryStore, raw: &str) -> Result<SavedEntry> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("Entry id must not be empty");
    }

    match store.load(&EntryId::from(raw)) {
        Ok(entry) => return Ok(entry),
        Err(StorageError::EntryNotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let mut matches = store
        .list()?
        .into_iter()
        .filter(|e| e.id.as_str().starts_with(raw));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (None, _) => bail!("No saved entry matches '{}'", raw),
        (Some(_), Some(_)) => bail!("Entry id '{}' is ambiguous, use more characters", raw),
    }
}

fn cmd_rebirth(store: &dyn EntryStore, args: &RebirthArgs, json: bool) -> Result<()> {
    let start = match &args.from {
        Some(id) => {
            let entry = resolve_entry(store, id)?;
            let _span = EntrySpan::enter(entry.id.as_str());
            obs::emit_entry_loaded(entry.id.as_str(), &entry.title);
            entry.inputs()
        }
        None => RebirthInputs::default(),
    };

    let inputs = build_inputs(start, args)?;
    let results = inputs.compute();
    obs::emit_rebirth_computed(&results);

    let saved = match &args.save {
        Some(title) => {
            let entry = store
                .create(title, &inputs)
                .context("Failed to save entry")?;
            obs::emit_entry_saved(entry.id.as_str(), &entry.title);
            Some(entry)
        }
        None => None,
    };

    if json {
        return print_json(&RebirthOutput {
            entry: saved.as_ref(),
            inputs: &inputs,
            results: &results,
        });
    }

    print!("{}", render_tiers(&results));
    if let Some(entry) = saved {
        println!();
        println!("Saved '{}' as {}", entry.title, entry.id.short());
    }
    Ok(())
}

fn render_tiers(results: &[TierResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:>5} {:>6} {:>5} {:>5} {:>5} {:>5} {:>7} {:>5} {:>5} {:>8}\n",
        "tier", "level", "points", "con", "wis", "dex", "agi", "applied", "bonus", "final", "actual"
    ));
    for r in results {
        let marker = if r.is_max() { "  MAX" } else { "" };
        out.push_str(&format!(
            "{:<4} {:>5} {:>6} {:>5} {:>5} {:>5} {:>5} {:>7} {:>5} {:>5} {:>8.2}{}\n",
            format!("{}환", r.tier + 1),
            r.level,
            r.available_points,
            r.stats.con,
            r.stats.wis,
            r.stats.dex,
            r.stats.agi,
            r.applied_total(),
            r.bonus,
            r.final_rebirth_value,
            r.decimal_total(),
            marker
        ));
        if r.unallocated() > 0 {
            out.push_str(&format!("     ({} points unallocated)\n", r.unallocated()));
        }
    }
    out
}

// ========== Saved entries ==========

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntrySummary<'a> {
    id: &'a str,
    title: &'a str,
    timestamp: String,
    final_rebirth_value: u32,
}

fn final_value(entry: &SavedEntry) -> u32 {
    entry.inputs().compute()[TIER_COUNT - 1].final_rebirth_value
}

fn cmd_entries_list(store: &dyn EntryStore, json: bool) -> Result<()> {
    let entries = store.list().context("Failed to list saved entries")?;

    if json {
        let summaries: Vec<EntrySummary> = entries
            .iter()
            .map(|e| EntrySummary {
                id: e.id.as_str(),
                title: &e.title,
                timestamp: e.timestamp.to_rfc3339(),
                final_rebirth_value: final_value(e),
            })
            .collect();
        return print_json(&summaries);
    }

    if entries.is_empty() {
        println!("No saved entries. Use 'stoneage rebirth --save TITLE' to create one.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {}  final {:>3}  {}",
            entry.id.short(),
            format_timestamp(&entry.timestamp),
            final_value(entry),
            entry.title
        );
    }
    Ok(())
}

fn cmd_entries_show(store: &dyn EntryStore, id: &str, json: bool) -> Result<()> {
    let entry = resolve_entry(store, id)?;
    let _span = EntrySpan::enter(entry.id.as_str());
    obs::emit_entry_loaded(entry.id.as_str(), &entry.title);

    let inputs = entry.inputs();
    let results = inputs.compute();

    if json {
        return print_json(&RebirthOutput {
            entry: Some(&entry),
            inputs: &inputs,
            results: &results,
        });
    }

    println!("{}  {}", entry.title, format_timestamp(&entry.timestamp));
    println!("id: {}", entry.id);
    println!();
    print!("{}", render_tiers(&results));
    Ok(())
}

fn cmd_entries_delete(store: &dyn EntryStore, id: &str) -> Result<()> {
    let entry = resolve_entry(store, id)?;
    store
        .delete(&entry.id)
        .with_context(|| format!("Failed to delete entry '{}'", entry.id))?;
    obs::emit_entry_deleted(entry.id.as_str());

    println!("Deleted '{}' ({})", entry.title, entry.id.short());
    Ok(())
}

// ========== Pets ==========

/// Exact name first, then ignoring the `(환)` marker.
fn lookup_pet<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a PetRecord> {
    catalog
        .find_pet(name)
        .or_else(|| catalog.find_pet_loose(name))
        .with_context(|| format!("No pet named '{}'", name))
}

fn cmd_pet_search(catalog: &Catalog, query: &str, limit: usize, json: bool) -> Result<()> {
    let pets = catalog.search_pets(query, limit);

    if json {
        return print_json(&pets);
    }

    if pets.is_empty() {
        println!("No pets match '{}'", query);
        return Ok(());
    }

    for pet in pets {
        println!(
            "{}  [{}] {}  growth {:.2}{}",
            pet.name,
            pet.grade,
            pet.source,
            pet.total_growth,
            if pet.rideable { "  rideable" } else { "" }
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct GrowthOutput<'a> {
    pet: &'a str,
    #[serde(flatten)]
    growth: PetGrowthResult,
}

fn cmd_pet_growth(catalog: &Catalog, name: &str, level: u32, json: bool) -> Result<()> {
    let pet = lookup_pet(catalog, name)?;
    let growth = calculate_pet_stats(pet, level);

    if json {
        return print_json(&GrowthOutput {
            pet: &pet.name,
            growth,
        });
    }

    println!("{} Lv.{}", pet.name, growth.level);
    print!("{}", render_growth(&growth));
    Ok(())
}

fn render_growth(growth: &PetGrowthResult) -> String {
    format!(
        "  attack   {:>5}\n  defense  {:>5}\n  agility  {:>5}\n  vitality {:>5}\n",
        growth.attack, growth.defense, growth.agility, growth.vitality
    )
}

fn cmd_pet_show(catalog: &Catalog, name: &str, json: bool) -> Result<()> {
    let pet = lookup_pet(catalog, name)?;
    let riders = catalog.riding_characters(&pet.name);

    if json {
        return print_json(&serde_json::json!({
            "pet": pet,
            "maxLevel": calculate_pet_stats(pet, MAX_PET_LEVEL),
            "ridingCharacters": riders,
        }));
    }

    println!("{} [{}]  {}", pet.name, pet.grade, pet.source);
    println!(
        "base    atk {} / def {} / agi {} / vit {}",
        pet.base_stats.attack,
        pet.base_stats.defense,
        pet.base_stats.agility,
        pet.base_stats.vitality
    );
    println!(
        "growth  atk {:.2} / def {:.2} / agi {:.2} / vit {:.2}  (total {:.2})",
        pet.growth_stats.attack,
        pet.growth_stats.defense,
        pet.growth_stats.agility,
        pet.growth_stats.vitality,
        pet.total_growth
    );
    let e = &pet.element_stats;
    println!(
        "element earth {} / water {} / fire {} / wind {}",
        e.earth, e.water, e.fire, e.wind
    );
    println!("Lv.{}:", MAX_PET_LEVEL);
    print!("{}", render_growth(&calculate_pet_stats(pet, MAX_PET_LEVEL)));
    if riders.is_empty() {
        println!("riders: none");
    } else {
        println!("riders: {}", riders.join(", "));
    }
    Ok(())
}

// ========== Boarding ==========

fn cmd_boarding(catalog: &Catalog, character: Option<&str>, query: &str, json: bool) -> Result<()> {
    let view = catalog.filter_boarding(character, query);

    if json {
        return print_json(&view);
    }

    if view.is_empty() {
        match character {
            Some(name) if !catalog.boarding().contains_key(name) => {
                println!("Unknown character '{}'", name)
            }
            _ => println!("No boarding entries match '{}'", query.trim()),
        }
        return Ok(());
    }

    print!("{}", render_boarding(catalog, &view));
    Ok(())
}

fn render_boarding(catalog: &Catalog, view: &BoardingView) -> String {
    let mut out = String::new();
    for (character, pets) in view.entries.iter() {
        out.push_str(&format!("{} ({})\n", character, pets.len()));
        for pet in pets {
            let image = catalog.pet_image(pet, character).unwrap_or("-");
            out.push_str(&format!("  {}  {}\n", pet, image));
        }
    }
    out.push_str(&format!(
        "{} characters, {} pets\n",
        view.total_characters(),
        view.total_pets()
    ));
    out
}

fn cmd_boarding_image(catalog: &Catalog, pet: &str, character: &str) -> Result<()> {
    match catalog.pet_image(pet, character) {
        Some(url) => println!("{}", url),
        None => bail!("No image for '{}' riding '{}'", character, pet),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use stoneage_core::MAX_REBIRTH;
    use stoneage_store::MemoryEntryStore;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_tier_is_one_based() {
        assert_eq!(parse_tier("1"), Ok(0));
        assert_eq!(parse_tier("5"), Ok(4));
        assert!(parse_tier("0").is_err());
        assert!(parse_tier("6").is_err());
        assert!(parse_tier("x").is_err());
    }

    #[test]
    fn parse_tier_stats_with_and_without_agi() {
        let three = parse_tier_stats("2=300,100,50").unwrap();
        assert_eq!(three.tier, 1);
        assert_eq!(three.stats, StatInput::new(300, 100, 50, 0));

        let four = parse_tier_stats("5=1, 2, 3, 4").unwrap();
        assert_eq!(four.stats, StatInput::new(1, 2, 3, 4));

        assert!(parse_tier_stats("2=1,2").is_err());
        assert!(parse_tier_stats("2:1,2,3").is_err());
        assert!(parse_tier_stats("2=a,b,c").is_err());
    }

    #[test]
    fn parse_stat_edit_accepts_codes_and_labels() {
        let edit = parse_stat_edit("3:wis=80").unwrap();
        assert_eq!((edit.tier, edit.stat, edit.raw.as_str()), (2, Stat::Wis, "80"));

        let korean = parse_stat_edit("1:건강=12").unwrap();
        assert_eq!(korean.stat, Stat::Dex);

        assert!(parse_stat_edit("1:luck=3").is_err());
        assert!(parse_stat_edit("1=3").is_err());
    }

    #[test]
    fn cli_parses_rebirth_flags() {
        let cli = Cli::try_parse_from([
            "stoneage",
            "rebirth",
            "--levels",
            "140,120",
            "--set",
            "1:wis=100",
            "--set",
            "2:dex=5",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Rebirth {
                levels,
                edits,
                json,
                ..
            } => {
                assert_eq!(levels, vec!["140", "120"]);
                assert_eq!(edits.len(), 2);
                assert!(json);
            }
            _ => panic!("expected rebirth"),
        }
    }

    #[test]
    fn cli_boarding_with_and_without_subcommand() {
        let cli = Cli::try_parse_from(["stoneage", "boarding", "-q", "ㅎㅂㅌ"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Boarding { action: None, ref query, .. } if query == "ㅎㅂㅌ"
        ));

        let cli =
            Cli::try_parse_from(["stoneage", "boarding", "image", "헬비스트", "-c", "카이"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Boarding {
                action: Some(BoardingAction::Image { .. }),
                ..
            }
        ));
    }

    #[test]
    fn build_inputs_applies_levels_stats_then_edits() {
        let args = RebirthArgs {
            levels: vec!["140".into(), "abc".into()],
            stats: vec![parse_tier_stats("3=10,20,30").unwrap()],
            edits: vec![parse_stat_edit("1:wis=100").unwrap()],
            ..RebirthArgs::default()
        };
        let inputs = build_inputs(RebirthInputs::default(), &args).unwrap();

        assert_eq!(inputs.levels[0], 140);
        assert_eq!(inputs.levels[1], 1);
        assert_eq!(inputs.stats[0], StatInput::new(337, 100, 0, 0));
        assert_eq!(inputs.stats[2], StatInput::new(10, 20, 30, 0));
    }

    #[test]
    fn build_inputs_rejects_too_many_levels() {
        let args = RebirthArgs {
            levels: vec!["1".into(); 6],
            ..RebirthArgs::default()
        };
        assert!(build_inputs(RebirthInputs::default(), &args).is_err());
    }

    #[test]
    fn max_u32_stats_stay_within_budget() {
        let args = RebirthArgs {
            stats: vec![parse_tier_stats("1=0,4294967295,4294967295").unwrap()],
            ..RebirthArgs::default()
        };
        let inputs = build_inputs(RebirthInputs::default(), &args).unwrap();
        for result in inputs.compute() {
            assert!(result.stats.total() <= result.available_points);
        }
        assert!(render_tiers(&inputs.compute()).contains("437"));
    }

    #[test]
    fn default_table_marks_every_tier_max() {
        let text = render_tiers(&RebirthInputs::default().compute());
        assert_eq!(text.matches("MAX").count(), TIER_COUNT);
        assert!(text.contains(&MAX_REBIRTH[4].to_string()));
        assert!(!text.contains("unallocated"));
    }

    #[test]
    fn unallocated_points_are_reported() {
        let text = render_tiers(&RebirthInputs::empty(140).compute());
        assert!(text.contains("(437 points unallocated)"));
    }

    #[test]
    fn resolve_entry_by_prefix() {
        let store = MemoryEntryStore::new();
        let entry = store.create("tank", &RebirthInputs::default()).unwrap();

        let by_full = resolve_entry(&store, entry.id.as_str()).unwrap();
        assert_eq!(by_full.id, entry.id);

        let by_prefix = resolve_entry(&store, entry.id.short()).unwrap();
        assert_eq!(by_prefix.id, entry.id);

        assert!(resolve_entry(&store, "zzzz-not-an-id").is_err());
        assert!(resolve_entry(&store, "  ").is_err());
    }

    #[test]
    fn resolve_entry_rejects_ambiguous_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");

        let mut a = SavedEntry::new("a", &RebirthInputs::default()).unwrap();
        a.id = EntryId::from("abc-1");
        let mut b = SavedEntry::new("b", &RebirthInputs::default()).unwrap();
        b.id = EntryId::from("abc-2");
        let doc = serde_json::json!({ "version": 1, "entries": [a, b] });
        std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let err = resolve_entry(&store, "abc").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
        assert_eq!(resolve_entry(&store, "abc-2").unwrap().title, "b");
    }

    #[test]
    fn rebirth_save_then_show_round_trip() {
        let store = MemoryEntryStore::new();
        let args = RebirthArgs {
            edits: vec![parse_stat_edit("2:agi=3").unwrap()],
            save: Some("agi build".into()),
            ..RebirthArgs::default()
        };
        cmd_rebirth(&store, &args, true).unwrap();

        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "agi build");
        assert_eq!(saved[0].stats[1].agi, 3);

        cmd_entries_show(&store, saved[0].id.short(), false).unwrap();
        cmd_entries_delete(&store, saved[0].id.as_str()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn boarding_render_lists_images_and_totals() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("data");
        let catalog = Catalog::load(dir).unwrap();
        let view = catalog.filter_boarding(Some("카이"), "");
        let text = render_boarding(&catalog, &view);

        assert!(text.starts_with("카이 (3)\n"));
        assert!(text.contains("images/riding/kai-hellbeast.png"));
        assert!(text.ends_with("1 characters, 3 pets\n"));
    }
}
