use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::config::Settings;
use crate::data::dataset::{read_text, Dataset};
use crate::data::reference::ReferenceData;
use crate::data::requirements::{summarize_requirements, RequirementSummary};
use crate::integrity::{validate_json, validate_json_with_reference, ValidationSeverity};
use crate::synergy::{synergy_partners, SynergyLink};
use crate::tier::{resolve_all_with_pool, resolve_character, TierBreakdown, TierResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Validate,
    Tier,
    Report,
    Sort,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("validate") => Some(Command::Validate),
        Some("tier") => Some(Command::Tier),
        Some("report") => Some(Command::Report),
        Some("sort") => Some(Command::Sort),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let settings = Settings::from_env();
    match parse_command(args) {
        Some(Command::Validate) => handle_validate(args, &settings),
        Some(Command::Tier) => handle_tier(args, &settings),
        Some(Command::Report) => handle_report(args, &settings),
        Some(Command::Sort) => handle_sort(args, &settings),
        None => {
            eprintln!("usage: tierlist <validate|tier|report|sort>");
            2
        }
    }
}

/// Explanation payload for one character.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierExplanation {
    pub character_id: String,
    pub final_tier: i64,
    pub breakdown: TierBreakdown,
    pub partners: Vec<SynergyLink>,
    pub requirements: RequirementSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierReport {
    pub generated_at: String,
    pub dataset: String,
    pub characters: Vec<TierResolution>,
}

fn dataset_path<'a>(arg: Option<&'a String>, settings: &'a Settings) -> &'a str {
    arg.map(String::as_str).unwrap_or(&settings.dataset_path)
}

fn load_reference(settings: &Settings) -> Option<ReferenceData> {
    match ReferenceData::load_or_default(&settings.reference_path) {
        Ok(reference) => Some(reference),
        Err(err) => {
            eprintln!("reference data error: {err}");
            None
        }
    }
}

fn load_dataset(path: &str) -> Option<Dataset> {
    match Dataset::load(path) {
        Ok(dataset) => Some(dataset),
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String], settings: &Settings) -> i32 {
    let path = dataset_path(args.get(2), settings);
    let raw = match read_text(Path::new(path)) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let report = if Path::new(&settings.reference_path).exists() {
        let Some(reference) = load_reference(settings) else {
            return 1;
        };
        validate_json_with_reference(&raw, &reference)
    } else {
        validate_json(&raw)
    };

    let errors = report.errors().count();
    let warnings = report.diagnostics.len() - errors;
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        for diagnostic in &report.diagnostics {
            eprintln!("- {diagnostic}");
        }
        return 1;
    }

    for diagnostic in report
        .diagnostics
        .iter()
        .filter(|d| d.severity == ValidationSeverity::Warning)
    {
        eprintln!("- {diagnostic}");
    }
    println!("validation passed: {path} ({warnings} warning(s))");
    0
}

fn handle_tier(args: &[String], settings: &Settings) -> i32 {
    let Some(id) = args.get(2) else {
        eprintln!("usage: tierlist tier <character-id> [dataset.json]");
        return 2;
    };
    let path = dataset_path(args.get(3), settings);
    let Some(dataset) = load_dataset(path) else {
        return 1;
    };
    let Some(reference) = load_reference(settings) else {
        return 1;
    };
    let Some(target) = dataset.get(id) else {
        eprintln!("unknown character '{id}' in {path}");
        return 1;
    };

    let resolution = resolve_character(target, &dataset, &reference, &settings.resolve_options());
    let explanation = TierExplanation {
        character_id: resolution.character_id,
        final_tier: resolution.final_tier,
        breakdown: resolution.breakdown,
        partners: synergy_partners(target, &dataset),
        requirements: summarize_requirements(target, &reference),
    };
    print_json(&explanation, "tier explanation")
}

fn handle_report(args: &[String], settings: &Settings) -> i32 {
    let path = dataset_path(args.get(2), settings);
    let Some(dataset) = load_dataset(path) else {
        return 1;
    };
    let Some(reference) = load_reference(settings) else {
        return 1;
    };

    let characters = resolve_all_with_pool(
        &dataset,
        &reference,
        &settings.resolve_options(),
        &settings.worker_pool(),
    );
    log::info!("resolved {} character(s) from {path}", characters.len());
    let report = TierReport {
        generated_at: Utc::now().to_rfc3339(),
        dataset: path.to_string(),
        characters,
    };
    print_json(&report, "tier report")
}

fn handle_sort(args: &[String], settings: &Settings) -> i32 {
    let path = dataset_path(args.get(2), settings);
    let Some(mut dataset) = load_dataset(path) else {
        return 1;
    };
    let already_sorted = dataset.is_sorted_by_id();
    dataset.sort_by_id();
    match dataset.save(path) {
        Ok(()) => {
            if already_sorted {
                println!("rewrote {} record(s) in canonical form: {path}", dataset.len());
            } else {
                println!("sorted {} record(s) by id: {path}", dataset.len());
            }
            0
        }
        Err(err) => {
            eprintln!("failed to save dataset: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parses_known_commands_only() {
        assert_eq!(parse_command(&args(&["tierlist", "tier", "A"])), Some(Command::Tier));
        assert_eq!(parse_command(&args(&["tierlist", "sort"])), Some(Command::Sort));
        assert_eq!(parse_command(&args(&["tierlist", "serve"])), None);
        assert_eq!(parse_command(&args(&["tierlist"])), None);
    }

    #[test]
    fn missing_command_and_missing_id_are_usage_errors() {
        assert_eq!(run_with_args(&args(&["tierlist"])), 2);
        assert_eq!(run_with_args(&args(&["tierlist", "tier"])), 2);
    }
}
